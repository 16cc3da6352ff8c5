use async_trait::async_trait;

use crate::{Order, OrderDraft, OrderStatus};

/// Access to the order resources of the REST backend.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(
        &self,
        draft: &OrderDraft,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_orders(&self) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>>;
}
