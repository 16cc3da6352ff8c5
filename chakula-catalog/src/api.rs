use async_trait::async_trait;

use crate::{FoodCourtTable, MenuItem, NewMenuItem, Outlet};

/// Access to the catalog resources of the REST backend.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_menu_items(
        &self,
    ) -> Result<Vec<MenuItem>, Box<dyn std::error::Error + Send + Sync>>;

    async fn create_menu_item(
        &self,
        item: &NewMenuItem,
    ) -> Result<MenuItem, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_outlets(&self) -> Result<Vec<Outlet>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_tables(
        &self,
    ) -> Result<Vec<FoodCourtTable>, Box<dyn std::error::Error + Send + Sync>>;
}
