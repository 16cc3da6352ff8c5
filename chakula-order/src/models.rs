use chakula_core::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status in the lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeaway,
}

/// One purchased dish inside an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub menu_item_id: i64,
    pub quantity: u32,
    pub price: i64,
}

/// POST /orders payload. Checkout creates exactly one of these per outlet
/// represented in the cart; total_amount is that outlet group's subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDraft {
    pub customer_id: i64,
    pub outlet_id: i64,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub order_type: OrderType,
    pub table_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<i64>,
    pub order_items: Vec<OrderItem>,
    pub payment_info: PaymentMethod,
    pub idempotency_key: String,
}

/// An order as held by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub outlet_id: i64,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub order_type: OrderType,
    pub table_number: String,
    #[serde(default)]
    pub reservation_id: Option<i64>,
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub payment_info: Option<PaymentMethod>,
}
