use chakula_catalog::{MenuItem, Outlet};
use serde::{Deserialize, Serialize};

/// One line in the customer's cart. Unique per menu_item_id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub menu_item_id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
    pub outlet_id: i64,
    pub outlet_name: String,
}

impl CartItem {
    /// A line for one unit of a listed dish.
    pub fn from_menu_item(item: &MenuItem, outlet: &Outlet) -> Self {
        Self {
            menu_item_id: item.id,
            name: item.item_name.clone(),
            price: item.price,
            quantity: 1,
            outlet_id: item.outlet_id,
            outlet_name: outlet.outlet_name.clone(),
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}
