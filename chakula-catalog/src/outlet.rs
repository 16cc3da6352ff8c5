use serde::{Deserialize, Serialize};

/// A vendor operating within the food court, owning its own menu and orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Outlet {
    pub id: i64,
    pub outlet_name: String,
    pub cuisine_type: String,
    pub description: String,
    pub owner_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
