use serde::{Deserialize, Serialize};

/// A dish on an outlet's menu. Prices are integer cents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: i64,
    pub outlet_id: i64,
    pub item_name: String,
    pub price: i64,
    pub category: String,
    pub image_url: String,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Create/update payload for the owner dashboard's menu form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub outlet_id: i64,
    pub item_name: String,
    pub price: i64,
    pub category: String,
    pub image_url: String,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Client-side filtering for the menu browse view.
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub outlet_id: Option<i64>,
    pub category: Option<String>,
    pub only_available: bool,
    pub query: Option<String>,
}

impl MenuFilter {
    pub fn matches(&self, item: &MenuItem) -> bool {
        if let Some(outlet_id) = self.outlet_id {
            if item.outlet_id != outlet_id {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !item.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if self.only_available && !item.is_available {
            return false;
        }
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            let in_name = item.item_name.to_lowercase().contains(&query);
            let in_description = item
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query));
            if !in_name && !in_description {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, items: &'a [MenuItem]) -> Vec<&'a MenuItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}
