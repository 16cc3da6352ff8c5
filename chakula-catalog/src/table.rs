use serde::{Deserialize, Serialize};

/// A physical table in the shared seating area, bookable per outlet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodCourtTable {
    pub id: i64,
    pub table_number: u32,
    pub capacity: u32,
    pub is_available: bool,
}
