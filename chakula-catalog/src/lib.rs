pub mod api;
pub mod menu;
pub mod outlet;
pub mod table;

pub use api::CatalogApi;
pub use menu::{MenuFilter, MenuItem, NewMenuItem};
pub use outlet::Outlet;
pub use table::FoodCourtTable;
