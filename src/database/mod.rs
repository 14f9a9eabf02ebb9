pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryItemStore;
pub use models::{Item, ItemFields};
pub use postgres::PgItemStore;
pub use store::{bounded, ItemStore, StoreError};
