pub mod item;

pub use item::{Item, ItemFields, ItemRow};
