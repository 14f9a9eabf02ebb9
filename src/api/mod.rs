pub mod pagination;

pub use pagination::{PageMeta, PageRequest, PageResult, PaginationError};
