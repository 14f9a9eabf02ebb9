pub mod auth;
pub mod response;

pub use auth::{authorize, require_admin, AuthError, AuthUser};
pub use response::{ApiResponse, ApiResult};
