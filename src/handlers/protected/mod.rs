// Protected handlers: every route here sits behind `middleware::require_admin`
// and receives the caller as `Extension<AuthUser>`.

pub mod items;

pub use items::{item_delete, items_add_post, items_update_put};
