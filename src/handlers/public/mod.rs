// Public handlers (no token required): catalog reads, login, feedback.

pub mod feedback;
pub mod items;
pub mod login;

pub use feedback::feedback_post;
pub use items::{item_get, items_get};
pub use login::login_post;
