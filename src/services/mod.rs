pub mod catalog;
pub mod feedback;
pub mod mailer;

pub use catalog::{Catalog, CatalogError};
pub use feedback::{Feedback, FeedbackError, FeedbackNotifier};
pub use mailer::{HttpMailer, InlineImage, LogMailer, MailError, Mailer, OutboundMail};
