pub mod dates;
pub mod error;
pub use error::AppError;
pub mod messages;
pub use messages::{notify_failure, Messages};
pub mod money;
