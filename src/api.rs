pub mod client;
pub use client::ApiClient;
pub mod memory;
pub use memory::InMemoryApi;
pub mod notify;
pub use notify::{BufferingNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
