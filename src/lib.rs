// src/lib.rs

// Declaração dos nossos módulos
pub mod api;
pub mod common;
pub mod config;
pub mod models;
pub mod services;
pub mod store;

// Re-exportações principais, para quem consome a crate
pub use api::{ApiClient, InMemoryApi, Notifier, TracingNotifier};
pub use common::{AppError, Messages};
pub use config::{AppConfig, AppState};
pub use store::{DashboardStore, DomainEvent, Snapshot};
