pub mod agent_service;
pub use agent_service::AgentService;
pub mod billing_service;
pub use billing_service::BillingService;
pub mod charge_service;
pub use charge_service::{ChargeForm, ChargeMode, ChargeStep, ChargeWizard};
pub mod client_service;
pub use client_service::ClientService;
pub mod feed_service;
pub use feed_service::FeedService;
pub mod invoice_service;
pub use invoice_service::{InvoiceService, StatusOrigin};
