pub mod client;
pub use client::{Client, ClientFilter, ClientPatch, CreateClientPayload};
pub mod invoice;
pub use invoice::{CreateInvoicePayload, Invoice, InvoiceFilter, InvoicePdf, InvoiceStatus};
pub mod payment;
pub use payment::{
    CardDetails, ChargeCardPayload, ChargeKind, ChargeOutcome, Payment, PaymentMethod,
    PaymentStatus,
};
pub mod subscription;
pub use subscription::Subscription;
pub mod agent;
pub use agent::{Agent, AgentRole, AgentSale, CreateAgentPayload, SaleStatus};
pub mod summary;
pub use summary::{
    ClientBillingSummary, TransactionEntry, TransactionHistory, TransactionKind,
};
