// src/api/client.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        Agent, AgentSale, ChargeCardPayload, ChargeOutcome, Client, ClientFilter, ClientPatch,
        CreateAgentPayload, CreateClientPayload, CreateInvoicePayload, Invoice, InvoiceFilter,
        InvoicePdf, Payment, Subscription, TransactionHistory,
    },
};

// A fronteira com o backend. Os serviços só falam com a API através
// deste trait, então os testes trocam a implementação real pela
// versão em memória sem tocar em nada acima.
//
// Os nomes espelham as rotas do backend, por isso "user" em vez de
// "client" nas operações de cliente.
#[async_trait]
pub trait ApiClient: Send + Sync {
    // --- Clientes ---
    async fn get_users(&self, filter: ClientFilter) -> Result<Vec<Client>, AppError>;
    async fn create_user(&self, payload: CreateClientPayload) -> Result<Client, AppError>;
    async fn update_user(&self, id: Uuid, patch: ClientPatch) -> Result<Client, AppError>;
    /// `hard` remove o registro; caso contrário só desativa.
    async fn delete_user(&self, id: Uuid, hard: bool) -> Result<(), AppError>;

    // --- Faturas ---
    async fn get_invoices(&self, filter: InvoiceFilter) -> Result<Vec<Invoice>, AppError>;
    async fn create_invoice(&self, payload: CreateInvoicePayload) -> Result<Invoice, AppError>;
    /// O backend recebe o status como string e grava em maiúsculas.
    async fn update_invoice_status(&self, id: Uuid, status: &str) -> Result<Invoice, AppError>;
    async fn delete_invoice(&self, id: Uuid, delete_payments: bool) -> Result<(), AppError>;
    async fn generate_invoice_pdf(&self, id: Uuid) -> Result<InvoicePdf, AppError>;

    // --- Pagamentos ---
    async fn get_payments(&self) -> Result<Vec<Payment>, AppError>;
    async fn charge_card(&self, payload: ChargeCardPayload) -> Result<ChargeOutcome, AppError>;
    async fn get_client_transaction_history(
        &self,
        client_id: Uuid,
    ) -> Result<TransactionHistory, AppError>;

    // --- Assinaturas ---
    async fn get_subscriptions(&self) -> Result<Vec<Subscription>, AppError>;

    // --- Agentes ---
    async fn get_agents(&self) -> Result<Vec<Agent>, AppError>;
    async fn create_agent(&self, payload: CreateAgentPayload) -> Result<Agent, AppError>;
    async fn update_agent_status(&self, id: Uuid, active: bool) -> Result<Agent, AppError>;
    async fn delete_agent(&self, id: Uuid) -> Result<(), AppError>;
    async fn get_all_agent_sales(&self) -> Result<Vec<AgentSale>, AppError>;
    async fn update_agent_sale_status(&self, id: Uuid, status: &str)
        -> Result<AgentSale, AppError>;
    async fn update_agent_sale_notes(&self, id: Uuid, notes: &str)
        -> Result<AgentSale, AppError>;
}
