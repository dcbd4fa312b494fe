// src/store.rs

use std::sync::RwLock;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::{Agent, AgentSale, Client, Invoice, Payment, Subscription};

// Capacidade do canal de eventos. Assinante lento perde eventos
// antigos (Lagged) em vez de travar quem publica.
const EVENT_CAPACITY: usize = 64;

/// Cópia imutável do estado do painel em um instante.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub invoices: Vec<Invoice>,
    pub payments: Vec<Payment>,
    pub subscriptions: Vec<Subscription>,
    pub agents: Vec<Agent>,
    pub agent_sales: Vec<AgentSale>,
}

/// Eventos publicados após cada mutação. As telas assinam o canal e
/// releem o snapshot quando algo muda, em vez de trocar mensagens
/// soltas entre si.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEvent {
    ClientCreated(Uuid),
    ClientUpdated(Uuid),
    ClientDeleted(Uuid),
    InvoiceCreated(Uuid),
    InvoiceUpdated(Uuid),
    InvoiceDeleted(Uuid),
    AgentUpdated(Uuid),
    AgentDeleted(Uuid),
    SaleUpdated(Uuid),
    StoreRefreshed,
}

/// O estado compartilhado do painel: um snapshot protegido por RwLock
/// e um canal de eventos. Toda mutação passa por aqui.
#[derive(Debug)]
pub struct DashboardStore {
    state: RwLock<Snapshot>,
    events: broadcast::Sender<DomainEvent>,
}

impl DashboardStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(Snapshot::default()),
            events,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Abre uma assinatura do canal de eventos. Soltar o receiver
    /// encerra a assinatura.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: DomainEvent) {
        // Sem assinantes o send falha; não é um erro do painel.
        let _ = self.events.send(event);
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Snapshot> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    // --- Clientes ---

    pub fn insert_client(&self, client: Client) {
        let id = client.id;
        self.write().clients.push(client);
        self.emit(DomainEvent::ClientCreated(id));
    }

    pub fn update_client(&self, client: Client) {
        let id = client.id;
        {
            let mut state = self.write();
            match state.clients.iter_mut().find(|c| c.id == id) {
                Some(slot) => *slot = client,
                None => state.clients.push(client),
            }
        }
        self.emit(DomainEvent::ClientUpdated(id));
    }

    pub fn remove_client(&self, id: Uuid) {
        self.write().clients.retain(|c| c.id != id);
        self.emit(DomainEvent::ClientDeleted(id));
    }

    // --- Faturas ---

    pub fn insert_invoice(&self, invoice: Invoice) {
        let id = invoice.id;
        self.write().invoices.push(invoice);
        self.emit(DomainEvent::InvoiceCreated(id));
    }

    pub fn update_invoice(&self, invoice: Invoice) {
        let id = invoice.id;
        {
            let mut state = self.write();
            match state.invoices.iter_mut().find(|i| i.id == id) {
                Some(slot) => *slot = invoice,
                None => state.invoices.push(invoice),
            }
        }
        self.emit(DomainEvent::InvoiceUpdated(id));
    }

    pub fn remove_invoice(&self, id: Uuid) {
        let mut state = self.write();
        state.invoices.retain(|i| i.id != id);
        drop(state);
        self.emit(DomainEvent::InvoiceDeleted(id));
    }

    pub fn remove_invoice_payments(&self, invoice_id: Uuid) {
        self.write()
            .payments
            .retain(|p| p.invoice_id != Some(invoice_id));
    }

    // --- Agentes ---

    pub fn update_agent(&self, agent: Agent) {
        let id = agent.id;
        {
            let mut state = self.write();
            match state.agents.iter_mut().find(|a| a.id == id) {
                Some(slot) => *slot = agent,
                None => state.agents.push(agent),
            }
        }
        self.emit(DomainEvent::AgentUpdated(id));
    }

    pub fn remove_agent(&self, id: Uuid) {
        self.write().agents.retain(|a| a.id != id);
        self.emit(DomainEvent::AgentDeleted(id));
    }

    pub fn update_sale(&self, sale: AgentSale) {
        let id = sale.id;
        {
            let mut state = self.write();
            match state.agent_sales.iter_mut().find(|s| s.id == id) {
                Some(slot) => *slot = sale,
                None => state.agent_sales.push(sale),
            }
        }
        self.emit(DomainEvent::SaleUpdated(id));
    }

    // --- Recarga (a releitura do backend é a fonte da verdade) ---

    pub fn replace_clients(&self, clients: Vec<Client>) {
        self.write().clients = clients;
        self.emit(DomainEvent::StoreRefreshed);
    }

    pub fn replace_invoices(&self, invoices: Vec<Invoice>) {
        self.write().invoices = invoices;
        self.emit(DomainEvent::StoreRefreshed);
    }

    pub fn replace_payments(&self, payments: Vec<Payment>) {
        self.write().payments = payments;
        self.emit(DomainEvent::StoreRefreshed);
    }

    pub fn replace_subscriptions(&self, subscriptions: Vec<Subscription>) {
        self.write().subscriptions = subscriptions;
        self.emit(DomainEvent::StoreRefreshed);
    }

    pub fn replace_agents(&self, agents: Vec<Agent>) {
        self.write().agents = agents;
        self.emit(DomainEvent::StoreRefreshed);
    }

    pub fn replace_sales(&self, sales: Vec<AgentSale>) {
        self.write().agent_sales = sales;
        self.emit(DomainEvent::StoreRefreshed);
    }

    /// Recarrega as três coleções financeiras com um único evento.
    pub fn replace_billing(
        &self,
        invoices: Vec<Invoice>,
        payments: Vec<Payment>,
        subscriptions: Vec<Subscription>,
    ) {
        {
            let mut state = self.write();
            state.invoices = invoices;
            state.payments = payments;
            state.subscriptions = subscriptions;
        }
        self.emit(DomainEvent::StoreRefreshed);
    }

    pub fn replace_all(&self, snapshot: Snapshot) {
        *self.write() = snapshot;
        self.emit(DomainEvent::StoreRefreshed);
    }

    // --- Consultas pontuais ---

    pub fn client(&self, id: Uuid) -> Option<Client> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn invoice(&self, id: Uuid) -> Option<Invoice> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .invoices
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    pub fn agent(&self, id: Uuid) -> Option<Agent> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .agents
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use crate::models::InvoiceStatus;

    fn invoice() -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            description: "Plano Growth".into(),
            amount: Decimal::new(10000, 2),
            tax: Decimal::ZERO,
            due_date: None,
            status: InvoiceStatus::Unpaid,
            package_id: None,
            notes: None,
            created_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn mutations_publish_events() {
        let store = DashboardStore::new();
        let mut rx = store.subscribe();

        let inv = invoice();
        let id = inv.id;
        store.insert_invoice(inv);

        assert_eq!(rx.recv().await.unwrap(), DomainEvent::InvoiceCreated(id));
    }

    #[tokio::test]
    async fn update_is_an_upsert_not_a_duplicate() {
        let store = DashboardStore::new();
        let mut inv = invoice();
        store.insert_invoice(inv.clone());

        inv.status = InvoiceStatus::Paid;
        store.update_invoice(inv.clone());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.invoices.len(), 1);
        assert_eq!(snapshot.invoices[0].status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn refresh_replaces_the_collection_and_notifies() {
        let store = DashboardStore::new();
        store.insert_invoice(invoice());

        let mut rx = store.subscribe();
        store.replace_invoices(vec![]);

        assert!(store.snapshot().invoices.is_empty());
        assert_eq!(rx.recv().await.unwrap(), DomainEvent::StoreRefreshed);
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_fine() {
        let store = DashboardStore::new();
        // Nenhum assinante: não pode falhar nem travar.
        store.insert_invoice(invoice());
        assert_eq!(store.snapshot().invoices.len(), 1);
    }
}
