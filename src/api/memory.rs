// src/api/memory.rs

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::{
    api::client::ApiClient,
    common::error::AppError,
    models::{
        Agent, AgentRole, AgentSale, ChargeCardPayload, ChargeKind, ChargeOutcome, Client,
        ClientFilter, ClientPatch, CreateAgentPayload, CreateClientPayload, CreateInvoicePayload,
        Invoice, InvoiceFilter, InvoicePdf, InvoiceStatus, Payment, PaymentMethod, PaymentStatus,
        SaleStatus, Subscription, TransactionHistory,
    },
};

#[derive(Debug, Default)]
struct MemoryState {
    clients: Vec<Client>,
    invoices: Vec<Invoice>,
    payments: Vec<Payment>,
    subscriptions: Vec<Subscription>,
    agents: Vec<Agent>,
    sales: Vec<AgentSale>,
}

// Backend simulado em memória. Reproduz os comportamentos que o
// painel precisa exercitar sem rede: o gate de administrador, a
// recusa de cartões terminados em 0002 e os guardas de exclusão.
#[derive(Debug)]
pub struct InMemoryApi {
    state: Mutex<MemoryState>,
    admin: AtomicBool,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            admin: AtomicBool::new(true),
        }
    }

    /// Simula a sessão perder (ou ganhar) o papel de administrador.
    pub fn set_admin(&self, admin: bool) {
        self.admin.store(admin, Ordering::Relaxed);
    }

    fn require_admin(&self) -> Result<(), AppError> {
        if self.admin.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // Um teste que deu panic não pode envenenar os demais.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // --- Seeds (usados pelos testes e pelos dados de demonstração) ---

    pub fn seed_client(&self, client: Client) -> Uuid {
        let id = client.id;
        self.state().clients.push(client);
        id
    }

    pub fn seed_invoice(&self, invoice: Invoice) -> Uuid {
        let id = invoice.id;
        self.state().invoices.push(invoice);
        id
    }

    pub fn seed_payment(&self, payment: Payment) -> Uuid {
        let id = payment.id;
        self.state().payments.push(payment);
        id
    }

    pub fn seed_subscription(&self, subscription: Subscription) -> Uuid {
        let id = subscription.id;
        self.state().subscriptions.push(subscription);
        id
    }

    pub fn seed_agent(&self, agent: Agent) -> Uuid {
        let id = agent.id;
        self.state().agents.push(agent);
        id
    }

    pub fn seed_sale(&self, sale: AgentSale) -> Uuid {
        let id = sale.id;
        self.state().sales.push(sale);
        id
    }

    /// Monta um backend com uma agência pequena já cadastrada.
    pub fn with_sample_data() -> Self {
        let api = Self::new();
        let now = Utc::now();

        let marina = api.seed_client(Client {
            id: Uuid::new_v4(),
            full_name: "Marina Duarte".into(),
            email: "marina@studioduarte.com".into(),
            company: Some("Studio Duarte".into()),
            phone: Some("+55 11 98888-0001".into()),
            active: true,
            created_at: Some(now - Duration::days(120)),
        });
        let carlos = api.seed_client(Client {
            id: Uuid::new_v4(),
            full_name: "Carlos Mendes".into(),
            email: "carlos@cafenorte.com".into(),
            company: Some("Café Norte".into()),
            phone: None,
            active: false,
            created_at: Some(now - Duration::days(300)),
        });

        api.seed_invoice(Invoice {
            id: Uuid::new_v4(),
            client_id: marina,
            description: "Plano Growth - Março".into(),
            amount: Decimal::new(10000, 2),
            tax: Decimal::new(800, 2),
            due_date: Some((now + Duration::days(14)).date_naive()),
            status: InvoiceStatus::Unpaid,
            package_id: None,
            notes: None,
            created_at: Some(now - Duration::days(10)),
        });
        let setup = api.seed_invoice(Invoice {
            id: Uuid::new_v4(),
            client_id: marina,
            description: "Setup inicial".into(),
            amount: Decimal::new(25000, 2),
            tax: Decimal::ZERO,
            due_date: None,
            status: InvoiceStatus::Paid,
            package_id: None,
            notes: None,
            created_at: Some(now - Duration::days(40)),
        });
        api.seed_invoice(Invoice {
            id: Uuid::new_v4(),
            client_id: marina,
            description: "Manutenção Fevereiro".into(),
            amount: Decimal::new(10000, 2),
            tax: Decimal::new(800, 2),
            due_date: Some((now - Duration::days(20)).date_naive()),
            status: InvoiceStatus::Overdue,
            package_id: None,
            notes: None,
            created_at: Some(now - Duration::days(35)),
        });
        api.seed_invoice(Invoice {
            id: Uuid::new_v4(),
            client_id: carlos,
            description: "Landing page".into(),
            amount: Decimal::new(48000, 2),
            tax: Decimal::new(3840, 2),
            due_date: None,
            status: InvoiceStatus::Draft,
            package_id: None,
            notes: Some("Aguardando aprovação do briefing".into()),
            created_at: Some(now - Duration::days(2)),
        });

        api.seed_payment(Payment {
            id: Uuid::new_v4(),
            invoice_id: Some(setup),
            client_id: Some(marina),
            amount: Decimal::new(25000, 2),
            method: PaymentMethod::Card,
            status: PaymentStatus::Completed,
            notes: None,
            created_at: Some(now - Duration::days(38)),
        });
        // Pagamento importado de planilha, sem data legível.
        api.seed_payment(Payment {
            id: Uuid::new_v4(),
            invoice_id: None,
            client_id: Some(marina),
            amount: Decimal::new(5000, 2),
            method: PaymentMethod::Zelle,
            status: PaymentStatus::Completed,
            notes: Some("Importado da planilha de janeiro".into()),
            created_at: None,
        });

        api.seed_subscription(Subscription {
            id: Uuid::new_v4(),
            client_id: marina,
            plan: Some("Retainer mensal".into()),
            total_billed: Decimal::new(240000, 2),
            created_at: Some(now - Duration::days(120)),
        });

        let rafael = api.seed_agent(Agent {
            id: Uuid::new_v4(),
            full_name: "Rafael Lima".into(),
            email: "rafael@agencia.com".into(),
            commission_rate_agent: Decimal::new(10, 2),
            commission_rate_closer: Decimal::new(5, 2),
            total_earnings: Decimal::new(19500, 2),
            total_payouts: Decimal::new(15000, 2),
            pending_commission: Decimal::new(4500, 2),
            active: true,
        });
        api.seed_sale(AgentSale {
            id: Uuid::new_v4(),
            agent_id: rafael,
            client_name: "Studio Duarte".into(),
            amount: Decimal::new(150000, 2),
            commission: Decimal::new(15000, 2),
            role: AgentRole::Agent,
            status: SaleStatus::Confirmed,
            notes: None,
            created_at: Some(now - Duration::days(5)),
        });
        api.seed_sale(AgentSale {
            id: Uuid::new_v4(),
            agent_id: rafael,
            client_name: "Café Norte".into(),
            amount: Decimal::new(90000, 2),
            commission: Decimal::new(4500, 2),
            role: AgentRole::Closer,
            status: SaleStatus::Pending,
            notes: None,
            created_at: Some(now - Duration::days(1)),
        });

        api
    }
}

impl Default for InMemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiClient for InMemoryApi {
    // --- Clientes ---

    async fn get_users(&self, filter: ClientFilter) -> Result<Vec<Client>, AppError> {
        let state = self.state();
        Ok(state
            .clients
            .iter()
            .filter(|c| c.matches(&filter))
            .cloned()
            .collect())
    }

    async fn create_user(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        self.require_admin()?;
        let client = Client {
            id: Uuid::new_v4(),
            full_name: payload.full_name,
            email: payload.email,
            company: payload.company,
            phone: payload.phone,
            active: true,
            created_at: Some(Utc::now()),
        };
        self.state().clients.push(client.clone());
        Ok(client)
    }

    async fn update_user(&self, id: Uuid, patch: ClientPatch) -> Result<Client, AppError> {
        self.require_admin()?;
        let mut state = self.state();
        let client = state
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(AppError::ClientNotFound)?;
        if let Some(full_name) = patch.full_name {
            client.full_name = full_name;
        }
        if let Some(email) = patch.email {
            client.email = email;
        }
        if let Some(company) = patch.company {
            client.company = Some(company);
        }
        if let Some(phone) = patch.phone {
            client.phone = Some(phone);
        }
        if let Some(active) = patch.active {
            client.active = active;
        }
        Ok(client.clone())
    }

    async fn delete_user(&self, id: Uuid, hard: bool) -> Result<(), AppError> {
        self.require_admin()?;
        let mut state = self.state();
        let Some(pos) = state.clients.iter().position(|c| c.id == id) else {
            return Err(AppError::ClientNotFound);
        };
        if hard {
            state.clients.remove(pos);
            // Exclusão definitiva leva junto o histórico do cliente.
            state.invoices.retain(|i| i.client_id != id);
            state.payments.retain(|p| p.client_id != Some(id));
            state.subscriptions.retain(|s| s.client_id != id);
        } else {
            state.clients[pos].active = false;
        }
        Ok(())
    }

    // --- Faturas ---

    async fn get_invoices(&self, filter: InvoiceFilter) -> Result<Vec<Invoice>, AppError> {
        let state = self.state();
        Ok(state
            .invoices
            .iter()
            .filter(|i| filter.client_id.map(|c| i.client_id == c).unwrap_or(true))
            .filter(|i| filter.status.map(|s| i.status == s).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn create_invoice(&self, payload: CreateInvoicePayload) -> Result<Invoice, AppError> {
        self.require_admin()?;
        let mut state = self.state();
        if !state.clients.iter().any(|c| c.id == payload.client_id) {
            return Err(AppError::ClientNotFound);
        }
        let invoice = Invoice {
            id: Uuid::new_v4(),
            client_id: payload.client_id,
            description: payload.description,
            amount: payload.amount,
            tax: payload.tax,
            due_date: payload.due_date,
            status: InvoiceStatus::Draft,
            package_id: payload.package_id,
            notes: payload.notes,
            created_at: Some(Utc::now()),
        };
        state.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn update_invoice_status(&self, id: Uuid, status: &str) -> Result<Invoice, AppError> {
        self.require_admin()?;
        let next = InvoiceStatus::parse(status)?;
        let mut state = self.state();
        let invoice = state
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(AppError::InvoiceNotFound)?;
        invoice.status = next;
        Ok(invoice.clone())
    }

    async fn delete_invoice(&self, id: Uuid, delete_payments: bool) -> Result<(), AppError> {
        self.require_admin()?;
        let mut state = self.state();
        let Some(pos) = state.invoices.iter().position(|i| i.id == id) else {
            return Err(AppError::InvoiceNotFound);
        };
        if state.invoices[pos].status == InvoiceStatus::Paid {
            return Err(AppError::DeletePaidInvoice);
        }
        let linked = state.payments.iter().any(|p| p.invoice_id == Some(id));
        if linked && !delete_payments {
            return Err(AppError::InvoiceHasPayments);
        }
        if delete_payments {
            state.payments.retain(|p| p.invoice_id != Some(id));
        }
        state.invoices.remove(pos);
        Ok(())
    }

    async fn generate_invoice_pdf(&self, id: Uuid) -> Result<InvoicePdf, AppError> {
        let state = self.state();
        let invoice = state
            .invoices
            .iter()
            .find(|i| i.id == id)
            .ok_or(AppError::InvoiceNotFound)?;
        let reference = invoice.reference();
        Ok(InvoicePdf {
            pdf_url: format!("https://files.example.com/invoices/{}.pdf", reference),
            filename: format!("{}.pdf", reference),
        })
    }

    // --- Pagamentos ---

    async fn get_payments(&self) -> Result<Vec<Payment>, AppError> {
        Ok(self.state().payments.clone())
    }

    async fn charge_card(&self, payload: ChargeCardPayload) -> Result<ChargeOutcome, AppError> {
        self.require_admin()?;
        let mut state = self.state();

        // Resolve a referência: fatura existente ou cliente avulso.
        let (invoice_id, client_id) = match payload.kind {
            ChargeKind::Invoice => {
                let id = payload.invoice_id.ok_or(AppError::InvoiceNotFound)?;
                let invoice = state
                    .invoices
                    .iter()
                    .find(|i| i.id == id)
                    .cloned()
                    .ok_or(AppError::InvoiceNotFound)?;
                // Fatura paga ou cancelada não aceita cobrança nova.
                if !invoice.status.is_chargeable() {
                    return Ok(ChargeOutcome {
                        success: false,
                        error: Some("Invoice is not payable.".into()),
                    });
                }
                (Some(invoice.id), Some(invoice.client_id))
            }
            ChargeKind::Direct => {
                // Cobrança avulsa: tenta casar o e-mail com um cliente
                // conhecido; sem correspondência, o pagamento fica órfão.
                let client_id = payload.client_id.or_else(|| {
                    payload.client_email.as_deref().and_then(|email| {
                        state
                            .clients
                            .iter()
                            .find(|c| c.email.eq_ignore_ascii_case(email))
                            .map(|c| c.id)
                    })
                });
                (None, client_id)
            }
        };

        if payload.amount <= Decimal::ZERO {
            return Ok(ChargeOutcome {
                success: false,
                error: Some("Invalid charge amount.".into()),
            });
        }

        // Número de teste: final 0002 simula recusa do emissor.
        let digits: String = payload
            .card
            .number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.ends_with("0002") {
            return Ok(ChargeOutcome {
                success: false,
                error: Some("Card declined by issuer.".into()),
            });
        }

        state.payments.push(Payment {
            id: Uuid::new_v4(),
            invoice_id,
            client_id,
            amount: payload.amount,
            method: payload.method,
            status: PaymentStatus::Completed,
            notes: None,
            created_at: Some(Utc::now()),
        });
        Ok(ChargeOutcome {
            success: true,
            error: None,
        })
    }

    async fn get_client_transaction_history(
        &self,
        client_id: Uuid,
    ) -> Result<TransactionHistory, AppError> {
        let state = self.state();
        // Cliente desconhecido não é falha: o backend devolve as
        // listas vazias com um aviso dentro do corpo.
        if !state.clients.iter().any(|c| c.id == client_id) {
            return Ok(TransactionHistory {
                error: Some(format!("Client {} not found", client_id)),
                ..Default::default()
            });
        }
        let invoices: Vec<Invoice> = state
            .invoices
            .iter()
            .filter(|i| i.client_id == client_id)
            .cloned()
            .collect();
        let invoice_ids: HashSet<Uuid> = invoices.iter().map(|i| i.id).collect();
        let payments: Vec<Payment> = state
            .payments
            .iter()
            .filter(|p| {
                p.client_id == Some(client_id)
                    || p.invoice_id.map(|id| invoice_ids.contains(&id)).unwrap_or(false)
            })
            .cloned()
            .collect();
        // O backend manda um bloco pré-montado que o painel ignora.
        let transactions = payments
            .iter()
            .map(|p| json!({ "type": "payment", "id": p.id, "amount": p.amount }))
            .collect();
        Ok(TransactionHistory {
            transactions,
            invoices,
            payments,
            error: None,
        })
    }

    // --- Assinaturas ---

    async fn get_subscriptions(&self) -> Result<Vec<Subscription>, AppError> {
        Ok(self.state().subscriptions.clone())
    }

    // --- Agentes ---

    async fn get_agents(&self) -> Result<Vec<Agent>, AppError> {
        Ok(self.state().agents.clone())
    }

    async fn create_agent(&self, payload: CreateAgentPayload) -> Result<Agent, AppError> {
        self.require_admin()?;
        let agent = Agent {
            id: Uuid::new_v4(),
            full_name: payload.full_name,
            email: payload.email,
            commission_rate_agent: payload.commission_rate_agent,
            commission_rate_closer: payload.commission_rate_closer,
            total_earnings: Decimal::ZERO,
            total_payouts: Decimal::ZERO,
            pending_commission: Decimal::ZERO,
            active: true,
        };
        self.state().agents.push(agent.clone());
        Ok(agent)
    }

    async fn update_agent_status(&self, id: Uuid, active: bool) -> Result<Agent, AppError> {
        self.require_admin()?;
        let mut state = self.state();
        let agent = state
            .agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::AgentNotFound)?;
        agent.active = active;
        Ok(agent.clone())
    }

    async fn delete_agent(&self, id: Uuid) -> Result<(), AppError> {
        self.require_admin()?;
        let mut state = self.state();
        let Some(pos) = state.agents.iter().position(|a| a.id == id) else {
            return Err(AppError::AgentNotFound);
        };
        state.agents.remove(pos);
        Ok(())
    }

    async fn get_all_agent_sales(&self) -> Result<Vec<AgentSale>, AppError> {
        Ok(self.state().sales.clone())
    }

    async fn update_agent_sale_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<AgentSale, AppError> {
        self.require_admin()?;
        let next = SaleStatus::parse(status)?;
        let mut state = self.state();
        let sale = state
            .sales
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::SaleNotFound)?;
        sale.status = next;
        Ok(sale.clone())
    }

    async fn update_agent_sale_notes(&self, id: Uuid, notes: &str) -> Result<AgentSale, AppError> {
        self.require_admin()?;
        let mut state = self.state();
        let sale = state
            .sales
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::SaleNotFound)?;
        let trimmed = notes.trim();
        sale.notes = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        Ok(sale.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardDetails;

    fn unpaid_invoice(client_id: Uuid) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            client_id,
            description: "Plano Growth".into(),
            amount: Decimal::new(10000, 2),
            tax: Decimal::new(800, 2),
            due_date: None,
            status: InvoiceStatus::Unpaid,
            package_id: None,
            notes: None,
            created_at: Some(Utc::now()),
        }
    }

    fn card(number: &str) -> CardDetails {
        CardDetails {
            holder: "MARINA DUARTE".into(),
            number: number.into(),
            expiry: "12/30".into(),
            cvv: "123".into(),
            address: None,
        }
    }

    fn invoice_charge(invoice_id: Uuid, amount: Decimal, number: &str) -> ChargeCardPayload {
        ChargeCardPayload {
            kind: ChargeKind::Invoice,
            invoice_id: Some(invoice_id),
            client_id: None,
            client_name: None,
            client_email: None,
            amount,
            method: PaymentMethod::Card,
            card: card(number),
            save_card: false,
            send_receipt: false,
        }
    }

    #[tokio::test]
    async fn mutations_require_admin() {
        let api = InMemoryApi::new();
        api.set_admin(false);

        let err = api
            .create_user(CreateClientPayload {
                full_name: "Marina".into(),
                email: "marina@agencia.com".into(),
                company: None,
                phone: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        // Leituras continuam liberadas.
        assert!(api.get_users(ClientFilter::default()).await.is_ok());
    }

    #[tokio::test]
    async fn charge_declines_test_card_0002() {
        let api = InMemoryApi::new();
        let client_id = Uuid::new_v4();
        let invoice_id = api.seed_invoice(unpaid_invoice(client_id));

        let outcome = api
            .charge_card(invoice_charge(
                invoice_id,
                Decimal::new(10800, 2),
                "4000 0000 0000 0002",
            ))
            .await
            .unwrap();
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("declined"));
        // Recusa não grava pagamento.
        assert!(api.get_payments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_charge_records_a_completed_payment() {
        let api = InMemoryApi::new();
        let client_id = Uuid::new_v4();
        let invoice_id = api.seed_invoice(unpaid_invoice(client_id));

        let outcome = api
            .charge_card(invoice_charge(
                invoice_id,
                Decimal::new(10800, 2),
                "4242 4242 4242 4242",
            ))
            .await
            .unwrap();
        assert!(outcome.success);

        let payments = api.get_payments().await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].status, PaymentStatus::Completed);
        assert_eq!(payments[0].invoice_id, Some(invoice_id));
        // O id do cliente vem da fatura, não do payload.
        assert_eq!(payments[0].client_id, Some(client_id));
        assert_eq!(payments[0].amount, Decimal::new(10800, 2));
    }

    #[tokio::test]
    async fn charge_refuses_an_invoice_that_is_not_payable() {
        let api = InMemoryApi::new();
        let client_id = Uuid::new_v4();
        let mut paid = unpaid_invoice(client_id);
        paid.status = InvoiceStatus::Paid;
        let paid_id = api.seed_invoice(paid);

        let outcome = api
            .charge_card(invoice_charge(
                paid_id,
                Decimal::new(10800, 2),
                "4242 4242 4242 4242",
            ))
            .await
            .unwrap();
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("not payable"));
        assert!(api.get_payments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn direct_charge_matches_the_client_by_email() {
        let api = InMemoryApi::new();
        let client_id = api.seed_client(Client {
            id: Uuid::new_v4(),
            full_name: "Marina Duarte".into(),
            email: "marina@studioduarte.com".into(),
            company: None,
            phone: None,
            active: true,
            created_at: None,
        });

        let outcome = api
            .charge_card(ChargeCardPayload {
                kind: ChargeKind::Direct,
                invoice_id: None,
                client_id: None,
                client_name: Some("Marina Duarte".into()),
                client_email: Some("MARINA@studioduarte.com".into()),
                amount: Decimal::new(5000, 2),
                method: PaymentMethod::Card,
                card: card("4242 4242 4242 4242"),
                save_card: false,
                send_receipt: true,
            })
            .await
            .unwrap();
        assert!(outcome.success);

        let payments = api.get_payments().await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].invoice_id, None);
        assert_eq!(payments[0].client_id, Some(client_id));
    }

    #[tokio::test]
    async fn delete_guards_protect_paid_and_linked_invoices() {
        let api = InMemoryApi::new();
        let client_id = Uuid::new_v4();

        let mut paid = unpaid_invoice(client_id);
        paid.status = InvoiceStatus::Paid;
        let paid_id = api.seed_invoice(paid);
        assert!(matches!(
            api.delete_invoice(paid_id, false).await.unwrap_err(),
            AppError::DeletePaidInvoice
        ));

        let linked_id = api.seed_invoice(unpaid_invoice(client_id));
        api.seed_payment(Payment {
            id: Uuid::new_v4(),
            invoice_id: Some(linked_id),
            client_id: Some(client_id),
            amount: Decimal::new(5000, 2),
            method: PaymentMethod::Zelle,
            status: PaymentStatus::Completed,
            notes: None,
            created_at: None,
        });
        assert!(matches!(
            api.delete_invoice(linked_id, false).await.unwrap_err(),
            AppError::InvoiceHasPayments
        ));

        // Com delete_payments os vínculos saem junto.
        api.delete_invoice(linked_id, true).await.unwrap();
        assert!(api.get_payments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_update_is_case_insensitive_but_strict() {
        let api = InMemoryApi::new();
        let invoice_id = api.seed_invoice(unpaid_invoice(Uuid::new_v4()));

        let updated = api.update_invoice_status(invoice_id, "paid").await.unwrap();
        assert_eq!(updated.status, InvoiceStatus::Paid);

        assert!(matches!(
            api.update_invoice_status(invoice_id, "ARCHIVED").await,
            Err(AppError::UnknownStatus(_))
        ));
    }
}
