// src/services/invoice_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{ApiClient, Notifier},
    common::error::AppError,
    common::messages::{notify_failure, Messages},
    models::{CreateInvoicePayload, Invoice, InvoicePdf, InvoiceStatus},
    store::DashboardStore,
};

/// De onde veio o pedido de mudança de status. A origem manual é a
/// válvula de escape do operador: ignora a tabela de transições, mas
/// fica registrada em log com destaque. Os alvos do override são os
/// quatro estados vivos; voltar para rascunho não existe nem à mão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOrigin {
    Automatic,
    Manual,
}

#[derive(Clone)]
pub struct InvoiceService {
    api: Arc<dyn ApiClient>,
    notifier: Arc<dyn Notifier>,
    messages: Messages,
    store: Arc<DashboardStore>,
}

impl InvoiceService {
    pub fn new(
        api: Arc<dyn ApiClient>,
        notifier: Arc<dyn Notifier>,
        messages: Messages,
        store: Arc<DashboardStore>,
    ) -> Self {
        Self {
            api,
            notifier,
            messages,
            store,
        }
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        let invoices = self.api.get_invoices(Default::default()).await?;
        self.store.replace_invoices(invoices);
        Ok(())
    }

    // Recarga pós-mutação: a releitura é a fonte da verdade, mas se
    // ela falhar o estado otimista fica valendo e só registramos o aviso.
    async fn soft_refresh(&self) {
        match self.api.get_invoices(Default::default()).await {
            Ok(invoices) => self.store.replace_invoices(invoices),
            Err(err) => {
                tracing::warn!("⚠️ Releitura de faturas falhou: {}", err);
            }
        }
    }

    // --- CRIAÇÃO ---

    pub async fn create(&self, payload: CreateInvoicePayload) -> Result<Invoice, AppError> {
        let result = self.create_inner(payload).await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Invoices", err);
        }
        result
    }

    async fn create_inner(&self, payload: CreateInvoicePayload) -> Result<Invoice, AppError> {
        // 1. Validação antes de qualquer rede. Vencimento no passado
        // não entra; sem vencimento, tudo bem.
        payload.validate()?;
        if let Some(due) = payload.due_date {
            if due < Utc::now().date_naive() {
                return Err(AppError::FieldInvalid {
                    field: "due_date",
                    code: "past",
                });
            }
        }

        // 2. Chamada ao backend.
        let created = self.api.create_invoice(payload).await?;

        // 3. Aplica otimista no snapshot e notifica.
        self.store.insert_invoice(created.clone());
        self.notifier
            .success("Invoices", &format!("Fatura {} criada.", created.reference()));

        // 4. Releitura de confiança.
        self.soft_refresh().await;
        Ok(created)
    }

    // --- STATUS ---

    /// Muda o status de uma fatura. O valor chega como string da tela
    /// (qualquer caixa) e só segue para o backend se a máquina de
    /// estados permitir, ou se a origem for manual.
    pub async fn update_status(
        &self,
        id: Uuid,
        requested: &str,
        origin: StatusOrigin,
    ) -> Result<Invoice, AppError> {
        let result = self.update_status_inner(id, requested, origin).await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Invoices", err);
        }
        result
    }

    async fn update_status_inner(
        &self,
        id: Uuid,
        requested: &str,
        origin: StatusOrigin,
    ) -> Result<Invoice, AppError> {
        // 1. Parse estrito: "paid" e " PAID " servem, "ARCHIVED" não.
        let next = InvoiceStatus::parse(requested)?;

        let current = self.store.invoice(id).ok_or(AppError::InvoiceNotFound)?;

        // 2. Pedir o status atual é um no-op.
        if current.status == next {
            tracing::debug!("Fatura {} já está em {}", id, next.as_str());
            return Ok(current);
        }

        // 3. A máquina de estados decide, salvo override manual.
        match origin {
            StatusOrigin::Automatic => {
                if !current.status.can_transition_to(next) {
                    return Err(AppError::InvalidTransition {
                        from: current.status.as_str(),
                        to: next.as_str(),
                    });
                }
                tracing::info!(
                    "Fatura {}: {} -> {}",
                    id,
                    current.status.as_str(),
                    next.as_str()
                );
            }
            StatusOrigin::Manual => {
                // O override alcança PAID, UNPAID, OVERDUE e CANCELLED;
                // rascunho fica de fora.
                if next == InvoiceStatus::Draft {
                    return Err(AppError::InvalidTransition {
                        from: current.status.as_str(),
                        to: next.as_str(),
                    });
                }
                // Log destacado: auditoria depende desta linha.
                tracing::warn!(
                    "⚠️ Override manual de status na fatura {}: {} -> {}",
                    id,
                    current.status.as_str(),
                    next.as_str()
                );
            }
        }

        // 4. Backend e snapshot.
        let updated = self.apply_status(id, next).await?;
        self.notifier.success(
            "Invoices",
            &format!(
                "Fatura {} atualizada para {}.",
                updated.reference(),
                next.as_str()
            ),
        );
        self.soft_refresh().await;
        Ok(updated)
    }

    /// Grava o status no backend e aplica no snapshot, sem passar pela
    /// tabela de transições. Uso interno dos fluxos que já validaram.
    pub(crate) async fn apply_status(
        &self,
        id: Uuid,
        next: InvoiceStatus,
    ) -> Result<Invoice, AppError> {
        let updated = self.api.update_invoice_status(id, next.as_str()).await?;
        self.store.update_invoice(updated.clone());
        Ok(updated)
    }

    // --- EXCLUSÃO ---

    /// Exclui uma fatura respeitando os guardas, nesta ordem:
    /// fatura paga nunca sai; fatura com pagamentos vinculados só sai
    /// com `delete_payments`.
    pub async fn delete(&self, id: Uuid, delete_payments: bool) -> Result<(), AppError> {
        let result = self.delete_inner(id, delete_payments).await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Invoices", err);
        }
        result
    }

    async fn delete_inner(&self, id: Uuid, delete_payments: bool) -> Result<(), AppError> {
        let current = self.store.invoice(id).ok_or(AppError::InvoiceNotFound)?;

        // 1. Guarda de fatura paga (vem antes do guarda de vínculos).
        if current.status == InvoiceStatus::Paid {
            return Err(AppError::DeletePaidInvoice);
        }

        // 2. Guarda de pagamentos vinculados.
        let linked = self
            .store
            .snapshot()
            .payments
            .iter()
            .any(|p| p.invoice_id == Some(id));
        if linked && !delete_payments {
            return Err(AppError::InvoiceHasPayments);
        }

        // 3. Backend, depois snapshot.
        self.api.delete_invoice(id, delete_payments).await?;
        if delete_payments {
            self.store.remove_invoice_payments(id);
        }
        self.store.remove_invoice(id);
        self.notifier.success("Invoices", "Fatura excluída.");
        self.soft_refresh().await;
        Ok(())
    }

    // --- VENCIMENTO ---

    /// Varre o snapshot e marca como OVERDUE as faturas UNPAID com
    /// vencimento anterior a `today`. Uma falha individual não para a
    /// varredura; devolve quantas foram marcadas.
    pub async fn sweep_overdue(&self, today: NaiveDate) -> usize {
        let candidates: Vec<Uuid> = self
            .store
            .snapshot()
            .invoices
            .iter()
            .filter(|i| i.is_overdue_candidate(today))
            .map(|i| i.id)
            .collect();

        let mut marked = 0usize;
        for id in &candidates {
            match self.apply_status(*id, InvoiceStatus::Overdue).await {
                Ok(_) => marked += 1,
                Err(err) => {
                    tracing::warn!("⚠️ Fatura {} não pôde ser marcada vencida: {}", id, err);
                }
            }
        }
        if marked > 0 {
            tracing::info!("✅ Varredura de vencimento marcou {} fatura(s)", marked);
        }
        marked
    }

    // --- PDF ---

    pub async fn pdf(&self, id: Uuid) -> Result<InvoicePdf, AppError> {
        let result = self.api.generate_invoice_pdf(id).await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Invoices", err);
        }
        result
    }
}
