// src/services/feed_service.rs

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::ApiClient,
    common::error::AppError,
    models::{Invoice, Payment, TransactionEntry, TransactionKind},
};

#[derive(Clone)]
pub struct FeedService {
    api: Arc<dyn ApiClient>,
}

impl FeedService {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self { api }
    }

    /// Extrato unificado do cliente: faturas e pagamentos misturados,
    /// do mais recente para o mais antigo.
    pub async fn client_feed(&self, client_id: Uuid) -> Result<Vec<TransactionEntry>, AppError> {
        let history = self.api.get_client_transaction_history(client_id).await?;

        // O backend às vezes devolve as listas com um aviso junto.
        // O extrato segue com o que veio; só registra o aviso.
        if let Some(warning) = history.error.as_deref() {
            tracing::warn!(
                "Histórico do cliente {} veio com aviso do backend: {}",
                client_id,
                warning
            );
        }

        Ok(Self::build_feed(&history.invoices, &history.payments))
    }

    /// Monta o extrato a partir das duas listas. Registro com data
    /// ilegível entra mesmo assim, com a data vazia; a tela mostra
    /// "no date" no lugar.
    pub fn build_feed(invoices: &[Invoice], payments: &[Payment]) -> Vec<TransactionEntry> {
        let reference_by_id: HashMap<Uuid, String> = invoices
            .iter()
            .map(|i| (i.id, i.reference()))
            .collect();

        let mut entries: Vec<TransactionEntry> = Vec::with_capacity(invoices.len() + payments.len());

        for invoice in invoices {
            entries.push(TransactionEntry {
                kind: TransactionKind::Invoice,
                description: if invoice.description.is_empty() {
                    invoice.reference()
                } else {
                    invoice.description.clone()
                },
                date: invoice.created_at,
                amount: invoice.total(),
                status: invoice.status.as_str().to_string(),
                method: None,
                invoice_ref: Some(invoice.reference()),
                source_id: invoice.id,
            });
        }

        for payment in payments {
            entries.push(TransactionEntry {
                kind: TransactionKind::Payment,
                description: payment
                    .notes
                    .clone()
                    .unwrap_or_else(|| format!("{} payment", payment.method.label())),
                date: payment.created_at,
                amount: payment.amount,
                status: payment.status.as_str().to_string(),
                method: Some(payment.method),
                invoice_ref: payment
                    .invoice_id
                    .and_then(|id| reference_by_id.get(&id).cloned()),
                source_id: payment.id,
            });
        }

        entries.sort_by(cmp_feed);
        entries
    }
}

// Mais recente primeiro. Entradas sem data vão para o fim, e dentro
// de cada empate o id decide, para a ordem ser estável entre recargas.
fn cmp_feed(a: &TransactionEntry, b: &TransactionEntry) -> Ordering {
    match (a.date, b.date) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| b.source_id.cmp(&a.source_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.source_id.cmp(&a.source_id),
    }
}
