// src/models/summary.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::invoice::Invoice;
use crate::models::payment::{Payment, PaymentMethod};

// --- Resumo financeiro por cliente ---

// Sempre recalculado do zero a partir das listas completas,
// nunca ajustado incrementalmente.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBillingSummary {
    pub client_id: Uuid,
    pub total_invoices: usize,
    pub total_paid: Decimal,
    pub total_outstanding: Decimal,
    pub last_payment_date: Option<DateTime<Utc>>,
}

// --- Extrato unificado ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Invoice,
    Payment,
}

/// Uma linha do extrato, já pronta para exibição.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEntry {
    pub kind: TransactionKind,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub amount: Decimal,
    pub status: String,
    pub method: Option<PaymentMethod>,
    pub invoice_ref: Option<String>,
    pub source_id: Uuid,
}

impl TransactionEntry {
    /// Data formatada para a tela. Registro sem data legível
    /// exibe "no date" em vez de quebrar o extrato.
    pub fn date_label(&self) -> String {
        match self.date {
            Some(d) => d.format("%b %d, %Y").to_string(),
            None => "no date".to_string(),
        }
    }
}

// Resposta crua do endpoint de histórico. O bloco `transactions`
// vem pré-montado pelo backend mas o painel monta o próprio extrato
// a partir de `invoices` + `payments`; o bloco é só repassado.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHistory {
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_label_formats_or_says_no_date() {
        let mut entry = TransactionEntry {
            kind: TransactionKind::Payment,
            description: "Pagamento".into(),
            date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap()),
            amount: Decimal::new(10000, 2),
            status: "COMPLETED".into(),
            method: Some(PaymentMethod::Card),
            invoice_ref: None,
            source_id: Uuid::new_v4(),
        };
        assert_eq!(entry.date_label(), "Mar 01, 2025");

        entry.date = None;
        assert_eq!(entry.date_label(), "no date");
    }

    #[test]
    fn history_tolerates_missing_blocks() {
        let raw = serde_json::json!({
            "invoices": [],
        });
        let history: TransactionHistory = serde_json::from_value(raw).unwrap();
        assert!(history.payments.is_empty());
        assert!(history.transactions.is_empty());
        assert!(history.error.is_none());
    }
}
