// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::money;
use crate::common::{dates, AppError};

// --- ENUMS ---

// O ciclo de vida da fatura. No backend os valores são gravados
// sempre em maiúsculas, então o serde espelha isso.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[default]
    Draft,     // Rascunho, ainda não enviada
    Unpaid,    // Enviada, aguardando pagamento
    Paid,      // Quitada
    Overdue,   // Vencida
    Cancelled, // Cancelada
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Unpaid => "UNPAID",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse estrito, usado quando o status vem de uma ação do operador.
    /// Aceita qualquer caixa ("paid", "Paid", " PAID ") mas rejeita
    /// valores desconhecidos.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_uppercase().as_str() {
            "DRAFT" => Ok(InvoiceStatus::Draft),
            "UNPAID" => Ok(InvoiceStatus::Unpaid),
            "PAID" => Ok(InvoiceStatus::Paid),
            "OVERDUE" => Ok(InvoiceStatus::Overdue),
            "CANCELLED" => Ok(InvoiceStatus::Cancelled),
            other => Err(AppError::UnknownStatus(other.to_string())),
        }
    }

    /// Parse tolerante, usado quando o status vem de um registro da API.
    /// Valor desconhecido vira DRAFT em vez de derrubar a listagem.
    pub fn parse_lossy(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|_| {
            tracing::debug!("Status de fatura desconhecido \"{}\", assumindo DRAFT", raw);
            InvoiceStatus::Draft
        })
    }

    /// Tabela de transições automáticas:
    /// DRAFT -> UNPAID -> {PAID, OVERDUE, CANCELLED}
    /// OVERDUE -> {PAID, CANCELLED}
    /// PAID e CANCELLED são terminais.
    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        matches!(
            (self, next),
            (Draft, Unpaid)
                | (Unpaid, Paid)
                | (Unpaid, Overdue)
                | (Unpaid, Cancelled)
                | (Overdue, Paid)
                | (Overdue, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }

    /// Status que contam como saldo em aberto no resumo financeiro.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            InvoiceStatus::Unpaid | InvoiceStatus::Overdue | InvoiceStatus::Draft
        )
    }

    /// Só fatura já enviada e em aberto pode ser cobrada no cartão.
    /// Rascunho precisa ser enviado antes.
    pub fn is_chargeable(&self) -> bool {
        matches!(self, InvoiceStatus::Unpaid | InvoiceStatus::Overdue)
    }
}

// Adaptador tolerante para registros vindos da API: campo ausente,
// nulo ou com valor desconhecido vira DRAFT.
fn lossy_status<'de, D>(deserializer: D) -> Result<InvoiceStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| InvoiceStatus::parse_lossy(&s))
        .unwrap_or_default())
}

// --- Structs ---

// A fatura canônica. Os atributos de serde são o único ponto de
// normalização dos payloads externos: apelidos de campo, valores
// monetários em qualquer formato e datas em qualquer formato entram
// aqui e saem no formato canônico.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,

    #[serde(alias = "client_id", alias = "client", alias = "userId")]
    pub client_id: Uuid,

    #[serde(default)]
    pub description: String,

    // Aceita número, string ("1,250.00"), nulo ou lixo; nunca negativo.
    #[serde(default, deserialize_with = "money::flexible_amount")]
    pub amount: Decimal,

    #[serde(default, deserialize_with = "money::flexible_amount")]
    pub tax: Decimal,

    #[serde(default, alias = "due_date", deserialize_with = "dates::flexible_date")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lossy_status")]
    pub status: InvoiceStatus,

    #[serde(default, alias = "package_id")]
    pub package_id: Option<Uuid>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default, alias = "created_at", deserialize_with = "dates::flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Valor total cobrado: principal + imposto.
    pub fn total(&self) -> Decimal {
        self.amount + self.tax
    }

    /// Referência curta exibida na tela, ex: "INV-3F2A9B1C".
    pub fn reference(&self) -> String {
        let hex = self.id.simple().to_string().to_uppercase();
        format!("INV-{}", &hex[..8])
    }

    /// UNPAID com vencimento no passado é candidata à varredura de atraso.
    /// Sem vencimento, nunca entra em atraso automaticamente.
    pub fn is_overdue_candidate(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Unpaid
            && self.due_date.map(|d| d < today).unwrap_or(false)
    }
}

// Dados para criação de uma nova fatura
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub client_id: Uuid,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[serde(default, deserialize_with = "money::flexible_amount")]
    pub amount: Decimal,

    #[serde(default, deserialize_with = "money::flexible_amount")]
    pub tax: Decimal,

    pub due_date: Option<NaiveDate>,
    pub package_id: Option<Uuid>,
    pub notes: Option<String>,
}

// Filtro de listagem (espelha os query params do backend)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    pub client_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
}

// Resposta da geração de PDF
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePdf {
    pub pdf_url: String,
    pub filename: String,
}
