// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::common::money;
use crate::common::dates;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Card,
    Zelle,
    Cashapp,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Zelle => "ZELLE",
            PaymentMethod::Cashapp => "CASHAPP",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
        }
    }

    /// Rótulo exibido na tela.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::Zelle => "Zelle",
            PaymentMethod::Cashapp => "CashApp",
            PaymentMethod::BankTransfer => "Bank transfer",
        }
    }

    pub fn parse_lossy(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "ZELLE" => PaymentMethod::Zelle,
            "CASHAPP" => PaymentMethod::Cashapp,
            "BANK_TRANSFER" | "BANK TRANSFER" | "TRANSFER" => PaymentMethod::BankTransfer,
            // Método desconhecido ou ausente vira cartão, o canal padrão.
            _ => PaymentMethod::Card,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }

    pub fn parse_lossy(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "COMPLETED" | "PAID" | "SUCCESS" => PaymentStatus::Completed,
            "FAILED" | "DECLINED" => PaymentStatus::Failed,
            "REFUNDED" => PaymentStatus::Refunded,
            _ => PaymentStatus::Pending,
        }
    }
}

fn lossy_method<'de, D>(deserializer: D) -> Result<PaymentMethod, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| PaymentMethod::parse_lossy(&s))
        .unwrap_or_default())
}

fn lossy_payment_status<'de, D>(deserializer: D) -> Result<PaymentStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| PaymentStatus::parse_lossy(&s))
        .unwrap_or_default())
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,

    #[serde(default, alias = "invoice_id", alias = "invoice")]
    pub invoice_id: Option<Uuid>,

    #[serde(default, alias = "client_id", alias = "client", alias = "userId")]
    pub client_id: Option<Uuid>,

    #[serde(default, deserialize_with = "money::flexible_amount")]
    pub amount: Decimal,

    #[serde(default, deserialize_with = "lossy_method")]
    pub method: PaymentMethod,

    #[serde(default, deserialize_with = "lossy_payment_status")]
    pub status: PaymentStatus,

    #[serde(default)]
    pub notes: Option<String>,

    // O backend já devolveu a data em três nomes diferentes.
    #[serde(
        default,
        alias = "created_at",
        alias = "date",
        alias = "paymentDate",
        deserialize_with = "dates::flexible_datetime"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Dados do cartão digitados no passo 2 do assistente de cobrança.
/// O Debug mascara número e CVV para nunca vazarem em log.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub holder: String,
    pub number: String, // Já formatado em grupos de 4
    pub expiry: String, // MM/YY
    pub cvv: String,
    #[serde(default)]
    pub address: Option<String>, // Endereço de cobrança, livre
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("holder", &self.holder)
            .field("number", &mask_digits(&self.number))
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .field("address", &self.address)
            .finish()
    }
}

fn mask_digits(number: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "****".into();
    }
    format!("**** {}", &digits[digits.len() - 4..])
}

/// Cobrança de fatura existente ou cobrança avulsa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeKind {
    Invoice,
    Direct,
}

/// Requisição de cobrança enviada ao gateway. Cobrança de fatura
/// referencia a fatura; cobrança avulsa identifica o cliente por
/// nome e e-mail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeCardPayload {
    #[serde(rename = "type")]
    pub kind: ChargeKind,
    pub invoice_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub card: CardDetails,
    pub save_card: bool,
    pub send_receipt: bool,
}

/// Resposta do gateway. `error` carrega a mensagem reportada
/// pelo emissor quando `success` é falso.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
