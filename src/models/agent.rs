// src/models/agent.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::money;
use crate::common::{dates, AppError};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentRole {
    #[default]
    Agent,  // Prospecta e abre a venda
    Closer, // Fecha o contrato
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Agent => "AGENT",
            AgentRole::Closer => "CLOSER",
        }
    }

    pub fn parse_lossy(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "CLOSER" => AgentRole::Closer,
            _ => AgentRole::Agent,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    #[default]
    Pending,
    Confirmed,
    Paid,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "PENDING",
            SaleStatus::Confirmed => "CONFIRMED",
            SaleStatus::Paid => "PAID",
            SaleStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse estrito para ações do operador, mesma regra de caixa
    /// do status de fatura.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_uppercase().as_str() {
            "PENDING" => Ok(SaleStatus::Pending),
            "CONFIRMED" => Ok(SaleStatus::Confirmed),
            "PAID" => Ok(SaleStatus::Paid),
            "CANCELLED" => Ok(SaleStatus::Cancelled),
            other => Err(AppError::UnknownStatus(other.to_string())),
        }
    }

    pub fn parse_lossy(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }
}

fn lossy_role<'de, D>(deserializer: D) -> Result<AgentRole, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| AgentRole::parse_lossy(&s)).unwrap_or_default())
}

fn lossy_sale_status<'de, D>(deserializer: D) -> Result<SaleStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| SaleStatus::parse_lossy(&s)).unwrap_or_default())
}

fn default_true() -> bool {
    true
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: Uuid,

    #[serde(alias = "full_name", alias = "name")]
    pub full_name: String,

    #[serde(default)]
    pub email: String,

    // Percentuais de comissão por papel (ex: "0.10" = 10%).
    #[serde(default, alias = "commission_rate_agent", deserialize_with = "money::flexible_amount")]
    pub commission_rate_agent: Decimal,

    #[serde(default, alias = "commission_rate_closer", deserialize_with = "money::flexible_amount")]
    pub commission_rate_closer: Decimal,

    #[serde(default, alias = "total_earnings", deserialize_with = "money::flexible_amount")]
    pub total_earnings: Decimal,

    #[serde(default, alias = "total_payouts", deserialize_with = "money::flexible_amount")]
    pub total_payouts: Decimal,

    #[serde(default, alias = "pending_commission", deserialize_with = "money::flexible_amount")]
    pub pending_commission: Decimal,

    #[serde(default = "default_true", alias = "is_active", alias = "isActive")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSale {
    pub id: Uuid,

    #[serde(alias = "agent_id", alias = "agent")]
    pub agent_id: Uuid,

    #[serde(default, alias = "client_name", alias = "clientName", alias = "customer")]
    pub client_name: String,

    #[serde(default, deserialize_with = "money::flexible_amount")]
    pub amount: Decimal,

    #[serde(default, deserialize_with = "money::flexible_amount")]
    pub commission: Decimal,

    #[serde(default, deserialize_with = "lossy_role")]
    pub role: AgentRole,

    #[serde(default, deserialize_with = "lossy_sale_status")]
    pub status: SaleStatus,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default, alias = "created_at", deserialize_with = "dates::flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

// Dados para cadastro de um novo agente
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub full_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[serde(default, deserialize_with = "money::flexible_amount")]
    pub commission_rate_agent: Decimal,

    #[serde(default, deserialize_with = "money::flexible_amount")]
    pub commission_rate_closer: Decimal,
}
