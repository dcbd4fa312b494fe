// src/models/subscription.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::money;
use crate::common::dates;

// Assinatura recorrente. Só interessa ao painel o total já faturado,
// que entra na soma de "total pago" do cliente.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,

    #[serde(alias = "client_id", alias = "client", alias = "userId")]
    pub client_id: Uuid,

    #[serde(default, alias = "plan_name", alias = "planName")]
    pub plan: Option<String>,

    #[serde(default, alias = "total_billed", deserialize_with = "money::flexible_amount")]
    pub total_billed: Decimal,

    #[serde(default, alias = "created_at", deserialize_with = "dates::flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}
