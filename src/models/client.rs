// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::dates;

fn default_true() -> bool {
    true
}

// O cliente da agência. Os apelidos de campo cobrem as variações
// que o backend já devolveu em versões diferentes ("name",
// "companyName" etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,

    #[serde(alias = "full_name", alias = "name")]
    pub full_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default, alias = "company_name", alias = "companyName")]
    pub company: Option<String>,

    #[serde(default, alias = "phone_number", alias = "phoneNumber")]
    pub phone: Option<String>,

    // Cliente listado sem o campo é presumido ativo.
    #[serde(default = "default_true", alias = "is_active", alias = "isActive")]
    pub active: bool,

    #[serde(default, alias = "created_at", deserialize_with = "dates::flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

// Dados para cadastro de um novo cliente
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub full_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    pub company: Option<String>,
    pub phone: Option<String>,
}

// Atualização parcial: só os campos presentes são alterados.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub active: Option<bool>,
}

// Filtro de listagem (espelha os query params do backend)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFilter {
    pub active: Option<bool>,
    // Busca por nome, e-mail ou empresa, sem diferenciar caixa.
    pub search: Option<String>,
}

impl Client {
    /// Aplica o filtro de listagem em memória.
    pub fn matches(&self, filter: &ClientFilter) -> bool {
        if let Some(active) = filter.active {
            if self.active != active {
                return false;
            }
        }
        if let Some(term) = filter.search.as_deref() {
            let term = term.trim().to_lowercase();
            if term.is_empty() {
                return true;
            }
            let company = self.company.as_deref().unwrap_or("");
            return self.full_name.to_lowercase().contains(&term)
                || self.email.to_lowercase().contains(&term)
                || company.to_lowercase().contains(&term);
        }
        true
    }
}
