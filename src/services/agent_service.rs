// src/services/agent_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{ApiClient, Notifier},
    common::error::AppError,
    common::messages::{notify_failure, Messages},
    models::{Agent, AgentSale, CreateAgentPayload, SaleStatus},
    store::DashboardStore,
};

#[derive(Clone)]
pub struct AgentService {
    api: Arc<dyn ApiClient>,
    notifier: Arc<dyn Notifier>,
    messages: Messages,
    store: Arc<DashboardStore>,
}

impl AgentService {
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

    /// Recarrega agentes e vendas de uma vez; as duas telas andam juntas.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let agents = self.api.get_agents().await?;
        let sales = self.api.get_all_agent_sales().await?;
        self.store.replace_agents(agents);
        self.store.replace_sales(sales);
        Ok(())
    }

    pub fn sales_for(&self, agent_id: Uuid) -> Vec<AgentSale> {
        self.store
            .snapshot()
            .agent_sales
            .into_iter()
            .filter(|s| s.agent_id == agent_id)
            .collect()
    }

    /// Comissão pendente recalculada do zero sobre as vendas: soma o
    /// que foi confirmado mas ainda não pago. PENDING ainda não conta;
    /// PAID já saiu daqui; CANCELLED nunca entra.
    pub fn pending_commission(sales: &[AgentSale], agent_id: Uuid) -> Decimal {
        sales
            .iter()
            .filter(|s| s.agent_id == agent_id && s.status == SaleStatus::Confirmed)
            .map(|s| s.commission)
            .sum()
    }

    pub fn pending_commission_for(&self, agent_id: Uuid) -> Decimal {
        Self::pending_commission(&self.store.snapshot().agent_sales, agent_id)
    }

    pub async fn create(&self, payload: CreateAgentPayload) -> Result<Agent, AppError> {
        let result = self.create_inner(payload).await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Agents", err);
        }
        result
    }

    async fn create_inner(&self, payload: CreateAgentPayload) -> Result<Agent, AppError> {
        payload.validate()?;
        let created = self.api.create_agent(payload).await?;
        self.store.update_agent(created.clone());
        self.notifier
            .success("Agents", &format!("Agente {} cadastrado.", created.full_name));
        Ok(created)
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Agent, AppError> {
        let result = async {
            let updated = self.api.update_agent_status(id, active).await?;
            self.store.update_agent(updated.clone());
            Ok(updated)
        }
        .await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Agents", err);
        }
        result
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let result = async {
            self.api.delete_agent(id).await?;
            self.store.remove_agent(id);
            Ok(())
        }
        .await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Agents", err);
        }
        result
    }

    /// Mesmo contrato do status de fatura: entrada em qualquer caixa,
    /// valor desconhecido é recusado antes da rede.
    pub async fn update_sale_status(
        &self,
        id: Uuid,
        requested: &str,
    ) -> Result<AgentSale, AppError> {
        let result = async {
            let next = SaleStatus::parse(requested)?;
            let updated = self.api.update_agent_sale_status(id, next.as_str()).await?;
            self.store.update_sale(updated.clone());
            Ok(updated)
        }
        .await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Agents", err);
        }
        result
    }

    pub async fn update_sale_notes(&self, id: Uuid, notes: &str) -> Result<AgentSale, AppError> {
        let result = async {
            let updated = self.api.update_agent_sale_notes(id, notes).await?;
            self.store.update_sale(updated.clone());
            Ok(updated)
        }
        .await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Agents", err);
        }
        result
    }
}
