// src/config.rs

use std::{env, sync::Arc, time::Duration};

use crate::{
    api::{ApiClient, Notifier},
    common::{AppError, Messages},
    services::{
        AgentService, BillingService, ChargeWizard, ClientService, FeedService, InvoiceService,
    },
    store::DashboardStore,
};

/// Configuração lida do ambiente. Tudo tem padrão sensato: o painel
/// sobe sem nenhuma variável definida.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub locale: String,
    pub charge_close_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let locale = env::var("DASHBOARD_LOCALE").unwrap_or_else(|_| "en".to_string());
        let close_ms = env::var("CHARGE_CLOSE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1500);

        Self {
            locale,
            charge_close_delay: Duration::from_millis(close_ms),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            charge_close_delay: Duration::from_millis(1500),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub api: Arc<dyn ApiClient>,
    pub notifier: Arc<dyn Notifier>,
    pub messages: Messages,
    pub store: Arc<DashboardStore>,
    pub client_service: ClientService,
    pub invoice_service: InvoiceService,
    pub billing_service: BillingService,
    pub feed_service: FeedService,
    pub agent_service: AgentService,
}

impl AppState {
    pub fn new(config: AppConfig, api: Arc<dyn ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        let store = Arc::new(DashboardStore::new());
        let messages = Messages::new(&config.locale);

        // --- Monta o gráfico de dependências ---
        let client_service = ClientService::new(
            api.clone(),
            notifier.clone(),
            messages.clone(),
            store.clone(),
        );
        let invoice_service = InvoiceService::new(
            api.clone(),
            notifier.clone(),
            messages.clone(),
            store.clone(),
        );
        let billing_service = BillingService::new(api.clone(), store.clone());
        let feed_service = FeedService::new(api.clone());
        let agent_service = AgentService::new(
            api.clone(),
            notifier.clone(),
            messages.clone(),
            store.clone(),
        );

        Self {
            config,
            api,
            notifier,
            messages,
            store,
            client_service,
            invoice_service,
            billing_service,
            feed_service,
            agent_service,
        }
    }

    /// O assistente de cobrança guarda o formulário entre os passos,
    /// então cada abertura do modal ganha uma instância própria.
    pub fn charge_wizard(&self) -> ChargeWizard {
        ChargeWizard::new(
            self.api.clone(),
            self.notifier.clone(),
            self.messages.clone(),
            self.store.clone(),
            self.config.charge_close_delay,
        )
    }

    /// Carga inicial do painel: clientes, faturas, pagamentos,
    /// assinaturas, agentes e vendas, nessa ordem.
    pub async fn refresh_all(&self) -> Result<(), AppError> {
        self.client_service.refresh().await?;
        self.billing_service.refresh().await?;
        self.agent_service.refresh().await?;
        tracing::info!("✅ Painel carregado com os dados do backend");
        Ok(())
    }
}
