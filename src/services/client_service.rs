// src/services/client_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{ApiClient, Notifier},
    common::error::AppError,
    common::messages::{notify_failure, Messages},
    models::{Client, ClientFilter, ClientPatch, CreateClientPayload},
    store::DashboardStore,
};

#[derive(Clone)]
pub struct ClientService {
    api: Arc<dyn ApiClient>,
    notifier: Arc<dyn Notifier>,
    messages: Messages,
    store: Arc<DashboardStore>,
}

impl ClientService {
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
        let clients = self.api.get_users(ClientFilter::default()).await?;
        self.store.replace_clients(clients);
        Ok(())
    }

    async fn soft_refresh(&self) {
        match self.api.get_users(ClientFilter::default()).await {
            Ok(clients) => self.store.replace_clients(clients),
            Err(err) => {
                tracing::warn!("⚠️ Releitura de clientes falhou: {}", err);
            }
        }
    }

    /// Busca e filtro rodam sobre o snapshot local; a tela não vai à
    /// rede a cada tecla digitada.
    pub fn search(&self, filter: &ClientFilter) -> Vec<Client> {
        self.store
            .snapshot()
            .clients
            .into_iter()
            .filter(|c| c.matches(filter))
            .collect()
    }

    pub async fn create(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        let result = self.create_inner(payload).await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Clients", err);
        }
        result
    }

    async fn create_inner(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        payload.validate()?;
        let created = self.api.create_user(payload).await?;
        self.store.insert_client(created.clone());
        self.notifier
            .success("Clients", &format!("Cliente {} cadastrado.", created.full_name));
        self.soft_refresh().await;
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, patch: ClientPatch) -> Result<Client, AppError> {
        let result = self.update_inner(id, patch).await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Clients", err);
        }
        result
    }

    async fn update_inner(&self, id: Uuid, patch: ClientPatch) -> Result<Client, AppError> {
        let updated = self.api.update_user(id, patch).await?;
        self.store.update_client(updated.clone());
        self.soft_refresh().await;
        Ok(updated)
    }

    /// `hard` exclui de vez; caso contrário o cliente só é desativado
    /// e continua aparecendo nos filtros de inativos.
    pub async fn remove(&self, id: Uuid, hard: bool) -> Result<(), AppError> {
        let result = self.remove_inner(id, hard).await;
        if let Err(err) = &result {
            notify_failure(self.notifier.as_ref(), &self.messages, "Clients", err);
        }
        result
    }

    async fn remove_inner(&self, id: Uuid, hard: bool) -> Result<(), AppError> {
        self.api.delete_user(id, hard).await?;
        if hard {
            self.store.remove_client(id);
            self.notifier.success("Clients", "Cliente excluído.");
        } else if let Some(mut client) = self.store.client(id) {
            client.active = false;
            self.store.update_client(client);
            self.notifier.success("Clients", "Cliente desativado.");
        }
        self.soft_refresh().await;
        Ok(())
    }
}
