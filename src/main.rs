//src/main.rs

use std::sync::Arc;

use dashboard_core::{
    api::{InMemoryApi, TracingNotifier},
    config::{AppConfig, AppState},
};

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    let config = AppConfig::from_env();
    let api = Arc::new(InMemoryApi::with_sample_data());
    let state = AppState::new(config, api, Arc::new(TracingNotifier));

    // Carga inicial, como a tela faz ao abrir.
    // .expect() é bom aqui: sem dados, o painel não tem o que mostrar.
    state
        .refresh_all()
        .await
        .expect("Falha ao carregar os dados do painel.");

    let snapshot = state.store.snapshot();
    tracing::info!(
        "🚀 Painel pronto: {} clientes, {} faturas, {} pagamentos",
        snapshot.clients.len(),
        snapshot.invoices.len(),
        snapshot.payments.len()
    );

    // --- Resumo financeiro e extrato de cada cliente ativo ---
    for client in snapshot.clients.iter().filter(|c| c.active) {
        let summary = state.billing_service.summary_for(client.id);
        tracing::info!(
            "{}: {} faturas | pago {} | em aberto {}",
            client.full_name,
            summary.total_invoices,
            summary.total_paid,
            summary.total_outstanding
        );

        match state.feed_service.client_feed(client.id).await {
            Ok(feed) => {
                for entry in feed {
                    tracing::info!(
                        "  {} | {} | {} | {}",
                        entry.date_label(),
                        entry.description,
                        entry.amount,
                        entry.status
                    );
                }
            }
            Err(err) => tracing::warn!("⚠️ Extrato indisponível: {}", err),
        }
    }

    // --- Uma cobrança de ponta a ponta com o assistente ---
    let Some(invoice) = snapshot
        .invoices
        .iter()
        .find(|i| i.status.is_chargeable())
        .cloned()
    else {
        tracing::info!("Nenhuma fatura em aberto para cobrar.");
        return;
    };

    tracing::info!(
        "Cobrando a fatura {} ({}) de {}",
        invoice.reference(),
        invoice.description,
        invoice.total()
    );

    let mut wizard = state.charge_wizard();
    wizard.open();
    wizard
        .select_invoice(invoice.client_id, invoice.id)
        .expect("Fatura deveria ser cobrável.");
    wizard.next().expect("Passo 1 completo.");

    wizard.set_holder("MARINA DUARTE");
    wizard.input_card_number("4242424242424242");
    wizard.input_expiry("1230");
    wizard.input_cvv("123");
    wizard.next().expect("Cartão válido.");

    wizard.submit().await.expect("Cobrança de teste aprovada.");

    // O resumo reflete o pagamento sem recálculo incremental.
    let summary = state.billing_service.summary_for(invoice.client_id);
    tracing::info!(
        "✅ Após a cobrança: pago {} | em aberto {}",
        summary.total_paid,
        summary.total_outstanding
    );
}
