// src/services/billing_service.rs

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    api::ApiClient,
    common::error::AppError,
    models::{ClientBillingSummary, Invoice, Payment, PaymentStatus, Subscription},
    store::DashboardStore,
};

#[derive(Clone)]
pub struct BillingService {
    api: Arc<dyn ApiClient>,
    store: Arc<DashboardStore>,
}

impl BillingService {
    pub fn new(api: Arc<dyn ApiClient>, store: Arc<DashboardStore>) -> Self {
        Self { api, store }
    }

    /// Recarrega faturas, pagamentos e assinaturas do backend.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let invoices = self.api.get_invoices(Default::default()).await?;
        let payments = self.api.get_payments().await?;
        let subscriptions = self.api.get_subscriptions().await?;
        self.store.replace_billing(invoices, payments, subscriptions);
        Ok(())
    }

    /// Resumo financeiro do cliente, calculado sobre o snapshot atual.
    pub fn summary_for(&self, client_id: Uuid) -> ClientBillingSummary {
        let snapshot = self.store.snapshot();
        Self::summarize(
            &snapshot.invoices,
            &snapshot.payments,
            &snapshot.subscriptions,
            client_id,
        )
    }

    /// O cálculo em si, sempre do zero a partir das listas completas.
    /// Nunca ajusta um resumo anterior de forma incremental: recontar
    /// tudo elimina qualquer deriva entre telas.
    pub fn summarize(
        invoices: &[Invoice],
        payments: &[Payment],
        subscriptions: &[Subscription],
        client_id: Uuid,
    ) -> ClientBillingSummary {
        // 1. Faturas do cliente.
        let own_invoices: Vec<&Invoice> = invoices
            .iter()
            .filter(|i| i.client_id == client_id)
            .collect();
        let own_ids: HashSet<Uuid> = own_invoices.iter().map(|i| i.id).collect();

        // 2. Pagamentos COMPLETED do cliente, ligados direto ou via fatura.
        let own_payments: Vec<&Payment> = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .filter(|p| {
                p.client_id == Some(client_id)
                    || p.invoice_id.map(|id| own_ids.contains(&id)).unwrap_or(false)
            })
            .collect();

        let paid_from_payments: Decimal = own_payments.iter().map(|p| p.amount).sum();

        // 3. Assinaturas entram no total pago pelo valor já faturado.
        let paid_from_subscriptions: Decimal = subscriptions
            .iter()
            .filter(|s| s.client_id == client_id)
            .map(|s| s.total_billed)
            .sum();

        // 4. Em aberto: principal + imposto das faturas não quitadas.
        let total_outstanding: Decimal = own_invoices
            .iter()
            .filter(|i| i.status.is_open())
            .map(|i| i.total())
            .sum();

        // 5. Data do último pagamento. Desempate pelo id para o
        // resultado não depender da ordem das listas; pagamento sem
        // data nunca vence.
        let last_payment_date = own_payments
            .iter()
            .filter_map(|p| p.created_at.map(|d| (d, p.id)))
            .max()
            .map(|(d, _)| d);

        ClientBillingSummary {
            client_id,
            total_invoices: own_invoices.len(),
            total_paid: paid_from_payments + paid_from_subscriptions,
            total_outstanding,
            last_payment_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceStatus, PaymentMethod};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn client_id() -> Uuid {
        Uuid::from_u128(0xA0)
    }

    fn other_client() -> Uuid {
        Uuid::from_u128(0xB0)
    }

    fn invoice(id: u128, status: InvoiceStatus, amount: i64, tax: i64) -> Invoice {
        Invoice {
            id: Uuid::from_u128(id),
            client_id: client_id(),
            description: format!("Fatura {}", id),
            amount: Decimal::new(amount, 2),
            tax: Decimal::new(tax, 2),
            due_date: None,
            status,
            package_id: None,
            notes: None,
            created_at: None,
        }
    }

    fn payment(
        id: u128,
        status: PaymentStatus,
        amount: i64,
        day: Option<u32>,
    ) -> Payment {
        Payment {
            id: Uuid::from_u128(id),
            invoice_id: None,
            client_id: Some(client_id()),
            amount: Decimal::new(amount, 2),
            method: PaymentMethod::Card,
            status,
            notes: None,
            created_at: day.map(|d| Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()),
        }
    }

    fn fixture_invoices() -> Vec<Invoice> {
        vec![
            invoice(1, InvoiceStatus::Unpaid, 10000, 800),
            invoice(2, InvoiceStatus::Overdue, 20000, 0),
            invoice(3, InvoiceStatus::Draft, 5000, 400),
            invoice(4, InvoiceStatus::Paid, 30000, 0),
            invoice(5, InvoiceStatus::Cancelled, 9900, 0),
        ]
    }

    fn fixture_payments() -> Vec<Payment> {
        vec![
            payment(10, PaymentStatus::Completed, 30000, Some(5)),
            payment(11, PaymentStatus::Completed, 5000, None), // sem data
            payment(12, PaymentStatus::Pending, 77700, Some(9)), // ignorado
        ]
    }

    fn fixture_subscriptions() -> Vec<Subscription> {
        vec![Subscription {
            id: Uuid::from_u128(20),
            client_id: client_id(),
            plan: Some("Retainer".into()),
            total_billed: Decimal::new(240000, 2),
            created_at: None,
        }]
    }

    #[test]
    fn summary_counts_sums_and_excludes_the_right_things() {
        let summary = BillingService::summarize(
            &fixture_invoices(),
            &fixture_payments(),
            &fixture_subscriptions(),
            client_id(),
        );

        assert_eq!(summary.total_invoices, 5);
        // 300.00 (pagamento) + 50.00 (sem data) + 2400.00 (assinatura);
        // o PENDING fica de fora.
        assert_eq!(summary.total_paid, Decimal::new(275000, 2));
        // 108.00 + 200.00 + 54.00; PAID e CANCELLED ficam de fora.
        assert_eq!(summary.total_outstanding, Decimal::new(36200, 2));
        assert_eq!(
            summary.last_payment_date,
            Some(Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn payments_linked_by_invoice_count_for_the_client() {
        let invoices = vec![invoice(1, InvoiceStatus::Paid, 10000, 0)];
        // Pagamento sem client_id, ligado só pela fatura.
        let mut p = payment(10, PaymentStatus::Completed, 10000, Some(3));
        p.client_id = None;
        p.invoice_id = Some(Uuid::from_u128(1));

        let summary = BillingService::summarize(&invoices, &[p], &[], client_id());
        assert_eq!(summary.total_paid, Decimal::new(10000, 2));
    }

    #[test]
    fn foreign_records_never_leak_into_the_summary() {
        let mut invoices = fixture_invoices();
        let mut foreign = invoice(99, InvoiceStatus::Unpaid, 999900, 0);
        foreign.client_id = other_client();
        invoices.push(foreign);

        let mut payments = fixture_payments();
        let mut foreign_payment = payment(98, PaymentStatus::Completed, 888800, Some(7));
        foreign_payment.client_id = Some(other_client());
        payments.push(foreign_payment);

        let summary = BillingService::summarize(
            &invoices,
            &payments,
            &fixture_subscriptions(),
            client_id(),
        );
        assert_eq!(summary.total_invoices, 5);
        assert_eq!(summary.total_outstanding, Decimal::new(36200, 2));
        assert_eq!(summary.total_paid, Decimal::new(275000, 2));
    }

    #[test]
    fn same_timestamp_ties_break_by_id() {
        let a = payment(10, PaymentStatus::Completed, 1000, Some(5));
        let b = payment(11, PaymentStatus::Completed, 2000, Some(5));
        let expected = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();

        let forward = BillingService::summarize(&[], &[a.clone(), b.clone()], &[], client_id());
        let backward = BillingService::summarize(&[], &[b, a], &[], client_id());

        assert_eq!(forward.last_payment_date, Some(expected));
        assert_eq!(forward.last_payment_date, backward.last_payment_date);
    }

    #[test]
    fn all_undated_payments_yield_no_last_date() {
        let payments = vec![
            payment(10, PaymentStatus::Completed, 1000, None),
            payment(11, PaymentStatus::Completed, 2000, None),
        ];
        let summary = BillingService::summarize(&[], &payments, &[], client_id());
        assert_eq!(summary.last_payment_date, None);
        assert_eq!(summary.total_paid, Decimal::new(3000, 2));
    }

    proptest! {
        // A ordem das listas não pode mudar o resumo.
        #[test]
        fn summary_is_order_independent(
            invoices in Just(fixture_invoices()).prop_shuffle(),
            payments in Just(fixture_payments()).prop_shuffle(),
        ) {
            let baseline = BillingService::summarize(
                &fixture_invoices(),
                &fixture_payments(),
                &fixture_subscriptions(),
                client_id(),
            );
            let shuffled = BillingService::summarize(
                &invoices,
                &payments,
                &fixture_subscriptions(),
                client_id(),
            );
            prop_assert_eq!(baseline, shuffled);
        }
    }
}
