// src/services/charge_service.rs

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    api::{ApiClient, Notifier},
    common::error::AppError,
    common::messages::{notify_failure, Messages},
    common::money,
    models::{CardDetails, ChargeCardPayload, ChargeKind, InvoiceStatus, PaymentMethod},
    store::DashboardStore,
};

// --- Formatação ao vivo dos campos do cartão ---

pub fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Número do cartão em grupos de 4, no máximo 16 dígitos.
/// O que passar disso é descartado enquanto o operador digita.
pub fn format_card_number(raw: &str) -> String {
    let mut ds = digits(raw);
    ds.truncate(16);
    ds.as_bytes()
        .chunks(4)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validade MM/YY com a barra entrando sozinha no terceiro dígito:
/// "1" -> "1", "12" -> "12/", "1225" -> "12/25".
pub fn format_expiry(raw: &str) -> String {
    let mut ds = digits(raw);
    ds.truncate(4);
    match ds.len() {
        0 | 1 => ds,
        2 => format!("{}/", ds),
        _ => format!("{}/{}", &ds[..2], &ds[2..]),
    }
}

// --- O assistente em si ---

/// Cobrar uma fatura existente ou um valor avulso.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChargeMode {
    #[default]
    Invoice,
    Direct,
}

/// Os três passos do assistente de cobrança.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStep {
    Select,  // 1. Escolher fatura (ou cliente avulso e valor)
    Card,    // 2. Dados do cartão
    Confirm, // 3. Conferir e cobrar
}

/// O formulário preenchido ao longo dos passos. Os campos NUNCA são
/// limpos por falha de validação ou recusa do cartão; só o sucesso
/// (ou fechar o assistente) zera tudo.
#[derive(Debug, Clone, Default)]
pub struct ChargeForm {
    pub mode: ChargeMode,

    // Modo fatura
    pub client_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,

    // Modo avulso
    pub client_name: String,
    pub client_email: String,
    pub amount_input: String,

    // Passo 2
    pub holder: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub billing_address: String,

    // Opções enviadas junto com a cobrança
    pub save_card: bool,
    pub send_receipt: bool,
}

fn validate_card(form: &ChargeForm) -> Result<(), AppError> {
    if form.holder.trim().is_empty() {
        return Err(AppError::FieldInvalid {
            field: "holder",
            code: "required",
        });
    }
    let number = digits(&form.card_number);
    if !(13..=16).contains(&number.len()) {
        return Err(AppError::FieldInvalid {
            field: "card_number",
            code: "length",
        });
    }
    let Some((month, year)) = form.expiry.split_once('/') else {
        return Err(AppError::FieldInvalid {
            field: "expiry",
            code: "format",
        });
    };
    let month_ok = month.len() == 2
        && month
            .parse::<u8>()
            .map(|m| (1..=12).contains(&m))
            .unwrap_or(false);
    let year_ok = year.len() == 2 && year.chars().all(|c| c.is_ascii_digit());
    if !month_ok || !year_ok {
        return Err(AppError::FieldInvalid {
            field: "expiry",
            code: "format",
        });
    }
    let cvv = digits(&form.cvv);
    if !(3..=4).contains(&cvv.len()) {
        return Err(AppError::FieldInvalid {
            field: "cvv",
            code: "length",
        });
    }
    Ok(())
}

/// O modal de cobrança em três passos. Uma instância por tela; o
/// estado do formulário vive aqui, não na tela.
pub struct ChargeWizard {
    api: Arc<dyn ApiClient>,
    notifier: Arc<dyn Notifier>,
    messages: Messages,
    store: Arc<DashboardStore>,
    close_delay: Duration,

    open: bool,
    step: ChargeStep,
    form: ChargeForm,
    error: Option<String>,
    submitting: bool,
}

impl ChargeWizard {
    pub fn new(
        api: Arc<dyn ApiClient>,
        notifier: Arc<dyn Notifier>,
        messages: Messages,
        store: Arc<DashboardStore>,
        close_delay: Duration,
    ) -> Self {
        Self {
            api,
            notifier,
            messages,
            store,
            close_delay,
            open: false,
            step: ChargeStep::Select,
            form: ChargeForm::default(),
            error: None,
            submitting: false,
        }
    }

    // --- Estado exposto para a tela ---

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn step(&self) -> ChargeStep {
        self.step
    }

    pub fn form(&self) -> &ChargeForm {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Valor que será cobrado: total da fatura escolhida ou o valor
    /// digitado na cobrança avulsa.
    pub fn amount(&self) -> Option<Decimal> {
        match self.form.mode {
            ChargeMode::Invoice => self
                .form
                .invoice_id
                .and_then(|id| self.store.invoice(id))
                .map(|i| i.total()),
            ChargeMode::Direct => {
                let parsed = money::parse_amount_str(&self.form.amount_input);
                (parsed > Decimal::ZERO).then_some(parsed)
            }
        }
    }

    /// Cartão exibido na confirmação: só os últimos 4 dígitos.
    pub fn masked_card(&self) -> String {
        let ds = digits(&self.form.card_number);
        if ds.len() < 4 {
            return "****".into();
        }
        format!("**** {}", &ds[ds.len() - 4..])
    }

    // --- Abertura e navegação ---

    pub fn open(&mut self) {
        self.reset();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.reset();
        self.open = false;
    }

    pub fn reset(&mut self) {
        self.form = ChargeForm::default();
        self.step = ChargeStep::Select;
        self.error = None;
    }

    pub fn set_mode(&mut self, mode: ChargeMode) {
        // Trocar de aba descarta o erro inline da aba anterior.
        if self.form.mode != mode {
            self.error = None;
        }
        self.form.mode = mode;
    }

    /// Passo 1, modo fatura. Só fatura UNPAID ou OVERDUE do cliente
    /// pode ser cobrada; DRAFT precisa ser enviada antes.
    pub fn select_invoice(&mut self, client_id: Uuid, invoice_id: Uuid) -> Result<(), AppError> {
        let result = self.select_invoice_inner(client_id, invoice_id);
        self.record_step_result(&result);
        result
    }

    fn select_invoice_inner(&mut self, client_id: Uuid, invoice_id: Uuid) -> Result<(), AppError> {
        let invoice = self
            .store
            .invoice(invoice_id)
            .ok_or(AppError::InvoiceNotFound)?;
        if invoice.client_id != client_id {
            return Err(AppError::FieldInvalid {
                field: "invoice",
                code: "wrong_client",
            });
        }
        if !invoice.status.is_chargeable() {
            return Err(AppError::FieldInvalid {
                field: "invoice",
                code: "not_chargeable",
            });
        }
        self.form.client_id = Some(client_id);
        self.form.invoice_id = Some(invoice_id);
        Ok(())
    }

    // Passo 1, modo avulso.

    pub fn set_client_name(&mut self, raw: &str) {
        self.form.client_name = raw.to_string();
    }

    pub fn set_client_email(&mut self, raw: &str) {
        self.form.client_email = raw.to_string();
    }

    pub fn input_amount(&mut self, raw: &str) {
        self.form.amount_input = raw.to_string();
    }

    // Passo 2: os setters formatam enquanto o operador digita.

    pub fn set_holder(&mut self, raw: &str) {
        self.form.holder = raw.to_string();
    }

    pub fn input_card_number(&mut self, raw: &str) {
        self.form.card_number = format_card_number(raw);
    }

    pub fn input_expiry(&mut self, raw: &str) {
        self.form.expiry = format_expiry(raw);
    }

    pub fn input_cvv(&mut self, raw: &str) {
        let mut ds = digits(raw);
        ds.truncate(4);
        self.form.cvv = ds;
    }

    pub fn set_billing_address(&mut self, raw: &str) {
        self.form.billing_address = raw.to_string();
    }

    pub fn set_save_card(&mut self, value: bool) {
        self.form.save_card = value;
    }

    pub fn set_send_receipt(&mut self, value: bool) {
        self.form.send_receipt = value;
    }

    /// Avança um passo, validando o atual. Falha de validação deixa
    /// todos os campos como estão e mostra a mensagem inline.
    pub fn next(&mut self) -> Result<(), AppError> {
        let result = match self.step {
            ChargeStep::Select => match self.validate_select() {
                Ok(()) => {
                    self.step = ChargeStep::Card;
                    Ok(())
                }
                Err(err) => Err(err),
            },
            ChargeStep::Card => match validate_card(&self.form) {
                Ok(()) => {
                    self.step = ChargeStep::Confirm;
                    Ok(())
                }
                Err(err) => Err(err),
            },
            ChargeStep::Confirm => Ok(()),
        };
        self.record_step_result(&result);
        result
    }

    fn validate_select(&self) -> Result<(), AppError> {
        match self.form.mode {
            ChargeMode::Invoice => {
                if self.form.client_id.is_none() || self.form.invoice_id.is_none() {
                    return Err(AppError::FieldInvalid {
                        field: "invoice",
                        code: "required",
                    });
                }
            }
            ChargeMode::Direct => {
                if self.form.client_name.trim().is_empty() {
                    return Err(AppError::FieldInvalid {
                        field: "client_name",
                        code: "required",
                    });
                }
                if !self.form.client_email.trim().validate_email() {
                    return Err(AppError::FieldInvalid {
                        field: "client_email",
                        code: "invalid",
                    });
                }
                if money::parse_amount_str(&self.form.amount_input) <= Decimal::ZERO {
                    return Err(AppError::FieldInvalid {
                        field: "amount",
                        code: "positive",
                    });
                }
            }
        }
        Ok(())
    }

    pub fn back(&mut self) {
        self.error = None;
        self.step = match self.step {
            ChargeStep::Select | ChargeStep::Card => ChargeStep::Select,
            ChargeStep::Confirm => ChargeStep::Card,
        };
    }

    fn record_step_result(&mut self, result: &Result<(), AppError>) {
        match result {
            Ok(()) => self.error = None,
            Err(err) => self.error = Some(self.messages.humanize(err)),
        }
    }

    // --- Passo 3: a cobrança ---

    /// Dispara a cobrança. Sucesso notifica, espera um instante com o
    /// modal aberto e então fecha e zera tudo. Falha mantém o passo de
    /// confirmação com o cartão preenchido para nova tentativa.
    pub async fn submit(&mut self) -> Result<(), AppError> {
        if self.step != ChargeStep::Confirm {
            let err = AppError::FieldInvalid {
                field: "step",
                code: "confirm_required",
            };
            self.error = Some(self.messages.humanize(&err));
            return Err(err);
        }
        if self.submitting {
            return Err(AppError::ChargeInFlight);
        }

        self.submitting = true;
        let result = self.do_submit().await;
        self.submitting = false;

        match result {
            Ok(reference) => {
                self.error = None;
                self.notifier
                    .success("Charge", self.messages.charge_success());
                tracing::info!("✅ Cobrança de {} concluída", reference);
                // O modal fica visível por um instante com o sucesso.
                tokio::time::sleep(self.close_delay).await;
                self.reset();
                self.open = false;
                Ok(())
            }
            Err(err) => {
                if !err.is_validation() {
                    notify_failure(self.notifier.as_ref(), &self.messages, "Charge", &err);
                }
                self.error = Some(self.messages.humanize(&err));
                Err(err)
            }
        }
    }

    async fn do_submit(&self) -> Result<String, AppError> {
        validate_card(&self.form)?;
        self.validate_select()?;

        let card = CardDetails {
            holder: self.form.holder.trim().to_string(),
            number: self.form.card_number.clone(),
            expiry: self.form.expiry.clone(),
            cvv: self.form.cvv.clone(),
            address: match self.form.billing_address.trim() {
                "" => None,
                trimmed => Some(trimmed.to_string()),
            },
        };

        // Não há chave de idempotência: cada submit é uma cobrança
        // nova no backend.
        match self.form.mode {
            ChargeMode::Invoice => {
                let invoice_id = self.form.invoice_id.ok_or(AppError::FieldInvalid {
                    field: "invoice",
                    code: "required",
                })?;
                let invoice = self
                    .store
                    .invoice(invoice_id)
                    .ok_or(AppError::InvoiceNotFound)?;
                // A fatura pode ter sido paga em outra tela enquanto o
                // operador conferia. O snapshot fresco decide.
                if !invoice.status.is_chargeable() {
                    return Err(AppError::FieldInvalid {
                        field: "invoice",
                        code: "not_chargeable",
                    });
                }

                // 1. Cobra no gateway.
                let outcome = self
                    .api
                    .charge_card(ChargeCardPayload {
                        kind: ChargeKind::Invoice,
                        invoice_id: Some(invoice_id),
                        client_id: Some(invoice.client_id),
                        client_name: None,
                        client_email: None,
                        amount: invoice.total(),
                        method: PaymentMethod::Card,
                        card,
                        save_card: self.form.save_card,
                        send_receipt: self.form.send_receipt,
                    })
                    .await?;
                if !outcome.success {
                    return Err(AppError::ChargeRejected(outcome.error.unwrap_or_default()));
                }

                // 2. Marca a fatura como paga.
                let updated = self
                    .api
                    .update_invoice_status(invoice_id, InvoiceStatus::Paid.as_str())
                    .await?;
                self.store.update_invoice(updated);

                // 3. Relê os pagamentos; a lista nova traz o registro
                // do gateway.
                self.refresh_payments().await;
                Ok(invoice.reference())
            }
            ChargeMode::Direct => {
                let name = self.form.client_name.trim().to_string();
                let outcome = self
                    .api
                    .charge_card(ChargeCardPayload {
                        kind: ChargeKind::Direct,
                        invoice_id: None,
                        client_id: None,
                        client_name: Some(name.clone()),
                        client_email: Some(self.form.client_email.trim().to_string()),
                        amount: money::parse_amount_str(&self.form.amount_input),
                        method: PaymentMethod::Card,
                        card,
                        save_card: self.form.save_card,
                        send_receipt: self.form.send_receipt,
                    })
                    .await?;
                if !outcome.success {
                    return Err(AppError::ChargeRejected(outcome.error.unwrap_or_default()));
                }

                // Sem fatura para marcar; só o registro novo importa.
                self.refresh_payments().await;
                Ok(name)
            }
        }
    }

    async fn refresh_payments(&self) {
        match self.api.get_payments().await {
            Ok(payments) => self.store.replace_payments(payments),
            Err(err) => {
                tracing::warn!("⚠️ Releitura de pagamentos falhou: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BufferingNotifier, InMemoryApi, NoticeLevel};
    use crate::models::{Client, Invoice};
    use chrono::Utc;

    #[test]
    fn card_number_formats_in_groups_of_four() {
        assert_eq!(
            format_card_number("4111111111111111"),
            "4111 1111 1111 1111"
        );
        assert_eq!(format_card_number("42424"), "4242 4");
        assert_eq!(format_card_number(""), "");
        // Letras e pontuação somem antes do agrupamento.
        assert_eq!(
            format_card_number("4111abcd1111efgh1111ijkl1111"),
            "4111 1111 1111 1111"
        );
        // O que passa de 16 dígitos é cortado.
        assert_eq!(
            format_card_number("4242-4242 4242.4242-9999"),
            "4242 4242 4242 4242"
        );
    }

    #[test]
    fn expiry_inserts_the_separator_at_the_third_digit() {
        assert_eq!(format_expiry(""), "");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12/");
        assert_eq!(format_expiry("123"), "12/3");
        assert_eq!(format_expiry("1225"), "12/25");
        // Redigitar um valor já formatado não duplica a barra.
        assert_eq!(format_expiry("12/25"), "12/25");
    }

    struct Harness {
        api: Arc<InMemoryApi>,
        notifier: Arc<BufferingNotifier>,
        store: Arc<DashboardStore>,
        client_id: Uuid,
        invoice_id: Uuid,
    }

    fn harness() -> (Harness, ChargeWizard) {
        let api = Arc::new(InMemoryApi::new());
        let notifier = Arc::new(BufferingNotifier::new());
        let store = Arc::new(DashboardStore::new());

        let client_id = api.seed_client(Client {
            id: Uuid::new_v4(),
            full_name: "Marina Duarte".into(),
            email: "marina@studioduarte.com".into(),
            company: None,
            phone: None,
            active: true,
            created_at: None,
        });
        let invoice = Invoice {
            id: Uuid::new_v4(),
            client_id,
            description: "Plano Growth - Março".into(),
            amount: Decimal::new(10000, 2),
            tax: Decimal::new(800, 2),
            due_date: None,
            status: InvoiceStatus::Unpaid,
            package_id: None,
            notes: None,
            created_at: Some(Utc::now()),
        };
        let invoice_id = api.seed_invoice(invoice.clone());
        store.update_invoice(invoice);

        let wizard = ChargeWizard::new(
            api.clone(),
            notifier.clone(),
            Messages::new("en"),
            store.clone(),
            Duration::ZERO,
        );
        (
            Harness {
                api,
                notifier,
                store,
                client_id,
                invoice_id,
            },
            wizard,
        )
    }

    fn fill_card(wizard: &mut ChargeWizard) {
        wizard.set_holder("MARINA DUARTE");
        wizard.input_card_number("4242424242424242");
        wizard.input_expiry("1230");
        wizard.input_cvv("123");
    }

    #[tokio::test]
    async fn happy_path_charges_marks_paid_and_closes() {
        let (h, mut wizard) = harness();

        wizard.open();
        wizard.select_invoice(h.client_id, h.invoice_id).unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), ChargeStep::Card);

        fill_card(&mut wizard);
        wizard.next().unwrap();
        assert_eq!(wizard.step(), ChargeStep::Confirm);
        assert_eq!(wizard.amount(), Some(Decimal::new(10800, 2)));
        assert_eq!(wizard.masked_card(), "**** 4242");

        wizard.submit().await.unwrap();

        // Fatura paga, pagamento de 108.00 registrado, modal fechado.
        let invoices = h.api.get_invoices(Default::default()).await.unwrap();
        assert_eq!(invoices[0].status, InvoiceStatus::Paid);
        let payments = h.api.get_payments().await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, Decimal::new(10800, 2));
        assert!(!wizard.is_open());
        assert!(wizard.form().card_number.is_empty());
        assert!(!wizard.is_submitting());

        let sent = h.notifier.take();
        assert!(sent.iter().any(|n| n.level == NoticeLevel::Success));
    }

    #[tokio::test]
    async fn validation_failure_keeps_every_field() {
        let (h, mut wizard) = harness();
        wizard.open();
        wizard.select_invoice(h.client_id, h.invoice_id).unwrap();
        wizard.next().unwrap();

        wizard.set_holder("MARINA DUARTE");
        wizard.input_card_number("4242424242424242");
        wizard.input_expiry("1325"); // mês 13
        wizard.input_cvv("123");

        let err = wizard.next().unwrap_err();
        assert!(matches!(
            err,
            AppError::FieldInvalid {
                field: "expiry",
                ..
            }
        ));
        // Continua no passo 2 com tudo preenchido.
        assert_eq!(wizard.step(), ChargeStep::Card);
        assert_eq!(wizard.form().card_number, "4242 4242 4242 4242");
        assert_eq!(wizard.form().expiry, "13/25");
        assert!(wizard.error().is_some());
        // Validação não vira toast.
        assert!(h.notifier.take().is_empty());
    }

    #[tokio::test]
    async fn direct_charge_with_empty_name_keeps_the_amount() {
        let (h, mut wizard) = harness();
        wizard.open();
        wizard.set_mode(ChargeMode::Direct);
        wizard.set_client_email("marina@studioduarte.com");
        wizard.input_amount("150.00");

        let err = wizard.next().unwrap_err();
        assert!(matches!(
            err,
            AppError::FieldInvalid {
                field: "client_name",
                ..
            }
        ));
        // Não avançou e o valor digitado continua lá.
        assert_eq!(wizard.step(), ChargeStep::Select);
        assert_eq!(wizard.form().amount_input, "150.00");
        assert!(h.notifier.take().is_empty());
    }

    #[tokio::test]
    async fn direct_charge_requires_a_valid_email_and_positive_amount() {
        let (_, mut wizard) = harness();
        wizard.open();
        wizard.set_mode(ChargeMode::Direct);
        wizard.set_client_name("Marina Duarte");
        wizard.set_client_email("not-an-email");
        wizard.input_amount("150.00");

        let err = wizard.next().unwrap_err();
        assert!(matches!(
            err,
            AppError::FieldInvalid {
                field: "client_email",
                ..
            }
        ));

        wizard.set_client_email("marina@studioduarte.com");
        wizard.input_amount("0");
        let err = wizard.next().unwrap_err();
        assert!(matches!(
            err,
            AppError::FieldInvalid {
                field: "amount",
                ..
            }
        ));

        wizard.input_amount("150.00");
        wizard.next().unwrap();
        assert_eq!(wizard.step(), ChargeStep::Card);
    }

    #[tokio::test]
    async fn direct_charge_records_an_unlinked_payment() {
        let (h, mut wizard) = harness();
        wizard.open();
        wizard.set_mode(ChargeMode::Direct);
        wizard.set_client_name("Marina Duarte");
        wizard.set_client_email("marina@studioduarte.com");
        wizard.input_amount("150.00");
        wizard.next().unwrap();

        fill_card(&mut wizard);
        wizard.set_billing_address("Rua das Laranjeiras, 100");
        wizard.next().unwrap();
        assert_eq!(wizard.amount(), Some(Decimal::new(15000, 2)));

        wizard.submit().await.unwrap();

        let payments = h.api.get_payments().await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].invoice_id, None);
        assert_eq!(payments[0].amount, Decimal::new(15000, 2));
        // O backend casou o e-mail com o cliente seedado.
        assert_eq!(payments[0].client_id, Some(h.client_id));
        assert!(!wizard.is_open());
    }

    #[tokio::test]
    async fn decline_stays_on_confirm_and_retry_succeeds() {
        let (h, mut wizard) = harness();
        wizard.open();
        wizard.select_invoice(h.client_id, h.invoice_id).unwrap();
        wizard.next().unwrap();

        wizard.set_holder("MARINA DUARTE");
        wizard.input_card_number("4000000000000002"); // recusado
        wizard.input_expiry("1230");
        wizard.input_cvv("123");
        wizard.next().unwrap();

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, AppError::ChargeRejected(_)));

        // Permanece aberto, no passo 3, com o cartão preenchido.
        assert!(wizard.is_open());
        assert_eq!(wizard.step(), ChargeStep::Confirm);
        assert_eq!(wizard.form().card_number, "4000 0000 0000 0002");
        assert_eq!(wizard.error(), Some("Card declined by issuer."));

        // Fatura segue em aberto e nada foi gravado.
        let invoices = h.api.get_invoices(Default::default()).await.unwrap();
        assert_eq!(invoices[0].status, InvoiceStatus::Unpaid);
        assert!(h.api.get_payments().await.unwrap().is_empty());

        // Nova tentativa com outro cartão, sem redigitar o resto.
        wizard.input_card_number("4242424242424242");
        wizard.submit().await.unwrap();
        assert!(!wizard.is_open());
        assert_eq!(h.api.get_payments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn draft_invoices_cannot_be_selected() {
        let (h, mut wizard) = harness();
        let draft = Invoice {
            id: Uuid::new_v4(),
            client_id: h.client_id,
            description: "Rascunho".into(),
            amount: Decimal::new(5000, 2),
            tax: Decimal::ZERO,
            due_date: None,
            status: InvoiceStatus::Draft,
            package_id: None,
            notes: None,
            created_at: None,
        };
        let draft_id = h.api.seed_invoice(draft.clone());
        h.store.update_invoice(draft);

        wizard.open();
        let err = wizard.select_invoice(h.client_id, draft_id).unwrap_err();
        assert!(matches!(
            err,
            AppError::FieldInvalid {
                code: "not_chargeable",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn an_invoice_paid_elsewhere_is_not_charged_again() {
        let (h, mut wizard) = harness();
        wizard.open();
        wizard.select_invoice(h.client_id, h.invoice_id).unwrap();
        wizard.next().unwrap();
        fill_card(&mut wizard);
        wizard.next().unwrap();
        assert_eq!(wizard.step(), ChargeStep::Confirm);

        // Enquanto o operador confere, outra tela marca a fatura como
        // paga e o snapshot é atualizado.
        let updated = h
            .api
            .update_invoice_status(h.invoice_id, "PAID")
            .await
            .unwrap();
        h.store.update_invoice(updated);

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::FieldInvalid {
                code: "not_chargeable",
                ..
            }
        ));
        // Nenhuma cobrança nova foi gravada.
        assert!(h.api.get_payments().await.unwrap().is_empty());
        // O modal continua aberto no passo 3 com o erro inline.
        assert!(wizard.is_open());
        assert_eq!(wizard.step(), ChargeStep::Confirm);
        assert!(wizard.error().is_some());
        assert!(h.notifier.take().is_empty());
    }

    #[tokio::test]
    async fn switching_modes_clears_the_inline_error() {
        let (_, mut wizard) = harness();
        wizard.open();
        wizard.set_mode(ChargeMode::Direct);
        wizard.input_amount("150.00");
        // Nome vazio segura no passo 1 com erro inline.
        wizard.next().unwrap_err();
        assert!(wizard.error().is_some());

        wizard.set_mode(ChargeMode::Invoice);
        assert!(wizard.error().is_none());
        // Os campos digitados ficam guardados para a volta.
        assert_eq!(wizard.form().amount_input, "150.00");
    }

    #[tokio::test]
    async fn submit_requires_the_confirm_step() {
        let (_, mut wizard) = harness();
        wizard.open();

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::FieldInvalid {
                code: "confirm_required",
                ..
            }
        ));
        assert!(wizard.error().is_some());
    }

    #[tokio::test]
    async fn a_second_submit_while_in_flight_is_refused() {
        let (h, mut wizard) = harness();
        wizard.open();
        wizard.select_invoice(h.client_id, h.invoice_id).unwrap();
        wizard.next().unwrap();
        fill_card(&mut wizard);
        wizard.next().unwrap();

        wizard.submitting = true;
        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, AppError::ChargeInFlight));
        wizard.submitting = false;

        // Liberado, a cobrança passa.
        wizard.submit().await.unwrap();
        assert_eq!(h.api.get_payments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unauthorized_charge_shows_the_admin_message() {
        let (h, mut wizard) = harness();
        wizard.open();
        wizard.select_invoice(h.client_id, h.invoice_id).unwrap();
        wizard.next().unwrap();
        fill_card(&mut wizard);
        wizard.next().unwrap();

        h.api.set_admin(false);
        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert_eq!(
            wizard.error(),
            Some("Admin privileges required to modify billing records.")
        );

        let sent = h.notifier.take();
        assert!(sent.iter().any(|n| n.level == NoticeLevel::Error));
    }
}
