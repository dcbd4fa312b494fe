// src/common/messages.rs

use crate::api::Notifier;
use crate::common::AppError;

/// Catálogo de mensagens humanizadas para o operador do painel.
/// O idioma vem de `DASHBOARD_LOCALE`; qualquer valor fora do catálogo
/// cai no inglês, o idioma padrão do painel.
#[derive(Debug, Clone)]
pub struct Messages {
    locale: String,
}

impl Messages {
    pub fn new(locale: &str) -> Self {
        // "pt-BR" -> split vira ["pt", "BR"] -> next() pega "pt"
        // "en"    -> split vira ["en"]       -> next() pega "en"
        let lang = locale
            .trim()
            .split('-')
            .next()
            .unwrap_or(locale)
            .to_lowercase();
        Self { locale: lang }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn is_pt(&self) -> bool {
        self.locale == "pt"
    }

    /// Converte um `AppError` na frase que o operador vê no toast.
    /// O detalhe técnico fica no log; aqui só sai texto de tela.
    pub fn humanize(&self, err: &AppError) -> String {
        if self.is_pt() {
            return self.humanize_pt(err);
        }
        match err {
            AppError::ValidationError(_) | AppError::FieldInvalid { .. } => {
                "Check the highlighted fields.".into()
            }
            AppError::UnknownStatus(_) => "Unknown invoice status.".into(),
            AppError::InvalidTransition { .. } => {
                "This status change is not allowed.".into()
            }
            AppError::ClientNotFound => "Client not found.".into(),
            AppError::InvoiceNotFound => "Invoice not found.".into(),
            AppError::AgentNotFound => "Agent not found.".into(),
            AppError::SaleNotFound => "Sale not found.".into(),
            AppError::DeletePaidInvoice => "Paid invoices cannot be deleted.".into(),
            AppError::InvoiceHasPayments => {
                "This invoice has linked payments. Delete them first or keep the invoice.".into()
            }
            AppError::ChargeInFlight => "A charge is already being processed.".into(),
            AppError::ChargeRejected(msg) if !msg.trim().is_empty() => msg.clone(),
            AppError::ChargeRejected(_) => {
                "Payment failed. Please check the card details and try again.".into()
            }
            // Caso especial: o backend devolve 403 quando a conta não é admin.
            AppError::Unauthorized => {
                "Admin privileges required to modify billing records.".into()
            }
            AppError::ApiUnavailable(_) => {
                "Could not reach the billing service. Please try again.".into()
            }
            AppError::Internal(_) => "Something went wrong. Please try again.".into(),
        }
    }

    fn humanize_pt(&self, err: &AppError) -> String {
        match err {
            AppError::ValidationError(_) | AppError::FieldInvalid { .. } => {
                "Verifique os campos destacados.".into()
            }
            AppError::UnknownStatus(_) => "Status de fatura desconhecido.".into(),
            AppError::InvalidTransition { .. } => {
                "Essa mudança de status não é permitida.".into()
            }
            AppError::ClientNotFound => "Cliente não encontrado.".into(),
            AppError::InvoiceNotFound => "Fatura não encontrada.".into(),
            AppError::AgentNotFound => "Agente não encontrado.".into(),
            AppError::SaleNotFound => "Venda não encontrada.".into(),
            AppError::DeletePaidInvoice => {
                "Faturas pagas não podem ser excluídas.".into()
            }
            AppError::InvoiceHasPayments => {
                "Esta fatura possui pagamentos vinculados. Exclua-os primeiro ou mantenha a fatura.".into()
            }
            AppError::ChargeInFlight => "Já existe uma cobrança em andamento.".into(),
            AppError::ChargeRejected(msg) if !msg.trim().is_empty() => msg.clone(),
            AppError::ChargeRejected(_) => {
                "Pagamento recusado. Verifique os dados do cartão e tente novamente.".into()
            }
            AppError::Unauthorized => {
                "É necessário privilégio de administrador para alterar registros de cobrança.".into()
            }
            AppError::ApiUnavailable(_) => {
                "Não foi possível contatar o serviço de cobrança. Tente novamente.".into()
            }
            AppError::Internal(_) => "Algo deu errado. Tente novamente.".into(),
        }
    }

    pub fn charge_success(&self) -> &'static str {
        if self.is_pt() {
            "Pagamento registrado e fatura marcada como paga."
        } else {
            "Payment collected and invoice marked as paid."
        }
    }

    pub fn refresh_failed(&self) -> &'static str {
        if self.is_pt() {
            "Os dados exibidos podem estar desatualizados."
        } else {
            "The data shown may be out of date."
        }
    }
}

/// Ponto único de saída para falhas de operação.
/// Erros de validação NUNCA chegam ao notificador: ficam no formulário
/// e viram apenas um log de debug. O resto é logado com o detalhe
/// técnico e notificado com a frase humanizada do catálogo.
pub fn notify_failure(notifier: &dyn Notifier, messages: &Messages, context: &str, err: &AppError) {
    if err.is_validation() {
        tracing::debug!("Validação falhou em {}: {}", context, err);
        return;
    }
    tracing::error!("🔥 Falha em {}: {}", context, err);
    notifier.error(context, &messages.humanize(err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BufferingNotifier;

    #[test]
    fn locale_normalization_takes_primary_subtag() {
        assert_eq!(Messages::new("pt-BR").locale(), "pt");
        assert_eq!(Messages::new("en-US").locale(), "en");
        assert_eq!(Messages::new("  PT ").locale(), "pt");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let m = Messages::new("fr");
        assert_eq!(
            m.humanize(&AppError::Unauthorized),
            "Admin privileges required to modify billing records."
        );
    }

    #[test]
    fn unauthorized_has_the_admin_wording() {
        let en = Messages::new("en");
        assert_eq!(
            en.humanize(&AppError::Unauthorized),
            "Admin privileges required to modify billing records."
        );
        let pt = Messages::new("pt-BR");
        assert!(pt.humanize(&AppError::Unauthorized).contains("administrador"));
    }

    #[test]
    fn rejected_charge_passes_the_gateway_message_through() {
        let m = Messages::new("en");
        assert_eq!(
            m.humanize(&AppError::ChargeRejected("Card declined by issuer".into())),
            "Card declined by issuer"
        );
        // Sem mensagem do gateway, cai na frase genérica.
        assert_eq!(
            m.humanize(&AppError::ChargeRejected(String::new())),
            "Payment failed. Please check the card details and try again."
        );
    }

    #[test]
    fn validation_failures_never_reach_the_notifier() {
        let notifier = BufferingNotifier::new();
        let messages = Messages::new("en");
        notify_failure(
            &notifier,
            &messages,
            "Invoices",
            &AppError::DeletePaidInvoice,
        );
        assert!(notifier.take().is_empty());
    }

    #[test]
    fn api_failures_are_notified_humanized() {
        let notifier = BufferingNotifier::new();
        let messages = Messages::new("en");
        notify_failure(&notifier, &messages, "Billing", &AppError::Unauthorized);
        let sent = notifier.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Billing");
        assert_eq!(
            sent[0].message,
            "Admin privileges required to modify billing records."
        );
    }
}
