use thiserror::Error;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
// A taxonomia segue o comportamento da tela: erros de validação ficam
// inline no formulário e nunca passam pelo notificador; erros de API
// são logados e humanizados em common/messages.rs antes de chegar ao
// operador.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras checadas à mão (o validator não cobre Decimal nem datas).
    #[error("Campo inválido: {field} ({code})")]
    FieldInvalid {
        field: &'static str,
        code: &'static str,
    },

    #[error("Status de fatura desconhecido: {0}")]
    UnknownStatus(String),

    #[error("Transição de status não permitida: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Fatura não encontrada")]
    InvoiceNotFound,

    #[error("Agente não encontrado")]
    AgentNotFound,

    #[error("Venda não encontrada")]
    SaleNotFound,

    #[error("Fatura paga não pode ser excluída")]
    DeletePaidInvoice,

    #[error("Fatura possui pagamentos vinculados")]
    InvoiceHasPayments,

    #[error("Já existe uma cobrança em andamento")]
    ChargeInFlight,

    // Mensagem reportada pelo gateway, repassada como veio.
    #[error("Cobrança recusada: {0}")]
    ChargeRejected(String),

    #[error("Sem permissão de administrador")]
    Unauthorized,

    #[error("Falha na chamada à API: {0}")]
    ApiUnavailable(String),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Código estável consumido pelo catálogo de mensagens.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::FieldInvalid { .. } => "field_invalid",
            AppError::UnknownStatus(_) => "unknown_status",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::ClientNotFound => "client_not_found",
            AppError::InvoiceNotFound => "invoice_not_found",
            AppError::AgentNotFound => "agent_not_found",
            AppError::SaleNotFound => "sale_not_found",
            AppError::DeletePaidInvoice => "delete_paid_invoice",
            AppError::InvoiceHasPayments => "invoice_has_payments",
            AppError::ChargeInFlight => "charge_in_flight",
            AppError::ChargeRejected(_) => "charge_rejected",
            AppError::Unauthorized => "unauthorized",
            AppError::ApiUnavailable(_) => "api_unavailable",
            AppError::Internal(_) => "internal",
        }
    }

    /// Erros de validação são tratados antes de qualquer chamada de rede:
    /// ficam no formulário e não geram toast nem log de erro.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_)
                | AppError::FieldInvalid { .. }
                | AppError::UnknownStatus(_)
                | AppError::InvalidTransition { .. }
                | AppError::DeletePaidInvoice
                | AppError::InvoiceHasPayments
                | AppError::ChargeInFlight
        )
    }
}
