// src/api/notify.rs

use std::sync::Mutex;

// O canal de avisos para o operador (toasts na tela).
// Os serviços não sabem como o aviso é exibido, só emitem.
pub trait Notifier: Send + Sync {
    fn success(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
    fn warning(&self, title: &str, message: &str);
}

/// Implementação padrão: os avisos viram linhas de log.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, title: &str, message: &str) {
        tracing::info!("✅ {}: {}", title, message);
    }

    fn error(&self, title: &str, message: &str) {
        tracing::error!("🔥 {}: {}", title, message);
    }

    fn warning(&self, title: &str, message: &str) {
        tracing::warn!("⚠️ {}: {}", title, message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// Guarda os avisos em memória para os testes inspecionarem.
#[derive(Debug, Default)]
pub struct BufferingNotifier {
    sent: Mutex<Vec<Notice>>,
}

impl BufferingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: NoticeLevel, title: &str, message: &str) {
        let mut sent = self.sent.lock().unwrap_or_else(|e| e.into_inner());
        sent.push(Notice {
            level,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    /// Drena os avisos acumulados.
    pub fn take(&self) -> Vec<Notice> {
        let mut sent = self.sent.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *sent)
    }
}

impl Notifier for BufferingNotifier {
    fn success(&self, title: &str, message: &str) {
        self.push(NoticeLevel::Success, title, message);
    }

    fn error(&self, title: &str, message: &str) {
        self.push(NoticeLevel::Error, title, message);
    }

    fn warning(&self, title: &str, message: &str) {
        self.push(NoticeLevel::Warning, title, message);
    }
}
