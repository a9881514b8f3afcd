use crate::errors::WalletError;

/// Sink for failures that are deliberately not surfaced to the user.
pub trait ErrorLogger: Send + Sync {
    fn error(&self, context: &str, err: &WalletError);
}

/// Forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorLogger;

impl ErrorLogger for LogErrorLogger {
    fn error(&self, context: &str, err: &WalletError) {
        log::error!("{}: {}", context, err);
    }
}
