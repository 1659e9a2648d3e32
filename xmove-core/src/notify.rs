//! Status and error notifications shown while a move is processed.

/// Transient status shown while a move request is outstanding.
pub const MOVING: &str = "Moving";
/// Transient status shown while an undo request is outstanding.
pub const UNDO_MOVING: &str = "Undo moving";
/// Generic error shown for any failed Studio round trip.
pub const SAVE_ERROR: &str = "Studio's having trouble saving your work";

/// Sink for user-visible notifications.
///
/// `show` and `hide` drive a single transient status line; `show_error`
/// raises a persistent error banner.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn show(&self, text: &str);
    fn hide(&self);
    fn show_error(&self, text: &str);
}

/// Notifier that only emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, text: &str) {
        tracing::info!(
            target: "xmove::notify",
            status = text,
            "notification shown"
        );
    }

    fn hide(&self) {
        tracing::debug!(target: "xmove::notify", "notification hidden");
    }

    fn show_error(&self, text: &str) {
        tracing::warn!(
            target: "xmove::notify",
            error = text,
            "error notification shown"
        );
    }
}
