//! Notification port trait.

use crate::domain::error::SignalError;

/// Delivers rendered signal text. Failures are reported as
/// `SignalError::Notify` and never affect the engine.
pub trait Notifier {
    fn send(&self, message: &str) -> Result<(), SignalError>;
}
