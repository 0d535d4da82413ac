//! Utility modules for KHQR.

pub mod datetime;

pub use datetime::{format_millis_rfc3339, now_millis};

/// Emits a debug event when the `tracing` feature is enabled.
pub(crate) fn trace_debug(_msg: std::fmt::Arguments<'_>) {
    #[cfg(feature = "tracing")]
    tracing::debug!("{}", _msg);
}
