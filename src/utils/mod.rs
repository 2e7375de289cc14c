//! Utility modules for chatstream

pub mod cancel;
pub mod redact;

pub use cancel::{CancelHandle, cancellable};
pub use redact::mask_secret;
