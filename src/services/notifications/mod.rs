//! Push notification delivery with a pluggable provider.
//!
//! The core trait `PushProvider` keeps the notifiers independent of the
//! delivery network; `FcmProvider` is the production implementation.

mod fcm_provider;
mod provider;

pub use fcm_provider::FcmProvider;
pub use provider::{PushMessage, PushProvider, PushReceipt};
