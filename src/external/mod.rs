//! Clients for the external platform APIs.

pub mod client;
pub mod google;
