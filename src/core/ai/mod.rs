//! Generative-AI provider integration
//!
//! A thin HTTP client for the text-completion API plus a failover wrapper
//! that manages primary/fallback credentials and bounded retry.

pub mod client;
pub mod error;
pub mod wrapper;

pub use client::ProviderClient;
pub use error::{ProviderError, ProviderErrorMapper};
pub use wrapper::{AiClientWrapper, AiClientStatus, Generation};
