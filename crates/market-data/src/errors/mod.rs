//! Error types for the market data crate.
//!
//! Every gateway call is a single best-effort attempt. Failures are reported
//! through [`MarketDataError`]; a successful call that carried no payload is
//! reported as `Ok(None)` by the gateway instead, so callers can tell "the
//! provider is down" apart from "the provider had nothing to say".

use thiserror::Error;

/// Errors that can occur while talking to a market data provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider rate limited the request (HTTP 429, or 403 on quota exhaustion).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider rejected the credential.
    #[error("Unauthorized: {provider}")]
    Unauthorized {
        /// The provider that rejected the API key
        provider: String,
    },

    /// A provider-specific error occurred (non-2xx status, error payload).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider answered with a body we could not decode.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// The provider that sent the body
        provider: String,
        /// Decoder message
        message: String,
    },

    /// The caller passed arguments the provider cannot serve.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the failure is likely to clear up on the next scheduled run
    /// without any operator action.
    ///
    /// Nothing in this workspace retries; the flag only drives log wording.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_)
        )
    }
}
