//! Error types for exchange rate provider operations.

use thiserror::Error;

/// Errors that can occur while talking to an external rate provider.
///
/// During spot lookups these are absorbed by the failover loop (the next
/// provider is tried); during explicit historical/timeseries requests they
/// are surfaced to the caller.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A network-level failure (connection refused, DNS, TLS, ...).
    #[error("Transport error from {provider}: {message}")]
    Transport {
        /// The provider that failed
        provider: String,
        /// The underlying error message
        message: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout from {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a non-success HTTP status after retries
    /// were exhausted (5xx) or immediately (4xx, never retried).
    #[error("HTTP {status} from {provider}")]
    Http {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The provider's response body could not be decoded.
    #[error("Decode error from {provider}: {message}")]
    Decode {
        /// The provider whose payload failed to decode
        provider: String,
        /// The decode failure detail
        message: String,
    },
}

impl ProviderError {
    /// Whether this error is a transport-class failure.
    ///
    /// Transport-class failures trigger failover to the next provider
    /// during rate resolution; they never abort the whole request on
    /// their own.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Http { .. }
        )
    }

    /// Build a `ProviderError` from a reqwest error, classifying timeouts.
    pub fn from_reqwest(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else if err.is_decode() {
            Self::Decode {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        }
    }
}
