//! Error types surfaced by the provider and the transaction adapter.

use thiserror::Error;

/// Errors produced by provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The extension never announced itself within the retry budget.
    #[error("Keeper Wallet extension is not installed")]
    NotInstalled,

    /// A gated operation ran before `connect` supplied network options.
    #[error("provider is not connected: call connect() before signing operations")]
    NotConnected,

    /// The extension's active network differs from the connected options.
    #[error(
        "network mismatch: expected byte {expected_byte} ({expected_url}), \
         extension reports byte {actual_byte} ({actual_url})"
    )]
    NetworkMismatch {
        expected_byte: u8,
        expected_url: String,
        actual_byte: u8,
        actual_url: String,
    },

    /// A transaction type outside the supported set.
    #[error("unsupported transaction type {0}")]
    UnsupportedTransactionType(i64),

    /// A transaction attachment that is not valid base58 text.
    #[error("invalid attachment encoding: {0}")]
    Attachment(#[from] bs58::decode::Error),

    /// The extension declined the request (user rejection, locked wallet).
    /// Passed through verbatim, never reinterpreted.
    #[error(transparent)]
    Extension(#[from] ExtensionError),

    /// The extension returned a response that does not parse.
    #[error("malformed signing response: {0}")]
    Response(String),

    /// JSON (de)serialization failure at the extension boundary.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// Stable machine-checkable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInstalled => "PROVIDER_NOT_INSTALLED",
            Self::NotConnected => "PROVIDER_NOT_CONNECTED",
            Self::NetworkMismatch { .. } => "NETWORK_MISMATCH",
            Self::UnsupportedTransactionType(_) => "UNSUPPORTED_TX_TYPE",
            Self::Attachment(_) => "INVALID_ATTACHMENT",
            Self::Extension(_) => "EXTENSION_REJECTED",
            Self::Response(_) => "BAD_RESPONSE",
            Self::Json(_) => "BAD_JSON",
        }
    }

    /// Whether this is a provider-class failure (installation or network
    /// identity) as opposed to a per-request one.
    pub fn is_provider(&self) -> bool {
        matches!(
            self,
            Self::NotInstalled | Self::NotConnected | Self::NetworkMismatch { .. }
        )
    }
}

/// An error reported by the extension itself.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct ExtensionError {
    pub message: String,
}

impl ExtensionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ProviderError::NotInstalled.code(), "PROVIDER_NOT_INSTALLED");
        assert_eq!(ProviderError::NotConnected.code(), "PROVIDER_NOT_CONNECTED");
        assert_eq!(
            ProviderError::UnsupportedTransactionType(17).code(),
            "UNSUPPORTED_TX_TYPE"
        );
    }

    #[test]
    fn provider_class() {
        assert!(ProviderError::NotInstalled.is_provider());
        assert!(ProviderError::NetworkMismatch {
            expected_byte: 87,
            expected_url: "https://nodes.wavesnodes.com".to_owned(),
            actual_byte: 84,
            actual_url: "https://nodes-testnet.wavesnodes.com".to_owned(),
        }
        .is_provider());
        assert!(!ProviderError::UnsupportedTransactionType(17).is_provider());
        assert!(!ProviderError::Extension(ExtensionError::new("User denied message")).is_provider());
    }
}
