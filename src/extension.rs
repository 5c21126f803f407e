//! The boundary to the Keeper Wallet extension.
//!
//! The extension is an externally developed component; this module only
//! captures the slice of its contract the provider depends on, plus the
//! discovery of its announcement on the host page.

use crate::error::ExtensionError;
use crate::keeper::{AuthData, CustomData, CustomDataSignature, KeeperTx, PublicState};
use crate::signer::UserData;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// The extension API surface.
///
/// `sign_transaction` and `sign_transaction_package` are genuinely
/// distinct operations on the extension side, not a batching convenience;
/// both return signed transactions as JSON text.
#[async_trait]
pub trait KeeperApi: Send + Sync {
    async fn public_state(&self) -> Result<PublicState, ExtensionError>;

    async fn auth(&self, data: AuthData) -> Result<UserData, ExtensionError>;

    async fn sign_transaction(&self, tx: KeeperTx) -> Result<String, ExtensionError>;

    async fn sign_transaction_package(
        &self,
        txs: Vec<KeeperTx>,
    ) -> Result<Vec<String>, ExtensionError>;

    async fn sign_custom_data(
        &self,
        data: CustomData,
    ) -> Result<CustomDataSignature, ExtensionError>;
}

/// Access to the page the extension announces itself on.
///
/// An implementation returns the API handle only once the extension has
/// both announced itself and finished its own initialization handshake.
pub trait ExtensionHost: Send + Sync {
    fn installed(&self) -> Option<Arc<dyn KeeperApi>>;
}

/// Interval between announcement checks.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Announcement checks after the first before giving up.
pub(crate) const MAX_RETRIES: u32 = 10;

/// Waits for the extension to announce itself within the retry budget.
///
/// Returns `None` once the budget is exhausted; the caller memoizes that
/// outcome so later operations fail immediately instead of re-polling.
pub(crate) async fn discover(host: &dyn ExtensionHost) -> Option<Arc<dyn KeeperApi>> {
    for attempt in 0..=MAX_RETRIES {
        if let Some(api) = host.installed() {
            tracing::debug!(attempt, "extension announced itself");
            return Some(api);
        }
        if attempt < MAX_RETRIES {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
    tracing::debug!("extension did not announce itself within the retry budget");
    None
}
