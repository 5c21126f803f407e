//! Fee estimation against a Waves node.
//!
//! Estimation is best-effort: the provider recovers from any failure here
//! by sending the transaction without a prefilled fee, so errors stay
//! internal and are only ever logged.

use crate::serialization::Long;
use crate::signer::SignerTx;
use anyhow::{ensure, Context as _, Result};
use serde::Deserialize;

/// The slice of the node's `calculateFee` response this crate reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeeInfo {
    fee_amount: Long,
}

/// Thin client for the node's fee calculation endpoint.
pub(crate) struct FeeEstimator {
    client: reqwest::Client,
}

impl FeeEstimator {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Asks the node at `node_url` for the minimal fee of `tx`.
    pub async fn estimate(&self, node_url: &str, tx: &SignerTx) -> Result<Long> {
        let url = format!(
            "{}/transactions/calculateFee",
            node_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .json(tx)
            .send()
            .await
            .context("fee calculation request failed")?;
        ensure!(
            response.status().is_success(),
            "fee calculation returned {}",
            response.status(),
        );
        let info: FeeInfo = response
            .json()
            .await
            .context("fee calculation response did not parse")?;

        Ok(info.fee_amount)
    }
}
