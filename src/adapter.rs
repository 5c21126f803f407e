//! Bidirectional mapping between the signer and extension transaction
//! schemas.
//!
//! The forward direction wraps money-like values, applies the documented
//! defaults and drops absent optionals; the reverse direction parses the
//! extension's signed JSON through the long-safe reader so 64-bit
//! quantities come back as exact decimal strings.

use crate::error::ProviderError;
use crate::keeper::{
    AliasData, BurnData, CancelLeaseData, DataEntries, InvokeData, IssueData, KeeperTx,
    KeeperTxData, LeaseData, MassTransferData, MassTransferEntry, Money, ReissueData,
    SetAssetScriptData, SetScriptData, SponsorshipData, TransferData,
};
use crate::serialization::{self, Long};
use crate::signer::{
    AliasTx, BurnTx, CancelLeaseTx, DataTx, InvokeTx, IssueTx, LeaseTx, MassTransferTx, ReissueTx,
    SetAssetScriptTx, SetScriptTx, SignedTx, SignerTx, SponsorshipTx, TransferTx, TxType,
};
use serde_json::Value;

/// Converts a signer transaction into the extension's envelope form.
pub fn keeper_tx(tx: &SignerTx) -> Result<KeeperTx, ProviderError> {
    match tx {
        SignerTx::Issue(tx) => Ok(issue(tx)),
        SignerTx::Transfer(tx) => transfer(tx),
        SignerTx::Reissue(tx) => Ok(reissue(tx)),
        SignerTx::Burn(tx) => Ok(burn(tx)),
        SignerTx::Lease(tx) => Ok(lease(tx)),
        SignerTx::CancelLease(tx) => Ok(cancel_lease(tx)),
        SignerTx::Alias(tx) => Ok(alias(tx)),
        SignerTx::MassTransfer(tx) => mass_transfer(tx),
        SignerTx::Data(tx) => Ok(data(tx)),
        SignerTx::SetScript(tx) => Ok(set_script(tx)),
        SignerTx::Sponsorship(tx) => Ok(sponsorship(tx)),
        SignerTx::SetAssetScript(tx) => Ok(set_asset_script(tx)),
        SignerTx::Invoke(tx) => Ok(invoke(tx)),
    }
}

/// Parses a signed transaction returned by the extension, normalizing all
/// 64-bit quantities to exact decimal strings.
pub fn signed_tx(json: &str) -> Result<SignedTx, ProviderError> {
    let mut value: Value = serde_json::from_str(json)?;
    serialization::normalize_longs(&mut value)
        .map_err(|err| ProviderError::Response(err.to_string()))?;
    SignedTx::from_value(value)
}

/// Reduces an `alias:<chain>:<name>` reference to the bare alias name;
/// plain addresses pass through.
fn address(source: &str) -> String {
    match source.strip_prefix("alias:") {
        Some(rest) => rest.splitn(2, ':').nth(1).unwrap_or(rest).to_owned(),
        None => source.to_owned(),
    }
}

/// An explicit fee becomes money; an absent or zero fee stays absent so
/// the extension knows to estimate one itself.
fn fee_money(fee: Option<Long>, fee_asset_id: Option<&String>) -> Option<Money> {
    match fee {
        Some(fee) if fee.0 != 0 => Some(Money::new(fee, fee_asset_id)),
        _ => None,
    }
}

/// Base58 attachment text becomes raw bytes; absent or empty text stays
/// absent.
fn attachment_bytes(attachment: Option<&String>) -> Result<Option<Vec<u8>>, ProviderError> {
    match attachment {
        Some(text) if !text.is_empty() => Ok(Some(bs58::decode(text).into_vec()?)),
        _ => Ok(None),
    }
}

fn issue(tx: &IssueTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::Issue,
        data: KeeperTxData::Issue(IssueData {
            name: tx.name.clone(),
            description: tx.description.clone().unwrap_or_default(),
            quantity: tx.quantity,
            precision: tx.decimals,
            reissuable: tx.reissuable.unwrap_or(false),
            script: tx.script.clone(),
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn transfer(tx: &TransferTx) -> Result<KeeperTx, ProviderError> {
    Ok(KeeperTx {
        tx_type: TxType::Transfer,
        data: KeeperTxData::Transfer(TransferData {
            amount: Money::new(tx.amount, tx.asset_id.as_ref()),
            recipient: address(&tx.recipient),
            attachment: attachment_bytes(tx.attachment.as_ref())?,
            fee: fee_money(tx.fee, tx.fee_asset_id.as_ref()),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    })
}

fn reissue(tx: &ReissueTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::Reissue,
        data: KeeperTxData::Reissue(ReissueData {
            asset_id: tx.asset_id.clone(),
            quantity: tx.quantity,
            reissuable: tx.reissuable,
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn burn(tx: &BurnTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::Burn,
        data: KeeperTxData::Burn(BurnData {
            asset_id: tx.asset_id.clone(),
            amount: tx.amount,
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn lease(tx: &LeaseTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::Lease,
        data: KeeperTxData::Lease(LeaseData {
            recipient: address(&tx.recipient),
            amount: tx.amount,
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn cancel_lease(tx: &CancelLeaseTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::CancelLease,
        data: KeeperTxData::CancelLease(CancelLeaseData {
            lease_id: tx.lease_id.clone(),
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn alias(tx: &AliasTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::Alias,
        data: KeeperTxData::Alias(AliasData {
            alias: tx.alias.clone(),
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn mass_transfer(tx: &MassTransferTx) -> Result<KeeperTx, ProviderError> {
    Ok(KeeperTx {
        tx_type: TxType::MassTransfer,
        data: KeeperTxData::MassTransfer(MassTransferData {
            // A fixed placeholder: the extension computes the real total.
            total_amount: Money::new(Long(0), tx.asset_id.as_ref()),
            transfers: tx
                .transfers
                .iter()
                .map(|transfer| MassTransferEntry {
                    recipient: address(&transfer.recipient),
                    amount: transfer.amount,
                })
                .collect(),
            attachment: attachment_bytes(tx.attachment.as_ref())?,
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    })
}

fn data(tx: &DataTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::Data,
        data: KeeperTxData::Data(DataEntries {
            data: tx.data.clone(),
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn set_script(tx: &SetScriptTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::SetScript,
        data: KeeperTxData::SetScript(SetScriptData {
            script: tx.script.clone(),
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn sponsorship(tx: &SponsorshipTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::Sponsorship,
        data: KeeperTxData::Sponsorship(SponsorshipData {
            min_sponsored_asset_fee: Money::new(
                tx.min_sponsored_asset_fee,
                Some(&tx.asset_id),
            ),
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn set_asset_script(tx: &SetAssetScriptTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::SetAssetScript,
        data: KeeperTxData::SetAssetScript(SetAssetScriptData {
            asset_id: tx.asset_id.clone(),
            script: tx.script.clone(),
            fee: fee_money(tx.fee, None),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}

fn invoke(tx: &InvokeTx) -> KeeperTx {
    KeeperTx {
        tx_type: TxType::InvokeScript,
        data: KeeperTxData::Invoke(InvokeData {
            d_app: address(&tx.d_app),
            call: tx.call.clone(),
            payment: tx.payment.clone().unwrap_or_default(),
            fee: fee_money(tx.fee, tx.fee_asset_id.as_ref()),
            sender_public_key: tx.sender_public_key.clone(),
            timestamp: tx.timestamp,
        }),
    }
}
