//! The data model of the Keeper Wallet extension contract.
//!
//! Every transaction crosses the boundary as a `{type, data}` envelope in
//! which money-like values use the canonical `{amount, assetId}` shape and
//! optional fields are omitted rather than sent as null. The `data` object
//! carries a `fee` key only when the source transaction had an explicit
//! fee; its absence tells the extension to estimate one itself.

use crate::serialization::Long;
use crate::signer::{Call, DataEntry, Payment, TxType, UserData};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

/// Asset id of the native asset.
pub const WAVES: &str = "WAVES";

/// The canonical money shape of the extension schema.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: Long,
    pub asset_id: String,
}

impl Money {
    /// Wraps an amount, defaulting the asset to the native one.
    pub fn new(amount: Long, asset_id: Option<&String>) -> Self {
        Self {
            amount,
            asset_id: asset_id.cloned().unwrap_or_else(|| WAVES.to_owned()),
        }
    }
}

/// The `{type, data}` envelope submitted to the extension for signing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeeperTx {
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub data: KeeperTxData,
}

/// Kind-specific payloads of the envelope.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeeperTxData {
    Issue(IssueData),
    Transfer(TransferData),
    Reissue(ReissueData),
    Burn(BurnData),
    Lease(LeaseData),
    CancelLease(CancelLeaseData),
    Alias(AliasData),
    MassTransfer(MassTransferData),
    Data(DataEntries),
    SetScript(SetScriptData),
    Sponsorship(SponsorshipData),
    SetAssetScript(SetAssetScriptData),
    Invoke(InvokeData),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueData {
    pub name: String,
    pub description: String,
    pub quantity: Long,
    pub precision: u8,
    pub reissuable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferData {
    pub amount: Money,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueData {
    pub asset_id: String,
    pub quantity: Long,
    pub reissuable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnData {
    pub asset_id: String,
    pub amount: Long,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseData {
    pub recipient: String,
    pub amount: Long,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelLeaseData {
    pub lease_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasData {
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// A mass-transfer entry on the extension side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MassTransferEntry {
    pub recipient: String,
    pub amount: Long,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MassTransferData {
    pub total_amount: Money,
    pub transfers: Vec<MassTransferEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntries {
    pub data: Vec<DataEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScriptData {
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipData {
    pub min_sponsored_asset_fee: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAssetScriptData {
    pub asset_id: String,
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeData {
    pub d_app: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<Call>,
    pub payment: Vec<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// The extension's public state, as far as this crate depends on it.
#[derive(Clone, Debug, Deserialize)]
pub struct PublicState {
    pub network: NetworkInfo,
    #[serde(default)]
    pub account: Option<UserData>,
}

/// The network the extension is currently on.
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkInfo {
    pub code: String,
    pub server: String,
}

impl NetworkInfo {
    /// The network byte, i.e. the first byte of the network code.
    pub fn byte(&self) -> Option<u8> {
        self.code.bytes().next()
    }
}

/// Payload of the extension's `auth` handshake.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AuthData {
    pub data: String,
}

/// Payload for the extension's custom-data signing entry point.
#[derive(Clone, Debug, PartialEq)]
pub enum CustomData {
    /// Version-1 payload: an opaque binary string.
    Binary(String),
    /// Version-2 payload: typed key/value entries.
    Typed(Vec<DataEntry>),
}

impl Serialize for CustomData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Binary(binary) => {
                let mut s = serializer.serialize_struct("CustomData", 2)?;
                s.serialize_field("version", &1u8)?;
                s.serialize_field("binary", binary)?;
                s.end()
            }
            Self::Typed(data) => {
                let mut s = serializer.serialize_struct("CustomData", 2)?;
                s.serialize_field("version", &2u8)?;
                s.serialize_field("data", data)?;
                s.end()
            }
        }
    }
}

/// The extension's custom-data signing result.
#[derive(Clone, Debug, Deserialize)]
pub struct CustomDataSignature {
    pub signature: String,
}
