//! The signer-side data model.
//!
//! These are the types a host application hands to the provider: one
//! variant per supported transaction kind, each carrying its kind-specific
//! required fields plus the common optional ones. JSON deserialization
//! dispatches on the numeric `type` tag the way the wire format does, so a
//! transaction arriving as JSON with an unknown type fails up front.

use crate::error::ProviderError;
use crate::serialization::Long;
use serde::{
    de::{self, Deserializer},
    ser::{self, Serializer},
    Deserialize, Serialize,
};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// Numeric transaction kind identifiers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum TxType {
    Issue = 3,
    Transfer = 4,
    Reissue = 5,
    Burn = 6,
    Lease = 8,
    CancelLease = 9,
    Alias = 10,
    MassTransfer = 11,
    Data = 12,
    SetScript = 13,
    Sponsorship = 14,
    SetAssetScript = 15,
    InvokeScript = 16,
}

impl TryFrom<i64> for TxType {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, i64> {
        Ok(match value {
            3 => Self::Issue,
            4 => Self::Transfer,
            5 => Self::Reissue,
            6 => Self::Burn,
            8 => Self::Lease,
            9 => Self::CancelLease,
            10 => Self::Alias,
            11 => Self::MassTransfer,
            12 => Self::Data,
            13 => Self::SetScript,
            14 => Self::Sponsorship,
            15 => Self::SetAssetScript,
            16 => Self::InvokeScript,
            other => return Err(other),
        })
    }
}

impl Serialize for TxType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for TxType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Self::try_from(value).map_err(|value| {
            de::Error::custom(format_args!("unsupported transaction type {value}"))
        })
    }
}

impl Display for TxType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&(*self as u8), f)
    }
}

/// A typed key/value entry, used by data transactions and typed-data
/// signing alike.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataEntry {
    String { key: String, value: String },
    Integer { key: String, value: Long },
    Boolean { key: String, value: bool },
    Binary { key: String, value: String },
}

/// An argument of a dApp function call.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CallArg {
    Integer { value: Long },
    Boolean { value: bool },
    String { value: String },
    Binary { value: String },
    List { value: Vec<CallArg> },
}

/// A dApp function invocation.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Call {
    pub function: String,
    pub args: Vec<CallArg>,
}

/// An asset payment attached to a script invocation. The asset id stays
/// optional here: `null` means the native asset and is forwarded as-is.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: Long,
    pub asset_id: Option<String>,
}

/// A single recipient of a mass transfer.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Transfer {
    pub recipient: String,
    pub amount: Long,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTx {
    pub name: String,
    pub quantity: Long,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reissuable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferTx {
    pub recipient: String,
    pub amount: Long,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueTx {
    pub asset_id: String,
    pub quantity: Long,
    pub reissuable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnTx {
    pub asset_id: String,
    pub amount: Long,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseTx {
    pub recipient: String,
    pub amount: Long,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelLeaseTx {
    pub lease_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasTx {
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MassTransferTx {
    pub transfers: Vec<Transfer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTx {
    pub data: Vec<DataEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScriptTx {
    pub script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipTx {
    pub asset_id: String,
    pub min_sponsored_asset_fee: Long,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAssetScriptTx {
    pub asset_id: String,
    pub script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeTx {
    pub d_app: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<Call>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Vec<Payment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Long>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// A transaction as handed over by the signer library.
#[derive(Clone, Debug, PartialEq)]
pub enum SignerTx {
    Issue(IssueTx),
    Transfer(TransferTx),
    Reissue(ReissueTx),
    Burn(BurnTx),
    Lease(LeaseTx),
    CancelLease(CancelLeaseTx),
    Alias(AliasTx),
    MassTransfer(MassTransferTx),
    Data(DataTx),
    SetScript(SetScriptTx),
    Sponsorship(SponsorshipTx),
    SetAssetScript(SetAssetScriptTx),
    Invoke(InvokeTx),
}

impl SignerTx {
    /// The numeric kind identifier of this transaction.
    pub fn tx_type(&self) -> TxType {
        match self {
            Self::Issue(_) => TxType::Issue,
            Self::Transfer(_) => TxType::Transfer,
            Self::Reissue(_) => TxType::Reissue,
            Self::Burn(_) => TxType::Burn,
            Self::Lease(_) => TxType::Lease,
            Self::CancelLease(_) => TxType::CancelLease,
            Self::Alias(_) => TxType::Alias,
            Self::MassTransfer(_) => TxType::MassTransfer,
            Self::Data(_) => TxType::Data,
            Self::SetScript(_) => TxType::SetScript,
            Self::Sponsorship(_) => TxType::Sponsorship,
            Self::SetAssetScript(_) => TxType::SetAssetScript,
            Self::Invoke(_) => TxType::InvokeScript,
        }
    }
}

impl Serialize for SignerTx {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        fn to_object<T, E>(tx: &T) -> Result<Map<String, Value>, E>
        where
            T: Serialize,
            E: ser::Error,
        {
            match serde_json::to_value(tx).map_err(ser::Error::custom)? {
                Value::Object(fields) => Ok(fields),
                _ => Err(ser::Error::custom("transaction must serialize to an object")),
            }
        }

        let mut fields = match self {
            Self::Issue(tx) => to_object(tx)?,
            Self::Transfer(tx) => to_object(tx)?,
            Self::Reissue(tx) => to_object(tx)?,
            Self::Burn(tx) => to_object(tx)?,
            Self::Lease(tx) => to_object(tx)?,
            Self::CancelLease(tx) => to_object(tx)?,
            Self::Alias(tx) => to_object(tx)?,
            Self::MassTransfer(tx) => to_object(tx)?,
            Self::Data(tx) => to_object(tx)?,
            Self::SetScript(tx) => to_object(tx)?,
            Self::Sponsorship(tx) => to_object(tx)?,
            Self::SetAssetScript(tx) => to_object(tx)?,
            Self::Invoke(tx) => to_object(tx)?,
        };
        fields.insert("type".to_owned(), (self.tx_type() as u8).into());
        fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SignerTx {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let tx_type = value
            .get("type")
            .and_then(Value::as_i64)
            .ok_or_else(|| de::Error::custom("transaction is missing its numeric type"))?;
        let tx_type = TxType::try_from(tx_type).map_err(|value| {
            de::Error::custom(format_args!("unsupported transaction type {value}"))
        })?;

        fn variant<'de, T, D>(value: Value) -> Result<T, D::Error>
        where
            T: serde::de::DeserializeOwned,
            D: Deserializer<'de>,
        {
            serde_json::from_value(value).map_err(de::Error::custom)
        }

        Ok(match tx_type {
            TxType::Issue => Self::Issue(variant::<_, D>(value)?),
            TxType::Transfer => Self::Transfer(variant::<_, D>(value)?),
            TxType::Reissue => Self::Reissue(variant::<_, D>(value)?),
            TxType::Burn => Self::Burn(variant::<_, D>(value)?),
            TxType::Lease => Self::Lease(variant::<_, D>(value)?),
            TxType::CancelLease => Self::CancelLease(variant::<_, D>(value)?),
            TxType::Alias => Self::Alias(variant::<_, D>(value)?),
            TxType::MassTransfer => Self::MassTransfer(variant::<_, D>(value)?),
            TxType::Data => Self::Data(variant::<_, D>(value)?),
            TxType::SetScript => Self::SetScript(variant::<_, D>(value)?),
            TxType::Sponsorship => Self::Sponsorship(variant::<_, D>(value)?),
            TxType::SetAssetScript => Self::SetAssetScript(variant::<_, D>(value)?),
            TxType::InvokeScript => Self::Invoke(variant::<_, D>(value)?),
        })
    }
}

/// A transaction signed and committed by the extension, with every 64-bit
/// quantity normalized to its exact decimal-string form.
#[derive(Clone, Debug, PartialEq)]
pub struct SignedTx {
    pub id: String,
    pub tx_type: TxType,
    pub version: i64,
    pub sender_public_key: String,
    pub proofs: Vec<String>,
    pub chain_id: u8,
    pub timestamp: u64,
    fields: Map<String, Value>,
}

impl SignedTx {
    pub(crate) fn from_value(value: Value) -> Result<Self, ProviderError> {
        fn missing(name: &str) -> ProviderError {
            ProviderError::Response(format!("signed transaction is missing '{name}'"))
        }

        let Value::Object(fields) = value else {
            return Err(ProviderError::Response(
                "signed transaction is not an object".to_owned(),
            ));
        };

        let string = |name: &str| -> Result<String, ProviderError> {
            fields
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| missing(name))
        };

        let tx_type = fields
            .get("type")
            .and_then(Value::as_i64)
            .ok_or_else(|| missing("type"))?;
        let tx_type =
            TxType::try_from(tx_type).map_err(ProviderError::UnsupportedTransactionType)?;
        let proofs = fields
            .get("proofs")
            .cloned()
            .map(serde_json::from_value)
            .transpose()?
            .ok_or_else(|| missing("proofs"))?;
        let chain_id = fields
            .get("chainId")
            .and_then(Value::as_u64)
            .and_then(|id| u8::try_from(id).ok())
            .ok_or_else(|| missing("chainId"))?;

        Ok(Self {
            id: string("id")?,
            tx_type,
            version: fields
                .get("version")
                .and_then(Value::as_i64)
                .ok_or_else(|| missing("version"))?,
            sender_public_key: string("senderPublicKey")?,
            proofs,
            chain_id,
            timestamp: fields
                .get("timestamp")
                .and_then(Value::as_u64)
                .ok_or_else(|| missing("timestamp"))?,
            fields,
        })
    }

    /// Kind-specific field access on the normalized transaction body.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The complete normalized transaction body, header included.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// The account the extension authenticated as.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub address: String,
    pub public_key: String,
}

/// The network identity the application expects the extension to be on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectOptions {
    pub network_byte: u8,
    pub node_url: String,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            network_byte: b'W',
            node_url: "https://nodes.wavesnodes.com".to_owned(),
        }
    }
}

/// Input accepted by `sign_message`: text, or a number coerced to its
/// string form before encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Text(String),
    Number(i64),
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => Display::fmt(number, f),
        }
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Message {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dispatches_on_the_numeric_type() {
        let tx: SignerTx = serde_json::from_value(json!({
            "type": 4,
            "recipient": "3N5HNJz5otiUavvoPrxMBrXBVv5HhYLdhiD",
            "amount": "9223372036854775807",
        }))
        .unwrap();
        match tx {
            SignerTx::Transfer(transfer) => {
                assert_eq!(transfer.amount, Long(i64::MAX));
                assert_eq!(transfer.asset_id, None);
            }
            other => panic!("expected a transfer, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = serde_json::from_value::<SignerTx>(json!({"type": 2, "amount": 1}))
            .unwrap_err()
            .to_string();
        assert!(err.contains("unsupported transaction type 2"), "{err}");
    }

    #[test]
    fn serializing_injects_the_type_tag() {
        let tx = SignerTx::Burn(BurnTx {
            asset_id: "7sP5abE9nGRwZxkgaEXgkQDZ3ERBcm9PLHixaUE5SYoT".to_owned(),
            amount: Long(100),
            ..Default::default()
        });
        assert_eq!(
            serde_json::to_value(&tx).unwrap(),
            json!({
                "type": 6,
                "assetId": "7sP5abE9nGRwZxkgaEXgkQDZ3ERBcm9PLHixaUE5SYoT",
                "amount": 100,
            }),
        );
    }

    #[test]
    fn signed_tx_requires_its_header() {
        let err = SignedTx::from_value(json!({"type": 4, "id": "x"})).unwrap_err();
        assert_eq!(err.code(), "BAD_RESPONSE");

        let err = SignedTx::from_value(json!({"type": 2})).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_TX_TYPE");
    }

    #[test]
    fn message_coerces_numbers() {
        assert_eq!(Message::from(1234567890).to_string(), "1234567890");
        assert_eq!(Message::from("hello").to_string(), "hello");
    }
}
