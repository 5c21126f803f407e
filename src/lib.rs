//! Provider adapter connecting signer-driven applications to the Keeper
//! Wallet browser extension.
//!
//! The crate has two halves. The [`adapter`] module is a pure,
//! bidirectional mapping between the signer transaction schema and the
//! extension's `{type, data}` envelope schema, including exact 64-bit
//! integer round-tripping. The [`provider`] module is the stateful session
//! manager: it discovers the extension on the host page, holds the
//! connected network options, gates every privileged operation behind a
//! live network-identity check, and emits `login`/`logout` events.
//!
//! The extension itself and the host page are external collaborators,
//! abstracted as the [`extension::KeeperApi`] and
//! [`extension::ExtensionHost`] traits.

pub mod adapter;
pub mod error;
pub mod events;
pub mod extension;
mod fee;
pub mod keeper;
pub mod provider;
pub mod serialization;
pub mod session;
pub mod signer;

pub use error::{ExtensionError, ProviderError};
pub use events::{EventKind, Handler, ProviderEvent, Subscription};
pub use extension::{ExtensionHost, KeeperApi};
pub use provider::{KeeperProvider, Provider};
pub use serialization::Long;
pub use signer::{ConnectOptions, Message, SignedTx, SignerTx, UserData};
