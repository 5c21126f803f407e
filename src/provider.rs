//! The provider session manager.
//!
//! A `KeeperProvider` waits for the extension to announce itself, holds
//! the connected network options, and gates every privileged operation
//! behind a live network-identity check before driving the extension's
//! signing entry points.

use crate::adapter;
use crate::error::ProviderError;
use crate::events::{Emitter, EventKind, Handler, Subscription};
use crate::extension::{self, ExtensionHost, KeeperApi};
use crate::fee::FeeEstimator;
use crate::keeper::{AuthData, CustomData};
use crate::session::Session;
use crate::signer::{ConnectOptions, DataEntry, Message, SignedTx, SignerTx, UserData};
use async_trait::async_trait;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use rand::RngCore as _;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// The capability contract exposed to the signer library.
#[async_trait]
pub trait Provider {
    /// Stores the expected network identity. Idempotent; calling again
    /// replaces the previous options.
    async fn connect(&self, options: ConnectOptions) -> Result<(), ProviderError>;

    /// Authenticates with the extension and returns the active account.
    async fn login(&self) -> Result<UserData, ProviderError>;

    /// Forgets the authenticated user. Local bookkeeping only.
    async fn logout(&self) -> Result<(), ProviderError>;

    /// Signs an arbitrary message and returns the signature.
    async fn sign_message(&self, message: Message) -> Result<String, ProviderError>;

    /// Signs typed key/value entries and returns the signature.
    async fn sign_typed_data(&self, data: Vec<DataEntry>) -> Result<String, ProviderError>;

    /// Signs a batch of transactions, preserving input order.
    async fn sign(&self, txs: Vec<SignerTx>) -> Result<Vec<SignedTx>, ProviderError>;

    /// Registers an event handler.
    fn on(&self, kind: EventKind, handler: Handler) -> Subscription;

    /// Registers a handler delivered at most once.
    fn once(&self, kind: EventKind, handler: Handler) -> Subscription;

    /// Removes a previously registered handler.
    fn off(&self, subscription: Subscription);
}

/// Provider backed by the Keeper Wallet extension.
pub struct KeeperProvider {
    host: Arc<dyn ExtensionHost>,
    api: OnceCell<Option<Arc<dyn KeeperApi>>>,
    auth_data: AuthData,
    session: Mutex<Session>,
    emitter: Emitter,
    fees: FeeEstimator,
}

impl KeeperProvider {
    /// Creates a provider that waits for the extension on `host`.
    ///
    /// The auth payload sent on `login` is sixteen random bytes generated
    /// here, hex-encoded, so each provider instance authenticates with its
    /// own challenge.
    pub fn new(host: Arc<dyn ExtensionHost>) -> Self {
        let mut entropy = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut entropy);

        Self {
            host,
            api: OnceCell::new(),
            auth_data: AuthData {
                data: hex::encode(entropy),
            },
            session: Mutex::new(Session::new()),
            emitter: Emitter::new(),
            fees: FeeEstimator::new(),
        }
    }

    /// The memoized extension handle. The first caller runs the polling
    /// discovery; once the retry budget has elapsed the failure sticks and
    /// every later call fails immediately.
    async fn api(&self) -> Result<Arc<dyn KeeperApi>, ProviderError> {
        let host = Arc::clone(&self.host);
        self.api
            .get_or_init(|| async move { extension::discover(host.as_ref()).await })
            .await
            .clone()
            .ok_or(ProviderError::NotInstalled)
    }

    /// The gate run before every privileged operation: the extension must
    /// be resolved, `connect` must have been called, and the extension's
    /// live network must match the connected options. Runs on every call
    /// because the extension's active network can change between calls.
    async fn ensure_network(&self) -> Result<(Arc<dyn KeeperApi>, ConnectOptions), ProviderError> {
        let api = self.api().await?;
        let options = self
            .session
            .lock()
            .unwrap()
            .options()
            .cloned()
            .ok_or(ProviderError::NotConnected)?;

        let state = api.public_state().await?;
        let actual_byte = state.network.byte().unwrap_or(0);
        if actual_byte != options.network_byte {
            return Err(ProviderError::NetworkMismatch {
                expected_byte: options.network_byte,
                expected_url: options.node_url,
                actual_byte,
                actual_url: state.network.server,
            });
        }

        Ok((api, options))
    }

    /// The public key to estimate fees under: the logged-in user's, or the
    /// extension's active account as a fallback.
    async fn sender_public_key(&self, api: &Arc<dyn KeeperApi>) -> Option<String> {
        let cached = self
            .session
            .lock()
            .unwrap()
            .user()
            .map(|user| user.public_key.clone());
        match cached {
            Some(key) => Some(key),
            None => api
                .public_state()
                .await
                .ok()
                .and_then(|state| state.account)
                .map(|account| account.public_key),
        }
    }

    /// Prefills the fee of an invoke transaction that has none. Estimation
    /// failures fall back to the unestimated transaction.
    async fn with_fee(
        &self,
        api: &Arc<dyn KeeperApi>,
        node_url: &str,
        tx: SignerTx,
    ) -> SignerTx {
        let SignerTx::Invoke(invoke) = &tx else {
            return tx;
        };
        if invoke.fee.is_some() {
            return tx;
        }

        let mut estimated = invoke.clone();
        estimated.payment.get_or_insert_with(Vec::new);
        if estimated.sender_public_key.is_none() {
            estimated.sender_public_key = self.sender_public_key(api).await;
        }

        match self
            .fees
            .estimate(node_url, &SignerTx::Invoke(estimated.clone()))
            .await
        {
            Ok(fee) => {
                estimated.fee = Some(fee);
                SignerTx::Invoke(estimated)
            }
            Err(err) => {
                tracing::warn!(?err, "fee estimation failed, signing without a prefilled fee");
                SignerTx::Invoke(estimated)
            }
        }
    }
}

#[async_trait]
impl Provider for KeeperProvider {
    async fn connect(&self, options: ConnectOptions) -> Result<(), ProviderError> {
        self.session.lock().unwrap().connect(options);
        Ok(())
    }

    async fn login(&self) -> Result<UserData, ProviderError> {
        let (api, _) = self.ensure_network().await?;
        let user = api.auth(self.auth_data.clone()).await?;
        tracing::info!(address = %user.address, "logged in");

        let event = self.session.lock().unwrap().login(user.clone());
        self.emitter.emit(&event);
        Ok(user)
    }

    async fn logout(&self) -> Result<(), ProviderError> {
        let event = self.session.lock().unwrap().logout();
        self.emitter.emit(&event);
        Ok(())
    }

    async fn sign_message(&self, message: Message) -> Result<String, ProviderError> {
        let (api, _) = self.ensure_network().await?;
        let binary = format!("base64:{}", BASE64_STANDARD.encode(message.to_string()));
        let signed = api.sign_custom_data(CustomData::Binary(binary)).await?;
        Ok(signed.signature)
    }

    async fn sign_typed_data(&self, data: Vec<DataEntry>) -> Result<String, ProviderError> {
        let (api, _) = self.ensure_network().await?;
        let signed = api.sign_custom_data(CustomData::Typed(data)).await?;
        Ok(signed.signature)
    }

    async fn sign(&self, txs: Vec<SignerTx>) -> Result<Vec<SignedTx>, ProviderError> {
        if txs.is_empty() {
            return Ok(Vec::new());
        }
        let (api, options) = self.ensure_network().await?;

        let mut prepared = Vec::with_capacity(txs.len());
        for tx in txs {
            prepared.push(self.with_fee(&api, &options.node_url, tx).await);
        }
        let mut envelopes = Vec::with_capacity(prepared.len());
        for tx in &prepared {
            envelopes.push(adapter::keeper_tx(tx)?);
        }

        // One transaction and a batch are distinct extension operations.
        let signed = if envelopes.len() == 1 {
            vec![api.sign_transaction(envelopes.remove(0)).await?]
        } else {
            api.sign_transaction_package(envelopes).await?
        };
        tracing::info!(count = signed.len(), "signed transactions");

        signed.iter().map(|tx| adapter::signed_tx(tx)).collect()
    }

    fn on(&self, kind: EventKind, handler: Handler) -> Subscription {
        self.emitter.subscribe(kind, handler, false)
    }

    fn once(&self, kind: EventKind, handler: Handler) -> Subscription {
        self.emitter.subscribe(kind, handler, true)
    }

    fn off(&self, subscription: Subscription) {
        self.emitter.unsubscribe(subscription);
    }
}
