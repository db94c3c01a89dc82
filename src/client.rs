//! High-level ledger client.
//!
//! # Responsibilities
//! - Own the connection pool, chain signer and process-wide gas defaults
//! - Run the build → assemble → sign → encode → submit pipeline
//! - Offer one-call helpers for common account, asset and candidate actions
//!
//! # Design Decisions
//! - Gas defaults live behind an `ArcSwap` so they can change while other
//!   threads are assembling transactions
//! - Helpers fetch the sender nonce from the node right before building the
//!   action and always sign with key index 0

use alloy::primitives::{Bytes, B256, U256};
use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::rpc::{ConnectionPool, Endpoint, RpcClient};
use crate::tx::payload::{
    ActionPayload, AssetObject, RegisterCandidate, UpdateCandidate, UpdateCandidatePubKey,
    VoteCandidate,
};
use crate::tx::{
    Action, ActionBuilder, ActionKind, ChainSigner, Name, PubKey, SignedTransaction,
    SigningRequest, Wallet,
};

/// Transaction-level nonce used when the caller does not pick one.
pub const DEFAULT_TX_NONCE: u64 = 1;

/// Asset the high-level helpers attach to non-transfer actions.
pub const SYSTEM_ASSET_ID: u64 = 1;

/// Gas values applied at assembly time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSettings {
    pub limit: u64,
    pub price: U256,
}

impl Default for GasSettings {
    fn default() -> Self {
        let config = crate::config::GasConfig::default();
        Self {
            limit: config.limit,
            price: config.price,
        }
    }
}

/// Entry point for building, signing and submitting transactions.
#[derive(Debug)]
pub struct LedgerClient {
    pool: Arc<ConnectionPool>,
    endpoint: Option<Endpoint>,
    gas: ArcSwap<GasSettings>,
    signer: ChainSigner,
}

impl LedgerClient {
    pub fn new(pool: Arc<ConnectionPool>, signer: ChainSigner, gas: GasSettings) -> Self {
        Self {
            pool,
            endpoint: None,
            gas: ArcSwap::from_pointee(gas),
            signer,
        }
    }

    /// Client over an HTTP pool built from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Arc::new(ConnectionPool::from_config(config)),
            ChainSigner::new(config.chain.id),
            GasSettings {
                limit: config.gas.limit,
                price: config.gas.price,
            },
        )
    }

    /// Send every call to `endpoint` instead of the pool's default.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    pub fn signer(&self) -> &ChainSigner {
        &self.signer
    }

    /// Connection handle this client talks through.
    pub fn rpc(&self) -> ClientResult<Arc<RpcClient>> {
        let client = match &self.endpoint {
            Some(endpoint) => self.pool.connect(endpoint)?,
            None => self.pool.default_connect()?,
        };
        Ok(client)
    }

    pub fn gas(&self) -> GasSettings {
        **self.gas.load()
    }

    pub fn set_gas_price(&self, price: U256) {
        self.gas.rcu(|current| GasSettings { price, ..**current });
        tracing::debug!(%price, "Gas price updated");
    }

    pub fn set_gas_limit(&self, limit: u64) {
        self.gas.rcu(|current| GasSettings { limit, ..**current });
        tracing::debug!(limit, "Gas limit updated");
    }

    /// Assemble and sign `requests` with the current gas price.
    pub fn sign(&self, requests: &[SigningRequest], tx_nonce: u64) -> ClientResult<SignedTransaction> {
        let price = self.gas().price;
        Ok(self.signer.sign_requests(requests, tx_nonce, price)?)
    }

    /// Sign `requests` into one transaction and submit it once.
    pub fn send(&self, requests: &[SigningRequest]) -> ClientResult<B256> {
        self.send_with_nonce(requests, DEFAULT_TX_NONCE)
    }

    pub fn send_with_nonce(&self, requests: &[SigningRequest], tx_nonce: u64) -> ClientResult<B256> {
        let signed = self.sign(requests, tx_nonce)?;
        self.submit(&signed)
    }

    /// Submit an already signed transaction.
    pub fn submit(&self, signed: &SignedTransaction) -> ClientResult<B256> {
        let raw = signed.encode();
        let local = signed.hash();
        let remote = self.rpc()?.submit(&raw)?;
        if remote != local {
            tracing::warn!(%local, %remote, "Node reported a different transaction hash");
        }
        Ok(remote)
    }

    fn send_single(
        &self,
        kind: ActionKind,
        wallet: &Wallet,
        from: &Name,
        fill: impl FnOnce(ActionBuilder) -> ActionBuilder,
    ) -> ClientResult<B256> {
        let nonce = self.rpc()?.get_nonce(from.as_str())?;
        let builder = Action::builder(kind, from.clone())
            .nonce(nonce)
            .gas_limit(self.gas().limit);
        let action = fill(builder).build();
        tracing::debug!(kind = ?kind, from = %from, nonce, "Sending action");
        self.send(&[SigningRequest::new(action, wallet.clone())])
    }

    /// Create `new_account` owned by `pub_key`, funded with `amount` of the
    /// system asset.
    pub fn create_account(
        &self,
        wallet: &Wallet,
        from: impl Into<Name>,
        new_account: impl Into<Name>,
        pub_key: &PubKey,
        amount: U256,
    ) -> ClientResult<B256> {
        let new_account = new_account.into();
        let payload = Bytes::copy_from_slice(pub_key.as_bytes());
        self.send_single(ActionKind::CreateAccount, wallet, &from.into(), |b| {
            b.to(new_account)
                .asset_id(SYSTEM_ASSET_ID)
                .value(amount)
                .payload(payload)
        })
    }

    pub fn transfer(
        &self,
        wallet: &Wallet,
        from: impl Into<Name>,
        to: impl Into<Name>,
        asset_id: u64,
        amount: U256,
    ) -> ClientResult<B256> {
        let to = to.into();
        self.send_single(ActionKind::Transfer, wallet, &from.into(), |b| {
            b.to(to).asset_id(asset_id).value(amount)
        })
    }

    /// Issue a new asset owned by `owner`.
    #[allow(clippy::too_many_arguments)]
    pub fn issue_asset(
        &self,
        wallet: &Wallet,
        from: impl Into<Name>,
        owner: impl Into<Name>,
        asset_name: &str,
        symbol: &str,
        amount: U256,
        decimals: u64,
    ) -> ClientResult<B256> {
        let payload = AssetObject {
            asset_name: asset_name.to_string(),
            symbol: symbol.to_string(),
            amount,
            decimals,
            owner: owner.into(),
            ..Default::default()
        }
        .to_bytes();
        self.send_single(ActionKind::IssueAsset, wallet, &from.into(), |b| {
            b.asset_id(SYSTEM_ASSET_ID).payload(payload)
        })
    }

    /// Mint `amount` more of `asset_id` to `to`.
    pub fn increase_asset(
        &self,
        wallet: &Wallet,
        from: impl Into<Name>,
        to: impl Into<Name>,
        asset_id: u64,
        amount: U256,
    ) -> ClientResult<B256> {
        let to = to.into();
        let payload = AssetObject {
            asset_id,
            amount,
            ..Default::default()
        }
        .to_bytes();
        self.send_single(ActionKind::IncreaseAsset, wallet, &from.into(), |b| {
            b.to(to).asset_id(asset_id).payload(payload)
        })
    }

    pub fn set_asset_owner(
        &self,
        wallet: &Wallet,
        from: impl Into<Name>,
        new_owner: impl Into<Name>,
        asset_id: u64,
    ) -> ClientResult<B256> {
        let payload = AssetObject {
            asset_id,
            owner: new_owner.into(),
            ..Default::default()
        }
        .to_bytes();
        self.send_single(ActionKind::SetAssetOwner, wallet, &from.into(), |b| {
            b.asset_id(asset_id).payload(payload)
        })
    }

    /// Register `from` as a producer candidate, staking `stake`.
    pub fn register_candidate(
        &self,
        wallet: &Wallet,
        from: impl Into<Name>,
        url: &str,
        stake: U256,
    ) -> ClientResult<B256> {
        let from = from.into();
        let payload = RegisterCandidate { url: url.to_string() }.to_bytes();
        let to = from.clone();
        self.send_single(ActionKind::RegisterCandidate, wallet, &from, |b| {
            b.to(to)
                .asset_id(SYSTEM_ASSET_ID)
                .value(stake)
                .payload(payload)
        })
    }

    pub fn update_candidate(
        &self,
        wallet: &Wallet,
        from: impl Into<Name>,
        url: &str,
        stake: U256,
    ) -> ClientResult<B256> {
        let payload = UpdateCandidate { url: url.to_string() }.to_bytes();
        self.send_single(ActionKind::UpdateCandidate, wallet, &from.into(), |b| {
            b.asset_id(SYSTEM_ASSET_ID).value(stake).payload(payload)
        })
    }

    pub fn unregister_candidate(&self, wallet: &Wallet, from: impl Into<Name>) -> ClientResult<B256> {
        self.send_single(ActionKind::UnregisterCandidate, wallet, &from.into(), |b| {
            b.asset_id(SYSTEM_ASSET_ID)
        })
    }

    pub fn refund_candidate(&self, wallet: &Wallet, from: impl Into<Name>) -> ClientResult<B256> {
        self.send_single(ActionKind::RefundCandidate, wallet, &from.into(), |b| {
            b.asset_id(SYSTEM_ASSET_ID)
        })
    }

    pub fn update_candidate_pub_key(
        &self,
        wallet: &Wallet,
        from: impl Into<Name>,
        pub_key: PubKey,
    ) -> ClientResult<B256> {
        let payload = UpdateCandidatePubKey { pub_key }.to_bytes();
        self.send_single(ActionKind::UpdateCandidatePubKey, wallet, &from.into(), |b| {
            b.asset_id(SYSTEM_ASSET_ID).payload(payload)
        })
    }

    /// Vote `stake` for `candidate`.
    pub fn vote_candidate(
        &self,
        wallet: &Wallet,
        from: impl Into<Name>,
        candidate: impl Into<Name>,
        stake: U256,
    ) -> ClientResult<B256> {
        let payload = VoteCandidate {
            candidate: candidate.into(),
            stake,
        }
        .to_bytes();
        self.send_single(ActionKind::VoteCandidate, wallet, &from.into(), |b| {
            b.asset_id(SYSTEM_ASSET_ID).payload(payload)
        })
    }
}
