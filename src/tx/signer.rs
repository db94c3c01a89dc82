//! Per-action multi-key signing.
//!
//! # Design Decisions
//! - Actions are never mutated; signatures are collected in a [`SignatureSet`]
//!   owned by the caller and merged by the encoder
//! - The digest of an action ignores every signature, so actions can be
//!   signed in any order and from any thread
//! - Re-signing an action under a key index it already carries overwrites the
//!   previous record (secp256k1 signatures here are deterministic, so the bytes
//!   are identical for identical input)

use alloy::primitives::{Address, Signature, U256};
use std::collections::BTreeMap;

use crate::tx::action::Action;
use crate::tx::codec::SignedTransaction;
use crate::tx::transaction::Transaction;
use crate::tx::types::{ChainId, TxError, TxResult};
use crate::tx::wallet::Wallet;

/// A private key together with the account key indices it may sign for.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub wallet: Wallet,
    pub indices: Vec<u64>,
}

impl KeyPair {
    pub fn new(wallet: Wallet, indices: impl Into<Vec<u64>>) -> Self {
        Self {
            wallet,
            indices: indices.into(),
        }
    }

    /// Key pair authorized for a single index.
    pub fn single(wallet: Wallet, key_index: u64) -> Self {
        Self::new(wallet, vec![key_index])
    }

    pub fn authorizes(&self, key_index: u64) -> bool {
        self.indices.contains(&key_index)
    }
}

/// One signature attached to one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureRecord {
    pub key_index: u64,
    /// `r || s || v`
    pub signature: [u8; 65],
}

/// Signatures of a transaction, keyed by action index.
///
/// Records of one action are kept sorted by key index, one per index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet {
    records: BTreeMap<usize, Vec<SignatureRecord>>,
}

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a record to an action, returning the record it replaced.
    pub fn insert(&mut self, action_index: usize, record: SignatureRecord) -> Option<SignatureRecord> {
        let records = self.records.entry(action_index).or_default();
        match records.binary_search_by_key(&record.key_index, |r| r.key_index) {
            Ok(pos) => Some(std::mem::replace(&mut records[pos], record)),
            Err(pos) => {
                records.insert(pos, record);
                None
            }
        }
    }

    /// Fold another set into this one. Records of `other` win on conflicts.
    pub fn merge(&mut self, other: SignatureSet) {
        for (action_index, records) in other.records {
            for record in records {
                self.insert(action_index, record);
            }
        }
    }

    pub fn get(&self, action_index: usize) -> &[SignatureRecord] {
        self.records
            .get(&action_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_signed(&self, action_index: usize) -> bool {
        !self.get(action_index).is_empty()
    }

    pub fn action_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(Vec::is_empty)
    }
}

/// An action paired with the key that will sign it.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    pub action: Action,
    pub wallet: Wallet,
    pub key_index: u64,
}

impl SigningRequest {
    /// Request signed with the account's first key (index 0).
    pub fn new(action: Action, wallet: Wallet) -> Self {
        Self {
            action,
            wallet,
            key_index: 0,
        }
    }

    pub fn with_key_index(mut self, key_index: u64) -> Self {
        self.key_index = key_index;
        self
    }
}

/// Signs actions for a specific chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainSigner {
    chain_id: ChainId,
}

impl ChainSigner {
    pub fn new(chain_id: impl Into<ChainId>) -> Self {
        Self {
            chain_id: chain_id.into(),
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Sign one action with the single key pair authorized for `key_index`.
    pub fn sign(
        &self,
        tx: &Transaction,
        action_index: usize,
        key_index: u64,
        keys: &[KeyPair],
    ) -> TxResult<SignatureRecord> {
        if keys.is_empty() {
            return Err(TxError::Build("no key pairs supplied for signing".to_string()));
        }

        let digest = tx.signing_hash(action_index, self.chain_id)?;

        let matching: Vec<&KeyPair> = keys.iter().filter(|k| k.authorizes(key_index)).collect();
        let key = match matching.as_slice() {
            [] => return Err(TxError::NoMatchingKey { key_index }),
            [key] => key,
            many => {
                return Err(TxError::AmbiguousKey {
                    key_index,
                    count: many.len(),
                })
            }
        };

        let signature = key.wallet.sign_hash(&digest)?;

        tracing::debug!(
            action_index = action_index,
            key_index = key_index,
            signer = %key.wallet.address(),
            chain_id = self.chain_id.0,
            "Action signed"
        );

        Ok(SignatureRecord {
            key_index,
            signature,
        })
    }

    /// Sign and record into `signatures`. Replaces an earlier record under the
    /// same key index.
    pub fn sign_into(
        &self,
        tx: &Transaction,
        signatures: &mut SignatureSet,
        action_index: usize,
        key_index: u64,
        keys: &[KeyPair],
    ) -> TxResult<()> {
        let record = self.sign(tx, action_index, key_index, keys)?;
        if signatures.insert(action_index, record).is_some() {
            tracing::debug!(
                action_index = action_index,
                key_index = key_index,
                "Replaced existing signature"
            );
        }
        Ok(())
    }

    /// Sign with every key pair under every index it is authorized for.
    ///
    /// Used for accounts whose authorization threshold needs several keys.
    /// `signatures` is left untouched unless every index signs.
    pub fn sign_with_all(
        &self,
        tx: &Transaction,
        signatures: &mut SignatureSet,
        action_index: usize,
        keys: &[KeyPair],
    ) -> TxResult<()> {
        let mut indices: Vec<u64> = keys.iter().flat_map(|k| k.indices.iter().copied()).collect();
        indices.sort_unstable();
        indices.dedup();

        if indices.is_empty() {
            return Err(TxError::Build("no key indices supplied for signing".to_string()));
        }

        let mut staged = SignatureSet::new();
        for key_index in indices {
            self.sign_into(tx, &mut staged, action_index, key_index, keys)?;
        }
        signatures.merge(staged);
        Ok(())
    }

    /// Assemble, sign and seal a batch of requests in one go.
    pub fn sign_requests(
        &self,
        requests: &[SigningRequest],
        nonce: u64,
        gas_price: U256,
    ) -> TxResult<SignedTransaction> {
        let tx = Transaction::assemble(requests.iter().map(|r| r.action.clone()), nonce, gas_price)?;

        let mut signatures = SignatureSet::new();
        for (action_index, request) in requests.iter().enumerate() {
            let keys = [KeyPair::single(request.wallet.clone(), request.key_index)];
            self.sign_into(&tx, &mut signatures, action_index, request.key_index, &keys)?;
        }

        SignedTransaction::new(tx, signatures)
    }

    /// Recover the signer address of every record attached to an action.
    pub fn recover(
        &self,
        signed: &SignedTransaction,
        action_index: usize,
    ) -> TxResult<Vec<(u64, Address)>> {
        let digest = signed.transaction().signing_hash(action_index, self.chain_id)?;

        signed
            .signatures(action_index)
            .iter()
            .map(|record| {
                let signature = Signature::try_from(&record.signature[..])
                    .map_err(|e| TxError::Signing(format!("malformed signature: {}", e)))?;
                let address = signature
                    .recover_address_from_prehash(&digest)
                    .map_err(|e| TxError::Signing(format!("recovery failed: {}", e)))?;
                Ok((record.key_index, address))
            })
            .collect()
    }
}
