//! Transaction assembly and hashing.

use alloy::primitives::{keccak256, B256, U256};

use crate::tx::action::Action;
use crate::tx::codec;
use crate::tx::types::{ChainId, TxError, TxResult};

/// An ordered, non-empty bundle of actions sharing one nonce and gas price.
///
/// Action order is part of the structural hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    nonce: u64,
    gas_price: U256,
    actions: Vec<Action>,
}

impl Transaction {
    /// Assemble actions into a transaction envelope.
    ///
    /// Actions are kept exactly as given: no deduplication, no reordering.
    pub fn assemble(
        actions: impl IntoIterator<Item = Action>,
        nonce: u64,
        gas_price: U256,
    ) -> TxResult<Self> {
        let actions: Vec<Action> = actions.into_iter().collect();
        if actions.is_empty() {
            return Err(TxError::EmptyActionSet);
        }

        tracing::debug!(
            action_count = actions.len(),
            nonce = nonce,
            gas_price = %gas_price,
            "Transaction assembled"
        );

        Ok(Self {
            nonce,
            gas_price,
            actions,
        })
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action(&self, index: usize) -> TxResult<&Action> {
        self.actions.get(index).ok_or(TxError::ActionIndex {
            index,
            len: self.actions.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Hash of the transaction without any signature.
    pub fn structural_hash(&self) -> B256 {
        let mut out = Vec::new();
        codec::encode_list(&mut out, |buf| {
            codec::encode_u64(buf, self.nonce);
            codec::encode_u256(buf, self.gas_price);
            codec::encode_list(buf, |actions| {
                for action in &self.actions {
                    action.encode_fields(actions);
                }
            });
        });
        keccak256(out)
    }

    /// Digest signed for the action at `index`.
    ///
    /// Binds the action's position and content, the enclosing transaction and
    /// the chain id. Signatures of other actions never enter the digest.
    pub fn signing_hash(&self, index: usize, chain_id: ChainId) -> TxResult<B256> {
        let action = self.action(index)?;
        let structural = self.structural_hash();

        let mut out = Vec::new();
        codec::encode_list(&mut out, |buf| {
            codec::encode_u64(buf, index as u64);
            action.encode_fields(buf);
            codec::encode_bytes(buf, structural.as_slice());
            codec::encode_u64(buf, chain_id.0);
        });
        Ok(keccak256(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::types::ActionKind;

    fn action(from: &str, nonce: u64) -> Action {
        Action::builder(ActionKind::Transfer, from)
            .to("bob")
            .nonce(nonce)
            .asset_id(1)
            .value(U256::from(100))
            .build()
    }

    #[test]
    fn test_empty_action_set() {
        let result = Transaction::assemble(Vec::new(), 1, U256::from(10));
        assert!(matches!(result, Err(TxError::EmptyActionSet)));
    }

    #[test]
    fn test_assemble_keeps_order_and_duplicates() {
        let a = action("alice", 5);
        let b = action("carol", 9);
        let tx = Transaction::assemble(vec![a.clone(), b.clone(), a.clone()], 1, U256::from(10))
            .unwrap();
        assert_eq!(tx.actions(), &[a.clone(), b, a]);
        assert_eq!(tx.nonce(), 1);
        assert_eq!(tx.gas_price(), U256::from(10));
    }

    #[test]
    fn test_structural_hash_is_order_sensitive() {
        let a = action("alice", 5);
        let b = action("carol", 9);
        let ab = Transaction::assemble(vec![a.clone(), b.clone()], 1, U256::from(10)).unwrap();
        let ba = Transaction::assemble(vec![b, a], 1, U256::from(10)).unwrap();
        assert_ne!(ab.structural_hash(), ba.structural_hash());
    }

    #[test]
    fn test_signing_hash_binds_chain_and_position() {
        let a = action("alice", 5);
        let tx = Transaction::assemble(vec![a.clone(), a], 1, U256::from(10)).unwrap();

        let first = tx.signing_hash(0, ChainId(1)).unwrap();
        assert_ne!(first, tx.signing_hash(1, ChainId(1)).unwrap());
        assert_ne!(first, tx.signing_hash(0, ChainId(2)).unwrap());
        assert_eq!(first, tx.signing_hash(0, ChainId(1)).unwrap());
    }

    #[test]
    fn test_signing_hash_out_of_range() {
        let tx = Transaction::assemble(vec![action("alice", 5)], 1, U256::from(10)).unwrap();
        let err = tx.signing_hash(3, ChainId(1)).unwrap_err();
        assert!(matches!(err, TxError::ActionIndex { index: 3, len: 1 }));
    }
}
