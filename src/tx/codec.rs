//! Canonical RLP encoding of signed transactions.
//!
//! # Layout
//! ```text
//! [nonce, gas_price, [
//!     [[kind, nonce, asset_id, from, to, gas_limit, [value?], payload, remark],
//!      [[key_index, signature], ...]],
//!     ...
//! ]]
//! ```
//!
//! The encoding is a pure function of the transaction content and action
//! order. Decoding accepts only the canonical form, so `decode(encode(tx))`
//! reproduces `tx` exactly.

use alloy::primitives::{keccak256, Bytes, B256, U256};
use alloy_rlp::{Decodable, Encodable, Header};

use crate::tx::action::Action;
use crate::tx::signer::{SignatureRecord, SignatureSet};
use crate::tx::transaction::Transaction;
use crate::tx::types::{TxError, TxResult};

/// A transaction whose every action carries at least one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: Transaction,
    /// Index-aligned with `tx.actions()`.
    signatures: Vec<Vec<SignatureRecord>>,
}

impl SignedTransaction {
    /// Merge a transaction with its signatures.
    ///
    /// Fails if an action is unsigned or a signature targets an action the
    /// transaction does not have.
    pub fn new(tx: Transaction, signatures: SignatureSet) -> TxResult<Self> {
        if let Some(stray) = signatures.action_indices().find(|&i| i >= tx.len()) {
            return Err(TxError::Encoding(format!(
                "signature for action {} but transaction has {} actions",
                stray,
                tx.len()
            )));
        }

        let signatures = (0..tx.len())
            .map(|i| {
                let records = signatures.get(i);
                if records.is_empty() {
                    Err(TxError::Encoding(format!("action {} is not signed", i)))
                } else {
                    Ok(records.to_vec())
                }
            })
            .collect::<TxResult<Vec<_>>>()?;

        Ok(Self { tx, signatures })
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn signatures(&self, action_index: usize) -> &[SignatureRecord] {
        self.signatures
            .get(action_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Canonical byte representation, as submitted to the node.
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::new();
        encode_list(&mut out, |buf| {
            encode_u64(buf, self.tx.nonce());
            encode_u256(buf, self.tx.gas_price());
            encode_list(buf, |entries| {
                for (action, records) in self.tx.actions().iter().zip(&self.signatures) {
                    encode_list(entries, |entry| {
                        action.encode_fields(entry);
                        encode_list(entry, |sigs| {
                            for record in records {
                                encode_list(sigs, |pair| {
                                    encode_u64(pair, record.key_index);
                                    encode_bytes(pair, &record.signature);
                                });
                            }
                        });
                    });
                }
            });
        });
        out.into()
    }

    /// Parse a canonical encoding.
    pub fn decode(raw: &[u8]) -> TxResult<Self> {
        let mut top = Cursor::new(raw);
        let mut body = top.list()?;
        top.finish()?;

        let nonce = body.u64()?;
        let gas_price = body.u256()?;
        let mut entries = body.list()?;
        body.finish()?;

        let mut actions = Vec::new();
        let mut signatures = Vec::new();
        while !entries.is_empty() {
            let mut entry = entries.list()?;
            actions.push(Action::decode_fields(&mut entry)?);

            let mut sigs = entry.list()?;
            entry.finish()?;

            let mut records: Vec<SignatureRecord> = Vec::new();
            while !sigs.is_empty() {
                let mut pair = sigs.list()?;
                let key_index = pair.u64()?;
                let signature: [u8; 65] = pair.bytes()?.try_into().map_err(|_| {
                    TxError::Decoding("signature must be 65 bytes".to_string())
                })?;
                pair.finish()?;

                if records.last().is_some_and(|last| last.key_index >= key_index) {
                    return Err(TxError::Decoding(
                        "signature key indices must be strictly increasing".to_string(),
                    ));
                }
                records.push(SignatureRecord {
                    key_index,
                    signature,
                });
            }
            if records.is_empty() {
                return Err(TxError::Decoding(format!(
                    "action {} has no signature",
                    actions.len() - 1
                )));
            }
            signatures.push(records);
        }

        let tx = Transaction::assemble(actions, nonce, gas_price).map_err(|e| match e {
            TxError::EmptyActionSet => TxError::Decoding("transaction has no actions".to_string()),
            other => other,
        })?;

        Ok(Self { tx, signatures })
    }

    /// Content-derived transaction id.
    pub fn hash(&self) -> B256 {
        keccak256(self.encode())
    }
}

/// Merge and encode in one step.
pub fn encode(tx: &Transaction, signatures: &SignatureSet) -> TxResult<Bytes> {
    Ok(SignedTransaction::new(tx.clone(), signatures.clone())?.encode())
}

pub(crate) fn encode_list(out: &mut Vec<u8>, body: impl FnOnce(&mut Vec<u8>)) {
    let mut payload = Vec::new();
    body(&mut payload);
    Header {
        list: true,
        payload_length: payload.len(),
    }
    .encode(out);
    out.extend_from_slice(&payload);
}

pub(crate) fn encode_u64(out: &mut Vec<u8>, value: u64) {
    value.encode(out);
}

pub(crate) fn encode_u256(out: &mut Vec<u8>, value: U256) {
    encode_bytes(out, &value.to_be_bytes_trimmed_vec());
}

pub(crate) fn encode_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    bytes.encode(out);
}

pub(crate) fn encode_str(out: &mut Vec<u8>, value: &str) {
    value.encode(out);
}

/// Sequential reader over the items of an RLP list payload.
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Enter the next item, which must be a list.
    pub(crate) fn list(&mut self) -> TxResult<Cursor<'a>> {
        let header = Header::decode(&mut self.buf)?;
        if !header.list {
            return Err(TxError::Decoding("expected RLP list".to_string()));
        }
        if self.buf.len() < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort.into());
        }
        let (payload, rest) = self.buf.split_at(header.payload_length);
        self.buf = rest;
        Ok(Cursor { buf: payload })
    }

    pub(crate) fn u64(&mut self) -> TxResult<u64> {
        Ok(u64::decode(&mut self.buf)?)
    }

    pub(crate) fn u256(&mut self) -> TxResult<U256> {
        let bytes = self.bytes()?;
        if bytes.first() == Some(&0) {
            return Err(alloy_rlp::Error::LeadingZero.into());
        }
        U256::try_from_be_slice(bytes).ok_or(alloy_rlp::Error::Overflow.into())
    }

    pub(crate) fn bytes(&mut self) -> TxResult<&'a [u8]> {
        Ok(Header::decode_bytes(&mut self.buf, false)?)
    }

    pub(crate) fn string(&mut self) -> TxResult<String> {
        let bytes = self.bytes()?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| TxError::Decoding(format!("invalid utf-8 string: {}", e)))
    }

    /// Require that every item was consumed.
    pub(crate) fn finish(self) -> TxResult<()> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(TxError::Decoding(format!("{} trailing bytes", self.buf.len())))
        }
    }
}
