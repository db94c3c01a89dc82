//! Action construction.
//!
//! An [`Action`] is a plain immutable value. Signatures never live on the
//! action itself; they are collected in a [`SignatureSet`](crate::tx::SignatureSet)
//! and merged when the transaction is encoded.

use alloy::primitives::{Bytes, U256};

use crate::tx::codec::{self, Cursor};
use crate::tx::types::{ActionKind, Name, TxResult};

/// One operation inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    kind: ActionKind,
    from: Name,
    to: Name,
    nonce: u64,
    asset_id: u64,
    gas_limit: u64,
    value: Option<U256>,
    payload: Bytes,
    remark: Bytes,
}

impl Action {
    /// Build an action from all of its fields.
    ///
    /// No semantic checks are made here; balance, recipient and
    /// authorization are validated by the node.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ActionKind,
        from: impl Into<Name>,
        to: impl Into<Name>,
        nonce: u64,
        asset_id: u64,
        gas_limit: u64,
        value: Option<U256>,
        payload: impl Into<Bytes>,
        remark: impl Into<Bytes>,
    ) -> Self {
        Self {
            kind,
            from: from.into(),
            to: to.into(),
            nonce,
            asset_id,
            gas_limit,
            value,
            payload: payload.into(),
            remark: remark.into(),
        }
    }

    /// Start a fluent builder for an action sent by `from`.
    pub fn builder(kind: ActionKind, from: impl Into<Name>) -> ActionBuilder {
        ActionBuilder {
            action: Action::new(kind, from, Name::default(), 0, 0, 0, None, Bytes::new(), Bytes::new()),
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn sender(&self) -> &Name {
        &self.from
    }

    pub fn recipient(&self) -> &Name {
        &self.to
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn asset_id(&self) -> u64 {
        self.asset_id
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn value(&self) -> Option<U256> {
        self.value
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn remark(&self) -> &Bytes {
        &self.remark
    }

    /// RLP list of the signable fields.
    ///
    /// `value` is wrapped in a list of zero or one element so that an absent
    /// value and an explicit zero stay distinguishable.
    pub(crate) fn encode_fields(&self, out: &mut Vec<u8>) {
        codec::encode_list(out, |buf| {
            codec::encode_u64(buf, self.kind.code());
            codec::encode_u64(buf, self.nonce);
            codec::encode_u64(buf, self.asset_id);
            codec::encode_str(buf, self.from.as_str());
            codec::encode_str(buf, self.to.as_str());
            codec::encode_u64(buf, self.gas_limit);
            codec::encode_list(buf, |value| {
                if let Some(amount) = self.value {
                    codec::encode_u256(value, amount);
                }
            });
            codec::encode_bytes(buf, &self.payload);
            codec::encode_bytes(buf, &self.remark);
        });
    }

    pub(crate) fn decode_fields(outer: &mut Cursor<'_>) -> TxResult<Self> {
        let mut fields = outer.list()?;
        let kind = ActionKind::try_from(fields.u64()?)?;
        let nonce = fields.u64()?;
        let asset_id = fields.u64()?;
        let from = Name::from(fields.string()?);
        let to = Name::from(fields.string()?);
        let gas_limit = fields.u64()?;

        let mut value_list = fields.list()?;
        let value = if value_list.is_empty() {
            None
        } else {
            Some(value_list.u256()?)
        };
        value_list.finish()?;

        let payload = Bytes::copy_from_slice(fields.bytes()?);
        let remark = Bytes::copy_from_slice(fields.bytes()?);
        fields.finish()?;

        Ok(Self {
            kind,
            from,
            to,
            nonce,
            asset_id,
            gas_limit,
            value,
            payload,
            remark,
        })
    }
}

/// Fluent alternative to [`Action::new`].
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    action: Action,
}

impl ActionBuilder {
    pub fn to(mut self, to: impl Into<Name>) -> Self {
        self.action.to = to.into();
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.action.nonce = nonce;
        self
    }

    pub fn asset_id(mut self, asset_id: u64) -> Self {
        self.action.asset_id = asset_id;
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.action.gas_limit = gas_limit;
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.action.value = Some(value);
        self
    }

    pub fn payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.action.payload = payload.into();
        self
    }

    pub fn remark(mut self, remark: impl Into<Bytes>) -> Self {
        self.action.remark = remark.into();
        self
    }

    pub fn build(self) -> Action {
        self.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer() -> Action {
        Action::new(
            ActionKind::Transfer,
            "alice",
            "bob",
            5,
            1,
            1_000_000,
            Some(U256::from(100)),
            Bytes::new(),
            Bytes::new(),
        )
    }

    #[test]
    fn test_builder_matches_constructor() {
        let built = Action::builder(ActionKind::Transfer, "alice")
            .to("bob")
            .nonce(5)
            .asset_id(1)
            .gas_limit(1_000_000)
            .value(U256::from(100))
            .build();
        assert_eq!(built, transfer());
    }

    #[test]
    fn test_builder_defaults() {
        let action = Action::builder(ActionKind::UnregisterCandidate, "carol").build();
        assert!(action.recipient().is_empty());
        assert_eq!(action.value(), None);
        assert!(action.payload().is_empty());
        assert!(action.remark().is_empty());
    }

    #[test]
    fn test_fields_roundtrip_keeps_absent_value() {
        let with_value = transfer();
        let without_value = Action::builder(ActionKind::Transfer, "alice").to("bob").build();
        let zero_value = Action::builder(ActionKind::Transfer, "alice")
            .to("bob")
            .value(U256::ZERO)
            .build();

        for action in [with_value, without_value, zero_value] {
            let mut out = Vec::new();
            action.encode_fields(&mut out);
            let mut cursor = Cursor::new(&out);
            assert_eq!(Action::decode_fields(&mut cursor).unwrap(), action);
            cursor.finish().unwrap();
        }
    }

    #[test]
    fn test_absent_and_zero_value_encode_differently() {
        let mut absent = Vec::new();
        Action::builder(ActionKind::Transfer, "alice").build().encode_fields(&mut absent);
        let mut zero = Vec::new();
        Action::builder(ActionKind::Transfer, "alice")
            .value(U256::ZERO)
            .build()
            .encode_fields(&mut zero);
        assert_ne!(absent, zero);
    }
}
