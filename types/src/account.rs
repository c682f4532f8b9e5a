//! The host-facing account model.
//!
//! Accounts are owned and lifecycle-managed by the host runtime. Per
//! invocation the host hands the engine an ordered list of [`Account`] views;
//! the engine only reads and writes the balance and data buffer it is given,
//! and only commits those writes when the whole invocation succeeds.

use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, Write};
use commonware_utils::hex;
use std::fmt;

/// Length in bytes of an [`AccountId`].
pub const ACCOUNT_ID_LEN: usize = 32;

/// A fixed-size account identifier.
///
/// Identifiers are opaque to the engine: equality and the all-zero "unset"
/// sentinel are the only semantics it relies on. The all-zero identifier is
/// reserved (a game with no second player stores it in the `player_o` slot).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    pub const fn new(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    /// Whether this is the reserved all-zero identifier.
    pub fn is_unset(&self) -> bool {
        self.0 == [0u8; ACCOUNT_ID_LEN]
    }
}

impl From<[u8; ACCOUNT_ID_LEN]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex(&self.0))
    }
}

impl Write for AccountId {
    fn write(&self, writer: &mut impl BufMut) {
        writer.put_slice(&self.0);
    }
}

impl Read for AccountId {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if reader.remaining() < ACCOUNT_ID_LEN {
            return Err(Error::EndOfBuffer);
        }
        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        reader.copy_to_slice(&mut bytes);
        Ok(Self(bytes))
    }
}

impl FixedSize for AccountId {
    const SIZE: usize = ACCOUNT_ID_LEN;
}

/// One account as supplied by the host for a single invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// The account's identity.
    pub id: AccountId,
    /// Identity permitted to write this account's buffer.
    pub owner: AccountId,
    /// Whether this invocation was authorized by `id`.
    pub signer: bool,
    /// Token balance, mutable by the engine.
    pub balance: u64,
    /// Raw state buffer, mutable by the engine.
    pub data: Vec<u8>,
}

impl Account {
    pub fn new(id: AccountId, owner: AccountId, data: Vec<u8>) -> Self {
        Self {
            id,
            owner,
            signer: false,
            balance: 0,
            data,
        }
    }
}
