//! Core ledger types: participant addresses and call contexts.
//!
//! All token amounts are `u128` base units. Block heights are `u64`. The
//! per-share accumulator is a [`U256`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AddressError;

pub use primitive_types::U256;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte participant address.
///
/// Rendered as `0x`-prefixed lowercase hex. Serializes as that string so it
/// can key JSON maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// The zero address. Source of minted `Transfer` events.
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    /// Create an address from a byte array.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parse a hex address, with or without the `0x` prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use drip_core::types::Address;
    ///
    /// let a: Address = "0x0101010101010101010101010101010101010101".parse().unwrap();
    /// assert_eq!(a, Address([1u8; 20]));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AddressError::InvalidLength(digits.len()));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressError::InvalidHex)?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The caller and block height an operation executes under.
///
/// Every ledger entry point receives one. The block height is supplied by
/// the host chain and must never move backwards between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Address invoking the operation.
    pub caller: Address,
    /// Current block height.
    pub block: u64,
}

impl CallContext {
    /// Create a context for `caller` at `block`.
    pub fn new(caller: Address, block: u64) -> Self {
        Self { caller, block }
    }

    /// The same block, a different caller. Used when one component calls
    /// into another within a single logical call.
    pub fn with_caller(&self, caller: Address) -> Self {
        Self {
            caller,
            block: self.block,
        }
    }
}
