//! Core types for the ledger
//!
//! All amounts are unsigned integers denominated in the smallest
//! indivisible unit of their currency. No floating-point value ever
//! crosses this boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Amount in smallest indivisible units (non-negative by type)
pub type Amount = u128;

/// Price of one native-asset unit expressed in a currency, scaled by
/// [`PRICE_SCALE`]
pub type Price = u128;

/// Fixed scale factor for prices (1e8, matching the reference feeds)
pub const PRICE_SCALE: u128 = 100_000_000;

/// Account identifier (externally authenticated address)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-width currency code (3 uppercase ASCII letters)
///
/// Codes are opaque identifiers; whether a code is usable is decided by
/// the [`CurrencyRegistry`](crate::registry::CurrencyRegistry), not by
/// this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// Indian Rupee
    pub const INR: CurrencyCode = CurrencyCode(*b"INR");

    /// Bangladeshi Taka
    pub const BDT: CurrencyCode = CurrencyCode(*b"BDT");

    /// Parse a 3-letter uppercase ASCII code
    pub fn parse(s: &str) -> crate::Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_uppercase()) {
            return Err(crate::Error::InvalidCurrency(format!(
                "expected 3 uppercase ASCII letters, got {:?}",
                s
            )));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2]]))
    }

    /// Decode the left-padded hex-encoded ASCII convention used by the
    /// reference web client (e.g. `0x494e52` or zero-padded variants)
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() % 2 != 0 {
            return Err(crate::Error::InvalidCurrency(format!(
                "odd-length hex string {:?}",
                s
            )));
        }
        let mut bytes = Vec::with_capacity(s.len() / 2);
        for pair in s.as_bytes().chunks(2) {
            let hi = hex_val(pair[0]);
            let lo = hex_val(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => bytes.push(hi << 4 | lo),
                _ => {
                    return Err(crate::Error::InvalidCurrency(format!(
                        "non-hex character in {:?}",
                        s
                    )))
                }
            }
        }
        // Drop left padding
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        let code = &bytes[start..];
        let text = std::str::from_utf8(code)
            .map_err(|_| crate::Error::InvalidCurrency(format!("non-ASCII code in {:?}", s)))?;
        Self::parse(text)
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        // Construction validates uppercase ASCII
        std::str::from_utf8(&self.0).expect("code is validated ASCII")
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = crate::Error;

    fn try_from(s: String) -> crate::Result<Self> {
        Self::parse(&s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}

/// Kind of balance-affecting operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Native asset converted into a ledger credit
    Deposit,
    /// Ledger debit converted back into native asset
    Withdraw,
    /// Debit leg of a cross-border transfer
    TransferOut,
    /// Credit leg of a cross-border transfer
    TransferIn,
}

impl EventKind {
    /// Whether the delta increases the balance
    pub fn is_credit(&self) -> bool {
        matches!(self, EventKind::Deposit | EventKind::TransferIn)
    }
}

/// Immutable record of one applied balance mutation
///
/// Events are append-only: never mutated or deleted. A transfer produces
/// exactly two events sharing one `transfer_id`; deposits and withdrawals
/// produce exactly one with `transfer_id` unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Unique event ID (UUIDv7 for time-ordering)
    pub event_id: Uuid,

    /// Account whose balance changed
    pub account: AccountId,

    /// Currency of the balance entry
    pub currency: CurrencyCode,

    /// Magnitude of the change in smallest units (sign is carried by `kind`)
    pub delta: Amount,

    /// Kind of operation that produced the event
    pub kind: EventKind,

    /// Links the two legs of a cross-border transfer
    pub transfer_id: Option<Uuid>,

    /// When the mutation was applied
    pub recorded_at: DateTime<Utc>,
}
