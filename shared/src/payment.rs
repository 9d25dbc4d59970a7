//! Payment proof checks.
//!
//! These are shape checks only. Nothing here proves that a transaction with
//! the submitted hash exists on chain, moved the expected amount, or paid the
//! expected wallet; reviewers still confirm that by hand.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::PaymentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("transaction hash must be 64 hex characters, optionally prefixed with 0x")]
    InvalidTxHash,

    #[error("cannot move a payment from {} to {}", .from.label(), .to.label())]
    InvalidTransition { from: PaymentStatus, to: PaymentStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFormat {
    /// `0x`-prefixed, as used by Ethereum-compatible networks.
    Evm,
    /// Bare hex, as used by TRON.
    Tron,
}

/// A syntactically valid, lower-cased transaction hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHash {
    value: String,
    format: HashFormat,
}

impl TxHash {
    const HEX_LEN: usize = 64;

    pub fn parse(input: &str) -> Result<Self, PaymentError> {
        let trimmed = input.trim();
        let (hex, format) = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            Some(rest) => (rest, HashFormat::Evm),
            None => (trimmed, HashFormat::Tron),
        };

        if hex.len() != Self::HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PaymentError::InvalidTxHash);
        }

        let hex = hex.to_ascii_lowercase();
        let value = match format {
            HashFormat::Evm => format!("0x{hex}"),
            HashFormat::Tron => hex,
        };
        Ok(Self { value, format })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn format(&self) -> HashFormat {
        self.format
    }
}

impl FromStr for TxHash {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed,
    /// Target equals the current status; nothing to send.
    Unchanged,
}

impl PaymentStatus {
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (AwaitingPayment, ProofSubmitted)
                | (Rejected, ProofSubmitted)
                | (ProofSubmitted, Verified)
                | (ProofSubmitted, Rejected)
        )
    }

    pub fn transition(self, next: PaymentStatus) -> Result<Transition, PaymentError> {
        if self == next {
            return Ok(Transition::Unchanged);
        }
        if self.can_transition_to(next) {
            Ok(Transition::Changed)
        } else {
            Err(PaymentError::InvalidTransition { from: self, to: next })
        }
    }

    /// Whether a reviewer can act on this payment.
    pub fn is_reviewable(self) -> bool {
        self == PaymentStatus::ProofSubmitted
    }
}
