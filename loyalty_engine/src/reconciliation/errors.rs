use loyalty_common::Points;
use thiserror::Error;

use crate::ledger_types::SocialAction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("The stored total ({stored}) does not match the sum of the breakdown ({computed}).")]
    TotalMismatch { stored: Points, computed: Points },
    #[error("The stored ledger could not be decoded. {0}")]
    Malformed(String),
    #[error("The '{0}' reward has already been granted to this customer.")]
    AlreadyRewarded(SocialAction),
    #[error("Invalid points rules. {0}")]
    InvalidRules(String),
}
