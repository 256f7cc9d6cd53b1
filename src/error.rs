use thiserror::Error;

/// Why a message produced no correlated trade. None of these are fatal; the
/// caller logs the reason and moves on. Retrying never helps — the same text
/// will not parse differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("no symbol")]
    NoSymbol,
    #[error("no direction")]
    NoDirection,
    #[error("unrecognized format")]
    UnrecognizedFormat,
    #[error("trade already closed")]
    TradeAlreadyClosed,
    #[error("trade not found")]
    TradeNotFound,
}

/// Store-level failures surfaced to direct callers of the correlation store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("trade not found for key {0}")]
    NotFound(String),
    #[error("trade already closed for key {0}")]
    AlreadyClosed(String),
}
