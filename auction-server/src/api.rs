use {
    crate::kernel::entities::{
        AuctionId,
        CarId,
    },
    bigdecimal::BigDecimal,
};

/// Typed errors surfaced to the embedding API layer, which maps them onto its
/// own status codes. Every validation variant is side-effect free: the engine
/// guarantees zero partial mutation on these paths.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// No auction exists with the requested id.
    #[error("auction {0} was not found")]
    AuctionNotFound(AuctionId),
    /// The operation is not valid for the auction's current status or timing.
    #[error("{0}")]
    InvalidState(String),
    /// The bid does not reach the smallest acceptable amount.
    #[error("the minimum bid is {minimum}")]
    InvalidAmount { minimum: BigDecimal },
    /// The car already has an open auction.
    #[error("car {0} already has an open auction")]
    Conflict(CarId),
    /// Internal error occurred during processing the request.
    #[error("this service is temporarily unavailable")]
    TemporarilyUnavailable,
}

impl RestError {
    pub fn invalid_state(reason: &str) -> Self {
        RestError::InvalidState(reason.to_string())
    }
}
