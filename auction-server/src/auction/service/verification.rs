use {
    super::place_bid::PlaceBidInput,
    crate::{
        api::RestError,
        auction::entities,
    },
    time::OffsetDateTime,
};

/// Validates a bid against the auction snapshot it would apply to. Checks run
/// in order and the first failure wins; nothing is mutated here. Callers hold
/// the auction's lock, so the snapshot cannot move underneath the checks.
pub fn verify_bid(
    auction: &entities::Auction,
    input: &PlaceBidInput,
    now: OffsetDateTime,
) -> Result<(), RestError> {
    if auction.status != entities::AuctionStatus::Active {
        return Err(RestError::invalid_state("auction is not active"));
    }
    // The sweeper may not have flipped the status yet; the deadline decides.
    if auction.has_ended(now) {
        return Err(RestError::invalid_state("auction has ended"));
    }
    let minimum = auction.minimum_acceptable_bid();
    if input.amount < minimum {
        return Err(RestError::InvalidAmount { minimum });
    }
    if auction.current_bidder_id == Some(input.bidder_id) {
        return Err(RestError::invalid_state("you are already the highest bidder"));
    }
    Ok(())
}
