pub mod bid;
pub mod ws;

pub type AuctionId = i64;
pub type BidId = i64;
pub type CarId = i64;
pub type UserId = i64;
