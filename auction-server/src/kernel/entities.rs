pub use car_auction_api_types::{
    AuctionId,
    BidId,
    CarId,
    UserId,
};
