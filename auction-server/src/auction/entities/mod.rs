mod auction;
mod bid;
mod history;

pub use {
    auction::*,
    bid::*,
    history::*,
};
