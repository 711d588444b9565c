#[cfg(test)]
use mockall::automock;
use {
    crate::kernel::entities::{
        AuctionId,
        UserId,
    },
    async_trait::async_trait,
    bigdecimal::BigDecimal,
};

/// Outbound user notifications (persistent inbox, email, push, ...). The
/// engine calls these strictly after commit from its task tracker;
/// implementations own delivery and the engine only logs their failures.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn notify_outbid(
        &self,
        user_id: UserId,
        auction_id: AuctionId,
        new_amount: BigDecimal,
    ) -> anyhow::Result<()>;

    async fn notify_won(
        &self,
        user_id: UserId,
        auction_id: AuctionId,
        final_price: BigDecimal,
    ) -> anyhow::Result<()>;

    async fn notify_ending_soon(
        &self,
        auction_id: AuctionId,
        minutes_remaining: i64,
    ) -> anyhow::Result<()>;

    async fn notify_cancelled(&self, user_id: UserId, auction_id: AuctionId)
        -> anyhow::Result<()>;
}

/// Sink used by the standalone binary: notifications are traced only.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify_outbid(
        &self,
        user_id: UserId,
        auction_id: AuctionId,
        new_amount: BigDecimal,
    ) -> anyhow::Result<()> {
        tracing::info!(user_id, auction_id, new_amount = %new_amount, "User was outbid");
        Ok(())
    }

    async fn notify_won(
        &self,
        user_id: UserId,
        auction_id: AuctionId,
        final_price: BigDecimal,
    ) -> anyhow::Result<()> {
        tracing::info!(user_id, auction_id, final_price = %final_price, "User won the auction");
        Ok(())
    }

    async fn notify_ending_soon(
        &self,
        auction_id: AuctionId,
        minutes_remaining: i64,
    ) -> anyhow::Result<()> {
        tracing::info!(auction_id, minutes_remaining, "Auction ending soon");
        Ok(())
    }

    async fn notify_cancelled(
        &self,
        user_id: UserId,
        auction_id: AuctionId,
    ) -> anyhow::Result<()> {
        tracing::info!(user_id, auction_id, "Auction was cancelled");
        Ok(())
    }
}
