//! Chat polling.
//!
//! The backend has no push channel, so open chat pages re-fetch the message
//! list on a fixed interval. [`poll_messages`] turns a [`MessageFeed`] into
//! a stream of snapshots:
//!
//! - The first fetch happens one full interval after the stream starts; the
//!   page is rendered with the initial list already.
//! - A failed fetch is logged and skipped. The next tick tries again.
//! - Dropping the stream stops polling. No timer or request outlives it.
//!
//! Responses are not sequenced: whatever the latest fetch returns replaces
//! what the page shows.

use std::future::Future;
use std::time::Duration;

use async_stream::stream;
use futures::{Stream, StreamExt};
use hiwhiw_core::{OrderId, RestaurantId, UserId};
use tokio::time::{Instant, MissedTickBehavior};

use crate::api::{ApiClient, ApiError, Message};

/// Source of chat message snapshots.
pub trait MessageFeed: Send + Sync {
    /// Fetch the full current message list.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send;
}

/// Which conversation a chat page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatChannel {
    /// Messages about a placed order.
    Order(OrderId),
    /// Pre-order chat with a restaurant.
    Restaurant(RestaurantId),
}

/// A chat channel read through the backend as a given user.
#[derive(Clone)]
pub struct ChatFeed {
    api: ApiClient,
    viewer: UserId,
    channel: ChatChannel,
}

impl ChatFeed {
    #[must_use]
    pub const fn new(api: ApiClient, viewer: UserId, channel: ChatChannel) -> Self {
        Self {
            api,
            viewer,
            channel,
        }
    }
}

impl MessageFeed for ChatFeed {
    async fn fetch(&self) -> Result<Vec<Message>, ApiError> {
        match self.channel {
            ChatChannel::Order(order) => self.api.order_messages(self.viewer, order).await,
            ChatChannel::Restaurant(restaurant) => {
                self.api.restaurant_chat(self.viewer, restaurant).await
            }
        }
    }
}

/// Poll `feed` every `interval`, yielding each successful snapshot.
pub fn poll_messages<F>(feed: F, interval: Duration) -> impl Stream<Item = Vec<Message>> + Send
where
    F: MessageFeed + 'static,
{
    stream! {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match feed.fetch().await {
                Ok(messages) => yield messages,
                Err(e) => tracing::warn!(error = %e, "Chat poll failed"),
            }
        }
    }
}

/// Drop snapshots identical to the one before them.
pub fn dedup_snapshots<S>(snapshots: S) -> impl Stream<Item = Vec<Message>> + Send
where
    S: Stream<Item = Vec<Message>> + Send + 'static,
{
    stream! {
        let mut last: Option<Vec<Message>> = None;
        let mut snapshots = std::pin::pin!(snapshots);

        while let Some(snapshot) = snapshots.next().await {
            if last.as_ref() == Some(&snapshot) {
                continue;
            }
            last = Some(snapshot.clone());
            yield snapshot;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;
    use hiwhiw_core::MessageId;
    use reqwest::StatusCode;

    const INTERVAL: Duration = Duration::from_secs(3);

    fn message(id: i32, content: &str) -> Message {
        Message {
            id: MessageId::new(id),
            sender_id: UserId::new(1),
            sender_name: "Somchai".to_string(),
            content: content.to_string(),
            created_at: NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(4, 30, 0)
                .unwrap(),
            is_mine: true,
        }
    }

    /// Feed that counts fetches and fails on the listed call numbers.
    #[derive(Clone, Default)]
    struct FakeFeed {
        calls: Arc<AtomicUsize>,
        failing_calls: Vec<usize>,
    }

    impl MessageFeed for FakeFeed {
        async fn fetch(&self) -> Result<Vec<Message>, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.failing_calls.contains(&call) {
                return Err(ApiError::Server {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "boom".to_string(),
                });
            }
            let id = i32::try_from(call).unwrap();
            Ok(vec![message(id, "hello")])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_after_one_interval() {
        let feed = FakeFeed::default();
        let calls = Arc::clone(&feed.calls);
        let started = Instant::now();

        let mut stream = std::pin::pin!(poll_messages(feed, INTERVAL));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first = stream.next().await.unwrap();
        assert_eq!(first[0].id, MessageId::new(1));
        assert_eq!(started.elapsed(), INTERVAL);

        stream.next().await.unwrap();
        assert_eq!(started.elapsed(), INTERVAL * 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_poll_is_skipped() {
        let feed = FakeFeed {
            failing_calls: vec![1],
            ..FakeFeed::default()
        };
        let started = Instant::now();

        let mut stream = std::pin::pin!(poll_messages(feed, INTERVAL));
        let first = stream.next().await.unwrap();

        assert_eq!(first[0].id, MessageId::new(2));
        assert_eq!(started.elapsed(), INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_stream_stops_polling() {
        let feed = FakeFeed::default();
        let calls = Arc::clone(&feed.calls);

        {
            let mut stream = Box::pin(poll_messages(feed, INTERVAL));
            stream.next().await.unwrap();
            stream.next().await.unwrap();
        }

        tokio::time::sleep(INTERVAL * 10).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dedup_snapshots_suppresses_repeats() {
        let a = vec![message(1, "hi")];
        let b = vec![message(1, "hi"), message(2, "there")];
        let source = futures::stream::iter(vec![a.clone(), a.clone(), b.clone(), b, a]);

        let out: Vec<_> = dedup_snapshots(source).collect().await;
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].len(), 1);
        assert_eq!(out[1].len(), 2);
        assert_eq!(out[2].len(), 1);
    }
}
