//! Falling-icon backdrop feed.
//!
//! Picks a random URL from an icon pool snapshot on every tick and sends it
//! to whoever renders the backdrop. The feed stops when the token is
//! cancelled or the receiver is dropped.

use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Buffered ticks before the feed waits on a slow renderer.
const CHANNEL_CAPACITY: usize = 16;

/// Periodic random picker over a fixed URL snapshot.
pub struct IconRain {
    urls: Vec<String>,
    interval: Duration,
    cancel: CancellationToken,
    tx: mpsc::Sender<String>,
}

impl IconRain {
    pub fn new(
        urls: Vec<String>,
        interval: Duration,
        cancel: CancellationToken,
        tx: mpsc::Sender<String>,
    ) -> Self {
        Self {
            urls,
            interval,
            cancel,
            tx,
        }
    }

    /// Emit one random URL per interval until cancelled.
    ///
    /// The first URL is sent one full interval after start. An empty
    /// snapshot returns immediately.
    pub async fn run(self) {
        if self.urls.is_empty() {
            tracing::debug!("icon pool empty, backdrop idle");
            return;
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::debug!(pool = self.urls.len(), interval = ?self.interval, "icon rain started");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!("icon rain cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let pick = {
                        let mut rng = rand::thread_rng();
                        self.urls.choose(&mut rng).cloned()
                    };
                    let Some(url) = pick else { break };
                    if self.tx.send(url).await.is_err() {
                        tracing::debug!("icon rain receiver dropped, stopping");
                        break;
                    }
                }
            }
        }
    }
}

/// Spawn an [`IconRain`] on the current runtime and return its receiver.
///
/// The channel closes when the feed stops, so an empty `urls` yields a
/// receiver that closes without producing anything.
pub fn spawn_icon_rain(
    urls: Vec<String>,
    interval: Duration,
    cancel: CancellationToken,
) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(IconRain::new(urls, interval, cancel, tx).run());
    rx
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn pool() -> Vec<String> {
        vec![
            "https://cdn.example.com/a.jpg".to_owned(),
            "https://cdn.example.com/b.jpg".to_owned(),
        ]
    }

    #[tokio::test]
    async fn emits_urls_from_the_snapshot() {
        let cancel = CancellationToken::new();
        let mut rx = spawn_icon_rain(pool(), Duration::from_millis(10), cancel.clone());

        for _ in 0..3 {
            let url = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("tick within timeout")
                .expect("channel open");
            assert!(pool().contains(&url));
        }
        cancel.cancel();
    }

    #[tokio::test]
    async fn empty_snapshot_closes_without_emitting() {
        let mut rx = spawn_icon_rain(Vec::new(), Duration::from_millis(5), CancellationToken::new());
        let next = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("channel closes promptly");
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn cancellation_closes_the_channel() {
        let cancel = CancellationToken::new();
        let mut rx = spawn_icon_rain(pool(), Duration::from_millis(10), cancel.clone());
        cancel.cancel();

        let drained = tokio::time::timeout(Duration::from_secs(2), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
    }
}
