//! # Emotion Poller
//!
//! Alternate mode: instead of capturing a photo, ask the service what it
//! last saw on a fixed interval.
//!
//! The poller is an owned task handle. It starts polling when spawned and
//! stops when cancelled or dropped; there is no global timer.
//!
//! ```text
//! spawn() ──▶ tick ──▶ GET /api/emotion ──▶ on_update(PollUpdate)
//!               ▲                                  │
//!               └────────── every interval ────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::EmotionService;
use crate::core::emotion::EmotionLabel;

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollUpdate {
    /// `None` when the request failed; the previous label should be kept.
    pub label: Option<EmotionLabel>,
    pub connected: bool,
    pub at: DateTime<Local>,
}

pub struct EmotionPoller {
    handle: JoinHandle<()>,
}

impl EmotionPoller {
    /// Starts polling immediately, then once per `interval`.
    ///
    /// `on_update` is called with every result. Returning `false` stops the
    /// loop (e.g. the receiving side is gone). Failures never stop it.
    pub fn spawn<F>(service: Arc<dyn EmotionService>, interval: Duration, mut on_update: F) -> Self
    where
        F: FnMut(PollUpdate) -> bool + Send + 'static,
    {
        info!("Starting emotion poller (every {:?})", interval);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let update = match service.current_emotion().await {
                    Ok(label) => PollUpdate {
                        label: Some(label),
                        connected: true,
                        at: Local::now(),
                    },
                    Err(e) => {
                        warn!("Emotion poll failed: {}", e);
                        PollUpdate {
                            label: None,
                            connected: false,
                            at: Local::now(),
                        }
                    }
                };
                debug!("Poll update: {:?}", update);
                if !on_update(update) {
                    info!("Poll receiver gone, stopping poller");
                    return;
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for EmotionPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisError;
    use crate::test_support::ScriptedService;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_polling() {
        let service = Arc::new(ScriptedService::polling(vec![
            Ok(EmotionLabel::Happy),
            Err(AnalysisError::Network("refused".into())),
            Ok(EmotionLabel::Anger),
        ]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _poller = EmotionPoller::spawn(service.clone(), Duration::from_secs(5), move |u| {
            tx.send(u).is_ok()
        });

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        let third = rx.recv().await.unwrap();

        assert_eq!((first.label, first.connected), (Some(EmotionLabel::Happy), true));
        assert_eq!((second.label, second.connected), (None, false));
        assert_eq!((third.label, third.connected), (Some(EmotionLabel::Anger), true));
        assert_eq!(service.poll_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        let service = Arc::new(ScriptedService::polling(vec![Ok(EmotionLabel::Calm)]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let poller = EmotionPoller::spawn(service.clone(), Duration::from_secs(5), move |u| {
            tx.send(u).is_ok()
        });

        assert!(rx.recv().await.is_some());
        drop(poller);

        // The closure (and its sender) is dropped with the aborted task.
        assert!(rx.recv().await.is_none());
        assert_eq!(service.poll_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_receiver_gone() {
        let service = Arc::new(ScriptedService::polling(vec![Ok(EmotionLabel::Calm)]));
        let poller = EmotionPoller::spawn(service, Duration::from_secs(5), |_| false);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(poller.is_finished());
    }
}
