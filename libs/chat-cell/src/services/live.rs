use std::time::Duration;

use shared_config::AppConfig;
use shared_utils::retry::Backoff;

use crate::models::LiveChannelView;

/// Reconnect schedule for the external live-message hub: up to five
/// attempts, doubling from one second and capped at thirty.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    backoff: Backoff,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Backoff::Exponential {
                base: Duration::from_secs(1),
                cap: Duration::from_secs(30),
            },
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based), or `None` once
    /// the budget is spent and the channel should stay down.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }
        Some(self.backoff.delay(attempt))
    }

    pub fn delays(&self) -> Vec<Duration> {
        (1..=self.max_attempts)
            .filter_map(|attempt| self.delay_for(attempt))
            .collect()
    }
}

/// What the browser needs to run the live channel itself: the hub location
/// plus the reconnect schedule. The gateway never proxies hub frames.
pub fn channel_descriptor(config: &AppConfig) -> LiveChannelView {
    let policy = ReconnectPolicy::default();
    LiveChannelView {
        hub_url: config.chat_hub_url.clone(),
        max_reconnect_attempts: policy.max_attempts,
        reconnect_delays_ms: policy
            .delays()
            .into_iter()
            .map(|d| d.as_millis() as u64)
            .collect(),
    }
}
