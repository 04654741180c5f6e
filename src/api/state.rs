use std::sync::Arc;

use crate::core::{Clock, ConfigCache};
use crate::host::HostApi;
use crate::schedule::{Scheduler, WebhookClient};

/// Shared by every request. Nothing here is mutated while handling a
/// request except the settings cache, which swaps atomically.
pub struct AppState {
    pub host: Arc<dyn HostApi>,
    pub settings: ConfigCache,
    pub webhook: WebhookClient,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        host: Arc<dyn HostApi>,
        settings: ConfigCache,
        webhook: WebhookClient,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            host,
            settings,
            webhook,
            clock,
        }
    }

    pub fn scheduler(&self) -> Scheduler<'_> {
        Scheduler {
            host: self.host.as_ref(),
            webhook: &self.webhook,
            clock: self.clock.as_ref(),
        }
    }
}
