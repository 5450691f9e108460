//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Skip notification emails for webhook events that were already processed
    #[serde(default = "default_deduplicate_webhook_events")]
    pub deduplicate_webhook_events: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            deduplicate_webhook_events: default_deduplicate_webhook_events(),
        }
    }
}

fn default_deduplicate_webhook_events() -> bool {
    true
}
