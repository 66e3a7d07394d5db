use std::path::Path;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::warn;

use crate::config::SearchSettings;
use crate::error::AppError;
use crate::models::campaign::{CampaignEvent, CampaignRecord};
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub campaigns: DashMap<String, CampaignRecord>,
    pub campaign_events_tx: broadcast::Sender<CampaignEvent>,
    pub search: SearchSettings,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize, search: SearchSettings) -> Self {
        let (campaign_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            campaigns: DashMap::new(),
            campaign_events_tx,
            search,
            metrics: Metrics::new(),
        }
    }

    /// Returns `false` when an existing campaign with the same id was replaced.
    pub fn insert_campaign(&self, campaign: CampaignRecord) -> bool {
        let replaced = self.campaigns.insert(campaign.id.clone(), campaign);
        self.metrics.campaigns_stored.set(self.campaigns.len() as i64);
        replaced.is_none()
    }

    /// Copy of every stored campaign ordered by creation time, then id.
    ///
    /// The map itself has no stable iteration order.
    pub fn campaign_snapshot(&self) -> Vec<CampaignRecord> {
        let mut campaigns: Vec<CampaignRecord> = self
            .campaigns
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        campaigns.sort_by(|a, b| {
            creation_key(a.created_at)
                .cmp(&creation_key(b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        campaigns
    }

    /// Loads a JSON array of campaign records. Records are stored as-is,
    /// missing locations included. Returns how many new ids were added; a
    /// repeated id replaces the earlier record.
    pub fn load_seed_file(&self, path: &Path) -> Result<usize, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            AppError::Internal(format!("failed to read {}: {err}", path.display()))
        })?;
        self.load_seed(&raw)
    }

    pub fn load_seed(&self, raw: &str) -> Result<usize, AppError> {
        let records: Vec<CampaignRecord> = serde_json::from_str(raw)
            .map_err(|err| AppError::Internal(format!("invalid campaign seed: {err}")))?;

        let mut added = 0;
        for record in records {
            let id = record.id.clone();
            if self.insert_campaign(record) {
                added += 1;
            } else {
                warn!(campaign_id = %id, "duplicate campaign id in seed; earlier record replaced");
            }
        }
        Ok(added)
    }
}

// undated records sort first
fn creation_key(created_at: Option<DateTime<Utc>>) -> (bool, Option<DateTime<Utc>>) {
    (created_at.is_some(), created_at)
}
