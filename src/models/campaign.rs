use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CampaignType {
    Infaq,
    Sumbangan,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Expired,
}

impl CampaignStatus {
    /// A campaign with no scheduled date never expires.
    pub fn at(scheduled_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match scheduled_date {
            Some(date) if date <= now => CampaignStatus::Expired,
            _ => CampaignStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub kind: CampaignType,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ngo_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CampaignRecord {
    /// The location, if present and within coordinate range.
    pub fn usable_location(&self) -> Option<GeoPoint> {
        self.location.filter(GeoPoint::is_valid)
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> CampaignStatus {
        CampaignStatus::at(self.scheduled_date, now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CampaignEvent {
    Created { campaign: CampaignRecord },
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    use super::{CampaignRecord, CampaignStatus, CampaignType};

    #[test]
    fn status_depends_on_scheduled_date() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        assert_eq!(CampaignStatus::at(None, now), CampaignStatus::Active);
        assert_eq!(
            CampaignStatus::at(Some(now + Duration::hours(1)), now),
            CampaignStatus::Active
        );
        assert_eq!(CampaignStatus::at(Some(now), now), CampaignStatus::Expired);
        assert_eq!(
            CampaignStatus::at(Some(now - Duration::days(2)), now),
            CampaignStatus::Expired
        );
    }

    #[test]
    fn null_location_deserializes_as_none() {
        let record: CampaignRecord = serde_json::from_value(json!({
            "id": "k-1",
            "title": "Bubur Lambuk",
            "address": "Kampung Baru",
            "type": "sumbangan",
            "location": null
        }))
        .unwrap();

        assert_eq!(record.kind, CampaignType::Sumbangan);
        assert!(record.location.is_none());
        assert!(record.usable_location().is_none());
        assert!(record.description.is_empty());
    }

    #[test]
    fn out_of_range_location_is_not_usable() {
        let record: CampaignRecord = serde_json::from_value(json!({
            "id": "k-2",
            "title": "Food bank",
            "address": "Shah Alam",
            "type": "infaq",
            "location": { "latitude": 123.0, "longitude": 101.5 }
        }))
        .unwrap();

        assert!(record.location.is_some());
        assert!(record.usable_location().is_none());
    }
}
