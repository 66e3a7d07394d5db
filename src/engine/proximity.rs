use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::geo::{haversine_km, GeoPoint};
use crate::models::campaign::CampaignRecord;

/// A campaign paired with its distance from the query origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedCampaign {
    #[serde(flatten)]
    pub campaign: CampaignRecord,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityOptions {
    pub radius_km: f64,
    /// Nearest first when set; otherwise input order is kept.
    pub sort_by_distance: bool,
}

impl ProximityOptions {
    pub fn within(radius_km: f64) -> Self {
        Self {
            radius_km,
            sort_by_distance: false,
        }
    }

    pub fn sorted(mut self) -> Self {
        self.sort_by_distance = true;
        self
    }
}

/// Campaigns within `options.radius_km` of `origin`.
///
/// Records without a usable location are skipped. An empty input or a
/// negative radius yields an empty result; a zero radius only admits
/// campaigns sitting exactly on the origin.
pub fn filter_nearby<'a, I>(
    origin: &GeoPoint,
    campaigns: I,
    options: ProximityOptions,
) -> Result<Vec<RankedCampaign>, GeoError>
where
    I: IntoIterator<Item = &'a CampaignRecord>,
{
    origin.validate()?;

    let radius_km = options.radius_km;
    if radius_km.is_nan() || radius_km < 0.0 {
        return Ok(Vec::new());
    }

    let mut ranked: Vec<RankedCampaign> = rank(origin, campaigns)
        .into_iter()
        .filter(|candidate| candidate.distance_km <= radius_km)
        .collect();

    if options.sort_by_distance {
        sort_nearest_first(&mut ranked);
    }

    Ok(ranked)
}

/// The single closest campaign with a usable location, regardless of radius.
pub fn nearest<'a, I>(origin: &GeoPoint, campaigns: I) -> Result<Option<RankedCampaign>, GeoError>
where
    I: IntoIterator<Item = &'a CampaignRecord>,
{
    origin.validate()?;

    Ok(rank(origin, campaigns)
        .into_iter()
        .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km)))
}

pub fn sort_nearest_first(ranked: &mut [RankedCampaign]) {
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

fn rank<'a, I>(origin: &GeoPoint, campaigns: I) -> Vec<RankedCampaign>
where
    I: IntoIterator<Item = &'a CampaignRecord>,
{
    campaigns
        .into_iter()
        .filter_map(|campaign| {
            let location = campaign.usable_location()?;
            Some(RankedCampaign {
                campaign: campaign.clone(),
                distance_km: haversine_km(origin, &location),
            })
        })
        .collect()
}
