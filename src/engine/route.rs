use serde::{Deserialize, Serialize};

use crate::engine::proximity::{nearest, RankedCampaign};
use crate::engine::travel;
use crate::error::GeoError;
use crate::geo::{distance_km, GeoPoint};
use crate::models::campaign::CampaignRecord;

/// Straight-line distance and naive travel time between two points.
///
/// This is the fallback shown on the map when no routing service is
/// consulted for an actual road path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub travel_time: String,
    pub originating_point: GeoPoint,
    pub destination_point: GeoPoint,
}

pub fn estimate_route(
    origin: &GeoPoint,
    destination: &GeoPoint,
    average_speed_kmh: f64,
) -> Result<RouteEstimate, GeoError> {
    let distance_km = distance_km(origin, destination)?;
    let travel_time = travel::estimate(distance_km, average_speed_kmh)?;

    Ok(RouteEstimate {
        distance_km,
        travel_time,
        originating_point: *origin,
        destination_point: *destination,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearestRoute {
    pub campaign: RankedCampaign,
    pub route: RouteEstimate,
}

/// Picks the closest campaign and estimates the trip to it.
///
/// `Ok(None)` when no campaign has a usable location.
pub fn nearest_route<'a, I>(
    origin: &GeoPoint,
    campaigns: I,
    average_speed_kmh: f64,
) -> Result<Option<NearestRoute>, GeoError>
where
    I: IntoIterator<Item = &'a CampaignRecord>,
{
    let Some(campaign) = nearest(origin, campaigns)? else {
        return Ok(None);
    };
    let Some(destination) = campaign.campaign.usable_location() else {
        return Ok(None);
    };

    let route = estimate_route(origin, &destination, average_speed_kmh)?;
    Ok(Some(NearestRoute { campaign, route }))
}
