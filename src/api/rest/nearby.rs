use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::proximity::{filter_nearby, ProximityOptions, RankedCampaign};
use crate::engine::route::{estimate_route, nearest_route, NearestRoute, RouteEstimate};
use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/nearby", get(nearby_campaigns))
        .route("/campaigns/:id/route", get(campaign_route))
        .route("/route/nearest", get(route_to_nearest))
}

/// Which configured radius applies when the request gives none.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    Nearby,
    Map,
}

#[derive(Deserialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub scope: SearchScope,
    #[serde(default)]
    pub sort: bool,
}

#[derive(Deserialize)]
pub struct RouteQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: Option<f64>,
}

#[derive(Serialize)]
pub struct NearbyResponse {
    pub origin: GeoPoint,
    pub radius_km: f64,
    pub campaigns: Vec<RankedCampaign>,
}

async fn nearby_campaigns(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> Result<Json<NearbyResponse>, AppError> {
    let Query(query) = query?;
    let start = Instant::now();
    let origin = GeoPoint {
        latitude: query.latitude,
        longitude: query.longitude,
    };
    let radius_km = query.radius_km.unwrap_or(match query.scope {
        SearchScope::Nearby => state.search.nearby_radius_km,
        SearchScope::Map => state.search.map_radius_km,
    });

    let campaigns = state.campaign_snapshot();
    let options = ProximityOptions {
        radius_km,
        sort_by_distance: query.sort,
    };

    match filter_nearby(&origin, &campaigns, options) {
        Ok(matched) => {
            let skipped = campaigns
                .iter()
                .filter(|campaign| campaign.usable_location().is_none())
                .count();
            state.metrics.campaigns_skipped_total.inc_by(skipped as u64);
            state
                .metrics
                .record_query("success", start.elapsed().as_secs_f64());

            info!(
                radius_km,
                matched = matched.len(),
                skipped,
                "nearby campaigns queried"
            );

            Ok(Json(NearbyResponse {
                origin,
                radius_km,
                campaigns: matched,
            }))
        }
        Err(err) => {
            state
                .metrics
                .record_query("error", start.elapsed().as_secs_f64());
            warn!(error = %err, "rejected nearby query");
            Err(err.into())
        }
    }
}

async fn campaign_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<RouteEstimate>, AppError> {
    let Query(query) = query?;
    let origin = GeoPoint {
        latitude: query.latitude,
        longitude: query.longitude,
    };
    origin.validate()?;

    let destination = {
        let campaign = state
            .campaigns
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("campaign {} not found", id)))?;
        campaign
            .usable_location()
            .ok_or_else(|| AppError::MissingLocation(id.clone()))?
    };

    let speed_kmh = query.speed_kmh.unwrap_or(state.search.average_speed_kmh);

    let result = estimate_route(&origin, &destination, speed_kmh);
    record_route_outcome(&state, result.is_ok());
    let route = result?;

    info!(
        campaign_id = %id,
        distance_km = route.distance_km,
        travel_time = %route.travel_time,
        "route estimated"
    );

    Ok(Json(route))
}

async fn route_to_nearest(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<NearestRoute>, AppError> {
    let Query(query) = query?;
    let origin = GeoPoint {
        latitude: query.latitude,
        longitude: query.longitude,
    };
    let speed_kmh = query.speed_kmh.unwrap_or(state.search.average_speed_kmh);
    let campaigns = state.campaign_snapshot();

    let result = nearest_route(&origin, &campaigns, speed_kmh);
    record_route_outcome(&state, result.is_ok());

    let found = result?
        .ok_or_else(|| AppError::NotFound("no campaign with a usable location".to_string()))?;

    info!(
        campaign_id = %found.campaign.campaign.id,
        distance_km = found.route.distance_km,
        "nearest campaign selected"
    );

    Ok(Json(found))
}

fn record_route_outcome(state: &AppState, ok: bool) {
    let outcome = if ok { "success" } else { "error" };
    state
        .metrics
        .route_estimates_total
        .with_label_values(&[outcome])
        .inc();
}
