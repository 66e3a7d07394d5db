use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::campaign::{CampaignEvent, CampaignRecord, CampaignStatus, CampaignType};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/campaigns", post(create_campaign).get(list_campaigns))
        .route("/campaigns/:id", get(get_campaign))
}

#[derive(Deserialize)]
pub struct CreateCampaignRequest {
    pub title: String,
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub kind: CampaignType,
    pub location: Option<GeoPoint>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub ngo_name: Option<String>,
}

#[derive(Serialize)]
pub struct CampaignView {
    #[serde(flatten)]
    pub campaign: CampaignRecord,
    pub status: CampaignStatus,
}

impl CampaignView {
    pub fn at(campaign: CampaignRecord, now: DateTime<Utc>) -> Self {
        let status = campaign.status_at(now);
        Self { campaign, status }
    }
}

async fn create_campaign(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCampaignRequest>,
) -> Result<Json<CampaignView>, AppError> {
    for (field, value) in [
        ("title", &payload.title),
        ("description", &payload.description),
        ("address", &payload.address),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} cannot be empty")));
        }
    }

    let location = payload
        .location
        .ok_or_else(|| AppError::BadRequest("location is required".to_string()))?;
    location.validate()?;

    let now = Utc::now();
    let campaign = CampaignRecord {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        description: payload.description,
        address: payload.address,
        kind: payload.kind,
        location: Some(location),
        scheduled_date: payload.scheduled_date,
        ngo_name: payload.ngo_name,
        created_at: Some(now),
    };

    state.insert_campaign(campaign.clone());
    let _ = state.campaign_events_tx.send(CampaignEvent::Created {
        campaign: campaign.clone(),
    });

    info!(campaign_id = %campaign.id, kind = ?campaign.kind, "campaign created");

    Ok(Json(CampaignView::at(campaign, now)))
}

async fn list_campaigns(State(state): State<Arc<AppState>>) -> Json<Vec<CampaignView>> {
    let now = Utc::now();
    let campaigns = state
        .campaign_snapshot()
        .into_iter()
        .map(|campaign| CampaignView::at(campaign, now))
        .collect();

    Json(campaigns)
}

async fn get_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CampaignView>, AppError> {
    let campaign = state
        .campaigns
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("campaign {} not found", id)))?;

    Ok(Json(CampaignView::at(campaign.value().clone(), Utc::now())))
}
