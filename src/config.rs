use std::env;
use std::path::PathBuf;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    pub search: SearchSettings,
    pub campaign_seed_file: Option<PathBuf>,
}

/// Radius and speed defaults applied when a request leaves them out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    pub nearby_radius_km: f64,
    pub map_radius_km: f64,
    pub average_speed_kmh: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            nearby_radius_km: 5.0,
            map_radius_km: 0.5,
            average_speed_kmh: 30.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let defaults = SearchSettings::default();
        let search = SearchSettings {
            nearby_radius_km: parse_or_default("NEARBY_RADIUS_KM", defaults.nearby_radius_km)?,
            map_radius_km: parse_or_default("MAP_RADIUS_KM", defaults.map_radius_km)?,
            average_speed_kmh: parse_or_default("AVERAGE_SPEED_KMH", defaults.average_speed_kmh)?,
        };

        if !(search.average_speed_kmh.is_finite() && search.average_speed_kmh > 0.0) {
            return Err(AppError::Internal(format!(
                "invalid AVERAGE_SPEED_KMH: must be positive, got {}",
                search.average_speed_kmh
            )));
        }

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: validate_event_buffer_size(parse_or_default(
                "EVENT_BUFFER_SIZE",
                1024,
            )?)?,
            search,
            campaign_seed_file: env::var("CAMPAIGN_SEED_FILE").ok().map(PathBuf::from),
        })
    }
}

fn validate_event_buffer_size(size: usize) -> Result<usize, AppError> {
    if size == 0 {
        return Err(AppError::Internal(
            "invalid EVENT_BUFFER_SIZE: must be at least 1".to_string(),
        ));
    }
    Ok(size)
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
