use crate::error::GeoError;

/// Average city-traffic speed used when the caller has no better figure.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Rough travel time for `distance_km` at a constant `average_speed_kmh`.
///
/// Produces `"<m> min"` under an hour and `"<h> h <m> min"` otherwise.
pub fn estimate(distance_km: f64, average_speed_kmh: f64) -> Result<String, GeoError> {
    let minutes = travel_minutes(distance_km, average_speed_kmh)?;
    Ok(format_duration(minutes))
}

pub fn travel_minutes(distance_km: f64, average_speed_kmh: f64) -> Result<u64, GeoError> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(GeoError::InvalidArgument(format!(
            "distance must be a non-negative number of kilometres, got {distance_km}"
        )));
    }
    if !average_speed_kmh.is_finite() || average_speed_kmh <= 0.0 {
        return Err(GeoError::InvalidArgument(format!(
            "average speed must be positive, got {average_speed_kmh}"
        )));
    }

    let minutes = (distance_km / average_speed_kmh * 60.0).round();
    if !minutes.is_finite() || minutes >= u64::MAX as f64 {
        return Err(GeoError::InvalidArgument(format!(
            "travel time for {distance_km} km at {average_speed_kmh} km/h is out of range"
        )));
    }

    Ok(minutes as u64)
}

fn format_duration(minutes: u64) -> String {
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {} min", minutes / 60, minutes % 60)
    }
}
