//! Display formatting for estimation values.

use std::fmt::Display;
use chrono::TimeZone;
use readtrack_core::Time;

/// Durations beyond this many hours (about 100 years) are shown as a cap.
pub const FAR_FUTURE_HOURS: f64 = 876_000.0;

const FAR_FUTURE: &str = "~100 years";
const NOT_APPLICABLE: &str = "\u{2014}";

/// Human-readable time left: `45 min`, `3h 20min`, `2d 5h`.
///
/// Missing or absurdly long durations show as `~100 years`, negative ones
/// (already finished) as a dash.
pub fn format_duration(hours: Option<f64>) -> String {
    let Some(hours) = hours.filter(|h| *h <= FAR_FUTURE_HOURS) else {
        return FAR_FUTURE.to_string();
    };
    if hours < 0.0 {
        return NOT_APPLICABLE.to_string();
    }

    let total_minutes = (hours * 60.0).round() as i64;
    if total_minutes < 60 {
        return format!("{} min", total_minutes);
    }

    let days = (hours / 24.0).floor() as i64;
    let h = (hours % 24.0).floor() as i64;
    let m = ((hours - hours.floor()) * 60.0).round() as i64;
    if days > 0 {
        format!("{}d {}h", days, h)
    } else {
        format!("{}h {}min", hours.floor() as i64, m)
    }
}

/// Reading speed with one decimal, or a dash when unknown.
pub fn format_speed(speed: Option<f64>) -> String {
    match speed {
        Some(speed) => format!("{:.1} pages/hr", speed),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Completion date rendered in `tz`, capped at `~100 years` from `now`.
pub fn format_eta<Tz>(eta: Option<Time>, now: Time, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(eta) = eta else {
        return FAR_FUTURE.to_string();
    };

    let hours_ahead = eta.signed_duration_since(now).num_seconds() as f64 / 3600.0;
    if hours_ahead > FAR_FUTURE_HOURS {
        return FAR_FUTURE.to_string();
    }
    eta.with_timezone(tz).format("%b %d, %Y %H:%M").to_string()
}

/// Share read with one decimal.
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}
