use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const TOO_MANY_REQUESTS: u16 = 429;
const DEFAULT_MESSAGE: &str = "Too many requests. Please try again later.";

/// Quota figures reported by the server alongside a 429 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitInfo {
    pub limit: u64,
    pub used: u64,
    #[serde(rename = "resetAt")]
    pub reset_at_epoch_seconds: i64,
}

/// User-facing guidance derived from a rate-limited response.
///
/// Informational only; the server enforces the limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitNotice {
    pub info: Option<RateLimitInfo>,
    pub message: String,
    /// Absolute reset time, e.g. `2026-10-17 14:30:00 UTC`
    pub reset_time: Option<String>,
    /// Coarse relative reset time, e.g. `in 1h 30m` or `now`
    pub reset_time_relative: Option<String>,
}

/// Interprets a response as a rate-limit notice, relative to the current time.
///
/// Returns `None` for anything but HTTP 429.
pub fn interpret(status: u16, body: &str) -> Option<RateLimitNotice> {
    interpret_at(status, body, Utc::now())
}

/// Same as [`interpret`], with an explicit clock.
pub fn interpret_at(status: u16, body: &str, now: DateTime<Utc>) -> Option<RateLimitNotice> {
    if status != TOO_MANY_REQUESTS {
        return None;
    }

    // Fields are read independently so a partial quota object keeps the error text
    let body: Value = serde_json::from_str(body).unwrap_or_default();
    let error = body
        .get("error")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let info = body
        .get("rateLimit")
        .cloned()
        .and_then(|quota| serde_json::from_value::<RateLimitInfo>(quota).ok());

    let Some(info) = info else {
        // Older deployments only send a free-text error
        return Some(RateLimitNotice {
            info: None,
            message: error.unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            reset_time: None,
            reset_time_relative: None,
        });
    };

    let message = error.unwrap_or_else(|| {
        format!(
            "Rate limit reached: {} of {} requests used.",
            info.used, info.limit
        )
    });

    Some(RateLimitNotice {
        info: Some(info),
        message,
        reset_time: format_reset_time(info.reset_at_epoch_seconds),
        reset_time_relative: Some(format_relative(info.reset_at_epoch_seconds, now)),
    })
}

fn format_reset_time(reset_at: i64) -> Option<String> {
    Utc.timestamp_opt(reset_at, 0)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// Renders the time until `reset_at` as `in {H}h {M}m`, dropping the hours when zero.
fn format_relative(reset_at: i64, now: DateTime<Utc>) -> String {
    let remaining = reset_at.saturating_sub(now.timestamp());
    if remaining <= 0 {
        return "now".to_string();
    }

    let minutes = remaining / 60;
    let hours = minutes / 60;
    let minutes = minutes % 60;

    if hours > 0 {
        format!("in {hours}h {minutes}m")
    } else {
        format!("in {minutes}m")
    }
}
