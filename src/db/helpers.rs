use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::models::{ProgressType, SignalKind};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn to_u16(value: i64, field: &str) -> Result<u16> {
    u16::try_from(value).map_err(|_| anyhow!("{field} value {value} out of range"))
}

pub fn parse_kind(value: &str) -> Result<SignalKind> {
    match value {
        "scroll" => Ok(SignalKind::Scroll),
        "bookmark" => Ok(SignalKind::Bookmark),
        "recite" => Ok(SignalKind::Recite),
        "click" => Ok(SignalKind::Click),
        other => Err(anyhow!("unknown signal kind {other}")),
    }
}

pub fn parse_progress_type(value: &str) -> Result<ProgressType> {
    match value {
        "scroll" => Ok(ProgressType::Scroll),
        "page" => Ok(ProgressType::Page),
        other => Err(anyhow!("unknown progress type {other}")),
    }
}
