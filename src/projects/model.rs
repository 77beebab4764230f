use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::status::format_optional;

/// One repository card. Field names follow the GitHub payload so cached
/// entries and API responses decode the same way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(rename = "stargazers_count", default)]
    pub star_count: u64,
    pub html_url: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub pushed_at: Option<DateTime<Utc>>,
}

impl RepoSummary {
    pub fn description_or_placeholder(&self) -> &str {
        self.description
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or("Repositorio sin descripción")
    }

    pub fn updated_label(&self) -> String {
        format!("Actualizado: {}", format_optional(self.pushed_at))
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (read as UTC
/// midnight). Anything else, including non-string values, decodes as `None`
/// so one bad date never rejects the whole list.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|value| value.as_str()).and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiRepo {
    #[serde(flatten)]
    pub summary: RepoSummary,
    #[serde(default)]
    pub fork: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub repos: Vec<RepoSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Drops forks and keeps the first `limit` entries in server order.
pub fn select_showcase(repos: Vec<ApiRepo>, limit: usize) -> Vec<RepoSummary> {
    repos
        .into_iter()
        .filter(|repo| !repo.fork)
        .map(|repo| repo.summary)
        .take(limit)
        .collect()
}
