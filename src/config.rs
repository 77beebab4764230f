use crate::telemetry::LogLevel;

const DEFAULT_GITHUB_USER: &str = "JUCUVIK";
const DEFAULT_REPO_REQUEST_LIMIT: usize = 9;
const DEFAULT_REPO_DISPLAY_LIMIT: usize = 6;
const DEFAULT_ROTATION_INTERVAL_MS: u32 = 4_200;
const DEFAULT_AVATAR_SOUND: &str = "imagenes/maullido.mp3";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const REPO_REQUEST_LIMIT_BOUNDS: (usize, usize) = (1, 100);
const REPO_DISPLAY_LIMIT_BOUNDS: (usize, usize) = (1, 30);
const ROTATION_INTERVAL_MS_BOUNDS: (u32, u32) = (500, 60_000);

#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    pub github_user: String,
    pub repo_request_limit: usize,
    pub repo_display_limit: usize,
    pub rotation_interval_ms: u32,
    pub avatar_sound: String,
    pub log_level: LogLevel,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            github_user: DEFAULT_GITHUB_USER.to_string(),
            repo_request_limit: DEFAULT_REPO_REQUEST_LIMIT,
            repo_display_limit: DEFAULT_REPO_DISPLAY_LIMIT,
            rotation_interval_ms: DEFAULT_ROTATION_INTERVAL_MS,
            avatar_sound: DEFAULT_AVATAR_SOUND.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl PageConfig {
    /// Builds the config from `data-*` style keys (`github-user`,
    /// `repo-request-limit`, ...). Missing, malformed or out-of-range values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let github_user = parse_non_empty_string(&lookup, "github-user")
            .unwrap_or_else(|| DEFAULT_GITHUB_USER.to_string());
        let repo_request_limit = parse_usize_with_bounds(
            &lookup,
            "repo-request-limit",
            DEFAULT_REPO_REQUEST_LIMIT,
            REPO_REQUEST_LIMIT_BOUNDS,
        );
        let repo_display_limit = parse_usize_with_bounds(
            &lookup,
            "repo-display-limit",
            DEFAULT_REPO_DISPLAY_LIMIT,
            REPO_DISPLAY_LIMIT_BOUNDS,
        );
        let rotation_interval_ms = parse_u32_with_bounds(
            &lookup,
            "rotation-interval-ms",
            DEFAULT_ROTATION_INTERVAL_MS,
            ROTATION_INTERVAL_MS_BOUNDS,
        );
        let avatar_sound = parse_non_empty_string(&lookup, "avatar-sound")
            .unwrap_or_else(|| DEFAULT_AVATAR_SOUND.to_string());
        let log_level = parse_non_empty_string(&lookup, "log-level")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            github_user,
            repo_request_limit,
            repo_display_limit,
            rotation_interval_ms,
            avatar_sound,
            log_level,
        }
    }
}

fn parse_non_empty_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_usize_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: usize,
    bounds: (usize, usize),
) -> usize {
    lookup(name)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_u32_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u32,
    bounds: (u32, u32),
) -> u32 {
    lookup(name)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| values.get(name).cloned()
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        let config = PageConfig::from_lookup(|_| None);
        assert_eq!(config, PageConfig::default());
        assert_eq!(config.repo_request_limit, 9);
        assert_eq!(config.repo_display_limit, 6);
        assert_eq!(config.rotation_interval_ms, 4_200);
    }

    #[test]
    fn valid_overrides_are_applied() {
        let config = PageConfig::from_lookup(lookup_from(&[
            ("github-user", "  octocat "),
            ("repo-request-limit", "20"),
            ("repo-display-limit", "3"),
            ("rotation-interval-ms", "1000"),
            ("log-level", "debug"),
        ]));

        assert_eq!(config.github_user, "octocat");
        assert_eq!(config.repo_request_limit, 20);
        assert_eq!(config.repo_display_limit, 3);
        assert_eq!(config.rotation_interval_ms, 1_000);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn out_of_range_and_malformed_values_fall_back() {
        let config = PageConfig::from_lookup(lookup_from(&[
            ("github-user", "   "),
            ("repo-request-limit", "0"),
            ("repo-display-limit", "many"),
            ("rotation-interval-ms", "10"),
            ("log-level", "loud"),
        ]));

        assert_eq!(config, PageConfig::default());
    }
}
