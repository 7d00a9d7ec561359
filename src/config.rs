use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://fantasy.premierleague.com/api";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    /// Concurrent element-summary requests. 1 keeps the fetch strictly sequential.
    pub fetch_parallelism: usize,
    pub player_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http_timeout: Duration::from_secs(30),
            fetch_parallelism: 1,
            player_limit: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from `lookup`, falling back to the default for every
    /// variable that is absent or fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base = lookup("FPL_API_BASE")
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.api_base);
        let data_dir = lookup("FPL_DATA_DIR")
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let http_timeout = lookup("FPL_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .map(|secs| Duration::from_secs(secs.max(1)))
            .unwrap_or(defaults.http_timeout);
        let fetch_parallelism = lookup("FPL_FETCH_PARALLELISM")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.fetch_parallelism)
            .clamp(1, 16);
        let player_limit = lookup("FPL_PLAYER_LIMIT")
            .and_then(|val| val.trim().parse::<usize>().ok());

        Self {
            api_base,
            data_dir,
            http_timeout,
            fetch_parallelism,
            player_limit,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

/// Loads `.env.local` then `.env`; variables already set win.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let cfg = Config {
            api_base: "http://localhost:9000/api".to_string(),
            ..Config::default()
        };
        assert_eq!(
            cfg.endpoint("/bootstrap-static/"),
            "http://localhost:9000/api/bootstrap-static/"
        );
        assert_eq!(cfg.endpoint("fixtures/"), "http://localhost:9000/api/fixtures/");
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let cfg = Config::from_lookup(lookup_from(&[]));
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
        assert_eq!(cfg.fetch_parallelism, 1);
        assert_eq!(cfg.player_limit, None);
    }

    #[test]
    fn values_are_trimmed_and_clamped() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("FPL_API_BASE", " http://localhost:9000/api/ "),
            ("FPL_DATA_DIR", "/tmp/fpl"),
            ("FPL_HTTP_TIMEOUT_SECS", "0"),
            ("FPL_FETCH_PARALLELISM", "64"),
            ("FPL_PLAYER_LIMIT", " 25 "),
        ]));
        assert_eq!(cfg.api_base, "http://localhost:9000/api");
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/fpl"));
        assert_eq!(cfg.http_timeout, Duration::from_secs(1));
        assert_eq!(cfg.fetch_parallelism, 16);
        assert_eq!(cfg.player_limit, Some(25));

        let cfg = Config::from_lookup(lookup_from(&[("FPL_FETCH_PARALLELISM", "0")]));
        assert_eq!(cfg.fetch_parallelism, 1);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("FPL_API_BASE", "   "),
            ("FPL_DATA_DIR", ""),
            ("FPL_HTTP_TIMEOUT_SECS", "soon"),
            ("FPL_FETCH_PARALLELISM", "-3"),
            ("FPL_PLAYER_LIMIT", "all"),
        ]));
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
        assert_eq!(cfg.fetch_parallelism, 1);
        assert_eq!(cfg.player_limit, None);
    }
}
