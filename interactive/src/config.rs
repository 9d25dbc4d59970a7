use std::time::Duration;

use bazaar_facets::{ControllerConfig, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE};
use thiserror::Error;
use web_sys::window;

const META_PREFIX: &str = "bazaar-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for meta `{key}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Front-end settings, set by the host page through `<meta name="bazaar-*">` tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: String,
    pub login_path: String,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub timeout_ms: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080".to_string(),
            login_path: "/login".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
            timeout_ms: 15_000,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Read the meta tags of the current document. Bad values keep their
    /// default and are returned so they can be logged once logging is up.
    pub fn from_document() -> (Self, Vec<ConfigError>) {
        let document = window().and_then(|w| w.document());
        Self::from_lookup(|key| {
            let el = document
                .as_ref()?
                .query_selector(&format!("meta[name='{META_PREFIX}{key}']"))
                .ok()??;
            el.get_attribute("content")
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<ConfigError>) {
        let mut cfg = Self::default();
        let mut errors = Vec::new();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(api) = get("api") {
            cfg.api_base = api.trim_end_matches('/').to_string();
        }
        if let Some(login) = get("login") {
            cfg.login_path = login;
        }
        if let Some(level) = get("log-level") {
            cfg.log_level = level;
        }

        parse_into(get("page-size"), "page-size", &mut cfg.page_size, &mut errors, |n| *n > 0);
        parse_into(
            get("search-debounce-ms"),
            "search-debounce-ms",
            &mut cfg.search_debounce_ms,
            &mut errors,
            |_| true,
        );
        parse_into(get("timeout-ms"), "timeout-ms", &mut cfg.timeout_ms, &mut errors, |n| *n > 0);

        (cfg, errors)
    }

    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            page_size: self.page_size,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }
}

fn parse_into<T>(
    raw: Option<String>,
    key: &'static str,
    slot: &mut T,
    errors: &mut Vec<ConfigError>,
    valid: impl Fn(&T) -> bool,
) where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = raw else { return };
    match raw.parse::<T>() {
        Ok(value) if valid(&value) => *slot = value,
        Ok(_) => errors.push(ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be greater than zero".to_string(),
        }),
        Err(e) => errors.push(ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> (AppConfig, Vec<ConfigError>) {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_meta_tags() {
        let (cfg, errors) = from(&[]);
        assert_eq!(cfg, AppConfig::default());
        assert!(errors.is_empty());
        assert_eq!(cfg.controller().search_debounce, Duration::from_millis(500));
    }

    #[test]
    fn reads_every_key() {
        let (cfg, errors) = from(&[
            ("api", "https://api.example.com/"),
            ("login", "/account/login"),
            ("page-size", "24"),
            ("search-debounce-ms", "300"),
            ("timeout-ms", "8000"),
            ("log-level", "bazaar_facets=debug,info"),
        ]);

        assert!(errors.is_empty());
        assert_eq!(cfg.api_base, "https://api.example.com");
        assert_eq!(cfg.login_path, "/account/login");
        assert_eq!(cfg.controller().page_size, 24);
        assert_eq!(cfg.controller().search_debounce, Duration::from_millis(300));
        assert_eq!(cfg.timeout_ms, 8000);
        assert_eq!(cfg.log_level, "bazaar_facets=debug,info");
    }

    #[test]
    fn bad_numbers_keep_defaults_and_are_reported() {
        let (cfg, errors) = from(&[("page-size", "0"), ("timeout-ms", "soon"), ("api", "  ")]);

        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.timeout_ms, 15_000);
        assert_eq!(cfg.api_base, "http://localhost:8080");
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(e, ConfigError::Invalid { key: "timeout-ms", .. })));
    }
}
