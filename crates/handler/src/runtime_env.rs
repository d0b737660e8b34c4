use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use reindex_protocol::ReindexConfig;

/// Environment-derived process settings, loaded once at startup.
///
/// Malformed values never abort the handler; they are skipped and collected
/// as warnings so a bad override falls back to the documented default.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub config: ReindexConfig,
    pub dispatch_url: Option<String>,
    pub warnings: Vec<String>,
}

pub fn load_from_env() -> RuntimeSettings {
    let mut warnings = Vec::new();
    let mut config = ReindexConfig::default();

    if let Some(secs) = parse_var::<u64>("REINDEX_TIMEOUT_SECS", &mut warnings) {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Ok(scroll) = env::var("REINDEX_SCROLL") {
        if scroll.trim().is_empty() {
            warnings.push("ignoring empty REINDEX_SCROLL".to_string());
        } else {
            config.default_scroll = scroll;
        }
    }
    if let Some(size) = parse_var::<u32>("REINDEX_PAGE_SIZE", &mut warnings) {
        config.default_page_size = size;
    }
    if let Some(size) = parse_var::<usize>("REINDEX_CHUNK_SIZE", &mut warnings) {
        config.default_chunk_size = size;
    }
    config.inline_dispatch = flag_enabled("REINDEX_INLINE_DISPATCH");

    let dispatch_url = env::var("REINDEX_DISPATCH_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());

    RuntimeSettings {
        config,
        dispatch_url,
        warnings,
    }
}

fn parse_var<T: FromStr>(key: &str, warnings: &mut Vec<String>) -> Option<T>
where
    T::Err: Display,
{
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warnings.push(format!("ignoring {key}={raw:?}: {err}"));
            None
        }
    }
}

fn flag_enabled(key: &str) -> bool {
    env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EnvGuard {
        saved: Vec<(String, Option<std::ffi::OsString>)>,
    }

    impl EnvGuard {
        fn new(keys: &[&str]) -> Self {
            let mut saved = Vec::new();
            for key in keys {
                saved.push((key.to_string(), env::var_os(key)));
                env::remove_var(key);
            }
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain(..) {
                match value {
                    Some(v) => env::set_var(&key, v),
                    None => env::remove_var(&key),
                }
            }
        }
    }

    #[test]
    fn overrides_apply_and_malformed_values_warn() {
        let _guard = EnvGuard::new(&[
            "REINDEX_TIMEOUT_SECS",
            "REINDEX_SCROLL",
            "REINDEX_PAGE_SIZE",
            "REINDEX_CHUNK_SIZE",
            "REINDEX_INLINE_DISPATCH",
            "REINDEX_DISPATCH_URL",
        ]);

        env::set_var("REINDEX_TIMEOUT_SECS", "10");
        env::set_var("REINDEX_SCROLL", "2m");
        env::set_var("REINDEX_PAGE_SIZE", "not-a-number");
        env::set_var("REINDEX_INLINE_DISPATCH", "true");
        env::set_var("REINDEX_DISPATCH_URL", "http://substrate:8080");

        let settings = load_from_env();
        assert_eq!(settings.config.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.config.default_scroll, "2m");
        // Malformed page size falls back to the default and warns.
        assert_eq!(settings.config.default_page_size, 500);
        assert_eq!(settings.config.default_chunk_size, 500);
        assert!(settings.config.inline_dispatch);
        assert_eq!(
            settings.dispatch_url.as_deref(),
            Some("http://substrate:8080")
        );
        assert_eq!(settings.warnings.len(), 1);
        assert!(settings.warnings[0].contains("REINDEX_PAGE_SIZE"));
    }
}
