use std::env;
use std::str::FromStr;

use reader_core::model::{ReaderSettings, ReaderSettingsDraft, SettingsError};

pub const ENV_API_BASE_URL: &str = "READER_API_BASE_URL";
pub const ENV_AUTH_TOKEN: &str = "READER_AUTH_TOKEN";
pub const ENV_WORDS_PER_PAGE: &str = "READER_WORDS_PER_PAGE";
pub const ENV_CHARS_PER_PAGE: &str = "READER_CHARS_PER_PAGE";
pub const ENV_TICK_SECS: &str = "READER_TICK_SECS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "READER_HTTP_TIMEOUT_SECS";

/// Build reader settings from `READER_*` environment variables.
///
/// Unset or unparsable numbers fall back to the defaults.
///
/// # Errors
///
/// Returns `SettingsError` if the resulting settings fail validation.
pub fn settings_from_env() -> Result<ReaderSettings, SettingsError> {
    draft_from_lookup(|name| env::var(name).ok()).validate()
}

fn draft_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ReaderSettingsDraft {
    fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
        lookup(name).and_then(|value| value.trim().parse().ok())
    }

    ReaderSettingsDraft {
        api_base_url: lookup(ENV_API_BASE_URL),
        auth_token: lookup(ENV_AUTH_TOKEN),
        words_per_page: parsed(&lookup, ENV_WORDS_PER_PAGE),
        chars_per_page: parsed(&lookup, ENV_CHARS_PER_PAGE),
        tick_secs: parsed(&lookup, ENV_TICK_SECS),
        http_timeout_secs: parsed(&lookup, ENV_HTTP_TIMEOUT_SECS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn draft(vars: &[(&str, &str)]) -> ReaderSettingsDraft {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        draft_from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn reads_known_variables() {
        let settings = draft(&[
            (ENV_API_BASE_URL, "http://localhost:4000/api"),
            (ENV_AUTH_TOKEN, "secret"),
            (ENV_WORDS_PER_PAGE, " 150 "),
            (ENV_TICK_SECS, "30"),
        ])
        .validate()
        .unwrap();

        assert_eq!(settings.api_base_url(), "http://localhost:4000/api");
        assert_eq!(settings.auth_token(), Some("secret"));
        assert_eq!(settings.pagination().words_per_page(), 150);
        assert_eq!(settings.pagination().chars_per_page(), 1800);
        assert_eq!(settings.tick_secs(), 30);
    }

    #[test]
    fn unparsable_numbers_use_defaults() {
        let settings = draft(&[(ENV_CHARS_PER_PAGE, "lots")]).validate().unwrap();
        assert_eq!(settings, ReaderSettings::default());
    }
}
