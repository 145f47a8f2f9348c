use prompter_core::{Error, Result};
use std::sync::Arc;
use tauri_plugin_store::StoreExt;

const STORE_FILE: &str = "app_prefs.json";
const PRIVACY_ACCEPTED_KEY: &str = "privacy_policy_accepted";
const LANGUAGE_KEY: &str = "selected_language";

pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "zh"];

/// Resolve a requested language code against the supported set.
///
/// Region suffixes are ignored, so `zh-CN` and `zh_TW` both map to `zh`.
pub fn supported_language(code: &str) -> Option<&'static str> {
    let base = code
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    SUPPORTED_LANGUAGES.iter().copied().find(|l| *l == base)
}

/// Privacy consent and UI language.
pub struct PreferencesManager<R: tauri::Runtime> {
    store: Arc<tauri_plugin_store::Store<R>>,
}

impl<R: tauri::Runtime> PreferencesManager<R> {
    pub fn new(app: &tauri::AppHandle<R>) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let store = app.store(STORE_FILE)?;
        Ok(Self { store })
    }

    pub fn privacy_accepted(&self) -> bool {
        self.store
            .get(PRIVACY_ACCEPTED_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub fn set_privacy_accepted(&self, accepted: bool) -> Result<()> {
        self.store
            .set(PRIVACY_ACCEPTED_KEY.to_string(), serde_json::Value::Bool(accepted));
        self.save()
    }

    /// Saved language, if the user ever picked one.
    pub fn language(&self) -> Option<String> {
        self.store
            .get(LANGUAGE_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn set_language(&self, code: &str) -> Result<&'static str> {
        let lang = supported_language(code)
            .ok_or_else(|| Error::Storage(format!("unsupported language: {code}")))?;
        self.store
            .set(LANGUAGE_KEY.to_string(), serde_json::Value::from(lang));
        self.save()?;
        tracing::info!(lang, "language changed");
        Ok(lang)
    }

    fn save(&self) -> Result<()> {
        self.store
            .save()
            .map_err(|e| Error::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_resolve_to_supported_set() {
        assert_eq!(supported_language("en"), Some("en"));
        assert_eq!(supported_language("zh-CN"), Some("zh"));
        assert_eq!(supported_language("ZH_tw"), Some("zh"));
        assert_eq!(supported_language("fr"), None);
        assert_eq!(supported_language(""), None);
    }
}
