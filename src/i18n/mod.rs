//! Internationalization (i18n) support
//!
//! Interface strings ship embedded for `pt-BR` and `en`; unknown keys fall
//! back to English, then to the key itself.

use anyhow::Result;
use std::collections::HashMap;

const BUILTIN: [(&str, &str); 2] = [
    ("pt-BR", include_str!("languages/pt-BR.yml")),
    ("en", include_str!("languages/en.yml")),
];

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: String,
    /// Flattened translations: lang -> "menu.home" -> text
    translations: HashMap<String, HashMap<String, String>>,
}

impl I18n {
    /// Create a handler with the built-in languages loaded
    pub fn new(language: &str) -> Result<Self> {
        let mut i18n = Self {
            language: normalize(language),
            translations: HashMap::new(),
        };
        for (lang, source) in BUILTIN {
            i18n.load_yaml(lang, source)?;
        }
        Ok(i18n)
    }

    /// Load (or extend) one language from YAML source
    pub fn load_yaml(&mut self, lang: &str, source: &str) -> Result<()> {
        let data: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(source)?;
        let entry = self.translations.entry(normalize(lang)).or_default();
        flatten_translations(&data, "", entry);
        tracing::debug!("Loaded language {}", lang);
        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key
    /// Key can be nested like "listing.load_more"
    pub fn get(&self, key: &str) -> String {
        self.lookup(&self.language, key)
            .or_else(|| self.lookup(base_language(&self.language), key))
            .or_else(|| self.lookup("en", key))
            .unwrap_or_else(|| key.to_string())
    }

    /// Get a translation with `%d` replaced by `count`
    pub fn get_count(&self, key: &str, count: usize) -> String {
        self.get(key).replace("%d", &count.to_string())
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<String> {
        self.translations.get(lang)?.get(key).cloned()
    }
}

/// `pt_br` and `pt-br` both become `pt-BR`
fn normalize(lang: &str) -> String {
    let lang = lang.replace('_', "-");
    match lang.split_once('-') {
        Some((base, region)) => format!("{}-{}", base.to_lowercase(), region.to_uppercase()),
        None => lang.to_lowercase(),
    }
}

fn base_language(lang: &str) -> &str {
    lang.split('-').next().unwrap_or(lang)
}

/// Flatten translations into a HashMap with dot-notation keys
fn flatten_translations(
    data: &HashMap<String, serde_yaml::Value>,
    prefix: &str,
    result: &mut HashMap<String, String>,
) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_yaml::Value::String(s) => {
                result.insert(full_key, s.clone());
            }
            serde_yaml::Value::Number(n) => {
                result.insert(full_key, n.to_string());
            }
            serde_yaml::Value::Bool(b) => {
                result.insert(full_key, b.to_string());
            }
            serde_yaml::Value::Mapping(map) => {
                // Recursively flatten nested objects
                let nested: HashMap<String, serde_yaml::Value> = map
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v.clone())))
                    .collect();
                flatten_translations(&nested, &full_key, result);
            }
            _ => {}
        }
    }
}
