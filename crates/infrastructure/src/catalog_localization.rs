//! JSON message catalogs bundled into the binary.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use warden_application::{Localization, Localizer};
use warden_core::{AppError, AppResult};

const BUNDLED_CATALOGS: [(&str, &str); 3] = [
    ("en", include_str!("../locales/en.json")),
    ("es", include_str!("../locales/es.json")),
    ("pt", include_str!("../locales/pt.json")),
];

struct CatalogLocalizer {
    language_tag: String,
    messages: HashMap<String, String>,
    fallback: Option<Arc<CatalogLocalizer>>,
}

impl Localizer for CatalogLocalizer {
    fn language_tag(&self) -> &str {
        &self.language_tag
    }

    fn message(&self, key: &str) -> String {
        if let Some(message) = self.messages.get(key) {
            return message.clone();
        }

        self.fallback
            .as_ref()
            .map_or_else(|| key.to_owned(), |fallback| fallback.message(key))
    }
}

/// Localization backed by per-language JSON catalogs.
///
/// Tags are matched on their primary subtag, so `pt-BR` resolves to `pt`.
/// Unsupported languages get the default catalog, and keys missing from a
/// catalog fall back to the default one.
pub struct CatalogLocalization {
    default_language: String,
    localizers: HashMap<String, Arc<CatalogLocalizer>>,
}

impl CatalogLocalization {
    /// Loads the bundled catalogs with `default_language` as fallback.
    pub fn bundled(default_language: &str) -> AppResult<Self> {
        Self::from_catalogs(default_language, &BUNDLED_CATALOGS)
    }

    /// Builds a localization from `(language, json)` catalog sources.
    pub fn from_catalogs(default_language: &str, catalogs: &[(&str, &str)]) -> AppResult<Self> {
        let default_language = primary_subtag(default_language)?;

        let mut parsed = HashMap::new();
        for (language, source) in catalogs {
            let messages: HashMap<String, String> =
                serde_json::from_str(source).map_err(|error| {
                    AppError::Internal(format!(
                        "message catalog '{language}' is not valid JSON: {error}"
                    ))
                })?;
            parsed.insert(primary_subtag(language)?, messages);
        }

        let default_messages = parsed.remove(&default_language).ok_or_else(|| {
            AppError::Validation(format!(
                "default language '{default_language}' has no message catalog"
            ))
        })?;
        let default_localizer = Arc::new(CatalogLocalizer {
            language_tag: default_language.clone(),
            messages: default_messages,
            fallback: None,
        });

        let mut localizers: HashMap<String, Arc<CatalogLocalizer>> = parsed
            .into_iter()
            .map(|(language, messages)| {
                let localizer = CatalogLocalizer {
                    language_tag: language.clone(),
                    messages,
                    fallback: Some(default_localizer.clone()),
                };
                (language, Arc::new(localizer))
            })
            .collect();
        localizers.insert(default_language.clone(), default_localizer);

        Ok(Self {
            default_language,
            localizers,
        })
    }
}

impl Localization for CatalogLocalization {
    fn localizer(&self, language_tag: &str) -> AppResult<Arc<dyn Localizer>> {
        let language = primary_subtag(language_tag)?;

        let localizer = match self.localizers.get(&language) {
            Some(localizer) => localizer.clone(),
            None => {
                debug!(
                    requested = %language_tag,
                    fallback = %self.default_language,
                    "no catalog for language, using default"
                );
                self.localizers
                    .get(&self.default_language)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::Internal("default message catalog is missing".to_owned())
                    })?
            }
        };

        Ok(localizer)
    }
}

/// Extracts and lowercases the primary language subtag of a BCP 47 tag.
fn primary_subtag(language_tag: &str) -> AppResult<String> {
    let primary = language_tag
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default();

    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(AppError::Validation(format!(
            "invalid language tag '{language_tag}'"
        )));
    }

    Ok(primary.to_ascii_lowercase())
}
