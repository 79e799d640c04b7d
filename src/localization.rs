//! Fluent-based localization for bot messages.
//!
//! Russian is the default language; English is served to users whose
//! Telegram client reports an English language code.

use anyhow::Result;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

use crate::config::DEFAULT_LOCALES_DIR;

pub const DEFAULT_LANGUAGE: &str = "ru";
pub const SUPPORTED_LANGUAGES: &[&str] = &["ru", "en"];

/// Localization manager for the bot
pub struct LocalizationManager {
    bundles: HashMap<String, Arc<FluentBundle<FluentResource>>>,
}

impl LocalizationManager {
    /// Create a manager reading `./locales/<lang>/main.ftl`
    pub fn new() -> Result<Self> {
        Self::with_dir(DEFAULT_LOCALES_DIR)
    }

    /// Create a manager reading `<dir>/<lang>/main.ftl` for every supported language
    pub fn with_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut bundles = HashMap::new();

        for language in SUPPORTED_LANGUAGES {
            let locale: LanguageIdentifier = language.parse()?;
            let bundle = Self::create_bundle(dir.as_ref(), &locale);
            bundles.insert(language.to_string(), Arc::new(bundle));
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(dir: &Path, locale: &LanguageIdentifier) -> FluentBundle<FluentResource> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Telegram renders the bidi isolation marks literally
        bundle.set_use_isolating(false);

        let resource_path = dir.join(locale.to_string()).join("main.ftl");
        let content = match fs::read_to_string(&resource_path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %resource_path.display(), error = %e, "Locale file not loaded");
                return bundle;
            }
        };

        let resource = match FluentResource::try_new(content) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                warn!(path = %resource_path.display(), errors = errors.len(), "Locale file has syntax errors");
                resource
            }
        };

        if let Err(errors) = bundle.add_resource(resource) {
            warn!(locale = %locale, errors = errors.len(), "Duplicate messages in locale file");
        }
        debug!(locale = %locale, "Locale bundle loaded");

        bundle
    }

    fn format(
        bundle: &FluentBundle<FluentResource>,
        key: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> Option<String> {
        let pattern = bundle.get_message(key)?.value()?;

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, *value);
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            debug!(key = %key, errors = errors.len(), "Message formatted with errors");
        }
        Some(value.into_owned())
    }

    /// Get a localized message in a specific language
    ///
    /// Unknown languages and keys missing from a translation fall back to
    /// Russian; a key missing everywhere yields `"Missing translation: <key>"`.
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let requested = self.bundles.get(language);
        let default = self.bundles.get(DEFAULT_LANGUAGE);

        requested
            .and_then(|bundle| Self::format(bundle, key, args))
            .or_else(|| default.and_then(|bundle| Self::format(bundle, key, args)))
            .unwrap_or_else(|| format!("Missing translation: {}", key))
    }

    /// Get a localized message in the default language
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        self.get_message_in_language(key, DEFAULT_LANGUAGE, args)
    }
}

/// Map a Telegram language code ("en-US", "ru") to a supported language
pub fn detect_language(language_code: Option<&str>) -> &'static str {
    let Some(code) = language_code else {
        return DEFAULT_LANGUAGE;
    };
    let primary = code
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();

    SUPPORTED_LANGUAGES
        .iter()
        .find(|language| **language == primary)
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Global localization instance
static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager from `./locales`
pub fn init_localization() -> Result<()> {
    init_localization_from(DEFAULT_LOCALES_DIR)
}

/// Initialize the global localization manager from a custom directory
///
/// Only the first call takes effect.
pub fn init_localization_from(dir: impl AsRef<Path>) -> Result<()> {
    let manager = LocalizationManager::with_dir(dir)?;
    if LOCALIZATION_MANAGER.set(manager).is_err() {
        debug!("Localization manager already initialized");
    }
    Ok(())
}

/// Get the global localization manager, loading `./locales` on first use
pub fn get_localization_manager() -> &'static LocalizationManager {
    LOCALIZATION_MANAGER.get_or_init(|| {
        LocalizationManager::new().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to an empty localization manager");
            LocalizationManager {
                bundles: HashMap::new(),
            }
        })
    })
}

/// Localized message for the user's language code
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    get_localization_manager().get_message_in_language(key, detect_language(language_code), None)
}

/// Localized message with arguments for the user's language code
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    get_localization_manager().get_message_in_language(
        key,
        detect_language(language_code),
        Some(&args_map),
    )
}
