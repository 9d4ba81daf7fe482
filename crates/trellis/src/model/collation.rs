//! Locale-aware display-name collation.
//!
//! Built on ICU with compiled data when the `collation` feature is on
//! (the default). The collator compares at secondary strength, so case
//! differences tie and accents still order; with the feature off, a
//! Unicode-lowercase comparison stands in.

use std::cmp::Ordering;
#[cfg(feature = "collation")]
use std::fmt;

/// Compares display names the way the user's locale sorts them.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use trellis::model::NameCollator;
///
/// let collator = NameCollator::with_locale("en-US");
/// assert_eq!(collator.compare("Alpha", "Zeta"), Ordering::Less);
/// assert_eq!(collator.compare("alpha", "Alpha"), Ordering::Equal);
/// ```
#[cfg(feature = "collation")]
pub struct NameCollator {
    locale: icu::locale::Locale,
    collator: icu::collator::CollatorBorrowed<'static>,
}

#[cfg(feature = "collation")]
impl NameCollator {
    /// Create a collator for the system locale.
    pub fn new() -> Self {
        let locale = sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string());
        Self::with_locale(&locale)
    }

    /// Create a collator for a specific locale.
    ///
    /// # Arguments
    ///
    /// * `locale` - A BCP 47 locale identifier (e.g., "en-US", "de-DE")
    ///
    /// Unparseable identifiers and locales without collation data fall
    /// back to `en-US`.
    pub fn with_locale(locale: &str) -> Self {
        use icu::collator::Collator;
        use icu::collator::options::{CollatorOptions, Strength};
        use icu::locale::Locale;

        let locale: Locale = locale
            .parse()
            .unwrap_or_else(|_| "en-US".parse().unwrap());

        let mut options = CollatorOptions::default();
        options.strength = Some(Strength::Secondary);

        let collator = Collator::try_new(locale.clone().into(), options).unwrap_or_else(|_| {
            let default_locale: Locale = "en-US".parse().unwrap();
            Collator::try_new(default_locale.into(), options)
                .expect("default locale should always work")
        });

        Self { locale, collator }
    }

    /// Compare two display names in this collator's locale.
    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        self.collator.compare(left, right)
    }

    /// The locale this collator resolved to.
    pub fn locale(&self) -> String {
        self.locale.to_string()
    }
}

#[cfg(feature = "collation")]
impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "collation")]
impl fmt::Debug for NameCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameCollator")
            .field("locale", &self.locale)
            .finish()
    }
}

/// Compares display names case-insensitively.
///
/// Fallback used when the `collation` feature is disabled.
#[cfg(not(feature = "collation"))]
#[derive(Debug, Default)]
pub struct NameCollator;

#[cfg(not(feature = "collation"))]
impl NameCollator {
    /// Create a collator for the system locale.
    pub fn new() -> Self {
        Self
    }

    /// Create a collator for a specific locale.
    ///
    /// Without the `collation` feature the locale is ignored.
    pub fn with_locale(_locale: &str) -> Self {
        Self
    }

    /// Compare two display names, ignoring case.
    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        left.to_lowercase().cmp(&right.to_lowercase())
    }

    /// The locale this collator resolved to.
    pub fn locale(&self) -> String {
        "en-US".to_string()
    }
}

static_assertions::assert_impl_all!(NameCollator: Send, Sync);
