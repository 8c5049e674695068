//! Internationalization (i18n) module for the bilingual site.
//!
//! # Architecture
//!
//! - `locale`: the closed `Locale` set (Arabic, English) and text direction
//! - `registry`: static metadata for each locale
//! - `text`: paired Arabic/English strings with fallback resolution
//! - `strings`: localized notices and inquiry message templates
//! - `validator`: markup, catalog and template consistency checks
//!
//! # Example
//!
//! ```rust
//! use rafe_site::i18n::{Locale, LocalizedText};
//!
//! let locale = Locale::negotiate("ar-SA").unwrap_or(Locale::En);
//! let text = LocalizedText::new("", "Rent now");
//! assert_eq!(text.resolve(locale), Some("Rent now"));
//! ```

mod locale;
mod registry;
mod strings;
mod text;
mod validator;

pub use locale::{Direction, Locale};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use strings::{fill, LocaleStrings, ARABIC_STRINGS, ENGLISH_STRINGS};
pub use text::LocalizedText;
pub use validator::{MarkupValidator, ValidationReport};
