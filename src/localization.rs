//! Localization engine: owns the active locale and renders bilingual content.
//!
//! At setup the engine scans the page once and records every translatable
//! element (one carrying both `data-en` and `data-ar`) together with the way
//! its text is applied. Rendering then walks that table only.

use crate::i18n::{Locale, LocalizedText};
use crate::page::{ElementId, Page, Tag};
use crate::storage::PreferenceStore;
use tracing::{debug, info, warn};

/// Classes marking label-like leaves whose visible text is always replaced.
const LABEL_CLASSES: [&str; 3] = ["btn-title", "btn-subtitle", "spec-label"];

/// Class of the locale switch controls.
pub const LOCALE_SWITCH_CLASS: &str = "lang-btn";

/// Body class present while the layout is right-to-left.
pub const RTL_LAYOUT_CLASS: &str = "rtl-layout";

/// How a translatable element receives its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRole {
    /// Form input / text area: the placeholder
    Placeholder,
    /// Image: the alternative text
    AltText,
    /// Visible text content
    Text,
    /// Has translatable children of its own; never written
    Untouched,
}

#[derive(Debug, Clone)]
struct TranslatableEntry {
    element: ElementId,
    text: LocalizedText,
    role: RenderRole,
}

/// Translatable elements of a page, in document order.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: Vec<TranslatableEntry>,
}

impl TranslationTable {
    /// Scan `page` and classify every translatable element.
    pub fn build(page: &Page) -> Self {
        let entries = page
            .all()
            .into_iter()
            .filter_map(|id| {
                let text = localized_text(page, id)?;
                Some(TranslatableEntry {
                    element: id,
                    text,
                    role: classify(page, id),
                })
            })
            .collect();

        Self { entries }
    }

    pub fn role_of(&self, id: ElementId) -> Option<RenderRole> {
        self.entries
            .iter()
            .find(|entry| entry.element == id)
            .map(|entry| entry.role)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn localized_text(page: &Page, id: ElementId) -> Option<LocalizedText> {
    let element = page.get(id);
    Some(LocalizedText::new(
        element.attr("data-ar")?,
        element.attr("data-en")?,
    ))
}

/// A child carrying text for either locale shields its parent from rendering,
/// even when its own pair is incomplete.
fn carries_locale_text(page: &Page, id: ElementId) -> bool {
    let element = page.get(id);
    element.has_attr("data-en") || element.has_attr("data-ar")
}

/// Precedence: input, image, label class, leaf, no translatable child,
/// otherwise untouched.
fn classify(page: &Page, id: ElementId) -> RenderRole {
    let element = page.get(id);
    match element.tag {
        Tag::Input | Tag::Textarea => RenderRole::Placeholder,
        Tag::Img => RenderRole::AltText,
        _ if LABEL_CLASSES.iter().any(|class| element.has_class(class)) => RenderRole::Text,
        _ if element.children().is_empty() => RenderRole::Text,
        _ if !element
            .children()
            .iter()
            .any(|child| carries_locale_text(page, *child)) =>
        {
            RenderRole::Text
        }
        _ => RenderRole::Untouched,
    }
}

/// The active locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageState {
    pub active: Locale,
}

/// Announcement that the active locale was (re)applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleChanged {
    pub previous: Locale,
    pub current: Locale,
}

/// Something that re-renders itself when the locale changes.
pub trait LocaleObserver {
    fn locale_changed(&mut self, page: &mut Page, locale: Locale);
}

pub struct LocalizationEngine {
    state: LanguageState,
    default_locale: Locale,
    storage_key: String,
    store: Box<dyn PreferenceStore>,
    table: TranslationTable,
    switches: Vec<(ElementId, Locale)>,
}

impl LocalizationEngine {
    /// Scan the page for translatable elements and locale switch controls.
    ///
    /// The engine starts at `default_locale`; call [`initialize`](Self::initialize)
    /// once to restore or negotiate the real one.
    pub fn setup(
        page: &Page,
        store: Box<dyn PreferenceStore>,
        storage_key: &str,
        default_locale: Locale,
    ) -> Self {
        let table = TranslationTable::build(page);

        let switches: Vec<(ElementId, Locale)> = page
            .find_by_class(LOCALE_SWITCH_CLASS)
            .into_iter()
            .filter_map(|id| {
                let code = page.get(id).attr("data-lang")?;
                match Locale::from_code(code) {
                    Ok(locale) => Some((id, locale)),
                    Err(e) => {
                        warn!("Ignoring locale switch: {}", e);
                        None
                    }
                }
            })
            .collect();

        if switches.is_empty() {
            debug!("No locale switch controls on this page");
        }
        info!(
            "Localization set up: {} translatable elements, {} switches",
            table.len(),
            switches.len()
        );

        Self {
            state: LanguageState {
                active: default_locale,
            },
            default_locale,
            storage_key: storage_key.to_string(),
            store,
            table,
            switches,
        }
    }

    /// Pick the starting locale: stored preference, then the user agent's
    /// preferred language, then the configured default.
    pub fn initialize(&mut self, page: &mut Page, browser_language: Option<&str>) -> LocaleChanged {
        let stored = match self.store.load(&self.storage_key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read stored locale: {:#}", e);
                None
            }
        };

        let from_store = stored.and_then(|code| match Locale::from_code(&code) {
            Ok(locale) => Some(locale),
            Err(e) => {
                warn!("Ignoring stored locale: {}", e);
                None
            }
        });

        let locale = if let Some(locale) = from_store {
            debug!("Restoring stored locale {}", locale);
            locale
        } else if let Some(locale) = browser_language.and_then(Locale::negotiate) {
            debug!("Negotiated locale {} from browser preference", locale);
            locale
        } else {
            debug!("Falling back to default locale {}", self.default_locale);
            self.default_locale
        };

        self.set_locale(page, locale)
    }

    /// Apply `locale` everywhere. Re-applying the active locale re-renders
    /// idempotently.
    pub fn set_locale(&mut self, page: &mut Page, locale: Locale) -> LocaleChanged {
        let previous = self.state.active;
        self.state.active = locale;

        if let Err(e) = self.store.save(&self.storage_key, locale.code()) {
            warn!("Failed to persist locale {}: {:#}", locale, e);
        }

        page.set_lang(locale.code(), locale.direction());
        let root = page.root();
        page.toggle_class(root, RTL_LAYOUT_CLASS, locale.is_rtl());

        for (id, switch_locale) in &self.switches {
            let selected = *switch_locale == locale;
            page.toggle_class(*id, "active", selected);
            page.set_attr(*id, "aria-pressed", if selected { "true" } else { "false" });
            page.set_attr(*id, "aria-label", switch_locale.config().native_name);
        }

        self.render(page);

        info!("Locale set to {} ({})", locale, locale.config().name);
        LocaleChanged {
            previous,
            current: locale,
        }
    }

    /// Write the active locale's string into every translatable element.
    pub fn render(&self, page: &mut Page) {
        let locale = self.state.active;

        for entry in &self.table.entries {
            if !page.get(entry.element).is_attached() || entry.role == RenderRole::Untouched {
                continue;
            }
            let Some(text) = entry.text.resolve(locale) else {
                continue;
            };

            match entry.role {
                RenderRole::Placeholder => page.set_attr(entry.element, "placeholder", text),
                RenderRole::AltText => page.set_attr(entry.element, "alt", text),
                RenderRole::Text => page.set_text_content(entry.element, text),
                RenderRole::Untouched => {}
            }
        }
    }

    pub fn active(&self) -> Locale {
        self.state.active
    }

    pub fn state(&self) -> LanguageState {
        self.state
    }

    /// The locale selected by `id`, if it is one of this page's switch controls.
    pub fn switch_locale(&self, id: ElementId) -> Option<Locale> {
        self.switches
            .iter()
            .find(|(switch, _)| *switch == id)
            .map(|(_, locale)| *locale)
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }
}
