//! Page bootstrap and event routing.
//!
//! `Site` owns the page and every feature mounted on it. It is the interface
//! page templates talk to: clicks, key presses, locale selection and direct
//! open/close requests for the rental dialog all go through it.

use crate::catalog::{EquipmentCatalog, EquipmentId};
use crate::chat_button::ChatButton;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::SiteError;
use crate::gallery::GalleryFilter;
use crate::i18n::{Locale, MarkupValidator, ValidationReport};
use crate::localization::{LocaleObserver, LocalizationEngine};
use crate::modal::{InquiryModal, Key, OpenOutcome};
use crate::page::{ElementId, Page};
use crate::storage::{MemoryStore, PreferenceStore};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Run one feature's setup; a failure is logged and the feature skipped.
fn setup_feature<T>(name: &str, setup: impl FnOnce() -> Result<T, SiteError>) -> Option<T> {
    debug!("Setting up {}", name);
    match setup() {
        Ok(feature) => Some(feature),
        Err(e) => {
            error!("Failed to set up {}: {}", name, e);
            None
        }
    }
}

pub struct SiteBuilder {
    page: Page,
    config: Config,
    catalog: EquipmentCatalog,
    store: Box<dyn PreferenceStore>,
    clock: Rc<dyn Clock>,
    browser_language: Option<String>,
}

impl SiteBuilder {
    pub fn new(page: Page, config: Config) -> Self {
        Self {
            page,
            config,
            catalog: EquipmentCatalog::builtin().clone(),
            store: Box::new(MemoryStore::new()),
            clock: Rc::new(SystemClock),
            browser_language: None,
        }
    }

    pub fn with_catalog(mut self, catalog: EquipmentCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The user agent's preferred language tag (e.g. "ar-SA").
    pub fn with_browser_language(mut self, tag: &str) -> Self {
        self.browser_language = Some(tag.to_string());
        self
    }

    /// Mount every feature and apply the starting locale.
    pub fn bootstrap(self) -> Site {
        let SiteBuilder {
            mut page,
            config,
            catalog,
            store,
            clock,
            browser_language,
        } = self;

        info!("Initializing site");

        let validation = MarkupValidator::validate(&page, &catalog);
        for problem in &validation.errors {
            warn!("Markup error: {}", problem);
        }
        for problem in &validation.warnings {
            debug!("Markup warning: {}", problem);
        }

        let gallery = GalleryFilter::mount(&page, &catalog);

        let modal = setup_feature("rental modal", || {
            if catalog.is_empty() {
                return Err(SiteError::InvalidCatalog("no equipment to rent".into()));
            }
            Ok(InquiryModal::mount(
                &mut page,
                &config,
                catalog,
                config.default_locale,
            ))
        });

        let chat_button = setup_feature("chat button", || {
            Ok(ChatButton::mount(&mut page, &config, config.default_locale))
        });

        let localization = LocalizationEngine::setup(
            &page,
            store,
            &config.storage_key,
            config.default_locale,
        );

        let mut site = Site {
            page,
            config,
            clock,
            localization,
            modal,
            chat_button,
            gallery,
            validation,
        };

        let change = site
            .localization
            .initialize(&mut site.page, browser_language.as_deref());
        site.notify_locale(change.current);

        info!("Site initialized in {}", change.current);
        site
    }
}

pub struct Site {
    page: Page,
    config: Config,
    clock: Rc<dyn Clock>,
    localization: LocalizationEngine,
    modal: Option<InquiryModal>,
    chat_button: Option<ChatButton>,
    gallery: GalleryFilter,
    validation: ValidationReport,
}

impl Site {
    pub fn builder(page: Page, config: Config) -> SiteBuilder {
        SiteBuilder::new(page, config)
    }

    // ==================== Locale ====================

    /// Select `locale` and re-render every dependent feature.
    pub fn set_locale(&mut self, locale: Locale) {
        let change = self.localization.set_locale(&mut self.page, locale);
        self.notify_locale(change.current);
    }

    fn notify_locale(&mut self, locale: Locale) {
        if let Some(modal) = self.modal.as_mut() {
            modal.locale_changed(&mut self.page, locale);
        }
        if let Some(chat_button) = self.chat_button.as_mut() {
            chat_button.locale_changed(&mut self.page, locale);
        }
    }

    pub fn locale(&self) -> Locale {
        self.localization.active()
    }

    // ==================== Events ====================

    /// Route a click on `target`. Returns true if some feature handled it.
    pub fn click(&mut self, target: ElementId) -> bool {
        let now = self.clock.now();
        self.page.prune_notices(now);

        if let Some(locale) = self.localization.switch_locale(target) {
            self.set_locale(locale);
            return true;
        }

        if self.gallery.handle_click(&mut self.page, target) {
            return true;
        }

        self.log_equipment_view(target);

        if let Some(modal) = self.modal.as_mut() {
            if modal.handle_click(&mut self.page, target, now) {
                return true;
            }
        }

        self.chat_button
            .as_ref()
            .is_some_and(|chat_button| chat_button.handle_click(&self.page, target))
    }

    /// Route a key press. Returns true if some feature handled it.
    pub fn key(&mut self, key: Key) -> bool {
        self.modal
            .as_mut()
            .is_some_and(|modal| modal.handle_key(&mut self.page, key))
    }

    fn log_equipment_view(&self, target: ElementId) {
        let card = self
            .page
            .ancestors(target)
            .find(|id| self.page.has_class(*id, "equipment-card"));

        if let Some(card) = card {
            let equipment_id = self.page.get(card).attr("data-equipment-id").unwrap_or("");
            let name = self
                .page
                .find_in(card, "card-title")
                .map(|title| self.page.text_content(title))
                .unwrap_or_default();
            info!(
                target: "rafe_site::analytics",
                equipment_id, name = name.as_str(), "Equipment viewed"
            );
        }
    }

    // ==================== Rental Dialog ====================

    /// Open the rental dialog for `id` (not debounced).
    ///
    /// Returns `None` if the dialog feature failed to set up on this page.
    pub fn open_rental(&mut self, id: impl Into<EquipmentId>) -> Option<OpenOutcome> {
        let now = self.clock.now();
        let Some(modal) = self.modal.as_mut() else {
            warn!("Rental dialog is not available on this page");
            return None;
        };
        Some(modal.open(&mut self.page, &id.into(), now))
    }

    pub fn close_rental(&mut self) {
        if let Some(modal) = self.modal.as_mut() {
            modal.close(&mut self.page);
        }
    }

    // ==================== Accessors ====================

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn modal(&self) -> Option<&InquiryModal> {
        self.modal.as_ref()
    }

    pub fn chat_button(&self) -> Option<&ChatButton> {
        self.chat_button.as_ref()
    }

    pub fn gallery(&self) -> &GalleryFilter {
        &self.gallery
    }

    pub fn localization(&self) -> &LocalizationEngine {
        &self.localization
    }

    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Find an element by its DOM id.
    pub fn element(&self, dom_id: &str) -> Option<ElementId> {
        self.page.find_by_dom_id(dom_id)
    }
}
