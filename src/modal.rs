//! Equipment inquiry modal.
//!
//! One shared dialog per page. Opening it for an equipment id resolves the
//! localized name, composes the chat and email deep links, writes them into the
//! dialog's slots, locks background scrolling and traps keyboard focus inside
//! the dialog until it closes.
//!
//! ```text
//! CLOSED --open(id)--> OPEN --close / backdrop / Escape--> CLOSED
//!                      OPEN --open(id) / locale change--> OPEN (content refreshed)
//! ```

use crate::catalog::{EquipmentCatalog, EquipmentId};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::i18n::{Locale, LocaleStrings};
use crate::links::InquiryLinks;
use crate::localization::LocaleObserver;
use crate::notice::{Notice, NoticeKind};
use crate::page::{ElementId, Markup, Page, Tag};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub const MODAL_DOM_ID: &str = "rentalModal";
pub const NAME_SLOT_DOM_ID: &str = "rentalEquipmentName";
pub const CONTENT_CLASS: &str = "modal-content";
pub const CLOSE_CLASS: &str = "modal-close";
pub const CHAT_LINK_CLASS: &str = "whatsapp-main";
pub const EMAIL_LINK_CLASS: &str = "email-btn";
pub const RENT_CONTROL_CLASS: &str = "rent-now";
pub const BODY_OPEN_CLASS: &str = "modal-open";

/// Keys the dialog reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    ShiftTab,
    Other,
}

/// The three ways a user can dismiss the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTrigger {
    CloseControl,
    Backdrop,
    CancelKey,
}

/// Everything shown while the dialog is open for one equipment item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryContext {
    pub equipment_id: EquipmentId,
    pub locale: Locale,
    pub resolved_name: String,
    pub links: InquiryLinks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open(InquiryContext),
}

/// Result of an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    /// Unknown id; a notice was shown and nothing else changed
    NotFound,
    /// Dropped by the click debounce window
    Debounced,
}

/// A rent control registered at mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RentControl {
    element: ElementId,
    equipment: Option<EquipmentId>,
}

/// Element handles inside the dialog.
#[derive(Debug, Clone)]
struct DialogSlots {
    root: ElementId,
    name: Option<ElementId>,
    chat: Option<ElementId>,
    email: Option<ElementId>,
    close: Vec<ElementId>,
}

impl DialogSlots {
    fn locate(page: &Page, root: ElementId) -> Self {
        let name = page
            .find_by_dom_id(NAME_SLOT_DOM_ID)
            .filter(|id| page.contains(root, *id));
        let chat = page.find_in(root, CHAT_LINK_CLASS);
        let email = page.find_in(root, EMAIL_LINK_CLASS);
        let close: Vec<ElementId> = page
            .find_by_class(CLOSE_CLASS)
            .into_iter()
            .filter(|id| page.contains(root, *id))
            .collect();

        if name.is_none() {
            warn!("Rental modal has no #{} slot", NAME_SLOT_DOM_ID);
        }
        if chat.is_none() {
            warn!("Rental modal has no .{} link", CHAT_LINK_CLASS);
        }
        if email.is_none() {
            warn!("Rental modal has no .{} link", EMAIL_LINK_CLASS);
        }

        Self {
            root,
            name,
            chat,
            email,
            close,
        }
    }
}

pub struct InquiryModal {
    config: Config,
    catalog: EquipmentCatalog,
    locale: Locale,
    slots: DialogSlots,
    /// The dialog was built here, so its link labels are ours to localize
    owns_labels: bool,
    rent_controls: Vec<RentControl>,
    state: ModalState,
    debouncer: Debouncer,
    computations: u64,
}

impl InquiryModal {
    /// Attach to the page's `#rentalModal`, building a minimal one if absent,
    /// and register the page's rent controls.
    pub fn mount(page: &mut Page, config: &Config, catalog: EquipmentCatalog, locale: Locale) -> Self {
        let (root, owns_labels) = match page.find_by_dom_id(MODAL_DOM_ID) {
            Some(root) => (root, false),
            None => {
                info!("Rental modal not found on this page, building a fallback dialog");
                (build_fallback_dialog(page, locale), true)
            }
        };
        let slots = DialogSlots::locate(page, root);

        let rent_controls: Vec<RentControl> = page
            .find_by_class(RENT_CONTROL_CLASS)
            .into_iter()
            .map(|element| RentControl {
                element,
                equipment: page
                    .get(element)
                    .attr("data-equipment-id")
                    .and_then(EquipmentId::parse),
            })
            .collect();

        info!("Rental modal set up with {} rent controls", rent_controls.len());

        Self {
            config: config.clone(),
            catalog,
            locale,
            slots,
            owns_labels,
            rent_controls,
            state: ModalState::Closed,
            debouncer: Debouncer::new(config.debounce_window()),
            computations: 0,
        }
    }

    // ==================== Open / Close ====================

    /// Open the dialog for `id`, or refresh it if already open.
    pub fn open(&mut self, page: &mut Page, id: &EquipmentId, now: DateTime<Utc>) -> OpenOutcome {
        debug!("Opening modal for equipment {}", id);

        let Some(context) = self.compute_context(id) else {
            warn!("Equipment id {} not found", id);
            page.notify(Notice::new(
                NoticeKind::EquipmentNotFound,
                self.locale,
                now,
                self.config.notice_ttl(),
            ));
            return OpenOutcome::NotFound;
        };

        self.apply(page, context);
        OpenOutcome::Opened
    }

    /// Debounced open, for clicks on rent controls.
    pub fn trigger(&mut self, page: &mut Page, id: &EquipmentId, now: DateTime<Utc>) -> OpenOutcome {
        if !self.debouncer.accept(now) {
            return OpenOutcome::Debounced;
        }
        self.open(page, id, now)
    }

    /// Hide the dialog, restore scrolling and release the focus trap.
    /// A no-op when already closed.
    pub fn close(&mut self, page: &mut Page) {
        if matches!(self.state, ModalState::Closed) {
            debug!("Modal already closed");
            return;
        }

        let root = self.slots.root;
        page.toggle_class(root, "active", false);
        page.set_attr(root, "aria-hidden", "true");
        let body = page.root();
        page.toggle_class(body, BODY_OPEN_CLASS, false);
        page.set_scroll_locked(false);

        if page.focused().is_some_and(|focused| page.contains(root, focused)) {
            page.blur();
        }

        self.state = ModalState::Closed;
        info!("Modal closed");
    }

    /// Every dismissal path lands here.
    pub fn dismiss(&mut self, page: &mut Page, trigger: DismissTrigger) {
        debug!("Modal dismissed via {:?}", trigger);
        self.close(page);
    }

    fn compute_context(&mut self, id: &EquipmentId) -> Option<InquiryContext> {
        let name = self.catalog.display_name(id, self.locale)?.to_string();
        let links = InquiryLinks::compose(&self.config, self.locale, &name, id);
        self.computations += 1;

        Some(InquiryContext {
            equipment_id: id.clone(),
            locale: self.locale,
            resolved_name: name,
            links,
        })
    }

    /// Write a fully computed context into the dialog and show it.
    fn apply(&mut self, page: &mut Page, context: InquiryContext) {
        if let Some(name) = self.slots.name {
            page.set_text_content(name, &context.resolved_name);
            page.set_attr(name, "data-equipment-id", context.equipment_id.as_str());
        }
        if let Some(chat) = self.slots.chat {
            page.set_attr(chat, "href", &context.links.chat);
        }
        if let Some(email) = self.slots.email {
            page.set_attr(email, "href", &context.links.email);
        }

        let was_closed = matches!(self.state, ModalState::Closed);
        if was_closed {
            let root = self.slots.root;
            page.toggle_class(root, "active", true);
            page.set_attr(root, "aria-hidden", "false");
            let body = page.root();
            page.toggle_class(body, BODY_OPEN_CLASS, true);
            page.set_scroll_locked(true);

            if let Some(first) = self.focusables(page).first() {
                page.focus(*first);
            }
        }

        info!("Modal showing {} ({})", context.resolved_name, context.equipment_id);
        self.state = ModalState::Open(context);
    }

    // ==================== Event Routing ====================

    /// Handle a click on `target`. Returns true if the modal consumed it.
    pub fn handle_click(&mut self, page: &mut Page, target: ElementId, now: DateTime<Utc>) -> bool {
        if let Some(control) = self.rent_control_for(page, target).cloned() {
            match control.equipment {
                Some(id) => {
                    debug!("Rent control clicked for equipment {}", id);
                    self.trigger(page, &id, now);
                }
                None => {
                    warn!("Rent control has no equipment id");
                    page.notify(Notice::new(
                        NoticeKind::ContactDirectly,
                        self.locale,
                        now,
                        self.config.notice_ttl(),
                    ));
                }
            }
            return true;
        }

        if !self.is_open() {
            return false;
        }

        let on_close_control = page
            .ancestors(target)
            .any(|id| self.slots.close.contains(&id));
        if on_close_control {
            self.dismiss(page, DismissTrigger::CloseControl);
            return true;
        }

        if target == self.slots.root {
            self.dismiss(page, DismissTrigger::Backdrop);
            return true;
        }

        false
    }

    /// Handle a key press. Returns true if the modal consumed it.
    pub fn handle_key(&mut self, page: &mut Page, key: Key) -> bool {
        if !self.is_open() {
            return false;
        }

        match key {
            Key::Escape => {
                self.dismiss(page, DismissTrigger::CancelKey);
                true
            }
            Key::Tab | Key::ShiftTab => {
                self.cycle_focus(page, key == Key::ShiftTab);
                true
            }
            Key::Other => false,
        }
    }

    /// Registered rent control at `target` or one of its ancestors.
    fn rent_control_for(&self, page: &Page, target: ElementId) -> Option<&RentControl> {
        page.ancestors(target).find_map(|id| {
            self.rent_controls
                .iter()
                .find(|control| control.element == id)
        })
    }

    // ==================== Focus Trap ====================

    fn focusables(&self, page: &Page) -> Vec<ElementId> {
        page.descendants(self.slots.root)
            .into_iter()
            .filter(|id| page.get(*id).tag.is_focusable())
            .collect()
    }

    fn cycle_focus(&self, page: &mut Page, backwards: bool) {
        let focusables = self.focusables(page);
        if focusables.is_empty() {
            return;
        }

        let current = page
            .focused()
            .and_then(|focused| focusables.iter().position(|id| *id == focused));
        let last = focusables.len() - 1;
        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => last,
            (Some(i), false) => if i == last { 0 } else { i + 1 },
            (Some(i), true) => if i == 0 { last } else { i - 1 },
        };
        page.focus(focusables[next]);
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn context(&self) -> Option<&InquiryContext> {
        match &self.state {
            ModalState::Open(context) => Some(context),
            ModalState::Closed => None,
        }
    }

    /// How many inquiry contexts have been computed so far.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    pub fn root(&self) -> ElementId {
        self.slots.root
    }
}

impl LocaleObserver for InquiryModal {
    fn locale_changed(&mut self, page: &mut Page, locale: Locale) {
        self.locale = locale;

        let strings = LocaleStrings::for_locale(locale);
        for close in self.slots.close.clone() {
            page.set_attr(close, "aria-label", strings.close_label);
        }
        if self.owns_labels {
            if let Some(chat) = self.slots.chat {
                page.set_text_content(chat, strings.chat_link_label);
            }
            if let Some(email) = self.slots.email {
                page.set_text_content(email, strings.email_link_label);
            }
        }

        let open_id = self.context().map(|context| context.equipment_id.clone());
        if let Some(id) = open_id {
            match self.compute_context(&id) {
                Some(context) => self.apply(page, context),
                None => warn!("Open equipment {} vanished from the catalog", id),
            }
        }
    }
}

fn build_fallback_dialog(page: &mut Page, locale: Locale) -> ElementId {
    let strings = LocaleStrings::for_locale(locale);
    let dialog = Markup::new(Tag::Div)
        .with_id(MODAL_DOM_ID)
        .with_class("modal")
        .with_attr("role", "dialog")
        .with_attr("aria-modal", "true")
        .with_attr("aria-hidden", "true")
        .with_child(
            Markup::new(Tag::Div)
                .with_class(CONTENT_CLASS)
                .with_child(
                    Markup::new(Tag::Button)
                        .with_class(CLOSE_CLASS)
                        .with_attr("aria-label", strings.close_label)
                        .with_text("×"),
                )
                .with_child(Markup::new(Tag::H3).with_id(NAME_SLOT_DOM_ID))
                .with_child(
                    Markup::new(Tag::A)
                        .with_class(CHAT_LINK_CLASS)
                        .with_attr("target", "_blank")
                        .with_attr("rel", "noopener noreferrer")
                        .with_text(strings.chat_link_label),
                )
                .with_child(
                    Markup::new(Tag::A)
                        .with_class(EMAIL_LINK_CLASS)
                        .with_text(strings.email_link_label),
                ),
        );

    let body = page.root();
    page.append(body, dialog)
}
