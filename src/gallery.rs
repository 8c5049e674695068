//! Gallery category filter.
//!
//! Filter buttons carry `data-filter` ("all" or a category tag). Gallery items
//! carry `data-category`, or a `data-equipment-id` whose catalog record gives
//! the category. Clicking a button hides every item outside the selection.

use crate::catalog::{Category, CategoryFilter, EquipmentCatalog, EquipmentId};
use crate::page::{ElementId, Page};
use tracing::{debug, info, warn};

pub const FILTER_BUTTON_CLASS: &str = "filter-btn";
pub const GALLERY_ITEM_CLASS: &str = "gallery-item";
pub const HIDDEN_CLASS: &str = "hidden";

pub struct GalleryFilter {
    buttons: Vec<(ElementId, CategoryFilter)>,
    items: Vec<(ElementId, Option<Category>)>,
    active: CategoryFilter,
}

impl GalleryFilter {
    /// Register the page's filter buttons and gallery items.
    pub fn mount(page: &Page, catalog: &EquipmentCatalog) -> Self {
        let buttons: Vec<(ElementId, CategoryFilter)> = page
            .find_by_class(FILTER_BUTTON_CLASS)
            .into_iter()
            .filter_map(|id| {
                let tag = page.get(id).attr("data-filter").unwrap_or_default();
                let filter = CategoryFilter::from_tag(tag);
                if filter.is_none() {
                    warn!("Ignoring filter button with unknown filter '{}'", tag);
                }
                filter.map(|filter| (id, filter))
            })
            .collect();

        let items: Vec<(ElementId, Option<Category>)> = page
            .find_by_class(GALLERY_ITEM_CLASS)
            .into_iter()
            .map(|id| (id, item_category(page, id, catalog)))
            .collect();

        if buttons.is_empty() {
            debug!("No gallery filter on this page");
        } else {
            info!(
                "Gallery filter set up: {} buttons, {} items",
                buttons.len(),
                items.len()
            );
        }

        Self {
            buttons,
            items,
            active: CategoryFilter::All,
        }
    }

    /// Apply the filter of the button at `target`. Returns true if `target`
    /// is inside a filter button.
    pub fn handle_click(&mut self, page: &mut Page, target: ElementId) -> bool {
        let selected = page.ancestors(target).find_map(|id| {
            self.buttons
                .iter()
                .find(|(button, _)| *button == id)
                .map(|(_, filter)| *filter)
        });

        match selected {
            Some(filter) => {
                self.apply(page, filter);
                true
            }
            None => false,
        }
    }

    /// Show the items passing `filter` and hide the rest.
    pub fn apply(&mut self, page: &mut Page, filter: CategoryFilter) {
        for (button, button_filter) in &self.buttons {
            page.toggle_class(*button, "active", *button_filter == filter);
        }

        let mut shown = 0;
        for (item, category) in &self.items {
            let visible = match (filter, category) {
                (CategoryFilter::All, _) => true,
                (_, Some(category)) => filter.matches(*category),
                (_, None) => false,
            };
            page.toggle_class(*item, HIDDEN_CLASS, !visible);
            if visible {
                shown += 1;
            }
        }

        self.active = filter;
        debug!("Gallery filter {:?} shows {} of {} items", filter, shown, self.items.len());
    }

    pub fn active(&self) -> CategoryFilter {
        self.active
    }
}

fn item_category(page: &Page, id: ElementId, catalog: &EquipmentCatalog) -> Option<Category> {
    let element = page.get(id);
    if let Some(tag) = element.attr("data-category") {
        let category = Category::from_tag(tag);
        if category.is_none() {
            warn!("Gallery item has unknown category '{}'", tag);
        }
        return category;
    }

    let equipment = element.attr("data-equipment-id").and_then(EquipmentId::parse)?;
    catalog.get(&equipment).map(|record| record.category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::from_json(
            r#"{
                "tag": "body",
                "children": [
                    {"tag": "button", "id": "all", "class": "filter-btn active", "data-filter": "all"},
                    {"tag": "button", "id": "heavy", "class": "filter-btn", "data-filter": "heavy", "children": [
                        {"tag": "span", "id": "heavy-label", "text": "Heavy"}
                    ]},
                    {"tag": "button", "id": "lighting", "class": "filter-btn", "data-filter": "lighting"},
                    {"tag": "button", "id": "boats", "class": "filter-btn", "data-filter": "boats"},
                    {"tag": "div", "id": "crane", "class": "gallery-item", "data-category": "heavy"},
                    {"tag": "div", "id": "tower", "class": "gallery-item", "data-equipment-id": "7"},
                    {"tag": "div", "id": "mystery", "class": "gallery-item"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn by_id(page: &Page, dom_id: &str) -> ElementId {
        page.find_by_dom_id(dom_id).unwrap()
    }

    fn hidden(page: &Page, dom_id: &str) -> bool {
        page.has_class(by_id(page, dom_id), HIDDEN_CLASS)
    }

    // ==================== Mount Tests ====================

    #[test]
    fn test_unknown_filter_button_is_ignored() {
        let mut page = page();
        let mut gallery = GalleryFilter::mount(&page, EquipmentCatalog::builtin());
        let boats = by_id(&page, "boats");
        assert!(!gallery.handle_click(&mut page, boats));
        assert_eq!(gallery.active(), CategoryFilter::All);
    }

    // ==================== Filter Tests ====================

    #[test]
    fn test_filter_by_data_category() {
        let mut page = page();
        let mut gallery = GalleryFilter::mount(&page, EquipmentCatalog::builtin());
        let label = by_id(&page, "heavy-label");

        assert!(gallery.handle_click(&mut page, label));

        assert_eq!(gallery.active(), CategoryFilter::Only(Category::Heavy));
        assert!(!hidden(&page, "crane"));
        assert!(hidden(&page, "tower"));
        assert!(hidden(&page, "mystery"));
        assert!(page.has_class(by_id(&page, "heavy"), "active"));
        assert!(!page.has_class(by_id(&page, "all"), "active"));
    }

    #[test]
    fn test_filter_uses_catalog_category() {
        let mut page = page();
        let mut gallery = GalleryFilter::mount(&page, EquipmentCatalog::builtin());
        let lighting = by_id(&page, "lighting");

        gallery.handle_click(&mut page, lighting);

        // Equipment 7 is the light towers
        assert!(!hidden(&page, "tower"));
        assert!(hidden(&page, "crane"));
    }

    #[test]
    fn test_all_shows_everything() {
        let mut page = page();
        let mut gallery = GalleryFilter::mount(&page, EquipmentCatalog::builtin());
        let heavy = by_id(&page, "heavy");
        let all = by_id(&page, "all");

        gallery.handle_click(&mut page, heavy);
        gallery.handle_click(&mut page, all);

        assert!(!hidden(&page, "crane"));
        assert!(!hidden(&page, "tower"));
        assert!(!hidden(&page, "mystery"));
    }

    #[test]
    fn test_click_outside_buttons_is_ignored() {
        let mut page = page();
        let mut gallery = GalleryFilter::mount(&page, EquipmentCatalog::builtin());
        let crane = by_id(&page, "crane");
        assert!(!gallery.handle_click(&mut page, crane));
    }
}
