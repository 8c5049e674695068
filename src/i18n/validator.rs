//! Consistency checks between page markup, the catalog and the templates.
//!
//! Nothing here blocks page setup; the bootstrap logs the report so template
//! authors can fix the markup.

use crate::catalog::{EquipmentCatalog, EquipmentId};
use crate::i18n::strings::placeholder_regex;
use crate::i18n::{Locale, LocaleStrings};
use crate::page::Page;
use std::collections::BTreeSet;

/// Validation report containing errors and warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that break a feature (e.g. a rent control that cannot open)
    pub errors: Vec<String>,

    /// Content that renders, but probably not as intended
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MarkupValidator;


impl MarkupValidator {
    /// Check the page against the catalog and the localized templates.
    pub fn validate(page: &Page, catalog: &EquipmentCatalog) -> ValidationReport {
        let mut report = ValidationReport::new();
        Self::check_rent_controls(page, catalog, &mut report);
        Self::check_locale_pairs(page, &mut report);
        Self::check_templates(&mut report);
        report
    }

    fn check_rent_controls(page: &Page, catalog: &EquipmentCatalog, report: &mut ValidationReport) {
        for id in page.find_by_class("rent-now") {
            let element = page.get(id);
            match element.attr("data-equipment-id").and_then(EquipmentId::parse) {
                Some(equipment) if !catalog.contains(&equipment) => report.errors.push(format!(
                    "Rent control references unknown equipment id {}",
                    equipment
                )),
                Some(_) => {}
                None => report
                    .warnings
                    .push("Rent control without data-equipment-id".to_string()),
            }
        }
    }

    fn check_locale_pairs(page: &Page, report: &mut ValidationReport) {
        for id in page.all() {
            let element = page.get(id);
            let en = element.attr("data-en");
            let ar = element.attr("data-ar");
            let label = element
                .dom_id
                .as_deref()
                .map(|dom_id| format!("#{}", dom_id))
                .unwrap_or_else(|| format!("<{:?}>", element.tag).to_lowercase());

            match (en, ar) {
                (Some(en), Some(ar)) if en.trim().is_empty() && ar.trim().is_empty() => report
                    .warnings
                    .push(format!("{} has blank text in both locales", label)),
                (Some(_), None) => report
                    .warnings
                    .push(format!("{} has data-en but no data-ar", label)),
                (None, Some(_)) => report
                    .warnings
                    .push(format!("{} has data-ar but no data-en", label)),
                _ => {}
            }
        }
    }

    fn check_templates(report: &mut ValidationReport) {
        let english = LocaleStrings::for_locale(Locale::En).templates();
        let arabic = LocaleStrings::for_locale(Locale::Ar).templates();

        for ((field, en), (_, ar)) in english.iter().zip(arabic.iter()) {
            let en_placeholders = Self::extract_placeholders(en);
            let ar_placeholders = Self::extract_placeholders(ar);
            if en_placeholders != ar_placeholders {
                report.errors.push(format!(
                    "Template {} placeholder mismatch: en has {:?}, ar has {:?}",
                    field, en_placeholders, ar_placeholders
                ));
            }
        }
    }

    /// Extract `{placeholder}` names from a template.
    pub fn extract_placeholders(text: &str) -> BTreeSet<String> {
        placeholder_regex()
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}
