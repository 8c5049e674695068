//! The rentable equipment catalog.
//!
//! Built once from a literal table and read-only thereafter. Ids are the keys
//! page templates put on rent controls (`data-equipment-id`), so they are kept
//! as strings: "3" and 3 name the same record.

use crate::error::SiteError;
use crate::i18n::{Locale, LocalizedText};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Catalog key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentId(String);

impl EquipmentId {
    /// Normalize a raw attribute value; `None` if it is blank.
    pub fn parse(raw: &str) -> Option<EquipmentId> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| EquipmentId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_from_integer {
    ($($int:ty),*) => {
        $(
            impl From<$int> for EquipmentId {
                fn from(id: $int) -> Self {
                    EquipmentId(id.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(u16, u32, u64, usize, i32, i64);

impl From<&str> for EquipmentId {
    fn from(id: &str) -> Self {
        EquipmentId(id.trim().to_string())
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Equipment category, matching the gallery's `data-category` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Heavy,
    Access,
    Material,
    Lighting,
}

impl Category {
    pub fn from_tag(tag: &str) -> Option<Category> {
        match tag.trim() {
            "heavy" => Some(Category::Heavy),
            "access" => Some(Category::Access),
            "material" => Some(Category::Material),
            "lighting" => Some(Category::Lighting),
            _ => None,
        }
    }
}

/// Category filter selected by the gallery filter buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a `data-filter` value ("all" or a category tag).
    pub fn from_tag(tag: &str) -> Option<CategoryFilter> {
        match tag.trim() {
            "all" => Some(CategoryFilter::All),
            other => Category::from_tag(other).map(CategoryFilter::Only),
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: EquipmentId,
    pub display_name: LocalizedText,
    pub category: Category,
}

impl EquipmentRecord {
    pub fn new(id: impl Into<EquipmentId>, en: &str, ar: &str, category: Category) -> Self {
        Self {
            id: id.into(),
            display_name: LocalizedText::new(ar, en),
            category,
        }
    }
}

/// Immutable table of equipment records keyed by id.
#[derive(Debug, Clone)]
pub struct EquipmentCatalog {
    records: Vec<EquipmentRecord>,
    index: HashMap<EquipmentId, usize>,
    default_locale: Locale,
}

static BUILTIN: OnceLock<EquipmentCatalog> = OnceLock::new();

impl EquipmentCatalog {
    /// Build a catalog, enforcing unique ids and complete display names.
    pub fn new(records: Vec<EquipmentRecord>, default_locale: Locale) -> Result<Self, SiteError> {
        let mut index = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            if !record.display_name.is_complete() {
                return Err(SiteError::InvalidCatalog(format!(
                    "equipment {} is missing a display name in some locale",
                    record.id
                )));
            }
            if index.insert(record.id.clone(), position).is_some() {
                return Err(SiteError::InvalidCatalog(format!(
                    "duplicate equipment id {}",
                    record.id
                )));
            }
        }

        Ok(Self {
            records,
            index,
            default_locale,
        })
    }

    /// The site's equipment table.
    pub fn builtin() -> &'static EquipmentCatalog {
        BUILTIN.get_or_init(|| {
            EquipmentCatalog::new(builtin_records(), Locale::En)
                .unwrap_or_else(|e| unreachable!("builtin catalog is invalid: {}", e))
        })
    }

    pub fn get(&self, id: &EquipmentId) -> Option<&EquipmentRecord> {
        self.index.get(id).map(|position| &self.records[*position])
    }

    pub fn contains(&self, id: &EquipmentId) -> bool {
        self.index.contains_key(id)
    }

    /// Display name of `id` in `locale`, falling back to the catalog's default
    /// locale when that name is blank.
    pub fn display_name(&self, id: &EquipmentId, locale: Locale) -> Option<&str> {
        let record = self.get(id)?;
        let name = record.display_name.get(locale);
        if name.trim().is_empty() {
            Some(record.display_name.get(self.default_locale))
        } else {
            Some(name)
        }
    }

    /// Records in table order.
    pub fn records(&self) -> &[EquipmentRecord] {
        &self.records
    }

    /// Records passing `filter`, in table order.
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&EquipmentRecord> {
        self.records
            .iter()
            .filter(|record| filter.matches(record.category))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }
}

fn builtin_records() -> Vec<EquipmentRecord> {
    use Category::*;

    vec![
        EquipmentRecord::new(1, "Bobcat Loaders", "بوبكات لودر", Heavy),
        EquipmentRecord::new(2, "Scissor Lifts", "منصات رفع مقصية", Access),
        EquipmentRecord::new(3, "Mobile Cranes", "كرينات متنقلة", Heavy),
        EquipmentRecord::new(4, "Forklifts", "رافعات شوكية", Material),
        EquipmentRecord::new(5, "Telescopic Forklifts", "رافعات شوكية تلسكوبية", Material),
        EquipmentRecord::new(6, "Man Lifts", "رافعات أشخاص", Access),
        EquipmentRecord::new(7, "Light Towers", "أبراج إضاءة", Lighting),
        EquipmentRecord::new(8, "Industrial Forklifts", "رافعات شوكية صناعية", Heavy),
        EquipmentRecord::new(9, "Boom Lifts", "رافعات ذراعية", Access),
        EquipmentRecord::new(10, "Backhoe Loader (JCB)", "حفار خلفي (JCB)", Heavy),
        EquipmentRecord::new(11, "Telehandler", "تيلي هاندلر", Heavy),
    ]
}
