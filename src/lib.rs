//! Rafe Global brochure site: bilingual rendering and the equipment rental
//! inquiry dialog.
//!
//! The page is a typed document model ([`page::Page`]); [`site::Site`] mounts
//! the features on it and routes user events to them.

pub mod catalog;
pub mod chat_button;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod error;
pub mod gallery;
pub mod i18n;
pub mod links;
pub mod localization;
pub mod modal;
pub mod notice;
pub mod page;
pub mod site;
pub mod storage;
