//! Core types for finfo-tui.
//!
//! This crate holds the synchronous half of the session: the items being
//! browsed, the catalog that orders, paginates and selects them, and the
//! configuration shared by the other crates.

mod catalog;
mod config;
mod error;
mod item;

pub use catalog::{scan_directory, stat_arguments, Catalog, ListSource, DEFAULT_PAGE_SIZE};
pub use config::{Detail, SessionConfig, SessionConfigBuilder};
pub use error::CatalogError;
pub use item::Item;
