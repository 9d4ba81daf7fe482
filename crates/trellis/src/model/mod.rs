//! Item model for the grid.
//!
//! [`Catalog`] keeps the deduplicated item set and its materialized
//! display order; [`NameCollator`] supplies the locale-aware comparison
//! the order is built from. Items themselves stay host-defined behind the
//! [`CatalogItem`] trait, which only asks for an identifier and a display
//! name.

mod catalog;
mod collation;

pub use catalog::{Catalog, CatalogItem};
pub use collation::NameCollator;
