//! Trellis - a host-agnostic icon grid engine.
//!
//! Trellis computes everything a paged application grid needs short of
//! drawing it: responsive item sizing, column/row fitting, pagination,
//! animated page navigation with drag gestures, and a locale-collated item
//! catalog. The host (a compositor shell, a windowing toolkit, a TUI) owns
//! the scene graph and the clock; Trellis owns the math and the state
//! machines, and returns plain data the host applies.
//!
//! # Example
//!
//! ```
//! use trellis::{CatalogItem, GridConfig, GridView, NameCollator};
//!
//! struct App { id: String, name: String }
//!
//! impl CatalogItem for App {
//!     fn id(&self) -> &str { &self.id }
//!     fn display_name(&self) -> &str { &self.name }
//! }
//!
//! # fn main() -> trellis::Result<()> {
//! let mut view = GridView::with_collator(GridConfig::default(), NameCollator::with_locale("en-US"))?;
//! view.add_item(App { id: "files".into(), name: "Files".into() });
//! view.add_item(App { id: "term".into(), name: "Terminal".into() });
//! view.load_grid();
//!
//! // Called from the host's layout pass with the viewport size.
//! let plan = view.calculate_responsive_grid(500.0, 500.0);
//! assert!(plan.columns >= 4);
//! assert_eq!(view.n_pages(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`layout`] - column/row fitting and responsive item sizing
//! - [`page`] - pagination and the page-navigation state machine
//! - [`model`] - the deduplicated, collation-ordered item catalog
//! - [`animation`] - host-sampled transitions and easing curves
//! - [`view`] - the [`GridView`] facade a view controller drives
//! - [`overlay`] - the modal gate that suppresses navigation
//! - [`slider`] - the slider value model
//! - [`config`] - explicit configuration threaded through constructors

pub mod animation;
pub mod config;
mod error;
pub mod layout;
pub mod model;
pub mod overlay;
pub mod page;
pub mod slider;
pub mod types;
pub mod view;

pub use config::GridConfig;
pub use error::{Error, Result};
pub use layout::{AdaptiveSizer, GridGeometry, GridPlan, Padding, plan_grid};
pub use model::{Catalog, CatalogItem, NameCollator};
pub use overlay::{OverlayGate, OverlayHold};
pub use page::{Navigation, PageNavigator, Paginator, PagesChanged};
pub use slider::SliderModel;
pub use types::{Point, Rect, Size};
pub use view::{GridView, OverlayClearance};
