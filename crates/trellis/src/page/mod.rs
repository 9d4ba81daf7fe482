//! Pagination and page navigation.
//!
//! [`Paginator`] partitions the item sequence into fixed-capacity pages and
//! answers position queries in scroll coordinates. [`PageNavigator`] owns
//! the current page index and animates the scroll offset between page
//! anchors in response to explicit requests, wheel steps, and drag
//! gestures. Both are pure state machines driven by the host: the paginator
//! is fed plans from the layout pass, the navigator timestamps from the
//! frame clock.

mod navigator;
mod paginator;

pub use navigator::{Navigation, PageNavigator};
pub use paginator::{Paginator, PagesChanged};
