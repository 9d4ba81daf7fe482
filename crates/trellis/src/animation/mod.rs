//! Scroll and page-switch animation primitives.
//!
//! The engine never sleeps or owns a clock; a [`Transition`] is a value that
//! the host samples with its own frame timestamps. This keeps animation math
//! deterministic and testable with synthetic instants.

mod easing;
mod transition;

pub use easing::{Easing, lerp_eased};
pub use transition::Transition;
