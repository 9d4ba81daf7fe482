//! Core systems for Trellis.
//!
//! This crate provides the foundational components of the Trellis grid engine:
//!
//! - **Signal/Slot System**: Type-safe change notification between components
//! - **Property System**: Reactive values with change detection
//! - **Tick Queue**: Deferred, coalesced work driven by the host's frame loop
//!
//! # Signal/Slot Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use trellis_core::{Property, Signal};
//!
//! // A reactive counter with change notification
//! struct Counter {
//!     value: Property<i32>,
//!     value_changed: Signal<i32>,
//! }
//!
//! impl Counter {
//!     fn new() -> Self {
//!         Self {
//!             value: Property::new(0),
//!             value_changed: Signal::new(),
//!         }
//!     }
//!
//!     fn increment(&self) {
//!         let new_value = self.value.get() + 1;
//!         if self.value.set(new_value) {
//!             self.value_changed.emit(new_value);
//!         }
//!     }
//! }
//! ```
//!
//! # Tick Queue Example
//!
//! ```
//! use trellis_core::TickQueue;
//!
//! let mut ticks = TickQueue::new();
//! let repaginate = ticks.register(|| {
//!     // rebuild page ranges here
//! });
//!
//! // Many invalidations, one execution on the next frame.
//! ticks.schedule(repaginate).unwrap();
//! ticks.schedule(repaginate).unwrap();
//! assert_eq!(ticks.run_pending(), 1);
//! ```

mod error;
pub mod logging;
pub mod property;
mod scheduler;
pub mod signal;

pub use error::{CoreError, Result, SchedulerError, SignalError};
pub use logging::PerfSpan;
pub use property::{Property, ReadOnlyProperty};
pub use scheduler::{TickQueue, TickTaskId};
pub use signal::{ConnectionGuard, ConnectionId, Signal, Subscriptions};
