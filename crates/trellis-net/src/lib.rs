//! Network device reconciliation for Trellis.
//!
//! This crate maintains the device model behind a network status indicator:
//! a flat set of [`DeviceRecord`]s tagged by [`DeviceKind`], each owning a
//! name-sorted connection list and a derived best connection, kept in sync
//! with async system notifications by the [`DeviceReconciler`].
//!
//! Kind-specific behavior (signal strength, autoconnect, primary-device
//! precedence) is a static [`DeviceCaps`] table looked up per kind; there
//! is no device class hierarchy to subclass.
//!
//! # Event-driven reconciliation
//!
//! ```
//! use trellis_net::{
//!     ConnectionProfile, DeviceEvent, DeviceKind, DeviceReconciler, DeviceState,
//! };
//!
//! let reconciler = DeviceReconciler::new();
//!
//! reconciler.apply(DeviceEvent::Added {
//!     id: "wlan0".into(),
//!     name: "Wi-Fi".into(),
//!     kind: DeviceKind::Wireless,
//! });
//! reconciler.apply(DeviceEvent::ConnectionUpserted {
//!     id: "wlan0".into(),
//!     profile: ConnectionProfile::new("home", "Home"),
//! });
//! reconciler.apply(DeviceEvent::StateChanged {
//!     id: "wlan0".into(),
//!     state: DeviceState::Connected,
//! });
//!
//! let primary = reconciler.primary().unwrap();
//! assert_eq!(primary.id, "wlan0");
//! assert_eq!(primary.best_connection().unwrap().name, "Home");
//! ```
//!
//! # Live sourcing
//!
//! [`SystemLink`] optionally feeds a reconciler from the operating system's
//! interface table and change notifications:
//!
//! ```no_run
//! use std::sync::Arc;
//! use trellis_net::{DeviceReconciler, SystemLink};
//!
//! # fn main() -> trellis_net::Result<()> {
//! let reconciler = Arc::new(DeviceReconciler::new());
//! let link = SystemLink::new(Arc::clone(&reconciler));
//! link.start()?;
//! # Ok(())
//! # }
//! ```

mod device;
mod error;
mod monitor;
mod reconciler;

pub use device::{ConnectionProfile, DeviceCaps, DeviceKind, DeviceRecord, DeviceState};
pub use error::{NetError, Result};
pub use monitor::{SystemLink, classify_interface};
pub use reconciler::{DeviceEvent, DeviceReconciler};
