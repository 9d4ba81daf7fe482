//! Event-driven device reconciliation.
//!
//! [`DeviceReconciler`] keeps the authoritative device set in sync with an
//! async source of [`DeviceEvent`]s (a system bus listener, the
//! [`SystemLink`](crate::SystemLink) bridge, or a test). Events for unknown
//! devices are logged and dropped rather than trusted; the source and the
//! reconciler may briefly disagree while notifications are in flight.
//!
//! # Example
//!
//! ```
//! use trellis_net::{DeviceEvent, DeviceKind, DeviceReconciler, DeviceState};
//!
//! let reconciler = DeviceReconciler::new();
//!
//! reconciler.primary_changed.connect(|primary| {
//!     match primary {
//!         Some(device) => println!("primary is now {}", device.name),
//!         None => println!("offline"),
//!     }
//! });
//!
//! reconciler.apply(DeviceEvent::Added {
//!     id: "eth0".into(),
//!     name: "Ethernet".into(),
//!     kind: DeviceKind::Wired,
//! });
//! reconciler.apply(DeviceEvent::StateChanged {
//!     id: "eth0".into(),
//!     state: DeviceState::Connected,
//! });
//! assert_eq!(reconciler.primary().unwrap().id, "eth0");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::Signal;

use crate::device::{ConnectionProfile, DeviceKind, DeviceRecord, DeviceState};

/// A change reported by the system about one device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// A device appeared.
    Added {
        /// Stable unique identifier.
        id: String,
        /// Display name.
        name: String,
        /// What kind of device it is.
        kind: DeviceKind,
    },
    /// A device disappeared.
    Removed {
        /// Identifier of the removed device.
        id: String,
    },
    /// A device's connectivity state changed.
    StateChanged {
        /// Identifier of the device.
        id: String,
        /// The new state.
        state: DeviceState,
    },
    /// A device's signal strength changed.
    StrengthChanged {
        /// Identifier of the device.
        id: String,
        /// New strength 0-100, or `None` when unknown.
        strength: Option<u8>,
    },
    /// A connection profile was added to or updated on a device.
    ConnectionUpserted {
        /// Identifier of the owning device.
        id: String,
        /// The profile as the system now reports it.
        profile: ConnectionProfile,
    },
    /// A connection profile was deleted from a device.
    ConnectionRemoved {
        /// Identifier of the owning device.
        id: String,
        /// Identifier of the removed profile.
        connection_id: String,
    },
    /// A device's active connection changed.
    ActiveChanged {
        /// Identifier of the device.
        id: String,
        /// The now-active profile, or `None` on deactivation.
        connection_id: Option<String>,
    },
}

impl DeviceEvent {
    /// The device this event concerns.
    pub fn device_id(&self) -> &str {
        match self {
            DeviceEvent::Added { id, .. }
            | DeviceEvent::Removed { id }
            | DeviceEvent::StateChanged { id, .. }
            | DeviceEvent::StrengthChanged { id, .. }
            | DeviceEvent::ConnectionUpserted { id, .. }
            | DeviceEvent::ConnectionRemoved { id, .. }
            | DeviceEvent::ActiveChanged { id, .. } => id,
        }
    }
}

/// Maintains the device set and derives the primary device.
///
/// All state sits behind one lock; signals are emitted after the lock is
/// released so slots may query the reconciler re-entrantly.
pub struct DeviceReconciler {
    /// Emitted with the new record when a device appears.
    pub device_added: Arc<Signal<DeviceRecord>>,

    /// Emitted with the device id when a device disappears.
    pub device_removed: Arc<Signal<String>>,

    /// Emitted with the updated record after any in-place change.
    pub device_changed: Arc<Signal<DeviceRecord>>,

    /// Emitted when a different device (or none) becomes primary.
    pub primary_changed: Arc<Signal<Option<DeviceRecord>>>,

    inner: Mutex<ReconcilerInner>,
}

#[derive(Default)]
struct ReconcilerInner {
    /// Devices by id; BTreeMap keeps snapshots in a stable order.
    devices: BTreeMap<String, DeviceRecord>,
    /// Id of the current primary device.
    primary: Option<String>,
}

/// Signals to fire once the state lock is released.
enum Outcome {
    Ignored,
    Added(DeviceRecord),
    Removed(String),
    Changed(DeviceRecord),
}

impl DeviceReconciler {
    /// Create a reconciler with no devices.
    pub fn new() -> Self {
        Self {
            device_added: Arc::new(Signal::new()),
            device_removed: Arc::new(Signal::new()),
            device_changed: Arc::new(Signal::new()),
            primary_changed: Arc::new(Signal::new()),
            inner: Mutex::new(ReconcilerInner::default()),
        }
    }

    /// Apply one event from the system, emitting the matching signals.
    ///
    /// Events that name an unknown device (or re-add a known one) are
    /// logged at warn level and otherwise ignored.
    pub fn apply(&self, event: DeviceEvent) {
        let (outcome, primary_update) = {
            let mut inner = self.inner.lock();
            let outcome = Self::apply_locked(&mut inner, event);
            let primary_update = Self::reselect_primary(&mut inner);
            (outcome, primary_update)
        };

        match outcome {
            Outcome::Ignored => {}
            Outcome::Added(record) => self.device_added.emit(record),
            Outcome::Removed(id) => self.device_removed.emit(id),
            Outcome::Changed(record) => self.device_changed.emit(record),
        }
        if let Some(primary) = primary_update {
            self.primary_changed.emit(primary);
        }
    }

    fn apply_locked(inner: &mut ReconcilerInner, event: DeviceEvent) -> Outcome {
        match event {
            DeviceEvent::Added { id, name, kind } => {
                if inner.devices.contains_key(&id) {
                    tracing::warn!(
                        target: "trellis_net::reconciler",
                        device = %id,
                        "ignoring add for already-known device"
                    );
                    return Outcome::Ignored;
                }
                let record = DeviceRecord::new(id.clone(), name, kind);
                inner.devices.insert(id, record.clone());
                tracing::debug!(
                    target: "trellis_net::reconciler",
                    device = %record.id,
                    kind = %record.kind,
                    "device added"
                );
                Outcome::Added(record)
            }
            DeviceEvent::Removed { id } => match inner.devices.remove(&id) {
                Some(_) => {
                    tracing::debug!(
                        target: "trellis_net::reconciler",
                        device = %id,
                        "device removed"
                    );
                    Outcome::Removed(id)
                }
                None => {
                    Self::warn_unknown(&id, "remove");
                    Outcome::Ignored
                }
            },
            DeviceEvent::StateChanged { id, state } => {
                Self::update(inner, &id, "state change", |device| {
                    device.state = state;
                })
            }
            DeviceEvent::StrengthChanged { id, strength } => {
                Self::update(inner, &id, "strength change", |device| {
                    device.set_strength(strength);
                })
            }
            DeviceEvent::ConnectionUpserted { id, profile } => {
                Self::update(inner, &id, "connection upsert", |device| {
                    device.upsert_connection(profile);
                })
            }
            DeviceEvent::ConnectionRemoved { id, connection_id } => {
                Self::update(inner, &id, "connection removal", |device| {
                    device.remove_connection(&connection_id);
                })
            }
            DeviceEvent::ActiveChanged { id, connection_id } => {
                Self::update(inner, &id, "active change", |device| {
                    device.set_active(connection_id);
                })
            }
        }
    }

    fn update(
        inner: &mut ReconcilerInner,
        id: &str,
        what: &'static str,
        mutate: impl FnOnce(&mut DeviceRecord),
    ) -> Outcome {
        match inner.devices.get_mut(id) {
            Some(device) => {
                mutate(device);
                Outcome::Changed(device.clone())
            }
            None => {
                Self::warn_unknown(id, what);
                Outcome::Ignored
            }
        }
    }

    fn warn_unknown(id: &str, what: &'static str) {
        tracing::warn!(
            target: "trellis_net::reconciler",
            device = %id,
            "ignoring {what} for unknown device"
        );
    }

    /// Re-derive the primary device; returns the new primary when it
    /// differs from the previous selection.
    fn reselect_primary(inner: &mut ReconcilerInner) -> Option<Option<DeviceRecord>> {
        let new_primary = inner
            .devices
            .values()
            .filter(|device| device.state.is_connected())
            .max_by(|a, b| {
                a.kind
                    .caps()
                    .precedence
                    .cmp(&b.kind.caps().precedence)
                    .then_with(|| a.strength.cmp(&b.strength))
                    // BTreeMap iterates ids ascending; prefer the smaller id
                    // on a full tie so the selection is deterministic.
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|device| device.id.clone());

        if new_primary == inner.primary {
            return None;
        }
        tracing::info!(
            target: "trellis_net::reconciler",
            primary = new_primary.as_deref().unwrap_or("<none>"),
            "primary device changed"
        );
        inner.primary = new_primary.clone();
        Some(new_primary.and_then(|id| inner.devices.get(&id).cloned()))
    }

    /// Snapshot of every device, ordered by id.
    pub fn snapshot(&self) -> Vec<DeviceRecord> {
        self.inner.lock().devices.values().cloned().collect()
    }

    /// Snapshot of one device by id.
    pub fn device(&self, id: &str) -> Option<DeviceRecord> {
        self.inner.lock().devices.get(id).cloned()
    }

    /// The connected device with the highest kind precedence, strength
    /// breaking ties.
    pub fn primary(&self) -> Option<DeviceRecord> {
        let inner = self.inner.lock();
        let id = inner.primary.as_ref()?;
        inner.devices.get(id).cloned()
    }

    /// Number of known devices.
    pub fn len(&self) -> usize {
        self.inner.lock().devices.len()
    }

    /// Whether no devices are known.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().devices.is_empty()
    }
}

impl Default for DeviceReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DeviceReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("DeviceReconciler")
            .field("devices", &inner.devices.len())
            .field("primary", &inner.primary)
            .finish()
    }
}

static_assertions::assert_impl_all!(DeviceReconciler: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn added(id: &str, kind: DeviceKind) -> DeviceEvent {
        DeviceEvent::Added {
            id: id.to_string(),
            name: id.to_string(),
            kind,
        }
    }

    fn connected(id: &str) -> DeviceEvent {
        DeviceEvent::StateChanged {
            id: id.to_string(),
            state: DeviceState::Connected,
        }
    }

    #[test]
    fn test_add_and_remove() {
        let reconciler = DeviceReconciler::new();
        reconciler.apply(added("eth0", DeviceKind::Wired));
        reconciler.apply(added("wlan0", DeviceKind::Wireless));
        assert_eq!(reconciler.len(), 2);

        reconciler.apply(DeviceEvent::Removed { id: "eth0".into() });
        assert_eq!(reconciler.len(), 1);
        assert!(reconciler.device("eth0").is_none());
        assert!(reconciler.device("wlan0").is_some());
    }

    #[test]
    fn test_duplicate_add_ignored() {
        let reconciler = DeviceReconciler::new();
        reconciler.apply(added("eth0", DeviceKind::Wired));
        reconciler.apply(connected("eth0"));
        reconciler.apply(added("eth0", DeviceKind::Wireless));

        let device = reconciler.device("eth0").unwrap();
        assert_eq!(device.kind, DeviceKind::Wired);
        assert_eq!(device.state, DeviceState::Connected); // not reset
    }

    #[test]
    fn test_unknown_device_event_ignored() {
        let reconciler = DeviceReconciler::new();
        reconciler.apply(connected("ghost"));
        reconciler.apply(DeviceEvent::Removed { id: "ghost".into() });
        assert!(reconciler.is_empty());
        assert!(reconciler.primary().is_none());
    }

    #[test]
    fn test_primary_follows_precedence() {
        let reconciler = DeviceReconciler::new();
        reconciler.apply(added("wlan0", DeviceKind::Wireless));
        reconciler.apply(added("eth0", DeviceKind::Wired));
        reconciler.apply(connected("wlan0"));
        assert_eq!(reconciler.primary().unwrap().id, "wlan0");

        // Wired outranks wireless once it connects.
        reconciler.apply(connected("eth0"));
        assert_eq!(reconciler.primary().unwrap().id, "eth0");

        reconciler.apply(DeviceEvent::StateChanged {
            id: "eth0".into(),
            state: DeviceState::Disconnected,
        });
        assert_eq!(reconciler.primary().unwrap().id, "wlan0");
    }

    #[test]
    fn test_primary_changed_signal() {
        let reconciler = DeviceReconciler::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        reconciler
            .primary_changed
            .connect(move |primary: &Option<DeviceRecord>| {
                seen_clone
                    .lock()
                    .push(primary.as_ref().map(|d| d.id.clone()));
            });

        reconciler.apply(added("wlan0", DeviceKind::Wireless));
        assert!(seen.lock().is_empty()); // not connected yet

        reconciler.apply(connected("wlan0"));
        reconciler.apply(connected("wlan0")); // no change, no signal
        reconciler.apply(DeviceEvent::Removed { id: "wlan0".into() });

        assert_eq!(*seen.lock(), vec![Some("wlan0".to_string()), None]);
    }

    #[test]
    fn test_strength_breaks_precedence_ties() {
        let reconciler = DeviceReconciler::new();
        reconciler.apply(added("wlan0", DeviceKind::Wireless));
        reconciler.apply(added("wlan1", DeviceKind::Wireless));
        reconciler.apply(connected("wlan0"));
        reconciler.apply(connected("wlan1"));
        reconciler.apply(DeviceEvent::StrengthChanged {
            id: "wlan0".into(),
            strength: Some(40),
        });
        reconciler.apply(DeviceEvent::StrengthChanged {
            id: "wlan1".into(),
            strength: Some(90),
        });

        assert_eq!(reconciler.primary().unwrap().id, "wlan1");
    }

    #[test]
    fn test_connection_events_flow_into_record() {
        let reconciler = DeviceReconciler::new();
        reconciler.apply(added("wlan0", DeviceKind::Wireless));
        reconciler.apply(DeviceEvent::ConnectionUpserted {
            id: "wlan0".into(),
            profile: ConnectionProfile::new("home", "Home"),
        });
        reconciler.apply(DeviceEvent::ConnectionUpserted {
            id: "wlan0".into(),
            profile: ConnectionProfile::new("cafe", "Cafe"),
        });
        reconciler.apply(DeviceEvent::ActiveChanged {
            id: "wlan0".into(),
            connection_id: Some("home".into()),
        });

        let device = reconciler.device("wlan0").unwrap();
        assert_eq!(device.connections().len(), 2);
        assert_eq!(device.best_connection().unwrap().id, "home");

        reconciler.apply(DeviceEvent::ConnectionRemoved {
            id: "wlan0".into(),
            connection_id: "home".into(),
        });
        let device = reconciler.device("wlan0").unwrap();
        assert_eq!(device.connections().len(), 1);
        assert!(device.active_connection().is_none());
    }

    #[test]
    fn test_device_changed_emits_updated_record() {
        let reconciler = DeviceReconciler::new();
        reconciler.apply(added("wwan0", DeviceKind::Modem));

        let states = Arc::new(Mutex::new(Vec::new()));
        let states_clone = states.clone();
        reconciler
            .device_changed
            .connect(move |device: &DeviceRecord| {
                states_clone.lock().push(device.state);
            });

        reconciler.apply(connected("wwan0"));
        assert_eq!(*states.lock(), vec![DeviceState::Connected]);
    }
}
