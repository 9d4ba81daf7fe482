//! Live system sourcing for the reconciler.
//!
//! [`SystemLink`] feeds a [`DeviceReconciler`] from the operating system:
//! an initial enumeration of interfaces, then change events from a
//! platform-native watcher. It is optional; hosts with their own device
//! source (a system bus listener, a test harness) apply events directly.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::device::{DeviceKind, DeviceState};
use crate::error::{NetError, Result};
use crate::reconciler::{DeviceEvent, DeviceReconciler};

/// Bridges platform interface watching into reconciler events.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use trellis_net::{DeviceReconciler, SystemLink};
///
/// # fn main() -> trellis_net::Result<()> {
/// let reconciler = Arc::new(DeviceReconciler::new());
/// let link = SystemLink::new(Arc::clone(&reconciler));
/// link.start()?;
///
/// for device in reconciler.snapshot() {
///     println!("{} ({}): {:?}", device.name, device.kind, device.state);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SystemLink {
    reconciler: Arc<DeviceReconciler>,
    inner: Arc<Mutex<LinkInner>>,
}

struct LinkInner {
    /// Whether the watcher is active.
    is_running: bool,
    /// Interface index to device id and last pushed online state.
    known: HashMap<u32, KnownDevice>,
    /// Handle that keeps the platform watcher alive (drop to stop).
    _watcher_handle: Option<netwatcher::WatchHandle>,
}

#[derive(Clone)]
struct KnownDevice {
    id: String,
    online: bool,
}

impl SystemLink {
    /// Create a stopped link that will feed the given reconciler.
    pub fn new(reconciler: Arc<DeviceReconciler>) -> Self {
        Self {
            reconciler,
            inner: Arc::new(Mutex::new(LinkInner {
                is_running: false,
                known: HashMap::new(),
                _watcher_handle: None,
            })),
        }
    }

    /// Enumerate current interfaces and start watching for changes.
    ///
    /// Starting an already-running link is a no-op.
    pub fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.is_running {
            return Ok(());
        }

        // Prime the reconciler with what exists right now.
        for iface in netdev::get_interfaces() {
            if iface.is_loopback() {
                continue;
            }
            let online = iface.is_up() && (!iface.ipv4.is_empty() || !iface.ipv6.is_empty());
            Self::admit(
                &self.reconciler,
                &mut inner.known,
                iface.index,
                iface.name.clone(),
                online,
            );
        }

        let reconciler = Arc::clone(&self.reconciler);
        let inner_clone = Arc::clone(&self.inner);

        let handle = netwatcher::watch_interfaces(move |update| {
            let mut inner = inner_clone.lock();

            for &ifindex in &update.diff.removed {
                if let Some(known) = inner.known.remove(&ifindex) {
                    reconciler.apply(DeviceEvent::Removed { id: known.id });
                }
            }

            // Added interfaces enter the map; kept ones only push a state
            // change when their online state actually flipped.
            for (&ifindex, iface) in &update.interfaces {
                if iface.name == "lo" || iface.name.starts_with("lo0") {
                    continue;
                }
                let online = !iface.ips.is_empty();
                Self::admit(
                    &reconciler,
                    &mut inner.known,
                    ifindex,
                    iface.name.clone(),
                    online,
                );
            }
        })
        .map_err(|e| NetError::Watch(format!("{e:?}")))?;

        inner._watcher_handle = Some(handle);
        inner.is_running = true;
        tracing::debug!(
            target: "trellis_net::monitor",
            devices = inner.known.len(),
            "system link started"
        );
        Ok(())
    }

    /// Register or refresh one interface with the reconciler.
    fn admit(
        reconciler: &DeviceReconciler,
        known: &mut HashMap<u32, KnownDevice>,
        ifindex: u32,
        name: String,
        online: bool,
    ) {
        let state = if online {
            DeviceState::Connected
        } else {
            DeviceState::Disconnected
        };
        match known.get_mut(&ifindex) {
            Some(device) => {
                if device.online != online {
                    device.online = online;
                    reconciler.apply(DeviceEvent::StateChanged {
                        id: device.id.clone(),
                        state,
                    });
                }
            }
            None => {
                reconciler.apply(DeviceEvent::Added {
                    id: name.clone(),
                    name: name.clone(),
                    kind: classify_interface(&name),
                });
                reconciler.apply(DeviceEvent::StateChanged {
                    id: name.clone(),
                    state,
                });
                known.insert(ifindex, KnownDevice { id: name, online });
            }
        }
    }

    /// Stop watching. Devices already reconciled stay as they are.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        inner._watcher_handle = None;
        inner.is_running = false;
    }

    /// Whether the link is currently watching.
    pub fn is_running(&self) -> bool {
        self.inner.lock().is_running
    }

    /// The reconciler this link feeds.
    pub fn reconciler(&self) -> &Arc<DeviceReconciler> {
        &self.reconciler
    }
}

impl Drop for SystemLink {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SystemLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SystemLink")
            .field("is_running", &inner.is_running)
            .field("known", &inner.known.len())
            .finish()
    }
}

/// Guess a device kind from an interface name.
///
/// Interface naming is conventional, not authoritative; anything
/// unrecognized counts as wired, matching how desktop shells bucket
/// unknown hardware.
pub fn classify_interface(name: &str) -> DeviceKind {
    const WIRELESS: &[&str] = &["wl", "ath", "ra"];
    const MODEM: &[&str] = &["ww", "ppp", "wwan"];
    const BLUETOOTH: &[&str] = &["bnep", "bt-pan"];
    const VPN: &[&str] = &["tun", "tap", "wg", "vpn", "utun"];
    const VIRTUAL: &[&str] = &["br", "bond", "virbr", "veth", "docker", "vmnet", "dummy"];

    let matches = |prefixes: &[&str]| prefixes.iter().any(|p| name.starts_with(p));

    if matches(WIRELESS) {
        DeviceKind::Wireless
    } else if matches(MODEM) {
        DeviceKind::Modem
    } else if matches(BLUETOOTH) {
        DeviceKind::Bluetooth
    } else if matches(VPN) {
        DeviceKind::Vpn
    } else if matches(VIRTUAL) {
        DeviceKind::Virtual
    } else {
        DeviceKind::Wired
    }
}
