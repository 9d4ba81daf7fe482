//! Device records and the kind capability table.
//!
//! Every network device is one flat [`DeviceRecord`] tagged with a
//! [`DeviceKind`]; behavior that varies by kind lives in a static
//! [`DeviceCaps`] table instead of a subclass hierarchy. A record owns a
//! name-sorted list of [`ConnectionProfile`]s and derives its "best"
//! connection from the active one or the most plausible candidate.

use std::cmp::Ordering;

/// Kind of network device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Ethernet and other cabled links.
    Wired,
    /// Wi-Fi adapters.
    Wireless,
    /// Cellular modems.
    Modem,
    /// Bluetooth tethering (PAN/DUN).
    Bluetooth,
    /// Bridges, bonds, and other software devices.
    Virtual,
    /// VPN tunnels.
    Vpn,
}

impl DeviceKind {
    /// Every device kind, in precedence order (highest first).
    pub const ALL: [DeviceKind; 6] = [
        DeviceKind::Wired,
        DeviceKind::Wireless,
        DeviceKind::Modem,
        DeviceKind::Bluetooth,
        DeviceKind::Virtual,
        DeviceKind::Vpn,
    ];

    /// The static capabilities of this kind.
    pub fn caps(self) -> &'static DeviceCaps {
        &CAPS[self as usize]
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceKind::Wired => write!(f, "Wired"),
            DeviceKind::Wireless => write!(f, "Wireless"),
            DeviceKind::Modem => write!(f, "Modem"),
            DeviceKind::Bluetooth => write!(f, "Bluetooth"),
            DeviceKind::Virtual => write!(f, "Virtual"),
            DeviceKind::Vpn => write!(f, "VPN"),
        }
    }
}

/// What a device kind can do, dispatched by table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCaps {
    /// Whether the device reports a signal strength (0-100).
    pub reports_strength: bool,
    /// Whether its connections may autoconnect.
    pub supports_autoconnect: bool,
    /// Rank when choosing the primary device; higher wins.
    pub precedence: u8,
}

/// Capability table indexed by `DeviceKind as usize`.
static CAPS: [DeviceCaps; 6] = [
    // Wired
    DeviceCaps {
        reports_strength: false,
        supports_autoconnect: true,
        precedence: 50,
    },
    // Wireless
    DeviceCaps {
        reports_strength: true,
        supports_autoconnect: true,
        precedence: 40,
    },
    // Modem
    DeviceCaps {
        reports_strength: true,
        supports_autoconnect: true,
        precedence: 30,
    },
    // Bluetooth
    DeviceCaps {
        reports_strength: true,
        supports_autoconnect: true,
        precedence: 20,
    },
    // Virtual
    DeviceCaps {
        reports_strength: false,
        supports_autoconnect: false,
        precedence: 10,
    },
    // Vpn: rides on another device's link, never primary on its own
    DeviceCaps {
        reports_strength: false,
        supports_autoconnect: false,
        precedence: 0,
    },
];

/// Connectivity state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceState {
    /// Present but not usable (no carrier, rfkill, missing firmware).
    Unavailable,
    /// Usable but idle.
    #[default]
    Disconnected,
    /// A connection is being activated.
    Connecting,
    /// A connection is active.
    Connected,
}

impl DeviceState {
    /// Whether the device currently carries traffic.
    #[inline]
    pub fn is_connected(self) -> bool {
        self == DeviceState::Connected
    }
}

/// A stored connection profile on a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    /// Stable unique identifier.
    pub id: String,
    /// Human-readable name, used for list ordering.
    pub name: String,
    /// Whether the device may activate this profile on its own.
    pub autoconnect: bool,
    /// Last activation time, seconds since the Unix epoch.
    pub last_used: Option<u64>,
}

impl ConnectionProfile {
    /// Create a profile that never autoconnects and has no history.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            autoconnect: false,
            last_used: None,
        }
    }
}

/// Sort key for the per-device connection list: name, then id for ties.
fn profile_order(a: &ConnectionProfile, b: &ConnectionProfile) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
}

/// One network device and its derived state.
///
/// The connection list stays sorted by name across upserts, so consumers
/// can render it directly without re-sorting.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    /// Stable unique identifier (e.g. interface name or object path).
    pub id: String,
    /// Display name.
    pub name: String,
    /// What kind of device this is.
    pub kind: DeviceKind,
    /// Current connectivity state.
    pub state: DeviceState,
    /// Signal strength 0-100; only kinds that report strength carry one.
    pub strength: Option<u8>,
    connections: Vec<ConnectionProfile>,
    active: Option<String>,
}

impl DeviceRecord {
    /// Create a disconnected device with no connections.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            state: DeviceState::Disconnected,
            strength: None,
            connections: Vec::new(),
            active: None,
        }
    }

    /// The device's connection profiles, sorted by name.
    pub fn connections(&self) -> &[ConnectionProfile] {
        &self.connections
    }

    /// Insert or replace a connection profile, keeping name order.
    ///
    /// Returns `true` when the profile was new, `false` when it replaced
    /// an existing profile with the same id.
    pub fn upsert_connection(&mut self, profile: ConnectionProfile) -> bool {
        let existed = self
            .connections
            .iter()
            .position(|c| c.id == profile.id)
            .map(|index| self.connections.remove(index))
            .is_some();
        let at = self
            .connections
            .partition_point(|c| profile_order(c, &profile) == Ordering::Less);
        self.connections.insert(at, profile);
        !existed
    }

    /// Remove a connection profile by id.
    ///
    /// An active connection that is removed also stops being active.
    pub fn remove_connection(&mut self, id: &str) -> Option<ConnectionProfile> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        Some(self.connections.remove(index))
    }

    /// Mark a connection as the active one, or clear it with `None`.
    ///
    /// An id that names no stored profile clears the active connection;
    /// the device then falls back to candidate ranking.
    pub fn set_active(&mut self, id: Option<String>) {
        self.active = id.filter(|id| self.connections.iter().any(|c| &c.id == id));
    }

    /// The currently active connection, if any.
    pub fn active_connection(&self) -> Option<&ConnectionProfile> {
        let id = self.active.as_deref()?;
        self.connections.iter().find(|c| c.id == id)
    }

    /// Set the reported signal strength, clamped to 0-100.
    ///
    /// Kinds that do not report strength ignore the value.
    pub fn set_strength(&mut self, strength: Option<u8>) {
        if self.kind.caps().reports_strength {
            self.strength = strength.map(|s| s.min(100));
        }
    }

    /// The connection this device would use: the active one when set,
    /// otherwise the best candidate.
    ///
    /// Candidates rank by autoconnect (when the kind supports it), then
    /// most recent use, then name. Returns `None` for an empty list.
    pub fn best_connection(&self) -> Option<&ConnectionProfile> {
        if let Some(active) = self.active_connection() {
            return Some(active);
        }
        let autoconnect_counts = self.kind.caps().supports_autoconnect;
        self.connections.iter().min_by(|a, b| {
            let by_autoconnect = if autoconnect_counts {
                b.autoconnect.cmp(&a.autoconnect)
            } else {
                Ordering::Equal
            };
            by_autoconnect
                .then_with(|| b.last_used.cmp(&a.last_used))
                .then_with(|| profile_order(a, b))
        })
    }
}
