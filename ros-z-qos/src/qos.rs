use std::fmt;

use serde::Serialize;

/// Default depth for KEEP_LAST, matching the ROS 2 default profile.
pub const DEFAULT_HISTORY_DEPTH: usize = 10;

#[derive(
    Debug, Default, Hash, PartialEq, Eq, Clone, Copy, Serialize, strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QosReliability {
    SystemDefault,
    #[default]
    Reliable,
    BestEffort,
    BestAvailable,
    #[strum(disabled)]
    Unknown,
}

impl QosReliability {
    /// Canonical policy string, `None` for settings without one.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::SystemDefault => Some("system_default"),
            Self::Reliable => Some("reliable"),
            Self::BestEffort => Some("best_effort"),
            Self::BestAvailable => Some("best_available"),
            Self::Unknown => None,
        }
    }

    /// Reverse lookup of [`Self::as_str`], yielding [`Self::Unknown`] on no match.
    pub fn from_policy_str(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for QosReliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemDefault => write!(f, "System Default"),
            Self::Reliable => write!(f, "Reliable"),
            Self::BestEffort => write!(f, "Best Effort"),
            Self::BestAvailable => write!(f, "Best Available"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(
    Debug, Default, Hash, PartialEq, Eq, Clone, Copy, Serialize, strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QosDurability {
    SystemDefault,
    TransientLocal,
    #[default]
    Volatile,
    BestAvailable,
    #[strum(disabled)]
    Unknown,
}

impl QosDurability {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::SystemDefault => Some("system_default"),
            Self::TransientLocal => Some("transient_local"),
            Self::Volatile => Some("volatile"),
            Self::BestAvailable => Some("best_available"),
            Self::Unknown => None,
        }
    }

    pub fn from_policy_str(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for QosDurability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemDefault => write!(f, "System Default"),
            Self::TransientLocal => write!(f, "Transient Local"),
            Self::Volatile => write!(f, "Volatile"),
            Self::BestAvailable => write!(f, "Best Available"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// History kind. The depth lives in [`QosProfile::depth`] so that both can be
/// overridden independently.
#[derive(
    Debug, Default, Hash, PartialEq, Eq, Clone, Copy, Serialize, strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QosHistory {
    SystemDefault,
    #[default]
    KeepLast,
    KeepAll,
    #[strum(disabled)]
    Unknown,
}

impl QosHistory {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::SystemDefault => Some("system_default"),
            Self::KeepLast => Some("keep_last"),
            Self::KeepAll => Some("keep_all"),
            Self::Unknown => None,
        }
    }

    pub fn from_policy_str(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for QosHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemDefault => write!(f, "System Default"),
            Self::KeepLast => write!(f, "Keep Last"),
            Self::KeepAll => write!(f, "Keep All"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(
    Debug, Default, Hash, PartialEq, Eq, Clone, Copy, Serialize, strum::EnumString, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QosLiveliness {
    SystemDefault,
    #[default]
    Automatic,
    /// Deprecated in ROS 2; it has no policy string and cannot be declared.
    #[strum(disabled)]
    ManualByNode,
    ManualByTopic,
    BestAvailable,
    #[strum(disabled)]
    Unknown,
}

impl QosLiveliness {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::SystemDefault => Some("system_default"),
            Self::Automatic => Some("automatic"),
            Self::ManualByTopic => Some("manual_by_topic"),
            Self::BestAvailable => Some("best_available"),
            Self::ManualByNode | Self::Unknown => None,
        }
    }

    pub fn from_policy_str(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for QosLiveliness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemDefault => write!(f, "System Default"),
            Self::Automatic => write!(f, "Automatic"),
            Self::ManualByNode => write!(f, "Manual by Node"),
            Self::ManualByTopic => write!(f, "Manual by Topic"),
            Self::BestAvailable => write!(f, "Best Available"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Represents a QoS duration in seconds and nanoseconds.
///
/// Used for deadline, lifespan, and liveliness lease duration. Parameters carry
/// these as a signed nanosecond count, see [`QosDuration::as_nanos`] and
/// [`QosDuration::try_from_nanos`].
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct QosDuration {
    pub sec: u64,
    pub nsec: u64,
}

impl QosDuration {
    /// Exactly `i64::MAX` nanoseconds.
    pub const INFINITE: QosDuration = QosDuration {
        sec: 9223372036,
        nsec: 854775807,
    };

    /// Nanoseconds past a whole second are carried into `sec`.
    pub const fn new(sec: u64, nsec: u64) -> Self {
        Self {
            sec: sec.saturating_add(nsec / NANOS_PER_SEC),
            nsec: nsec % NANOS_PER_SEC,
        }
    }

    /// Total nanoseconds, saturating at `i64::MAX`.
    pub fn as_nanos(&self) -> i64 {
        let nanos = u128::from(self.sec) * u128::from(NANOS_PER_SEC) + u128::from(self.nsec);
        i64::try_from(nanos).unwrap_or(i64::MAX)
    }

    /// Returns `None` for negative counts.
    pub fn try_from_nanos(nanos: i64) -> Option<Self> {
        let nanos = u64::try_from(nanos).ok()?;
        Some(Self {
            sec: nanos / NANOS_PER_SEC,
            nsec: nanos % NANOS_PER_SEC,
        })
    }
}

impl Default for QosDuration {
    fn default() -> Self {
        Self::INFINITE
    }
}

impl fmt::Display for QosDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INFINITE {
            write!(f, "Infinite")
        } else if self.nsec == 0 {
            write!(f, "{}s", self.sec)
        } else {
            write!(f, "{}s {}ns", self.sec, self.nsec)
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct QosProfile {
    pub reliability: QosReliability,
    pub durability: QosDurability,
    pub history: QosHistory,
    pub depth: usize,
    pub deadline: QosDuration,
    pub lifespan: QosDuration,
    pub liveliness: QosLiveliness,
    pub liveliness_lease_duration: QosDuration,
    pub avoid_ros_namespace_conventions: bool,
}

impl Default for QosProfile {
    fn default() -> Self {
        Self {
            reliability: QosReliability::default(),
            durability: QosDurability::default(),
            history: QosHistory::default(),
            depth: DEFAULT_HISTORY_DEPTH,
            deadline: QosDuration::default(),
            lifespan: QosDuration::default(),
            liveliness: QosLiveliness::default(),
            liveliness_lease_duration: QosDuration::default(),
            avoid_ros_namespace_conventions: false,
        }
    }
}

impl QosProfile {
    /// Keep-last profile with the given depth, everything else default.
    pub fn keep_last(depth: usize) -> Self {
        Self {
            history: QosHistory::KeepLast,
            depth,
            ..Default::default()
        }
    }
}

impl fmt::Display for QosProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QoS({}, {}, {}", self.reliability, self.durability, self.history)?;
        if self.history == QosHistory::KeepLast {
            write!(f, " ({})", self.depth)?;
        }
        if self.deadline != QosDuration::INFINITE {
            write!(f, ", deadline={}", self.deadline)?;
        }
        if self.lifespan != QosDuration::INFINITE {
            write!(f, ", lifespan={}", self.lifespan)?;
        }
        if self.liveliness != QosLiveliness::Automatic {
            write!(f, ", liveliness={}", self.liveliness)?;
        }
        if self.liveliness_lease_duration != QosDuration::INFINITE {
            write!(f, ", lease={}", self.liveliness_lease_duration)?;
        }
        if self.avoid_ros_namespace_conventions {
            write!(f, ", avoid_ros_namespace_conventions")?;
        }
        write!(f, ")")
    }
}
