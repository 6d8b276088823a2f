//! Lookup tables from caller tokens to platform codes.
//!
//! Optional enumerations (notification importance and lock-screen
//! visibility) never fail: unknown tokens resolve to the least intrusive
//! level. Accuracy has no safe default, so an unknown accuracy token is
//! reported to the caller instead.

use std::str::FromStr;

use serde_json::Value;
use strum::{Display, EnumString};

/// Notification importance as understood by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
pub enum Importance {
    /// Never shown.
    #[default]
    #[strum(serialize = "IMPORTANCE_NONE")]
    None,
    /// Shown only in the shade, below the fold.
    #[strum(serialize = "IMPORTANCE_MIN")]
    Min,
    /// Shown everywhere but makes no sound.
    #[strum(serialize = "IMPORTANCE_LOW")]
    Low,
    /// Shown everywhere and makes noise.
    #[strum(serialize = "IMPORTANCE_DEFAULT")]
    Default,
    /// May peek onto the screen.
    #[strum(serialize = "IMPORTANCE_HIGH")]
    High,
    /// Highest priority.
    #[strum(serialize = "IMPORTANCE_MAX")]
    Max,
}

impl Importance {
    /// Resolves a caller token, falling back to [`Importance::None`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        Self::from_str(token).unwrap_or_default()
    }

    /// Platform code for this level.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Min => 1,
            Self::Low => 2,
            Self::Default => 3,
            Self::High => 4,
            Self::Max => 5,
        }
    }
}

/// Lock-screen visibility of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
pub enum Visibility {
    /// Nothing is shown on the lock screen.
    #[default]
    #[strum(serialize = "VISIBILITY_SECRET")]
    Secret,
    /// Shown with sensitive content redacted.
    #[strum(serialize = "VISIBILITY_PRIVATE")]
    Private,
    /// Shown in full.
    #[strum(serialize = "VISIBILITY_PUBLIC")]
    Public,
}

impl Visibility {
    /// Resolves a caller token, falling back to [`Visibility::Secret`].
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        Self::from_str(token).unwrap_or_default()
    }

    /// Platform code for this level.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Secret => -1,
            Self::Private => 0,
            Self::Public => 1,
        }
    }
}

/// Maps an importance token to its platform code; unknown tokens map to 0.
#[must_use]
pub fn importance(token: &str) -> i32 {
    Importance::from_token(token).code()
}

/// Maps a visibility token to its platform code; unknown tokens map to -1.
#[must_use]
pub fn visibility(token: &str) -> i32 {
    Visibility::from_token(token).code()
}

/// Accuracy requested by the caller.
///
/// Callers address levels either by index (`0..=5`) or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum AccuracyLevel {
    /// Index 0.
    PowerSave,
    /// Index 1.
    Low,
    /// Index 2.
    Balanced,
    /// Index 3.
    High,
    /// Index 4.
    Navigation,
    /// Index 5.
    Reduced,
}

impl AccuracyLevel {
    /// Looks a level up by its numeric index.
    #[must_use]
    pub const fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::PowerSave),
            1 => Some(Self::Low),
            2 => Some(Self::Balanced),
            3 => Some(Self::High),
            4 => Some(Self::Navigation),
            5 => Some(Self::Reduced),
            _ => None,
        }
    }

    /// Looks a level up from a loosely typed token (index or name).
    #[must_use]
    pub fn from_token(token: &Value) -> Option<Self> {
        match token {
            Value::Number(number) => number.as_i64().and_then(Self::from_index),
            Value::String(name) => Self::from_str(name.trim()).ok(),
            _ => None,
        }
    }

    /// Location request priority used by the platform for this level.
    #[must_use]
    pub const fn priority(self) -> LocationPriority {
        match self {
            Self::PowerSave => LocationPriority::NoPower,
            Self::Low | Self::Reduced => LocationPriority::LowPower,
            Self::Balanced => LocationPriority::BalancedPowerAccuracy,
            Self::High | Self::Navigation => LocationPriority::HighAccuracy,
        }
    }
}

/// Platform location request priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPriority {
    /// Most accurate fixes, highest power draw.
    HighAccuracy,
    /// Block-level accuracy.
    BalancedPowerAccuracy,
    /// City-level accuracy.
    LowPower,
    /// Only fixes requested by other clients.
    NoPower,
}

impl LocationPriority {
    /// Platform code for this priority.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::HighAccuracy => 100,
            Self::BalancedPowerAccuracy => 102,
            Self::LowPower => 104,
            Self::NoPower => 105,
        }
    }
}
