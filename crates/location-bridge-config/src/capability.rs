use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Platform capabilities whose detection can be overridden.
#[derive(
    Debug,
    Clone,
    Copy,
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PlatformCapability {
    /// Permissions are granted at runtime through a user-facing dialog.
    RuntimePermissions,
    /// Background location is a grant separate from foreground location.
    BackgroundPermission,
    /// Notifications are grouped into user-configurable channels.
    NotificationChannels,
}

/// Directive applied to a detected capability.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CapabilityOverride {
    /// Treat the capability as supported whatever the platform reports.
    Force,
    /// Treat the capability as unsupported whatever the platform reports.
    Deny,
    /// Keep the detected value (default behaviour).
    #[default]
    Allow,
}

/// Errors produced when parsing [`CapabilityDirective`] values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityDirectiveParseError {
    /// Override assignment (`=`) was missing from the directive.
    #[error("directive '{0}' is missing the override assignment '='")]
    MissingDirective(String),
    /// The capability name is not recognised.
    #[error("unknown platform capability '{0}'")]
    UnknownCapability(String),
    /// The override directive could not be parsed.
    #[error("unsupported capability directive '{0}'")]
    InvalidDirective(String),
}

/// Declarative override for a single capability, written as
/// `<capability>=<override>`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityDirective {
    /// Capability being overridden.
    pub capability: PlatformCapability,
    /// Override applied to the capability.
    pub directive: CapabilityOverride,
}

impl CapabilityDirective {
    /// Creates a new directive.
    #[must_use]
    pub const fn new(capability: PlatformCapability, directive: CapabilityOverride) -> Self {
        Self {
            capability,
            directive,
        }
    }
}

impl fmt::Display for CapabilityDirective {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}={}", self.capability, self.directive)
    }
}

impl TryFrom<String> for CapabilityDirective {
    type Error = CapabilityDirectiveParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CapabilityDirective> for String {
    fn from(value: CapabilityDirective) -> Self {
        value.to_string()
    }
}

impl FromStr for CapabilityDirective {
    type Err = CapabilityDirectiveParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (capability, directive) = input
            .split_once('=')
            .ok_or_else(|| CapabilityDirectiveParseError::MissingDirective(input.to_owned()))?;
        let capability = PlatformCapability::from_str(capability.trim()).map_err(|_| {
            CapabilityDirectiveParseError::UnknownCapability(capability.trim().to_owned())
        })?;
        let directive = CapabilityOverride::from_str(directive.trim()).map_err(|_| {
            CapabilityDirectiveParseError::InvalidDirective(directive.trim().to_owned())
        })?;
        Ok(Self::new(capability, directive))
    }
}

/// Overrides keyed by capability. Later directives win.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CapabilityOverrides {
    #[serde(default)]
    overrides: BTreeMap<PlatformCapability, CapabilityOverride>,
}

impl CapabilityOverrides {
    /// Builds the override set from an iterator of directives.
    #[must_use]
    pub fn from_directives<'a, I>(directives: I) -> Self
    where
        I: IntoIterator<Item = &'a CapabilityDirective>,
    {
        let mut overrides = Self::default();
        for directive in directives {
            overrides.set_override(directive.capability, directive.directive);
        }
        overrides
    }

    /// Stores or replaces the override for a capability.
    pub fn set_override(&mut self, capability: PlatformCapability, directive: CapabilityOverride) {
        self.overrides.insert(capability, directive);
    }

    /// Returns the override for a capability, defaulting to `Allow`.
    #[must_use]
    pub fn override_for(&self, capability: PlatformCapability) -> CapabilityOverride {
        self.overrides.get(&capability).copied().unwrap_or_default()
    }

    /// Returns `true` when no override other than `Allow` is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides
            .values()
            .all(|directive| *directive == CapabilityOverride::Allow)
    }
}

/// Deduplicates directives in-place, keeping the last directive per capability.
pub fn deduplicate_directives(directives: &mut Vec<CapabilityDirective>) {
    let mut merged: BTreeMap<PlatformCapability, CapabilityDirective> = BTreeMap::new();
    for directive in directives.drain(..) {
        merged.insert(directive.capability, directive);
    }
    *directives = merged.into_values().collect();
}
