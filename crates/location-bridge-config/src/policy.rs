use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Behaviour when a request kind already has an outstanding continuation.
///
/// The bridge keeps a single continuation per request kind. This policy
/// decides what happens to a second caller that arrives before the platform
/// has answered the first.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PendingConflictPolicy {
    /// Answer the newcomer with an error and keep the original waiting.
    #[default]
    Reject,
    /// Answer the original with an error and let the newcomer wait instead.
    Supersede,
}
