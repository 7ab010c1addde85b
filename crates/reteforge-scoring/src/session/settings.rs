//! Session settings.

/// How much checking a session does at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnvironmentMode {
    /// No extra checks.
    #[default]
    NonReproducible,

    /// No extra checks. Propagation is deterministic in every mode, so this
    /// only records the caller's intent.
    Reproducible,

    /// Compares every match total against a from-scratch rebuild after each
    /// mutation.
    FullAssert,
}

impl EnvironmentMode {
    pub fn is_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}

/// How a source node propagates a fact update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UpdateMode {
    /// A retract followed by an insert of the new value.
    #[default]
    RetractInsert,

    /// A single update event carrying the new value.
    InPlace,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSettings {
    pub environment_mode: EnvironmentMode,
    pub update_mode: UpdateMode,
}

impl SessionSettings {
    pub fn new(environment_mode: EnvironmentMode, update_mode: UpdateMode) -> Self {
        Self {
            environment_mode,
            update_mode,
        }
    }
}
