//! Simulator configuration.
//!
//! A [`Config`] controls the knobs the execution engine and the assembler
//! consult but that do not belong on the hart's architectural state: the
//! instruction budget, whether the text region is write-protected, and the
//! initial breakpoint set. Configs are `serde`-deserializable so a driver
//! can load one from a JSON file instead of hardcoding it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default upper bound on instructions executed by `run()` before it gives
/// up and returns [`crate::common::error::VmError::InstructionLimitExceeded`].
pub const DEFAULT_MAX_INSTRUCTIONS: u64 = 1_000_000;

/// Simulator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound on instructions `run()` will execute before treating the
    /// program as non-terminating.
    pub max_instructions: u64,

    /// Whether stores into the text region are rejected.
    pub text_protect: bool,

    /// Program-counter addresses that `run()` should stop at, after
    /// executing the instruction at that address was avoided — i.e. a
    /// breakpoint halts the engine before the instruction at that address
    /// executes.
    pub breakpoints: BTreeSet<u32>,

    /// Entry point `pc` to install before the first instruction executes,
    /// overriding the assembler's own entry point if set.
    pub entry_point: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_instructions: DEFAULT_MAX_INSTRUCTIONS,
            text_protect: true,
            breakpoints: BTreeSet::new(),
            entry_point: None,
        }
    }
}

impl Config {
    /// Loads a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `json` is not valid JSON or does
    /// not match the shape of [`Config`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
