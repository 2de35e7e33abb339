// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Symmetry settings, optionally loaded from environment variables.

use crate::axis::SymmetryAxis;
use crate::grid::GridResolution;

/// Default matching distance between a vertex's mirror image and its twin.
pub const DEFAULT_TOLERANCE: f32 = 0.001;

/// Settings for a symmetry pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymmetryConfig {
    /// Whether symmetric editing is on at all.
    pub enabled: bool,
    /// Axis the mirror plane is perpendicular to.
    pub axis: SymmetryAxis,
    /// Maximum distance between a mirrored vertex and its twin.
    pub tolerance: f32,
    /// Candidate grid cells per world axis.
    pub resolution: GridResolution,
}

impl Default for SymmetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            axis: SymmetryAxis::X,
            tolerance: DEFAULT_TOLERANCE,
            resolution: GridResolution::default(),
        }
    }
}

impl SymmetryConfig {
    pub fn new(axis: SymmetryAxis, tolerance: f32) -> Self {
        Self {
            axis,
            tolerance,
            ..Self::default()
        }
    }

    pub fn with_resolution(mut self, resolution: GridResolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// - `MESHMIRROR_SYMMETRY`: `true`/`false` (also `1`/`0`, `on`/`off`)
    /// - `MESHMIRROR_AXIS`: `x`, `y` or `z`
    /// - `MESHMIRROR_TOLERANCE`: non-negative float
    /// - `MESHMIRROR_GRID`: `NXxNYxNZ`, e.g. `4x8x8`
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            enabled: lookup("MESHMIRROR_SYMMETRY")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.enabled),
            axis: lookup("MESHMIRROR_AXIS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.axis),
            tolerance: lookup("MESHMIRROR_TOLERANCE")
                .and_then(|v| v.trim().parse::<f32>().ok())
                .filter(|t| t.is_finite() && *t >= 0.0)
                .unwrap_or(defaults.tolerance),
            resolution: lookup("MESHMIRROR_GRID")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.resolution),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
