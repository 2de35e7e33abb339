// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mirror axis and side classification.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::point::{is_unused, Point};

/// The coordinate axis the mirror plane is perpendicular to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymmetryAxis {
    #[default]
    X = 0,
    Y = 1,
    Z = 2,
}

impl SymmetryAxis {
    /// Component index of this axis (0, 1 or 2).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Signed coordinate of `p` along this axis.
    #[inline]
    pub fn component(self, p: &Point) -> f32 {
        p[self.index()]
    }

    /// Reflects `p` through the mirror plane.
    #[inline]
    pub fn mirror(self, p: &Point) -> Point {
        let mut m = *p;
        m[self.index()] = -m[self.index()];
        m
    }

    /// Returns the axis name as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymmetryAxis::X => "x",
            SymmetryAxis::Y => "y",
            SymmetryAxis::Z => "z",
        }
    }
}

impl fmt::Display for SymmetryAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymmetryAxis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(SymmetryAxis::X),
            "y" => Ok(SymmetryAxis::Y),
            "z" => Ok(SymmetryAxis::Z),
            _ => Err(Error::UnknownAxis(s.to_string())),
        }
    }
}

/// Which side of the mirror plane an element lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymmetrySide {
    /// Unused slot, or a face that has no mirror.
    #[default]
    None,
    /// On the mirror plane (within the zero band).
    Center,
    /// Positive side of the axis.
    Plus,
    /// Negative side of the axis.
    Minus,
}

impl SymmetrySide {
    /// Classifies a point against the mirror plane.
    ///
    /// `zero_band` is the half-width of the slab around the plane that
    /// counts as [`SymmetrySide::Center`].
    pub fn classify(p: &Point, axis: SymmetryAxis, zero_band: f32) -> Self {
        if is_unused(p) {
            return SymmetrySide::None;
        }
        let c = axis.component(p);
        if c > zero_band {
            SymmetrySide::Plus
        } else if c < -zero_band {
            SymmetrySide::Minus
        } else {
            SymmetrySide::Center
        }
    }

    /// The side across the plane. `None` and `Center` map to themselves.
    pub const fn opposite(self) -> Self {
        match self {
            SymmetrySide::Plus => SymmetrySide::Minus,
            SymmetrySide::Minus => SymmetrySide::Plus,
            other => other,
        }
    }

    #[inline]
    pub const fn is_none_or_center(self) -> bool {
        matches!(self, SymmetrySide::None | SymmetrySide::Center)
    }
}

/// Half-width of the on-plane band for a given matching tolerance.
///
/// Scales with the tolerance so large models do not see every near-plane
/// vertex as off-center, with a floor for tiny tolerances.
#[inline]
pub fn zero_band(tolerance: f32) -> f32 {
    (tolerance * 1e-6).max(1e-6)
}
