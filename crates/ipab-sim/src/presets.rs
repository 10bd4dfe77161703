//! Named partial configurations applied to the current array.

use std::fmt;
use std::str::FromStr;

use ipab_core::beamforming::{ArrayUpdate, PhaseProfile};
use ipab_core::types::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Broadside,
    Endfire,
    FocusedShort,
    FocusedLong,
    NarrowBeam,
    WideBeam,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Broadside,
        Preset::Endfire,
        Preset::FocusedShort,
        Preset::FocusedLong,
        Preset::NarrowBeam,
        Preset::WideBeam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Broadside => "broadside",
            Preset::Endfire => "endfire",
            Preset::FocusedShort => "focused_short",
            Preset::FocusedLong => "focused_long",
            Preset::NarrowBeam => "narrow_beam",
            Preset::WideBeam => "wide_beam",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Preset::Broadside => "Broadside Array",
            Preset::Endfire => "Endfire Array",
            Preset::FocusedShort => "Short Range Focus",
            Preset::FocusedLong => "Long Range Focus",
            Preset::NarrowBeam => "Narrow Beam",
            Preset::WideBeam => "Wide Beam",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Broadside => "Standard broadside configuration",
            Preset::Endfire => "Endfire array configuration",
            Preset::FocusedShort => "Focused beam for short range",
            Preset::FocusedLong => "Focused beam for long range",
            Preset::NarrowBeam => "Narrow beam configuration",
            Preset::WideBeam => "Wide beam configuration",
        }
    }

    /// The fields this preset changes
    pub fn update(&self) -> ArrayUpdate {
        match self {
            Preset::Broadside => ArrayUpdate {
                steering_angle: Some(0.0),
                phase_profile: Some(PhaseProfile::Linear),
                ..Default::default()
            },
            Preset::Endfire => ArrayUpdate {
                steering_angle: Some(90.0),
                phase_profile: Some(PhaseProfile::Linear),
                ..Default::default()
            },
            Preset::FocusedShort => ArrayUpdate {
                focus_distance: Some(2.0),
                phase_profile: Some(PhaseProfile::Quadratic),
                ..Default::default()
            },
            Preset::FocusedLong => ArrayUpdate {
                focus_distance: Some(20.0),
                phase_profile: Some(PhaseProfile::Quadratic),
                ..Default::default()
            },
            Preset::NarrowBeam => ArrayUpdate {
                num_elements: Some(16),
                ..Default::default()
            },
            Preset::WideBeam => ArrayUpdate {
                num_elements: Some(4),
                ..Default::default()
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::invalid_enum("preset", s))
    }
}
