use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Knee angle thresholds for squats, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquatThresholds {
    /// Above this the leg counts as extended (standing, `Stage::Up`)
    pub extended_above: f64,
    /// Below this, after standing, the rep is credited (`Stage::Down`)
    pub flexed_below: f64,
}

impl Default for SquatThresholds {
    fn default() -> Self {
        Self {
            extended_above: 160.0,
            flexed_below: 70.0,
        }
    }
}

/// Elbow angle thresholds for curls, in degrees. Both arms must agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurlThresholds {
    /// Above this both arms count as extended (`Stage::Down`)
    pub extended_above: f64,
    /// Below this both arms count as flexed
    pub flexed_below: f64,
    /// Flexed frames required before the rep is credited
    pub hold_frames: u32,
}

impl Default for CurlThresholds {
    fn default() -> Self {
        Self {
            extended_above: 150.0,
            flexed_below: 60.0,
            hold_frames: 3,
        }
    }
}

/// Configuration for both rep detectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectorConfig {
    pub squat: SquatThresholds,
    pub curl: CurlThresholds,

    /// Skip an exercise's update when any of its angles came from degenerate
    /// geometry. Off by default: the 0° sentinel then reads as fully flexed.
    pub ignore_degenerate_angles: bool,
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        check_band("squat", self.squat.flexed_below, self.squat.extended_above)?;
        check_band("curl", self.curl.flexed_below, self.curl.extended_above)?;
        if self.curl.hold_frames == 0 {
            bail!("curl hold_frames must be at least 1");
        }
        Ok(())
    }
}

fn check_band(name: &str, flexed_below: f64, extended_above: f64) -> Result<()> {
    if !(0.0..=180.0).contains(&flexed_below) || !(0.0..=180.0).contains(&extended_above) {
        bail!("{name} thresholds must lie within [0, 180] degrees");
    }
    if flexed_below >= extended_above {
        bail!(
            "{name} flexed threshold ({flexed_below}) must be below extended threshold ({extended_above})"
        );
    }
    Ok(())
}
