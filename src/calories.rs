//! Calorie estimate from cumulative rep counts
//!
//! Each rep is scored as one minute of the exercise's MET-rated activity:
//! `kcal/min = MET × weight_kg × 3.5 / 200`. Real elapsed time is not used.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// ml O2 per kg per minute at 1 MET.
const OXYGEN_PER_MET: f64 = 3.5;
/// ml O2 per kcal (5 kcal per litre of oxygen).
const OXYGEN_DIVISOR: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalorieModel {
    pub squat_met: f64,
    pub curl_met: f64,
    pub weight_kg: f64,
}

impl Default for CalorieModel {
    fn default() -> Self {
        Self {
            squat_met: 5.0,
            curl_met: 3.5,
            weight_kg: 50.0,
        }
    }
}

impl CalorieModel {
    pub fn with_weight(weight_kg: f64) -> Self {
        Self {
            weight_kg,
            ..Self::default()
        }
    }

    pub fn kcal_per_squat(&self) -> f64 {
        self.squat_met * self.weight_kg * OXYGEN_PER_MET / OXYGEN_DIVISOR
    }

    pub fn kcal_per_curl(&self) -> f64 {
        self.curl_met * self.weight_kg * OXYGEN_PER_MET / OXYGEN_DIVISOR
    }

    /// Total kcal, rounded to two decimals (ties to even).
    pub fn estimate(&self, squats: u32, curls: u32) -> f64 {
        let total =
            self.kcal_per_squat() * f64::from(squats) + self.kcal_per_curl() * f64::from(curls);
        round_to_hundredths(total)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            bail!("weight_kg must be a positive number, got {}", self.weight_kg);
        }
        if self.squat_met < 0.0 || self.curl_met < 0.0 {
            bail!("MET values must not be negative");
        }
        Ok(())
    }
}

/// Estimate with the default model (50 kg, squat MET 5.0, curl MET 3.5).
pub fn calories(squats: u32, curls: u32) -> f64 {
    CalorieModel::default().estimate(squats, curls)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
