use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{calories::CalorieModel, exercise::DetectorConfig};

pub const ENV_USER_NAME: &str = "REPCOUNT_USER_NAME";
pub const ENV_USER_AGE: &str = "REPCOUNT_USER_AGE";
pub const ENV_RECEIVER_EMAIL: &str = "REPCOUNT_RECEIVER_EMAIL";
pub const ENV_WEIGHT_KG: &str = "REPCOUNT_WEIGHT_KG";

/// Who is working out, and where the summary goes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: Option<u32>,
    pub receiver_email: String,
}

impl UserProfile {
    /// A session can only start once name, age and receiver email are filled in.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("profile name is required");
        }
        if self.age.is_none() {
            bail!("profile age is required");
        }
        let email = self.receiver_email.trim();
        if email.is_empty() {
            bail!("receiver email is required");
        }
        if !email.contains('@') {
            bail!("receiver email '{email}' is not an email address");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UserSettings {
    profile: UserProfile,
    detector: DetectorConfig,
    calories: CalorieModel,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring invalid settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Write the current settings when no file exists yet, leaving an
    /// editable template behind. Returns true if the file was created.
    pub fn ensure_file(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.persist(&self.read())?;
        Ok(true)
    }

    /// Take profile fields and body weight from `lookup` (the process
    /// environment in the binary) and persist whatever was supplied.
    pub fn apply_overrides<F>(&self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut profile = self.profile();
        let mut changed = false;

        if let Some(name) = lookup(ENV_USER_NAME) {
            profile.name = name.trim().to_string();
            changed = true;
        }
        if let Some(raw) = lookup(ENV_USER_AGE) {
            let age = raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("{ENV_USER_AGE} must be a whole number, got '{raw}'"))?;
            profile.age = Some(age);
            changed = true;
        }
        if let Some(email) = lookup(ENV_RECEIVER_EMAIL) {
            profile.receiver_email = email.trim().to_string();
            changed = true;
        }
        if changed {
            self.update_profile(profile)?;
        }

        if let Some(raw) = lookup(ENV_WEIGHT_KG) {
            let weight_kg = raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("{ENV_WEIGHT_KG} must be a number, got '{raw}'"))?;
            self.update_calorie_model(CalorieModel {
                weight_kg,
                ..self.calorie_model()
            })?;
        }

        Ok(())
    }

    pub fn profile(&self) -> UserProfile {
        self.read().profile.clone()
    }

    pub fn detector_config(&self) -> DetectorConfig {
        self.read().detector.clone()
    }

    pub fn calorie_model(&self) -> CalorieModel {
        self.read().calories
    }

    pub fn update_profile(&self, profile: UserProfile) -> Result<()> {
        let mut guard = self.write();
        guard.profile = profile;
        self.persist(&guard)
    }

    pub fn update_detector_config(&self, detector: DetectorConfig) -> Result<()> {
        detector.validate()?;
        let mut guard = self.write();
        guard.detector = detector;
        self.persist(&guard)
    }

    pub fn update_calorie_model(&self, calories: CalorieModel) -> Result<()> {
        calories.validate()?;
        let mut guard = self.write();
        guard.calories = calories;
        self.persist(&guard)
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
