//! Shared rep counter state

use serde::{Deserialize, Serialize};

/// The two tracked exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExerciseKind {
    Squat,
    Curl,
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::Curl => "curl",
        }
    }
}

/// Coarse posture tracked per exercise.
///
/// Names describe the posture, not the direction of counting: a standing squat
/// is `Up`, arms hanging extended in a curl are `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// No posture seen yet since start or reset.
    #[default]
    Idle,
    Up,
    Down,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Up => "up",
            Stage::Down => "down",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepCounter {
    pub kind: ExerciseKind,
    /// Never decreases between resets.
    pub count: u32,
    pub stage: Stage,
    /// Qualifying frames accumulated toward the hold threshold. Always 0 for squats.
    pub hold_frames: u32,
}

impl RepCounter {
    pub fn new(kind: ExerciseKind) -> Self {
        Self {
            kind,
            count: 0,
            stage: Stage::Idle,
            hold_frames: 0,
        }
    }

    /// Credit one rep and move to `stage`.
    pub(crate) fn credit(&mut self, stage: Stage) -> RepEvent {
        self.stage = stage;
        self.count = self.count.saturating_add(1);
        self.hold_frames = 0;
        RepEvent {
            kind: self.kind,
            count: self.count,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.kind);
    }
}

/// Emitted on the frame a rep is credited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepEvent {
    pub kind: ExerciseKind,
    /// Count after crediting this rep.
    pub count: u32,
}
