//! Append-only record of counts over a session, one sample per processed frame.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSample {
    /// Whole seconds since the session started (or was last reset).
    pub elapsed_secs: u64,
    pub squats: u32,
    pub curls: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SessionTimeline {
    samples: Vec<TimelineSample>,
}

impl SessionTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, sample: TimelineSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[TimelineSample] {
        &self.samples
    }

    /// Owned copy for consumers that outlive the borrow (export, charts).
    pub fn snapshot(&self) -> Vec<TimelineSample> {
        self.samples.clone()
    }

    pub fn last(&self) -> Option<&TimelineSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_snapshot() {
        let mut timeline = SessionTimeline::new();
        timeline.append(TimelineSample {
            elapsed_secs: 0,
            squats: 0,
            curls: 0,
        });
        timeline.append(TimelineSample {
            elapsed_secs: 2,
            squats: 1,
            curls: 0,
        });

        let snapshot = timeline.snapshot();
        timeline.clear();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].squats, 1);
        assert!(timeline.is_empty());
        assert!(timeline.last().is_none());
    }
}
