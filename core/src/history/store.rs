use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::record::HistoryRecord;
use crate::prelude::{AnalysisError, AnalysisResult};

/// A revision of one committed record produced by an adjustment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub index: usize,
    pub before: HistoryRecord,
    pub after: HistoryRecord,
}

impl RecordPatch {
    /// Names of the fields the patch rewrites.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let (a, b) = (&self.before, &self.after);
        let mut fields = Vec::new();
        if a.traw != b.traw {
            fields.push("traw");
        }
        if a.tfinal != b.tfinal {
            fields.push("tfinal");
        }
        if a.ci != b.ci {
            fields.push("ci");
        }
        if a.rule8 != b.rule8 {
            fields.push("rule8");
        }
        if a.comment != b.comment {
            fields.push("comment");
        }
        if a.mw_score != b.mw_score || a.mw_date != b.mw_date || a.mw_time != b.mw_time {
            fields.push("mw");
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Inserted(usize),
    Replaced(usize),
}

/// Time-ordered archive of one storm's analyses.
///
/// Records are kept strictly ordered by [`HistoryRecord::time_value`];
/// committing a record at an existing time replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryStore {
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.commit(record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    /// Records strictly earlier than `time`.
    pub fn before(&self, time: f64) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().filter(move |r| r.time_value() < time)
    }

    pub fn commit(&mut self, record: HistoryRecord) -> CommitOutcome {
        let time = record.time_value();
        let position = self.records.partition_point(|r| r.time_value() < time);
        match self.records.get(position) {
            Some(existing) if existing.time_value() == time => {
                debug!("replacing history record at {:.4}", time);
                self.records[position] = record;
                CommitOutcome::Replaced(position)
            }
            _ => {
                self.records.insert(position, record);
                CommitOutcome::Inserted(position)
            }
        }
    }

    /// Applies revisions in order. Every patch must target a record with
    /// the same analysis time as its `before` image.
    pub fn apply_patches(&mut self, patches: &[RecordPatch]) -> AnalysisResult<usize> {
        for patch in patches {
            let target = self.records.get(patch.index).ok_or_else(|| {
                AnalysisError::InvalidInput(format!("patch index {} out of range", patch.index))
            })?;
            if target.time_value() != patch.after.time_value()
                || target.time_value() != patch.before.time_value()
            {
                return Err(AnalysisError::InvalidInput(format!(
                    "patch for {:.4} does not match record at index {}",
                    patch.after.time_value(),
                    patch.index
                )));
            }
        }
        for patch in patches {
            debug!(
                "revising record {} ({})",
                patch.index,
                patch.changed_fields().join(",")
            );
            self.records[patch.index] = patch.after.clone();
        }
        Ok(patches.len())
    }

    pub fn to_json(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> AnalysisResult<Self> {
        let records: Vec<HistoryRecord> = serde_json::from_str(text)?;
        Ok(Self::from_records(records))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> AnalysisResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|err| {
            AnalysisError::Internal(format!("writing history {}: {}", path.display(), err))
        })?;
        info!("saved {} history records to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            AnalysisError::InvalidInput(format!("reading history {}: {}", path.display(), err))
        })?;
        Self::from_json(&text)
    }
}
