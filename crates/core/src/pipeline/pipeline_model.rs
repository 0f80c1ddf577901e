use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stages of a run, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStage {
    FetchUniverse,
    RankSectors,
    ValuateAndRoi,
    ComputeBreadth,
    Done,
}

impl PipelineStage {
    /// Next stage; `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            PipelineStage::FetchUniverse => PipelineStage::RankSectors,
            PipelineStage::RankSectors => PipelineStage::ValuateAndRoi,
            PipelineStage::ValuateAndRoi => PipelineStage::ComputeBreadth,
            PipelineStage::ComputeBreadth | PipelineStage::Done => PipelineStage::Done,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::FetchUniverse => write!(f, "fetch universe"),
            PipelineStage::RankSectors => write!(f, "rank sectors"),
            PipelineStage::ValuateAndRoi => write!(f, "valuation and ROI"),
            PipelineStage::ComputeBreadth => write!(f, "breadth"),
            PipelineStage::Done => write!(f, "done"),
        }
    }
}

/// Outcome of one stage's sector loop and its batched write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReport {
    pub stage: PipelineStage,
    /// Sectors the stage looped over
    pub sectors_attempted: usize,
    /// Documents included in the stage's batch
    pub sectors_written: usize,
    /// Sectors (or ids) that contributed nothing, with the reason
    pub skipped: Vec<(String, String)>,
    /// Whether the batch reached the store
    pub committed: bool,
}

impl StageReport {
    pub fn new(stage: PipelineStage) -> Self {
        Self {
            stage,
            sectors_attempted: 0,
            sectors_written: 0,
            skipped: Vec::new(),
            committed: false,
        }
    }

    pub fn skip(&mut self, id: &str, reason: impl Into<String>) {
        self.skipped.push((id.to_string(), reason.into()));
    }
}

/// Everything a run did, for logs and callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: String,
    pub run_date: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Equities in the fetched universe
    pub universe_size: usize,
    pub sector_count: usize,
    /// Whether the constituent snapshot batch was committed
    pub constituents_committed: bool,
    pub stages: Vec<StageReport>,
    /// Stored sector documents with no sector in today's universe. Reported,
    /// never deleted.
    pub stale_records: Vec<String>,
    pub final_stage: PipelineStage,
}

impl RunSummary {
    pub fn stage(&self, stage: PipelineStage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    pub fn all_committed(&self) -> bool {
        self.constituents_committed && self.stages.iter().all(|report| report.committed)
    }
}
