use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use serde_json::Value;
use uuid::Uuid;

use sectorwatch_market_data::{MarketDataGateway, Pacer};

use crate::breadth::BreadthCalculator;
use crate::config::PipelineConfig;
use crate::constants::{
    CONSTITUENTS_COLLECTION, MARKET_BENCHMARK_RECORD_ID, SECTOR_ANALYTICS_COLLECTION,
};
use crate::errors::Result;
use crate::pipeline::pipeline_model::{PipelineStage, RunSummary, StageReport};
use crate::ranking::SectorAggregator;
use crate::records::{
    Document, MergeWrite, RecordStoreTrait, SectorRecordPatch, PREVIEW_SUMMARY_FIELD,
};
use crate::roi::BenchmarkRoiCollector;
use crate::sectors::SectorProxyTable;
use crate::universe::{Equity, SectorUniverse, UniverseProviderTrait};
use crate::valuation::ValuationAnalytics;

const BENCHMARK_LABEL: &str = "Market Benchmark";

/// Runs the sector update end to end.
///
/// Stages run strictly one after another and each loops over every sector
/// before the next begins. A sector that fails inside a stage is logged and
/// left out of that stage's batch; the other sectors still commit. Only a
/// failed universe fetch ends the run early.
pub struct PipelineOrchestrator {
    universe: Arc<dyn UniverseProviderTrait>,
    store: Arc<dyn RecordStoreTrait>,
    aggregator: SectorAggregator,
    valuation: ValuationAnalytics,
    roi: BenchmarkRoiCollector,
    breadth: BreadthCalculator,
    config: PipelineConfig,
    run_date: Option<NaiveDate>,
}

impl PipelineOrchestrator {
    pub fn new(
        universe: Arc<dyn UniverseProviderTrait>,
        gateway: Arc<dyn MarketDataGateway>,
        store: Arc<dyn RecordStoreTrait>,
        proxies: Arc<SectorProxyTable>,
        pacer: Arc<dyn Pacer>,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            universe,
            store,
            aggregator: SectorAggregator::new(gateway.clone()),
            valuation: ValuationAnalytics::new(
                gateway.clone(),
                config.pe_history_days,
                config.weekly_lookback_days,
            ),
            roi: BenchmarkRoiCollector::new(gateway.clone(), proxies),
            breadth: BreadthCalculator::new(gateway, pacer, config.sma_period),
            config,
            run_date: None,
        })
    }

    /// Pin the date used as "today" instead of the current UTC date.
    pub fn with_run_date(mut self, date: NaiveDate) -> Self {
        self.run_date = Some(date);
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let run_id = Uuid::now_v7().to_string();
        let started_at = Utc::now();
        let run_date = self.run_date.unwrap_or_else(|| started_at.date_naive());
        info!("Starting sector update run {} for {}", run_id, run_date);

        let mut stage = PipelineStage::FetchUniverse;
        let equities = self.universe.fetch_universe().await?;
        let universe = SectorUniverse::group(equities);
        info!(
            "Universe: {} equities across {} sectors",
            universe.equity_count(),
            universe.sector_count()
        );
        let constituents_committed = self.persist_constituents(&universe).await;

        let mut stages = Vec::new();
        while stage != PipelineStage::Done {
            stage = stage.next();
            let report = match stage {
                PipelineStage::RankSectors => self.rank_sectors(&universe).await,
                PipelineStage::ValuateAndRoi => self.valuate_and_roi(&universe, run_date).await,
                PipelineStage::ComputeBreadth => self.compute_breadth(&universe).await,
                PipelineStage::FetchUniverse | PipelineStage::Done => continue,
            };
            info!(
                "Stage '{}': {} of {} sectors written, {} skipped, committed: {}",
                report.stage,
                report.sectors_written,
                report.sectors_attempted,
                report.skipped.len(),
                report.committed
            );
            stages.push(report);
        }

        let summary = RunSummary {
            run_id,
            run_date,
            started_at,
            finished_at: Utc::now(),
            universe_size: universe.equity_count(),
            sector_count: universe.sector_count(),
            constituents_committed,
            stages,
            stale_records: self.stale_records(&universe),
            final_stage: stage,
        };

        if !summary.stale_records.is_empty() {
            info!(
                "Stored sectors missing from today's universe: {}",
                summary.stale_records.join(", ")
            );
        }
        info!(
            "Run {} finished in {}s (all batches committed: {})",
            summary.run_id,
            (summary.finished_at - summary.started_at).num_seconds(),
            summary.all_committed()
        );
        Ok(summary)
    }

    async fn persist_constituents(&self, universe: &SectorUniverse) -> bool {
        let writes: Vec<MergeWrite> = universe
            .sectors()
            .flat_map(|(_, equities)| equities.iter())
            .map(|equity| MergeWrite::new(equity.symbol.clone(), constituent_document(equity)))
            .collect();

        match self
            .store
            .merge_set_batch(CONSTITUENTS_COLLECTION, writes)
            .await
        {
            Ok(count) => {
                debug!("Stored {} constituents", count);
                true
            }
            Err(e) => {
                error!("Failed to store constituent snapshot: {}", e);
                false
            }
        }
    }

    async fn rank_sectors(&self, universe: &SectorUniverse) -> StageReport {
        let mut report = StageReport::new(PipelineStage::RankSectors);
        let mut writes = Vec::new();

        for (sector, equities) in universe.sectors() {
            report.sectors_attempted += 1;
            let ranking = match self
                .aggregator
                .rank_top_k(sector, equities, self.config.top_k)
                .await
            {
                Ok(Some(ranking)) => ranking,
                Ok(None) => {
                    report.skip(sector, "no market caps");
                    continue;
                }
                Err(e) => {
                    warn!("Ranking failed for {}: {}", sector, e);
                    report.skip(sector, e.to_string());
                    continue;
                }
            };

            match SectorRecordPatch::new(sector).top_stocks(&ranking) {
                Ok(patch) => writes.push(patch.into_merge_write()),
                Err(e) => {
                    warn!("Could not encode ranking for {}: {}", sector, e);
                    report.skip(sector, e.to_string());
                }
            }
        }

        self.commit(writes, &mut report).await;
        report
    }

    async fn valuate_and_roi(&self, universe: &SectorUniverse, run_date: NaiveDate) -> StageReport {
        let mut report = StageReport::new(PipelineStage::ValuateAndRoi);
        let mut writes = Vec::new();

        let snapshot = self.valuation.fetch_snapshot(run_date).await;

        for sector in universe.sector_names() {
            report.sectors_attempted += 1;
            let summary = self
                .valuation
                .summarize(sector, snapshot.as_ref(), run_date)
                .await;
            let roi = self.roi.collect(sector).await;

            let patch = match roi {
                Some(roi) => SectorRecordPatch::new(sector)
                    .valuation(&summary)
                    .and_then(|patch| patch.roi(&roi)),
                None => SectorRecordPatch::new(sector).valuation(&summary),
            };
            match patch {
                Ok(patch) if patch.is_empty() => report.skip(sector, "no valuation or ROI data"),
                Ok(patch) => writes.push(patch.into_merge_write()),
                Err(e) => {
                    warn!("Could not encode valuation for {}: {}", sector, e);
                    report.skip(sector, e.to_string());
                }
            }
        }

        // The benchmark document counts as one more attempt in this stage
        report.sectors_attempted += 1;
        match self.roi.collect_benchmark().await {
            Some(roi) => {
                match SectorRecordPatch::for_id(MARKET_BENCHMARK_RECORD_ID, BENCHMARK_LABEL).roi(&roi)
                {
                    Ok(patch) => writes.push(patch.into_merge_write()),
                    Err(e) => report.skip(MARKET_BENCHMARK_RECORD_ID, e.to_string()),
                }
            }
            None => report.skip(MARKET_BENCHMARK_RECORD_ID, "no benchmark ROI"),
        }

        self.commit(writes, &mut report).await;
        report
    }

    async fn compute_breadth(&self, universe: &SectorUniverse) -> StageReport {
        let mut report = StageReport::new(PipelineStage::ComputeBreadth);
        let mut writes = Vec::new();

        for (sector, equities) in universe.sectors() {
            report.sectors_attempted += 1;
            let symbols: Vec<String> = equities.iter().map(|e| e.symbol.clone()).collect();
            let breadth = self.breadth.compute_breadth(sector, &symbols).await;

            let mut patch = SectorRecordPatch::new(sector);
            if let Some(pct) = breadth.market_breadth_pct() {
                patch = patch.market_breadth(pct);
            }
            if let Some(text) = self.stored_preview(sector) {
                patch = patch.preview_summary(&text);
            }

            if patch.is_empty() {
                report.skip(sector, "no breadth samples");
            } else {
                writes.push(patch.into_merge_write());
            }
        }

        self.commit(writes, &mut report).await;
        report
    }

    /// The externally written preview text for `sector`, if any.
    fn stored_preview(&self, sector: &str) -> Option<String> {
        match self.store.get(SECTOR_ANALYTICS_COLLECTION, sector) {
            Ok(Some(document)) => match document.get(PREVIEW_SUMMARY_FIELD) {
                Some(Value::String(text)) => Some(text.clone()),
                _ => None,
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read stored record for {}: {}", sector, e);
                None
            }
        }
    }

    async fn commit(&self, writes: Vec<MergeWrite>, report: &mut StageReport) {
        if writes.is_empty() {
            warn!("Stage '{}' produced nothing to write", report.stage);
            report.committed = true;
            return;
        }

        let count = writes.len();
        match self
            .store
            .merge_set_batch(SECTOR_ANALYTICS_COLLECTION, writes)
            .await
        {
            Ok(_) => {
                report.sectors_written = count;
                report.committed = true;
            }
            Err(e) => {
                error!(
                    "Stage '{}' batch of {} documents was not stored: {}",
                    report.stage, count, e
                );
                report.committed = false;
            }
        }
    }

    fn stale_records(&self, universe: &SectorUniverse) -> Vec<String> {
        let current: HashSet<&str> = universe.sector_names().collect();
        match self.store.list_ids(SECTOR_ANALYTICS_COLLECTION) {
            Ok(ids) => ids
                .into_iter()
                .filter(|id| id != MARKET_BENCHMARK_RECORD_ID && !current.contains(id.as_str()))
                .collect(),
            Err(e) => {
                warn!("Could not list stored sector records: {}", e);
                Vec::new()
            }
        }
    }
}

fn constituent_document(equity: &Equity) -> Document {
    let mut document = Document::new();
    document.insert("symbol".to_string(), Value::String(equity.symbol.clone()));
    document.insert("sector".to_string(), Value::String(equity.sector.clone()));
    if let Some(name) = &equity.name {
        document.insert("name".to_string(), Value::String(name.clone()));
    }
    if let Some(sub_sector) = &equity.sub_sector {
        document.insert("subSector".to_string(), Value::String(sub_sector.clone()));
    }
    document
}
