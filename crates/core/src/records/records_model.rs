use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sectorwatch_market_data::RoiValues;

use crate::errors::Result;
use crate::ranking::SectorRanking;
use crate::records::records_constants::*;
use crate::roi::RoiSummary;
use crate::universe::Equity;
use crate::valuation::ValuationSummary;

/// A stored document: a flat JSON object.
pub type Document = Map<String, Value>;

/// One document's worth of fields to merge.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeWrite {
    pub id: String,
    pub fields: Document,
}

impl MergeWrite {
    pub fn new(id: impl Into<String>, fields: Document) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Merge `patch` into `existing`: top-level fields named by the patch are
/// replaced, every other field is kept.
pub fn merge_fields(existing: &mut Document, patch: &Document) {
    for (key, value) in patch {
        existing.insert(key.clone(), value.clone());
    }
}

/// Builder for the fields one stage writes into a sector document.
///
/// Every patch carries the sector name so a document created by any stage is
/// self-describing.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorRecordPatch {
    id: String,
    fields: Document,
}

impl SectorRecordPatch {
    pub fn new(sector: &str) -> Self {
        Self::for_id(sector, sector)
    }

    /// Patch for a document whose id is not a sector name (the benchmark).
    pub fn for_id(id: &str, label: &str) -> Self {
        let mut fields = Document::new();
        fields.insert(SECTOR_FIELD.to_string(), Value::String(label.to_string()));
        Self {
            id: id.to_string(),
            fields,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn top_stocks(mut self, ranking: &SectorRanking) -> Result<Self> {
        self.fields.insert(
            TOP_STOCKS_FIELD.to_string(),
            serde_json::to_value(&ranking.top_stocks)?,
        );
        Ok(self)
    }

    /// Adds only the valuation fields that were computed.
    pub fn valuation(mut self, summary: &ValuationSummary) -> Result<Self> {
        if let Value::Object(fields) = serde_json::to_value(summary)? {
            merge_fields(&mut self.fields, &fields);
        }
        Ok(self)
    }

    pub fn roi(mut self, roi: &RoiSummary) -> Result<Self> {
        self.fields
            .insert(ETF_ROI_FIELD.to_string(), serde_json::to_value(&roi.values)?);
        self.fields.insert(
            ETF_SYMBOL_FIELD.to_string(),
            Value::String(roi.symbol.clone()),
        );
        Ok(self)
    }

    /// Skipped when the value is not finite.
    pub fn market_breadth(mut self, pct: f64) -> Self {
        if let Some(number) = serde_json::Number::from_f64(pct) {
            self.fields
                .insert(MARKET_BREADTH_FIELD.to_string(), Value::Number(number));
        }
        self
    }

    pub fn preview_summary(mut self, text: &str) -> Self {
        self.fields.insert(
            PREVIEW_SUMMARY_FIELD.to_string(),
            Value::String(text.to_string()),
        );
        self
    }

    /// True when nothing beyond the sector label would be written.
    pub fn is_empty(&self) -> bool {
        self.fields.keys().all(|key| key == SECTOR_FIELD)
    }

    pub fn into_merge_write(self) -> MergeWrite {
        MergeWrite::new(self.id, self.fields)
    }
}

/// Typed view of a stored sector document. Any field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    pub sector: Option<String>,
    pub top_stocks: Option<Vec<Equity>>,
    pub pe_today: Option<f64>,
    pub pe_7_days_ago: Option<f64>,
    pub pe_weekly_change_percent: Option<f64>,
    pub pe_high_1y: Option<f64>,
    pub pe_low_1y: Option<f64>,
    pub market_breadth_pct: Option<f64>,
    pub etf_roi: Option<RoiValues>,
    pub etf_symbol: Option<String>,
    pub preview_summary: Option<String>,
}

impl SectorRecord {
    pub fn from_document(document: Document) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}
