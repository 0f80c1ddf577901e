use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use sectorwatch_market_data::PeHistoryPoint;

/// Derived P/E figures for one sector. Every field is optional: a value
/// that cannot be computed is left out rather than stored as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_today: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_7_days_ago: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_weekly_change_percent: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_high_1y: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_low_1y: Option<f64>,
}

impl ValuationSummary {
    pub fn is_empty(&self) -> bool {
        self.pe_today.is_none()
            && self.pe_7_days_ago.is_none()
            && self.pe_weekly_change_percent.is_none()
            && self.pe_high_1y.is_none()
            && self.pe_low_1y.is_none()
    }
}

/// Summarize a P/E series.
///
/// `overlay` is the snapshot reading for the run date; it replaces any
/// history point on the same date. The "week ago" value is the sample closest
/// to `lookback_days` before the latest one (older wins a tie). High and low
/// come from `history` alone.
pub fn summarize_series(
    history: &[PeHistoryPoint],
    overlay: Option<PeHistoryPoint>,
    lookback_days: i64,
) -> ValuationSummary {
    let mut summary = ValuationSummary::default();

    let finite_history = history.iter().filter(|p| p.pe.is_finite());
    summary.pe_high_1y = finite_history.clone().map(|p| p.pe).reduce(f64::max);
    summary.pe_low_1y = finite_history.map(|p| p.pe).reduce(f64::min);

    let mut by_date: BTreeMap<NaiveDate, f64> = history
        .iter()
        .filter(|p| p.pe.is_finite())
        .map(|p| (p.date, p.pe))
        .collect();
    if let Some(point) = overlay.filter(|p| p.pe.is_finite()) {
        by_date.insert(point.date, point.pe);
    }

    let Some((&latest_date, &latest_pe)) = by_date.iter().next_back() else {
        return summary;
    };
    summary.pe_today = Some(latest_pe);

    let target = latest_date - Duration::days(lookback_days);
    let prior = by_date
        .range(..latest_date)
        .min_by_key(|(date, _)| (**date - target).num_days().abs())
        .map(|(_, pe)| *pe);

    if let Some(prior_pe) = prior {
        summary.pe_7_days_ago = Some(prior_pe);
        summary.pe_weekly_change_percent = weekly_change_percent(latest_pe, prior_pe);
    }

    summary
}

/// `None` when the prior value is zero or the result is not finite.
fn weekly_change_percent(today: f64, prior: f64) -> Option<f64> {
    if prior == 0.0 {
        return None;
    }
    let change = (today - prior) / prior * 100.0;
    change.is_finite().then_some(change)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn point(date: &str, pe: f64) -> PeHistoryPoint {
        PeHistoryPoint::new(d(date), pe)
    }

    #[test]
    fn test_two_points_a_week_apart() {
        let history = vec![point("2024-01-01", 20.0), point("2024-01-08", 22.0)];

        let summary = summarize_series(&history, None, 7);

        assert_eq!(summary.pe_today, Some(22.0));
        assert_eq!(summary.pe_7_days_ago, Some(20.0));
        assert_eq!(summary.pe_weekly_change_percent, Some(10.0));
        assert_eq!(summary.pe_high_1y, Some(22.0));
        assert_eq!(summary.pe_low_1y, Some(20.0));
    }

    #[test]
    fn test_unsorted_input_is_ordered_by_date() {
        let history = vec![point("2024-01-08", 22.0), point("2024-01-01", 20.0)];

        let summary = summarize_series(&history, None, 7);

        assert_eq!(summary.pe_today, Some(22.0));
        assert_eq!(summary.pe_7_days_ago, Some(20.0));
    }

    #[test]
    fn test_single_sample_omits_weekly_fields() {
        let summary = summarize_series(&[point("2024-01-08", 22.0)], None, 7);

        assert_eq!(summary.pe_today, Some(22.0));
        assert_eq!(summary.pe_7_days_ago, None);
        assert_eq!(summary.pe_weekly_change_percent, None);
    }

    #[test]
    fn test_duplicate_dates_count_once() {
        let history = vec![point("2024-01-08", 21.0), point("2024-01-08", 22.0)];

        let summary = summarize_series(&history, None, 7);

        assert_eq!(summary.pe_7_days_ago, None);
        assert_eq!(summary.pe_weekly_change_percent, None);
    }

    #[test]
    fn test_zero_prior_omits_change_but_keeps_prior() {
        let history = vec![point("2024-01-01", 0.0), point("2024-01-08", 22.0)];

        let summary = summarize_series(&history, None, 7);

        assert_eq!(summary.pe_7_days_ago, Some(0.0));
        assert_eq!(summary.pe_weekly_change_percent, None);
    }

    #[test]
    fn test_prior_is_nearest_to_lookback_target() {
        let history = vec![
            point("2024-01-01", 18.0),
            point("2024-01-02", 19.0),
            point("2024-01-05", 21.0),
            point("2024-01-09", 22.0),
        ];

        // target is 2024-01-02
        let summary = summarize_series(&history, None, 7);

        assert_eq!(summary.pe_7_days_ago, Some(19.0));
    }

    #[test]
    fn test_tie_prefers_older_sample() {
        let history = vec![
            point("2024-01-01", 18.0),
            point("2024-01-03", 19.0),
            point("2024-01-09", 22.0),
        ];

        // target 2024-01-02 is one day from both candidates
        let summary = summarize_series(&history, None, 7);

        assert_eq!(summary.pe_7_days_ago, Some(18.0));
    }

    #[test]
    fn test_overlay_becomes_today() {
        let history = vec![point("2024-01-01", 20.0)];

        let summary = summarize_series(&history, Some(point("2024-01-08", 25.0)), 7);

        assert_eq!(summary.pe_today, Some(25.0));
        assert_eq!(summary.pe_7_days_ago, Some(20.0));
        assert_eq!(summary.pe_weekly_change_percent, Some(25.0));
        // range stays on the history series
        assert_eq!(summary.pe_high_1y, Some(20.0));
    }

    #[test]
    fn test_empty_history_without_overlay_is_empty() {
        let summary = summarize_series(&[], None, 7);
        assert!(summary.is_empty());
    }

    #[test]
    fn test_empty_history_omits_range() {
        let summary = summarize_series(&[], Some(point("2024-01-08", 25.0)), 7);

        assert_eq!(summary.pe_today, Some(25.0));
        assert_eq!(summary.pe_high_1y, None);
        assert_eq!(summary.pe_low_1y, None);
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let history = vec![point("2024-01-01", f64::NAN), point("2024-01-08", 22.0)];

        let summary = summarize_series(&history, None, 7);

        assert_eq!(summary.pe_high_1y, Some(22.0));
        assert_eq!(summary.pe_low_1y, Some(22.0));
        assert_eq!(summary.pe_7_days_ago, None);
    }
}
