//! Result types produced by an experiment run.

use serde::Serialize;

/// The strategies compared by the experiment, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Drop incomplete rows, then fit ordinary least squares.
    DropRows,
    /// Mean imputation, then ordinary least squares.
    MeanImputation,
    /// Gradient boosting that routes missing values itself.
    NativeMissing,
    /// Median imputation, then ordinary least squares.
    MedianImputation,
    /// Nearest-neighbor imputation, then ordinary least squares.
    KnnImputation,
}

impl StrategyKind {
    /// Numbered solution block the strategy is reported under.
    pub fn solution(&self) -> usize {
        match self {
            Self::DropRows => 1,
            Self::MeanImputation => 2,
            Self::NativeMissing => 3,
            Self::MedianImputation | Self::KnnImputation => 4,
        }
    }

    /// Heading of the solution block.
    pub fn solution_title(&self) -> &'static str {
        match self.solution() {
            1 => "Drop rows with NaN values",
            2 => "Impute NaN values with mean",
            3 => "Use a model that handles NaN natively",
            _ => "Advanced imputation with median and KNN",
        }
    }

    /// Short label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DropRows => "drop_rows",
            Self::MeanImputation => "mean_imputation",
            Self::NativeMissing => "native_missing",
            Self::MedianImputation => "median_imputation",
            Self::KnnImputation => "knn_imputation",
        }
    }
}

/// Shape bookkeeping for the row deletion strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowDeletionStats {
    /// `(rows, columns)` of the training features after dropping.
    pub clean_shape: (usize, usize),
    /// Training rows removed because they held a missing value.
    pub rows_dropped: usize,
    /// Test rows left after the same filter.
    pub clean_test_rows: usize,
}

/// Whether a strategy produced a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StrategyOutcome {
    /// R² on the held-out rows, plus a one-line description of the model.
    Scored { score: f64, detail: String },
    /// The strategy could not be scored; `reason` is printed in place of a score.
    Unavailable { reason: String },
}

impl StrategyOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Scored { score, .. } => Some(*score),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Scored { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyReport {
    pub kind: StrategyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_deletion: Option<RowDeletionStats>,
    pub outcome: StrategyOutcome,
}

impl StrategyReport {
    pub fn scored(kind: StrategyKind, score: f64, detail: impl Into<String>) -> Self {
        Self {
            kind,
            row_deletion: None,
            outcome: StrategyOutcome::Scored {
                score,
                detail: detail.into(),
            },
        }
    }

    pub fn unavailable(kind: StrategyKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            row_deletion: None,
            outcome: StrategyOutcome::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn with_row_deletion(mut self, stats: RowDeletionStats) -> Self {
        self.row_deletion = Some(stats);
        self
    }
}

/// Everything the report needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentSummary {
    /// `(rows, columns)` of the training features.
    pub train_shape: (usize, usize),
    /// Missing entries in the training features.
    pub train_missing: usize,
    /// Held-out rows.
    pub n_test: usize,
    pub reports: Vec<StrategyReport>,
}

impl ExperimentSummary {
    /// Report for `kind`, if that strategy was run.
    pub fn report(&self, kind: StrategyKind) -> Option<&StrategyReport> {
        self.reports.iter().find(|r| r.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_solution_blocks() {
        assert_eq!(StrategyKind::DropRows.solution(), 1);
        assert_eq!(StrategyKind::NativeMissing.solution(), 3);
        assert_eq!(
            StrategyKind::MedianImputation.solution_title(),
            StrategyKind::KnnImputation.solution_title()
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let scored = StrategyReport::scored(StrategyKind::MeanImputation, 0.5, "ols");
        assert_eq!(scored.outcome.score(), Some(0.5));
        assert!(scored.outcome.is_available());

        let skipped = StrategyReport::unavailable(StrategyKind::KnnImputation, "missing");
        assert_eq!(skipped.outcome.score(), None);
        assert!(!skipped.outcome.is_available());
    }

    #[test]
    fn test_report_serializes_with_status_tag() {
        let report = StrategyReport::unavailable(StrategyKind::DropRows, "no rows").with_row_deletion(
            RowDeletionStats {
                clean_shape: (70, 5),
                rows_dropped: 10,
                clean_test_rows: 0,
            },
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "drop_rows",
                "row_deletion": { "clean_shape": [70, 5], "rows_dropped": 10, "clean_test_rows": 0 },
                "outcome": { "status": "unavailable", "reason": "no rows" },
            })
        );
    }

    #[test]
    fn test_summary_lookup() {
        let summary = ExperimentSummary {
            train_shape: (80, 5),
            train_missing: 8,
            n_test: 20,
            reports: vec![StrategyReport::scored(StrategyKind::NativeMissing, 0.9, "gbdt")],
        };
        assert!(summary.report(StrategyKind::NativeMissing).is_some());
        assert!(summary.report(StrategyKind::DropRows).is_none());
    }
}
