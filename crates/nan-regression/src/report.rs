//! Text rendering of an [`ExperimentSummary`].

use crate::types::{ExperimentSummary, StrategyKind, StrategyOutcome, StrategyReport};
use std::fmt::Write;

const CONCLUSION: &[&str] = &[
    "There are multiple ways to handle NaN values in a regression workflow:",
    "1. Drop rows with NaN values - simple but may lose data",
    "2. Use SimpleImputer to replace NaN with mean/median",
    "3. Use models that natively handle NaN values (like HistGradientBoostingRegressor)",
    "4. Use advanced imputation strategies (KNN imputation, iterative imputation)",
];

fn score_label(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::DropRows => "R² score on clean test data",
        StrategyKind::MeanImputation => "R² score with mean imputation",
        StrategyKind::NativeMissing => "R² score with HistGradientBoostingRegressor",
        StrategyKind::MedianImputation => "R² score with median imputation",
        StrategyKind::KnnImputation => "R² score with KNN imputation",
    }
}

fn write_report(out: &mut String, report: &StrategyReport) -> std::fmt::Result {
    if let Some(stats) = &report.row_deletion {
        writeln!(
            out,
            "Clean data shape after dropping NaN rows: ({}, {})",
            stats.clean_shape.0, stats.clean_shape.1
        )?;
        writeln!(out, "Number of rows dropped: {}", stats.rows_dropped)?;
    }
    match &report.outcome {
        StrategyOutcome::Scored { score, .. } => {
            writeln!(out, "{}: {:.3}", score_label(report.kind), score)
        }
        StrategyOutcome::Unavailable { reason } => writeln!(out, "{}", reason),
    }
}

/// Render the summary as the text printed by the binary, conclusion included.
pub fn render(summary: &ExperimentSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_summary(&mut out, summary);
    out
}

fn write_summary(out: &mut String, summary: &ExperimentSummary) -> std::fmt::Result {
    writeln!(
        out,
        "Original data shape: ({}, {})",
        summary.train_shape.0, summary.train_shape.1
    )?;
    writeln!(
        out,
        "Number of NaN values in training data: {}",
        summary.train_missing
    )?;

    let mut current_solution = None;
    for report in &summary.reports {
        let solution = report.kind.solution();
        if current_solution != Some(solution) {
            writeln!(
                out,
                "\n===== SOLUTION {}: {} =====",
                solution,
                report.kind.solution_title()
            )?;
            current_solution = Some(solution);
        }
        write_report(out, report)?;
    }

    writeln!(out, "\nConclusion:")?;
    for line in CONCLUSION {
        writeln!(out, "{}", line)?;
    }
    writeln!(
        out,
        "\nThe best approach depends on your specific dataset and requirements."
    )
}
