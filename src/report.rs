//! Messages shown to the person running an analysis.

use polars::prelude::*;

use crate::classifier::Analysis;
use crate::loader::LoadStatus;

pub const SUCCESS_MESSAGE: &str = "Analysis completed. Download the ZIP below.";

pub fn load_status_message(status: &LoadStatus) -> String {
    format!(
        "Detected {} rows and {} columns.",
        status.rows, status.columns
    )
}

pub fn empty_warning(shipment_type_column: &str, container_value: &str) -> String {
    format!(
        "No rows found with shipment_type = '{container_value}' in column '{shipment_type_column}'."
    )
}

pub fn container_info(rows: usize, shipment_type_column: &str, container_value: &str) -> String {
    format!("{rows} rows where {shipment_type_column} = '{container_value}'.")
}

/// Render the summary table for display.
pub fn summary_preview(summary: &DataFrame) -> String {
    format!("{summary}")
}

/// One line describing how a run ended.
pub fn outcome_message(analysis: &Analysis) -> String {
    match analysis {
        Analysis::Empty {
            shipment_type_column,
            container_value,
        } => empty_warning(shipment_type_column, container_value),
        Analysis::Classified(tables) => container_info(
            tables.counts.total_container_rows,
            &tables.shipment_type_column,
            &tables.container_value,
        ),
    }
}
