/// Column-name, summary-case and archive-member constants.
/// Single source of truth - also exported to Python via PyO3.

// ── Working columns (row-level extracts) ────────────────────────────────────
pub mod columns {
    pub const BOL_ID: &str = "bol_id";
    pub const IDENTIFIER: &str = "identifier";
    pub const SHIPMENT_TYPE: &str = "shipment_type";
    /// Destination ETA.
    pub const AJ: &str = "aj";
    /// Destination ATA.
    pub const AK: &str = "ak";

    /// Column order of every row-level output table.
    pub const BASE: [&str; 5] = [BOL_ID, IDENTIFIER, SHIPMENT_TYPE, AJ, AK];
}

// ── Per-BOL statistics ──────────────────────────────────────────────────────
pub mod stats {
    pub const N_AJ: &str = "n_aj";
    pub const N_AK: &str = "n_ak";
    pub const ROW_COUNT: &str = "row_count";
}

// ── Summary table ───────────────────────────────────────────────────────────
pub mod summary {
    pub const CASE: &str = "case";
    pub const DESCRIPTION: &str = "description";
    pub const COUNT: &str = "count";
}

// ── Summary case keys ───────────────────────────────────────────────────────
pub mod cases {
    pub const TOTAL_CONTAINER_ROWS: &str = "total_container_rows";
    pub const UNIQUE_BOLS: &str = "unique_bols";
    pub const BOLS_SAME_AJ: &str = "bols_same_aj";
    pub const BOLS_DIFFERENT_AJ: &str = "bols_different_aj";
    pub const BOLS_SAME_AK: &str = "bols_same_ak";
    pub const BOLS_DIFFERENT_AK: &str = "bols_different_ak";

    pub const ALL: [&str; 6] = [
        TOTAL_CONTAINER_ROWS,
        UNIQUE_BOLS,
        BOLS_SAME_AJ,
        BOLS_DIFFERENT_AJ,
        BOLS_SAME_AK,
        BOLS_DIFFERENT_AK,
    ];
}

// ── Archive members ─────────────────────────────────────────────────────────
pub mod members {
    pub const UNIQUE_BOLS: &str = "unique_bols.csv";
    pub const DIFFERENT_AJ: &str = "different_aj.csv";
    pub const DIFFERENT_AK: &str = "different_ak.csv";
    pub const SAME_AJ: &str = "same_aj.csv";
    pub const SAME_AK: &str = "same_ak.csv";
    pub const SUMMARY: &str = "summary.csv";

    pub const ALL: [&str; 6] = [
        UNIQUE_BOLS,
        DIFFERENT_AJ,
        DIFFERENT_AK,
        SAME_AJ,
        SAME_AK,
        SUMMARY,
    ];

    pub const DEFAULT_ARCHIVE_NAME: &str = "eta_ata_analysis.zip";
}

// ── Shipment type values ────────────────────────────────────────────────────
pub mod shipment_type {
    pub const CONTAINER: &str = "Container";
}
