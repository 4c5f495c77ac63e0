//! Container filtering, grouping by bill of lading and ETA/ATA consistency split.
//!
//! Comparison rule: every value is compared as an exact string. Nothing is
//! trimmed or case-folded, and a blank cell is a value like any other, so a
//! BOL whose containers carry `"10"` and `""` has two distinct ETAs. A BOL with
//! a single container row is always consistent for both fields.

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::error::ConsistencyError;
use crate::mapping::RoleMapping;
use crate::schema::{columns, members, shipment_type, stats};
use crate::summary::SummaryCounts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Shipment type value that marks a container row.
    pub container_value: String,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            container_value: shipment_type::CONTAINER.to_string(),
        }
    }
}

/// Whether all containers of a BOL agree on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consistency {
    Same,
    Different,
}

impl Consistency {
    pub fn from_distinct(count: usize) -> Self {
        if count > 1 {
            Consistency::Different
        } else {
            Consistency::Same
        }
    }
}

/// Per-BOL distinct-value counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BolStat {
    pub bol_id: String,
    pub distinct_field_a_count: usize,
    pub distinct_field_b_count: usize,
    pub row_count: usize,
}

impl BolStat {
    pub fn field_a(&self) -> Consistency {
        Consistency::from_distinct(self.distinct_field_a_count)
    }

    pub fn field_b(&self) -> Consistency {
        Consistency::from_distinct(self.distinct_field_b_count)
    }
}

/// Every table produced by a non-empty run.
#[derive(Debug, Clone)]
pub struct ClassifiedTables {
    /// Projected working table restricted to container rows.
    pub containers: DataFrame,
    /// `bol_id`, first-seen order.
    pub unique_bols: DataFrame,
    /// `bol_id, n_aj, n_ak, row_count`, first-seen order.
    pub bol_stats: DataFrame,
    pub different_aj: DataFrame,
    pub different_ak: DataFrame,
    pub same_aj: DataFrame,
    pub same_ak: DataFrame,
    pub summary: DataFrame,
    pub counts: SummaryCounts,
    /// Input column the container filter ran on.
    pub shipment_type_column: String,
    pub container_value: String,
}

impl ClassifiedTables {
    /// Archive member name paired with its table.
    pub fn member_tables(&self) -> [(&'static str, &DataFrame); 6] {
        [
            (members::UNIQUE_BOLS, &self.unique_bols),
            (members::DIFFERENT_AJ, &self.different_aj),
            (members::DIFFERENT_AK, &self.different_ak),
            (members::SAME_AJ, &self.same_aj),
            (members::SAME_AK, &self.same_ak),
            (members::SUMMARY, &self.summary),
        ]
    }

    /// Typed view of `bol_stats`.
    pub fn stats(&self) -> Result<Vec<BolStat>, ConsistencyError> {
        let df = &self.bol_stats;
        let ids = df.column(columns::BOL_ID)?.str()?;
        let n_aj = df.column(stats::N_AJ)?.cast(&DataType::UInt64)?;
        let n_ak = df.column(stats::N_AK)?.cast(&DataType::UInt64)?;
        let rows = df.column(stats::ROW_COUNT)?.cast(&DataType::UInt64)?;
        let (n_aj, n_ak, rows) = (n_aj.u64()?, n_ak.u64()?, rows.u64()?);

        Ok((0..df.height())
            .map(|i| BolStat {
                bol_id: ids.get(i).unwrap_or("").to_string(),
                distinct_field_a_count: n_aj.get(i).unwrap_or(0) as usize,
                distinct_field_b_count: n_ak.get(i).unwrap_or(0) as usize,
                row_count: rows.get(i).unwrap_or(0) as usize,
            })
            .collect())
    }
}

/// Outcome of one classification run.
#[derive(Debug, Clone)]
pub enum Analysis {
    /// No row matched the container value; nothing should be packaged.
    Empty {
        shipment_type_column: String,
        container_value: String,
    },
    Classified(Box<ClassifiedTables>),
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        matches!(self, Analysis::Empty { .. })
    }

    pub fn classified(&self) -> Option<&ClassifiedTables> {
        match self {
            Analysis::Classified(tables) => Some(tables),
            Analysis::Empty { .. } => None,
        }
    }

    pub fn into_classified(self) -> Option<ClassifiedTables> {
        match self {
            Analysis::Classified(tables) => Some(*tables),
            Analysis::Empty { .. } => None,
        }
    }
}

/// Classify with the default container value `"Container"`.
pub fn classify(table: &DataFrame, mapping: &RoleMapping) -> Result<Analysis, ConsistencyError> {
    classify_with(table, mapping, &ClassifierOptions::default())
}

pub fn classify_with(
    table: &DataFrame,
    mapping: &RoleMapping,
    options: &ClassifierOptions,
) -> Result<Analysis, ConsistencyError> {
    // Fails on an unresolvable role before anything is filtered.
    let working = mapping.project(table)?;

    let containers = working
        .lazy()
        .filter(col(columns::SHIPMENT_TYPE).eq(lit(options.container_value.as_str())))
        .collect()?;

    if containers.height() == 0 {
        warn!(
            column = %mapping.shipment_type,
            value = %options.container_value,
            "no container rows"
        );
        return Ok(Analysis::Empty {
            shipment_type_column: mapping.shipment_type.clone(),
            container_value: options.container_value.clone(),
        });
    }
    debug!(
        input_rows = table.height(),
        container_rows = containers.height(),
        "filtered container rows"
    );

    let bol_stats = containers
        .clone()
        .lazy()
        .group_by_stable([col(columns::BOL_ID)])
        .agg([
            col(columns::AJ).n_unique().alias(stats::N_AJ),
            col(columns::AK).n_unique().alias(stats::N_AK),
            len().alias(stats::ROW_COUNT),
        ])
        .collect()?;
    let unique_bols = bol_stats.select([columns::BOL_ID])?;

    let count_bols = |predicate: Expr| -> PolarsResult<usize> {
        Ok(bol_stats.clone().lazy().filter(predicate).collect()?.height())
    };
    let counts = SummaryCounts {
        total_container_rows: containers.height(),
        unique_bols: unique_bols.height(),
        bols_same_aj: count_bols(col(stats::N_AJ).eq(lit(1)))?,
        bols_different_aj: count_bols(col(stats::N_AJ).gt(lit(1)))?,
        bols_same_ak: count_bols(col(stats::N_AK).eq(lit(1)))?,
        bols_different_ak: count_bols(col(stats::N_AK).gt(lit(1)))?,
    };

    // Each container row carries its BOL's distinct counts, so a plain filter
    // selects whole BOL groups while keeping the input row order.
    let flagged = containers.clone().lazy().with_columns([
        col(columns::AJ)
            .n_unique()
            .over([col(columns::BOL_ID)])
            .alias(stats::N_AJ),
        col(columns::AK)
            .n_unique()
            .over([col(columns::BOL_ID)])
            .alias(stats::N_AK),
    ]);
    let extract = |predicate: Expr| -> PolarsResult<DataFrame> {
        flagged
            .clone()
            .filter(predicate)
            .select(columns::BASE.map(col))
            .collect()
    };

    let tables = ClassifiedTables {
        same_aj: extract(col(stats::N_AJ).eq(lit(1)))?,
        different_aj: extract(col(stats::N_AJ).gt(lit(1)))?,
        same_ak: extract(col(stats::N_AK).eq(lit(1)))?,
        different_ak: extract(col(stats::N_AK).gt(lit(1)))?,
        summary: counts.to_frame()?,
        containers,
        unique_bols,
        bol_stats,
        counts,
        shipment_type_column: mapping.shipment_type.clone(),
        container_value: options.container_value.clone(),
    };

    info!(
        container_rows = counts.total_container_rows,
        unique_bols = counts.unique_bols,
        different_aj = counts.bols_different_aj,
        different_ak = counts.bols_different_ak,
        "classified BOLs"
    );
    Ok(Analysis::Classified(Box::new(tables)))
}
