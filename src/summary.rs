use polars::prelude::*;

use crate::schema::{cases, summary};

/// The six counts reported in `summary.csv`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    pub total_container_rows: usize,
    pub unique_bols: usize,
    pub bols_same_aj: usize,
    pub bols_different_aj: usize,
    pub bols_same_ak: usize,
    pub bols_different_ak: usize,
}

impl SummaryCounts {
    /// `(case, description, count)` in output order.
    pub fn rows(&self) -> [(&'static str, &'static str, usize); 6] {
        [
            (
                cases::TOTAL_CONTAINER_ROWS,
                "Total rows with shipment_type = 'Container'",
                self.total_container_rows,
            ),
            (
                cases::UNIQUE_BOLS,
                "Distinct BOL IDs among Container rows (including blanks)",
                self.unique_bols,
            ),
            (
                cases::BOLS_SAME_AJ,
                "BOLs where containers share exactly 1 unique AJ (including single-container BOLs)",
                self.bols_same_aj,
            ),
            (
                cases::BOLS_DIFFERENT_AJ,
                "BOLs where containers have more than 1 unique AJ (blanks treated as distinct)",
                self.bols_different_aj,
            ),
            (
                cases::BOLS_SAME_AK,
                "BOLs where containers share exactly 1 unique AK (including single-container BOLs)",
                self.bols_same_ak,
            ),
            (
                cases::BOLS_DIFFERENT_AK,
                "BOLs where containers have more than 1 unique AK (blanks treated as distinct)",
                self.bols_different_ak,
            ),
        ]
    }

    /// Build the `case, description, count` table.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let rows = self.rows();
        let case: Vec<&str> = rows.iter().map(|(c, _, _)| *c).collect();
        let description: Vec<&str> = rows.iter().map(|(_, d, _)| *d).collect();
        let count: Vec<i64> = rows.iter().map(|(_, _, n)| *n as i64).collect();

        df!(
            summary::CASE => case,
            summary::DESCRIPTION => description,
            summary::COUNT => count,
        )
    }

    /// Look a count up by its case key.
    pub fn get(&self, case: &str) -> Option<usize> {
        self.rows()
            .into_iter()
            .find(|(c, _, _)| *c == case)
            .map(|(_, _, n)| n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_frame_has_six_rows_in_fixed_order() {
        let counts = SummaryCounts {
            total_container_rows: 3,
            unique_bols: 2,
            bols_same_aj: 2,
            bols_different_aj: 0,
            bols_same_ak: 1,
            bols_different_ak: 1,
        };
        let df = counts.to_frame().unwrap();

        assert_eq!(
            df.get_column_names_str(),
            vec!["case", "description", "count"]
        );
        let case: Vec<&str> = df
            .column("case")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(case, cases::ALL.to_vec());

        let count: Vec<i64> = df
            .column("count")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(count, vec![3, 2, 2, 0, 1, 1]);
    }

    #[test]
    fn get_looks_up_by_case() {
        let counts = SummaryCounts {
            bols_different_ak: 4,
            ..Default::default()
        };
        assert_eq!(counts.get(cases::BOLS_DIFFERENT_AK), Some(4));
        assert_eq!(counts.get("nope"), None);
    }
}
