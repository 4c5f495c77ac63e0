use std::collections::HashMap;
use std::path::PathBuf;

use polars::prelude::DataFrame;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyModule};
use pyo3_polars::PyDataFrame;

use crate::archive::build_archive;
use crate::classifier::{classify_with, ClassifiedTables, ClassifierOptions};
use crate::loader::{fill_missing, read_csv_bytes, read_csv_path, LoadStatus};
use crate::mapping::RoleMapping;
use crate::report;
use crate::schema;

/// An uploaded shipment table waiting for a column mapping.
#[pyclass(name = "ConsistencyAnalyzer")]
pub struct PyConsistencyAnalyzer {
    table: DataFrame,
}

#[pymethods]
impl PyConsistencyAnalyzer {
    /// Load CSV bytes (e.g. an uploaded file) with every column as a string.
    #[new]
    fn new(data: &[u8]) -> PyResult<Self> {
        Ok(Self {
            table: read_csv_bytes(data)?,
        })
    }

    #[staticmethod]
    fn from_path(path: PathBuf) -> PyResult<Self> {
        Ok(Self {
            table: read_csv_path(path)?,
        })
    }

    /// Wrap an existing DataFrame; columns are cast to strings and nulls blanked.
    #[staticmethod]
    fn from_frame(df: PyDataFrame) -> PyResult<Self> {
        Ok(Self {
            table: fill_missing(df.0)?,
        })
    }

    #[getter]
    fn table(&self) -> PyDataFrame {
        PyDataFrame(self.table.clone())
    }

    #[getter]
    fn columns(&self) -> Vec<String> {
        LoadStatus::of(&self.table).column_names
    }

    /// "Detected N rows and M columns."
    #[getter]
    fn status(&self) -> String {
        report::load_status_message(&LoadStatus::of(&self.table))
    }

    /// Run the ETA/ATA analysis. Returns None when no container rows exist.
    #[pyo3(signature = (identifier, shipment_type, bol_id, aj, ak, container_value=None))]
    fn analyze(
        &self,
        identifier: &str,
        shipment_type: &str,
        bol_id: &str,
        aj: &str,
        ak: &str,
        container_value: Option<String>,
    ) -> PyResult<Option<PyAnalysisResult>> {
        let mapping = RoleMapping::new(identifier, shipment_type, bol_id, aj, ak);
        let mut options = ClassifierOptions::default();
        if let Some(value) = container_value {
            options.container_value = value;
        }

        let analysis = classify_with(&self.table, &mapping, &options)?;
        let info = report::outcome_message(&analysis);
        Ok(analysis
            .into_classified()
            .map(|tables| PyAnalysisResult { tables, info }))
    }
}

#[pyclass(name = "AnalysisResult")]
pub struct PyAnalysisResult {
    tables: ClassifiedTables,
    info: String,
}

#[pymethods]
impl PyAnalysisResult {
    #[getter]
    fn unique_bols(&self) -> PyDataFrame {
        PyDataFrame(self.tables.unique_bols.clone())
    }

    #[getter]
    fn different_aj(&self) -> PyDataFrame {
        PyDataFrame(self.tables.different_aj.clone())
    }

    #[getter]
    fn different_ak(&self) -> PyDataFrame {
        PyDataFrame(self.tables.different_ak.clone())
    }

    #[getter]
    fn same_aj(&self) -> PyDataFrame {
        PyDataFrame(self.tables.same_aj.clone())
    }

    #[getter]
    fn same_ak(&self) -> PyDataFrame {
        PyDataFrame(self.tables.same_ak.clone())
    }

    #[getter]
    fn summary(&self) -> PyDataFrame {
        PyDataFrame(self.tables.summary.clone())
    }

    #[getter]
    fn bol_stats(&self) -> PyDataFrame {
        PyDataFrame(self.tables.bol_stats.clone())
    }

    #[getter]
    fn containers(&self) -> PyDataFrame {
        PyDataFrame(self.tables.containers.clone())
    }

    /// "N rows where <column> = 'Container'."
    #[getter]
    fn info(&self) -> String {
        self.info.clone()
    }

    /// Summary counts keyed by case.
    fn counts(&self) -> HashMap<String, usize> {
        self.tables
            .counts
            .rows()
            .into_iter()
            .map(|(case, _, n)| (case.to_string(), n))
            .collect()
    }

    /// ZIP archive with the six CSV members.
    fn archive<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = build_archive(&self.tables)?;
        Ok(PyBytes::new(py, &bytes))
    }

    fn summary_preview(&self) -> String {
        report::summary_preview(&self.tables.summary)
    }
}

#[pyfunction]
#[pyo3(name = "empty_warning", signature = (shipment_type_column, container_value=None))]
fn py_empty_warning(shipment_type_column: &str, container_value: Option<&str>) -> String {
    report::empty_warning(
        shipment_type_column,
        container_value.unwrap_or(schema::shipment_type::CONTAINER),
    )
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Columns
    let columns = PyModule::new(m.py(), "columns")?;
    columns.add("BOL_ID", schema::columns::BOL_ID)?;
    columns.add("IDENTIFIER", schema::columns::IDENTIFIER)?;
    columns.add("SHIPMENT_TYPE", schema::columns::SHIPMENT_TYPE)?;
    columns.add("AJ", schema::columns::AJ)?;
    columns.add("AK", schema::columns::AK)?;
    columns.add("N_AJ", schema::stats::N_AJ)?;
    columns.add("N_AK", schema::stats::N_AK)?;
    columns.add("ROW_COUNT", schema::stats::ROW_COUNT)?;
    m.add_submodule(&columns)?;

    // Summary cases
    let cases = PyModule::new(m.py(), "cases")?;
    cases.add("TOTAL_CONTAINER_ROWS", schema::cases::TOTAL_CONTAINER_ROWS)?;
    cases.add("UNIQUE_BOLS", schema::cases::UNIQUE_BOLS)?;
    cases.add("BOLS_SAME_AJ", schema::cases::BOLS_SAME_AJ)?;
    cases.add("BOLS_DIFFERENT_AJ", schema::cases::BOLS_DIFFERENT_AJ)?;
    cases.add("BOLS_SAME_AK", schema::cases::BOLS_SAME_AK)?;
    cases.add("BOLS_DIFFERENT_AK", schema::cases::BOLS_DIFFERENT_AK)?;
    m.add_submodule(&cases)?;

    // Archive members
    let members = PyModule::new(m.py(), "members")?;
    members.add("ALL", schema::members::ALL.to_vec())?;
    members.add("DEFAULT_ARCHIVE_NAME", schema::members::DEFAULT_ARCHIVE_NAME)?;
    m.add_submodule(&members)?;

    Ok(())
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyConsistencyAnalyzer>()?;
    m.add_class::<PyAnalysisResult>()?;
    m.add_function(wrap_pyfunction!(py_empty_warning, m)?)?;
    m.add("SUCCESS_MESSAGE", report::SUCCESS_MESSAGE)?;
    add_schema_exports(m)?;
    Ok(())
}
