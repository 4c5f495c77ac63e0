pub mod archive;
pub mod classifier;
pub mod error;
pub mod loader;
pub mod mapping;
pub mod report;
pub mod schema;
pub mod summary;

#[cfg(feature = "python")]
mod python;

pub use archive::{build_archive, to_csv_bytes, ArchiveSink, ZipSink};
pub use classifier::{
    classify, classify_with, Analysis, BolStat, ClassifiedTables, ClassifierOptions, Consistency,
};
pub use error::ConsistencyError;
pub use loader::{read_csv_bytes, read_csv_path, LoadStatus};
pub use mapping::{PartialRoleMapping, Role, RoleMapping};
pub use summary::SummaryCounts;

#[cfg(feature = "python")]
#[pyo3::pymodule]
#[pyo3(name = "_core")]
fn bol_consistency_core(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    python::register(m)
}
