//! File persistence for the directory and the wait-time archive.
//!
//! Every entity has one fixed column schema shared by its CSV and JSON
//! renditions; field order and naming are the wire contract for downstream
//! consumers.

mod archive;
mod directory;

pub use archive::{
    merge_samples, read_archive_json, write_samples_csv, write_samples_json, SAMPLE_COLUMNS,
};
pub use directory::{
    read_directory_json, write_directory_csv, write_directory_json, write_locations_geojson,
    DIRECTORY_COLUMNS,
};

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}
