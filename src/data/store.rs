use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::Result;

use super::loader::load_dataset;
use super::model::Table;
use super::schema::Schema;

/// The two base tables, read-only for the rest of the process.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub employees: Table,
    pub happiness: Table,
}

/// Source files for [`Datasets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub employees: PathBuf,
    pub happiness: PathBuf,
}

/// Init-once holder for the base tables.
///
/// The first successful [`DatasetStore::load`] reads both files; every later
/// call hands back the same `Arc`. A failed load leaves the store empty so
/// the next call tries again.
#[derive(Debug)]
pub struct DatasetStore {
    paths: DatasetPaths,
    cell: OnceLock<Arc<Datasets>>,
}

impl DatasetStore {
    pub fn new(paths: DatasetPaths) -> Self {
        Self {
            paths,
            cell: OnceLock::new(),
        }
    }

    pub fn paths(&self) -> &DatasetPaths {
        &self.paths
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn load(&self) -> Result<Arc<Datasets>> {
        if let Some(datasets) = self.cell.get() {
            return Ok(Arc::clone(datasets));
        }
        let datasets = Arc::new(read_datasets(&self.paths.employees, &self.paths.happiness)?);
        Ok(Arc::clone(self.cell.get_or_init(|| datasets)))
    }
}

fn read_datasets(employees: &Path, happiness: &Path) -> Result<Datasets> {
    Ok(Datasets {
        employees: load_dataset(employees, &Schema::employees())?,
        happiness: load_dataset(happiness, &Schema::happiness())?,
    })
}
