//! # Earth orientation provider
//!
//! [`EopProvider`] owns the Earth orientation table of a [`PosAngle`](crate::posangle::PosAngle)
//! context. The table is read from its [`EopSource`] on first use and cached; later calls
//! share the same [`Arc<EopTable>`].
//!
//! ## Reloading
//!
//! [`EopProvider::reload`] builds a complete new table before publishing it. Readers holding
//! the previous `Arc` keep a consistent snapshot, new readers see the new table, and nobody
//! ever observes a mix of both. A failed reload leaves the current table in place.
//!
//! ## Source descriptors
//!
//! | descriptor        | reader                                                            |
//! |-------------------|-------------------------------------------------------------------|
//! | `finals:<path>`   | [`read_finals`](crate::eop::finals_reader::read_finals)           |
//! | `csv:<path>`      | [`read_csv`](crate::eop::csv_reader::read_csv)                    |
//!
//! ```rust, no_run
//! use posangle::eop::provider::EopProvider;
//!
//! let provider = EopProvider::new("finals:data/finals2000A.all").unwrap();
//! let values = provider.lookup(41732.5).unwrap();
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use camino::Utf8PathBuf;
use tracing::{debug, info, warn};

use super::csv_reader::read_csv;
use super::finals_reader::read_finals;
use super::{EopDataError, EopRecord, EopTable, EopValues};
use crate::constants::{DEFAULT_MAX_EOP_GAP, MJD};
use crate::posangle_errors::PosAngleError;

/// Where the Earth orientation records come from.
#[derive(Debug, Clone, PartialEq)]
pub enum EopSource {
    /// IERS `finals2000A` fixed-width file
    Finals(Utf8PathBuf),
    /// Headered CSV file
    Csv(Utf8PathBuf),
    /// Records supplied in memory
    Records(Vec<EopRecord>),
}

impl EopSource {
    /// Read the raw records of the source, in source order.
    pub fn read_records(&self) -> Result<Vec<EopRecord>, EopDataError> {
        match self {
            EopSource::Finals(path) => read_finals(path),
            EopSource::Csv(path) => read_csv(path),
            EopSource::Records(records) => Ok(records.clone()),
        }
    }

    /// Read and validate the source into a table.
    pub fn build_table(&self, max_gap: f64) -> Result<EopTable, PosAngleError> {
        let table = EopTable::from_records(self.read_records()?)?.with_max_gap(max_gap)?;
        let (first, last) = table.coverage();
        debug!(
            source = %self,
            records = table.len(),
            first,
            last,
            "Earth orientation table built"
        );
        Ok(table)
    }
}

impl FromStr for EopSource {
    type Err = EopDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || EopDataError::UnknownSource(s.to_string());
        let (kind, path) = s.split_once(':').ok_or_else(unknown)?;
        let path = path.trim();
        if path.is_empty() {
            return Err(unknown());
        }

        match kind.trim().to_ascii_lowercase().as_str() {
            "finals" => Ok(EopSource::Finals(path.into())),
            "csv" => Ok(EopSource::Csv(path.into())),
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<&str> for EopSource {
    type Error = EopDataError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EopSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EopSource::Finals(path) => write!(f, "finals:{path}"),
            EopSource::Csv(path) => write!(f, "csv:{path}"),
            EopSource::Records(records) => write!(f, "<{} in-memory records>", records.len()),
        }
    }
}

/// Lazily loaded, atomically reloadable Earth orientation table.
#[derive(Debug)]
pub struct EopProvider {
    source: EopSource,
    max_gap: f64,
    table: RwLock<Option<Arc<EopTable>>>,
    // serializes loads so that concurrent first uses read the source once
    loader: Mutex<()>,
}

impl EopProvider {
    /// Create a provider from a source descriptor (`finals:<path>` or `csv:<path>`).
    ///
    /// Nothing is read yet; the source is opened on the first lookup or on [`EopProvider::load`].
    pub fn new(source: &str) -> Result<Self, PosAngleError> {
        Ok(Self::from_source(source.try_into()?))
    }

    pub fn from_source(source: EopSource) -> Self {
        EopProvider {
            source,
            max_gap: DEFAULT_MAX_EOP_GAP,
            table: RwLock::new(None),
            loader: Mutex::new(()),
        }
    }

    /// Create a provider around an already built table.
    ///
    /// The records of the table become the source of later reloads.
    pub fn from_table(table: EopTable) -> Self {
        let max_gap = table.max_gap();
        EopProvider {
            source: EopSource::Records(table.records().to_vec()),
            max_gap,
            table: RwLock::new(Some(Arc::new(table))),
            loader: Mutex::new(()),
        }
    }

    /// Set the largest spacing (days) allowed between two bracketing records.
    ///
    /// Takes effect at the next load; an already loaded table is dropped.
    pub fn with_max_gap(self, max_gap: f64) -> Result<Self, PosAngleError> {
        if !(max_gap.is_finite() && max_gap > 0.0) {
            return Err(PosAngleError::InvalidParameter(format!(
                "max_gap must be a positive number of days, got {max_gap}"
            )));
        }
        Ok(EopProvider {
            max_gap,
            table: RwLock::new(None),
            ..self
        })
    }

    pub fn source(&self) -> &EopSource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    fn current(&self) -> Option<Arc<EopTable>> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, table: Arc<EopTable>) {
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Some(table);
    }

    /// Load the table if it is absent, then return a snapshot of it.
    ///
    /// Concurrent first calls build exactly one table.
    pub fn load(&self) -> Result<Arc<EopTable>, PosAngleError> {
        if let Some(table) = self.current() {
            return Ok(table);
        }

        let _guard = self.loader.lock().unwrap_or_else(PoisonError::into_inner);
        // another thread may have finished loading while we waited
        if let Some(table) = self.current() {
            return Ok(table);
        }

        let table = Arc::new(self.source.build_table(self.max_gap)?);
        let (first, last) = table.coverage();
        info!(
            source = %self.source,
            records = table.len(),
            first,
            last,
            "Earth orientation table loaded"
        );
        self.publish(Arc::clone(&table));
        Ok(table)
    }

    /// Current table, reading the source if this is the first use.
    pub fn snapshot(&self) -> Result<Arc<EopTable>, PosAngleError> {
        self.load()
    }

    /// Re-read the source and atomically replace the current table.
    ///
    /// Return
    /// ------
    /// * the new table, or the load error. On error the previous table, if any, stays in use.
    pub fn reload(&self) -> Result<Arc<EopTable>, PosAngleError> {
        let _guard = self.loader.lock().unwrap_or_else(PoisonError::into_inner);

        match self.source.build_table(self.max_gap) {
            Ok(table) => {
                let table = Arc::new(table);
                let (first, last) = table.coverage();
                info!(
                    source = %self.source,
                    records = table.len(),
                    first,
                    last,
                    "Earth orientation table reloaded"
                );
                self.publish(Arc::clone(&table));
                Ok(table)
            }
            Err(err) => {
                warn!(
                    source = %self.source,
                    error = %err,
                    kept_previous = self.is_loaded(),
                    "Earth orientation reload failed"
                );
                Err(err)
            }
        }
    }

    /// Interpolated Earth orientation parameters at `epoch_mjd`, see [`EopTable::lookup`].
    pub fn lookup(&self, epoch_mjd: MJD) -> Result<EopValues, PosAngleError> {
        self.snapshot()?.lookup(epoch_mjd)
    }
}
