//! Fold storage for origami
//!
//! The store is the only component that touches persisted state. Layout:
//! - `state.json`: the fold log, read and written as a whole
//! - `folds/fold-NNN.md`: one detail blob per fold
//! - `config.toml`: optional configuration
//!
//! Default location: `.origami/` under the project root.

mod io;
pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{OrigamiError, Result};
use crate::fold::{Fold, FoldId, FoldLog, FoldStatus, LOG_FORMAT_VERSION};
use crate::tokens::TokenEstimator;
use crate::transcript::Section;
use paths::{CONFIG_FILE, FOLDS_DIR, STATE_FILE};

/// Durable fold log plus detail blobs
#[derive(Debug, Clone)]
pub struct FoldStore {
    /// Root path of the store
    root: PathBuf,
    /// Estimator for logs created by this store
    estimator: TokenEstimator,
}

impl FoldStore {
    /// Open a store rooted at `root`. Nothing is created until the first write.
    pub fn open(root: &Path, estimator: TokenEstimator) -> Self {
        Self {
            root: root.to_path_buf(),
            estimator,
        }
    }

    /// Get the store root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the fold log path
    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    /// Get the detail blob directory
    pub fn folds_dir(&self) -> PathBuf {
        self.root.join(FOLDS_DIR)
    }

    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Path of the detail blob for a fold id
    pub fn detail_path(&self, id: FoldId) -> PathBuf {
        self.folds_dir().join(id.detail_file_name())
    }

    /// Load the fold log.
    ///
    /// A missing or undecodable document yields a fresh empty log. A document
    /// that decodes but breaks the log invariants is an `InvalidStore` error.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self) -> Result<FoldLog> {
        let path = self.state_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no fold log yet, starting empty");
                return Ok(FoldLog::new(self.estimator));
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "unreadable fold log, starting empty");
                return Ok(FoldLog::new(self.estimator));
            }
        };

        let mut log: FoldLog = match serde_json::from_str(&content) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "malformed fold log, starting empty");
                // Adopt the on-disk stamp so the next save replaces the broken document
                let mut log = FoldLog::new(self.estimator);
                log.set_revision(io::read_revision(&path));
                return Ok(log);
            }
        };

        if log.version() > LOG_FORMAT_VERSION {
            return Err(OrigamiError::InvalidStore {
                path: path.clone(),
                reason: format!(
                    "fold log version {} is newer than supported version {}",
                    log.version(),
                    LOG_FORMAT_VERSION
                ),
            });
        }

        log.validate_loaded()
            .map_err(|reason| OrigamiError::InvalidStore {
                path: path.clone(),
                reason,
            })?;

        if log.estimator() != self.estimator {
            tracing::debug!(
                pinned = log.estimator().chars_per_token(),
                configured = self.estimator.chars_per_token(),
                "fold log keeps its pinned token estimator"
            );
        }

        tracing::debug!(folds = log.len(), revision = log.revision(), "loaded fold log");
        Ok(log)
    }

    /// Persist the whole log, replacing what is on disk.
    ///
    /// Fails with `StoreConflict` if another writer saved since `log` was
    /// loaded; nothing is written in that case.
    #[tracing::instrument(skip(self, log), fields(root = %self.root.display(), folds = log.len()))]
    pub fn save(&self, log: &mut FoldLog) -> Result<()> {
        let path = self.state_path();
        let found = io::read_revision(&path);
        if found != log.revision() {
            return Err(OrigamiError::StoreConflict {
                expected: log.revision(),
                found,
            });
        }

        log.recompute_totals();
        let previous = log.revision();
        log.set_revision(previous + 1);

        let written = serde_json::to_string_pretty(log)
            .map_err(OrigamiError::from)
            .and_then(|json| io::write_atomic(&path, json.as_bytes()));

        if let Err(e) = written {
            log.set_revision(previous);
            return Err(e);
        }

        tracing::debug!(revision = log.revision(), "saved fold log");
        Ok(())
    }

    /// Record a section as a new fold.
    ///
    /// Writes the detail blob, then appends the fold to `log` with the next
    /// sequential id and initial status `folded`. The log itself is not saved.
    pub fn create_fold(
        &self,
        log: &mut FoldLog,
        section: &Section,
        summary: impl Into<String>,
    ) -> Result<Fold> {
        let id = log.next_id();
        if section.turn_range.start <= log.last_turn() || section.turn_range.is_empty() {
            return Err(OrigamiError::invalid_value(
                "turn range",
                format!(
                    "{} (log already covers turns up to {})",
                    section.turn_range,
                    log.last_turn()
                ),
            ));
        }

        let estimator = log.estimator();
        let summary = summary.into();
        io::write_atomic(&self.detail_path(id), section.content.as_bytes())?;

        let fold = Fold {
            id,
            status: FoldStatus::Folded,
            summary_tokens: estimator.estimate(&summary),
            summary,
            detail_tokens: estimator.estimate(&section.content),
            detail_file: format!("{}/{}", FOLDS_DIR, id.detail_file_name()),
            turn_range: section.turn_range,
            timestamp: Utc::now(),
            relevance_score: 0.0,
            files_touched: section.files_touched.clone(),
            tags: Default::default(),
        };

        tracing::debug!(
            %id,
            range = %fold.turn_range,
            detail_tokens = fold.detail_tokens,
            "created fold"
        );
        log.push(fold).cloned()
    }

    /// Look up a fold by id
    pub fn get<'a>(&self, log: &'a FoldLog, id: FoldId) -> Result<&'a Fold> {
        log.get(id).ok_or(OrigamiError::FoldNotFound { id })
    }

    /// Set a fold's status
    pub fn set_status<'a>(
        &self,
        log: &'a mut FoldLog,
        id: FoldId,
        status: FoldStatus,
    ) -> Result<&'a Fold> {
        let fold = log.get_mut(id)?;
        fold.status = status;
        Ok(fold)
    }

    /// Replace a fold's summary and recompute token accounting
    pub fn set_summary<'a>(
        &self,
        log: &'a mut FoldLog,
        id: FoldId,
        summary: impl Into<String>,
    ) -> Result<&'a Fold> {
        let estimator = log.estimator();
        let fold = log.get_mut(id)?;
        fold.summary = summary.into();
        fold.summary_tokens = estimator.estimate(&fold.summary);
        log.recompute_totals();
        self.get(log, id)
    }

    /// Set a fold's relevance score, which must lie in [0, 1]
    pub fn set_relevance<'a>(
        &self,
        log: &'a mut FoldLog,
        id: FoldId,
        score: f64,
    ) -> Result<&'a Fold> {
        let fold = log.get_mut(id)?;
        if !(0.0..=1.0).contains(&score) {
            return Err(OrigamiError::invalid_value("relevance score", score));
        }
        fold.relevance_score = score;
        Ok(fold)
    }

    /// Read a fold's full detail text
    pub fn read_detail(&self, id: FoldId) -> Result<String> {
        let path = self.detail_path(id);
        match fs::read_to_string(&path) {
            Ok(detail) => Ok(detail),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OrigamiError::DetailMissing { id })
            }
            Err(e) => Err(OrigamiError::io_operation("read", path.display(), e)),
        }
    }

    /// Delete the fold log and every detail blob. Configuration is kept.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub fn clear(&self) -> Result<()> {
        io::remove_file_if_exists(&self.state_path())?;
        io::remove_dir_if_exists(&self.folds_dir())?;
        tracing::info!("cleared fold log and detail blobs");
        Ok(())
    }
}
