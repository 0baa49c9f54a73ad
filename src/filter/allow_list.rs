use crate::error::{CatError, Result};
use clap::ValueEnum;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const READ_ID_COLUMN: usize = 4;
const DECISION_COLUMN: usize = 6;

/// Adaptive-sampling decision recorded for a read in the decision log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Decision {
    #[value(name = "unblock")]
    Unblock,
    #[value(name = "unblock_hit_outside_bed")]
    UnblockHitOutsideBed,
    #[value(name = "stop_receiving")]
    StopReceiving,
    #[value(name = "no_decision")]
    NoDecision,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Unblock => "unblock",
            Decision::UnblockHitOutsideBed => "unblock_hit_outside_bed",
            Decision::StopReceiving => "stop_receiving",
            Decision::NoDecision => "no_decision",
        }
    }
}

/// Where the allowed read ids come from.
#[derive(Debug, Clone, Default)]
pub struct AllowListSources {
    pub read_id_file: Option<PathBuf>,
    pub decision_log: Option<PathBuf>,
    pub decisions: Vec<Decision>,
}

impl AllowListSources {
    /// The decision log and its accepted labels come as a pair.
    pub fn validate(&self) -> Result<()> {
        if self.decision_log.is_some() != !self.decisions.is_empty() {
            return Err(CatError::invalid_parameter(
                "filter-as",
                "--filter-as-state and --filter-as must either be both specified or both skipped",
            ));
        }
        Ok(())
    }

    /// `None` when no source is configured. `Some` of an empty set rejects every read.
    pub fn load(&self) -> Result<Option<AllowList>> {
        self.validate()?;

        let mut allowed: Option<AllowList> = None;
        if let Some(path) = &self.read_id_file {
            let ids = load_read_ids(path)?;
            log::info!("Found {} read ids.", ids.len());
            allowed.get_or_insert_with(AllowList::default).extend(ids);
        }
        if let Some(path) = &self.decision_log {
            let ids = load_decision_log(path, &self.decisions)?;
            let labels: Vec<&str> = self.decisions.iter().map(Decision::as_str).collect();
            log::info!("Found {} reads with {:?}.", ids.len(), labels);
            allowed.get_or_insert_with(AllowList::default).extend(ids);
        }
        Ok(allowed)
    }
}

/// Read ids allowed through to the output.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ids: HashSet<String>,
}

impl AllowList {
    pub fn contains(&self, read_id: &str) -> bool {
        self.ids.contains(read_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Extend<String> for AllowList {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}

impl FromIterator<String> for AllowList {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| CatError::io(path, e))
}

/// One read id per line; surrounding whitespace and blank lines are dropped.
pub fn load_read_ids(path: &Path) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    for line in open(path)?.lines() {
        let line = line.map_err(|e| CatError::io(path, e))?;
        let read_id = line.trim();
        if !read_id.is_empty() {
            ids.insert(read_id.to_string());
        }
    }
    Ok(ids)
}

/// Read ids of decision-log rows whose decision is one of `accepted`.
pub fn load_decision_log(path: &Path, accepted: &[Decision]) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    for (index, line) in open(path)?.lines().enumerate() {
        let line = line.map_err(|e| CatError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cols: Vec<&str> = line.split(',').collect();
        if cols.len() <= DECISION_COLUMN {
            return Err(CatError::DecisionLog {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!(
                    "expected at least {} columns, found {}",
                    DECISION_COLUMN + 1,
                    cols.len()
                ),
            });
        }

        let decision = cols[DECISION_COLUMN];
        if accepted.iter().any(|d| d.as_str() == decision) {
            ids.insert(cols[READ_ID_COLUMN].to_string());
        }
    }
    Ok(ids)
}
