//! Ordered candidate collection kept between selection runs.

use crate::candidate::Candidate;
use crate::error::PoolError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidatePool {
    candidates: Vec<Candidate>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }

    /// Append a freshly generated batch, numbering it after the current
    /// highest id so ids stay unique.
    ///
    /// Fails without modifying the pool when the batch would not fit below
    /// `i64::MAX`.
    pub fn append(&mut self, batch: Vec<Candidate>) -> Result<(), PoolError> {
        if batch.is_empty() {
            return Ok(());
        }

        let max_id = self.candidates.iter().map(|c| c.id).max();
        let first = match max_id {
            Some(max) => max.checked_add(1),
            None => Some(0),
        };
        let last = first.and_then(|first| {
            i64::try_from(batch.len() - 1)
                .ok()
                .and_then(|extra| first.checked_add(extra))
        });
        let (Some(mut next_id), Some(_)) = (first, last) else {
            return Err(PoolError::IdSpaceExhausted {
                max_id: max_id.unwrap_or_default(),
                incoming: batch.len(),
            });
        };

        for mut candidate in batch {
            candidate.id = next_id;
            next_id = next_id.saturating_add(1);
            self.candidates.push(candidate);
        }
        Ok(())
    }

    /// Swap the whole pool for a new one, e.g. the candidates of a selection response.
    pub fn replace_all(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
    }

    /// Mark a candidate as endorsed (or not). Returns `false` for an unknown id.
    pub fn set_adoption(&mut self, id: i64, adopted: bool) -> bool {
        match self.candidates.iter_mut().find(|c| c.id == id) {
            Some(candidate) => {
                candidate.user_adopted = adopted;
                true
            }
            None => {
                debug!(id, "adoption update for unknown candidate");
                false
            }
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(|c| c.selected)
    }

    pub fn selected_length(&self) -> usize {
        self.selected().map(Candidate::char_len).sum()
    }

    pub fn load_from_file(path: &Path) -> Result<Self, PoolError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let data = fs::read(path)?;
        let pool = serde_json::from_slice(&data)?;
        Ok(pool)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), PoolError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let blob = serde_json::to_vec_pretty(self)?;
        fs::write(path, blob)?;
        Ok(())
    }
}
