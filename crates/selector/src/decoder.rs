//! Map a solver assignment back onto candidates.

use draftforge_candidates::Candidate;
use draftforge_model::Assignment;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Set `selected` on every candidate from `assignment`.
///
/// Total: a variable that is missing or unreadable leaves its candidate
/// unselected instead of failing the batch. Returns the number selected.
pub fn decode_selection(candidates: &mut [Candidate], assignment: Option<&Assignment>) -> usize {
    let mut selected = 0;
    for (index, candidate) in candidates.iter_mut().enumerate() {
        let bit = assignment.and_then(|a| a.bit(index));
        if bit.is_none() {
            debug!(index, id = candidate.id, "decision variable unreadable; leaving unselected");
        }
        candidate.selected = bit.unwrap_or(false);
        if candidate.selected {
            selected += 1;
        }
    }
    selected
}

/// How close the selection came to the length target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub selected_count: usize,
    pub selected_length: usize,
    pub target_length: f64,
    /// `selected_length - target_length`
    pub length_delta: f64,
    /// Within ten characters of the target.
    pub within_tolerance: bool,
}

impl SelectionSummary {
    pub const TOLERANCE: f64 = 10.0;

    pub fn from_candidates(candidates: &[Candidate], target_length: f64) -> Self {
        let selected: Vec<&Candidate> = candidates.iter().filter(|c| c.selected).collect();
        let selected_length: usize = selected.iter().map(|c| c.char_len()).sum();
        let length_delta = selected_length as f64 - target_length;
        Self {
            selected_count: selected.len(),
            selected_length,
            target_length,
            length_delta,
            within_tolerance: length_delta.abs() < Self::TOLERANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate::new(i as i64, "x".repeat(10 * (i + 1)), "Scene Craft"))
            .collect()
    }

    #[test]
    fn test_decode_sets_flags_in_order() {
        let mut cs = candidates(3);
        cs[0].selected = true;
        let assignment = Assignment::from_bits(&[false, true, true]);
        let count = decode_selection(&mut cs, Some(&assignment));

        assert_eq!(count, 2);
        let flags: Vec<bool> = cs.iter().map(|c| c.selected).collect();
        assert_eq!(flags, vec![false, true, true]);
    }

    #[test]
    fn test_unreadable_variables_default_to_unselected() {
        let mut cs = candidates(4);
        let mut assignment = Assignment::new();
        assignment.set(0, 1.0);
        assignment.set(1, f64::NAN);
        // 2 is missing entirely
        assignment.set(3, 0.9);

        decode_selection(&mut cs, Some(&assignment));
        let flags: Vec<bool> = cs.iter().map(|c| c.selected).collect();
        assert_eq!(flags, vec![true, false, false, true]);

        let count = decode_selection(&mut cs, None);
        assert_eq!(count, 0);
        assert!(cs.iter().all(|c| !c.selected));
    }

    #[test]
    fn test_summary() {
        let mut cs = candidates(3);
        cs[0].selected = true;
        cs[2].selected = true;
        let summary = SelectionSummary::from_candidates(&cs, 45.0);
        assert_eq!(summary.selected_count, 2);
        assert_eq!(summary.selected_length, 40);
        assert_eq!(summary.length_delta, -5.0);
        assert!(summary.within_tolerance);
    }
}
