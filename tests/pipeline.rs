use anyhow::Result;
use draftforge::candidates::parse_generated;
use draftforge::model::Assignment;
use draftforge::solver::{
    AnnealingSolver, Credentials, ExhaustiveSolver, SolveResult, Solution, SolverBackend,
    SolverError,
};
use draftforge::{
    Candidate, CandidatePool, DynSolver, Polynomial, SelectionMode, SelectionRequest, Selector,
    SelectorConfig, SolverAdapter, SolverConfig, TargetParams,
};
use std::sync::Arc;
use std::time::Duration;

/// Ignores the expression and selects the prefix whose cumulative length is
/// nearest the target.
struct NearestPrefixSolver {
    lengths: Vec<usize>,
    target: usize,
}

impl SolverAdapter for NearestPrefixSolver {
    fn name(&self) -> &str {
        "nearest-prefix"
    }

    fn solve(
        &self,
        objective: &Polynomial,
        _credentials: &Credentials,
        _budget: Duration,
    ) -> Result<SolveResult, SolverError> {
        let mut best = (usize::MAX, 0);
        let mut total = 0;
        for (n, len) in std::iter::once(0).chain(self.lengths.iter().copied()).enumerate() {
            total += len;
            let gap = total.abs_diff(self.target);
            if gap < best.0 {
                best = (gap, n);
            }
        }
        let bits: Vec<bool> = (0..self.lengths.len()).map(|i| i < best.1).collect();
        let assignment = Assignment::from_bits(&bits);
        Ok(SolveResult::from_solutions(vec![Solution {
            objective: objective.evaluate(&assignment),
            assignment,
            elapsed: Duration::from_millis(1),
        }]))
    }
}

fn texts(lengths: &[usize]) -> Vec<Candidate> {
    lengths
        .iter()
        .enumerate()
        .map(|(i, len)| Candidate::new(i as i64, "x".repeat(*len), "Scene Craft").with_relevance(0.7))
        .collect()
}

#[test]
fn stub_solver_wiring_reaches_length_target() -> Result<()> {
    let lengths = vec![50, 80, 120];
    let stub: DynSolver = Arc::new(NearestPrefixSolver {
        lengths: lengths.clone(),
        target: 150,
    });
    let selector = Selector::new(SelectorConfig::default(), Some(stub));
    let request = SelectionRequest::new(texts(&lengths), TargetParams::default().with_length(150.0))
        .with_token("test-token");

    let first = selector.run_parameter_selection(request.clone())?;
    let second = selector.run_parameter_selection(request)?;

    let flags: Vec<bool> = first.candidates.iter().map(|c| c.selected).collect();
    assert_eq!(flags, vec![true, true, false]);
    assert_eq!(first.candidates.len(), 3);

    let gap = first.summary.length_delta.abs();
    assert!(gap < (250.0f64 - 150.0).abs());
    assert!(gap < 150.0);

    assert_eq!(first.candidates, second.candidates);
    assert_eq!(first.solver, "nearest-prefix");
    assert_eq!(first.trace.len(), 1);
    Ok(())
}

#[test]
fn json_request_round_trip_with_exhaustive_solver() -> Result<()> {
    let request: SelectionRequest = serde_json::from_value(serde_json::json!({
        "candidates": [
            {"id": 0, "text": "a".repeat(600), "type": "Scene Craft", "relevance": "0.9",
             "attributes": {"tension": 0.8}},
            {"id": 1, "text": "b".repeat(900), "type": "Character Dynamics", "relevance": null,
             "attributes": {"char_voice": "loud"}, "selected": "yes"},
            {"id": 2, "text": "c".repeat(400), "type": "Scene Craft", "relevance": 0.9,
             "attributes": {"tension": 0.8}}
        ],
        "params": {"p_tension": 0.8, "length": 1000}
    }))?;
    assert_eq!(request.candidates[0].relevance, 0.9);
    assert_eq!(request.candidates[1].relevance, 0.5);
    assert_eq!(request.candidates[1].attribute("char_voice"), 0.5);
    assert!(request.candidates[1].selected);

    let solver = SolverConfig::default().with_backend(SolverBackend::Exhaustive);
    let selector = Selector::from_configs(SelectorConfig::default(), &solver);
    let response = selector.select(SelectionMode::Parameter, request)?;

    // {0, 2} lands exactly on 1000 characters with the two best-fitting candidates.
    let flags: Vec<bool> = response.candidates.iter().map(|c| c.selected).collect();
    assert_eq!(flags, vec![true, false, true]);
    assert!(response.summary.within_tolerance);

    let json = serde_json::to_value(&response)?;
    for key in ["candidates", "trace", "scales", "summary"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["candidates"][0]["type"], "Scene Craft");
    assert_eq!(json["scales"]["constraint"], 1.0);
    Ok(())
}

#[test]
fn intake_adopt_and_custom_selection() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let pool_path = dir.path().join("pool.json");

    let reply = format!(
        "```json\n[{{\"type\": \"Scene Craft\", \"text\": \"{}\", \"scores\": {{\"relevance\": 0.5}}}},\
         {{\"type\": \"Scene Craft\", \"text\": \"{}\", \"scores\": {{\"relevance\": 0.5}}}},\
         {{\"type\": \"Scene Craft\", \"text\": \"{}\", \"scores\": {{\"relevance\": 0.5}}}}]\n```",
        "p".repeat(50),
        "q".repeat(80),
        "r".repeat(120)
    );
    let mut pool = CandidatePool::load_from_file(&pool_path)?;
    pool.append(parse_generated(&reply)?)?;
    assert!(pool.set_adoption(0, true));
    pool.save_to_file(&pool_path)?;

    let pool = CandidatePool::load_from_file(&pool_path)?;
    assert_eq!(pool.len(), 3);

    let solver: DynSolver = Arc::new(ExhaustiveSolver::new());
    let selector = Selector::new(SelectorConfig::default(), Some(solver));
    let request = SelectionRequest::new(
        pool.into_candidates(),
        TargetParams::default().with_length(140.0),
    );

    let response = selector.run_custom_selection(request)?;
    let flags: Vec<bool> = response.candidates.iter().map(|c| c.selected).collect();
    assert_eq!(flags, vec![true, true, false]);
    Ok(())
}

#[test]
fn seeded_annealing_matches_exhaustive_on_small_pool() -> Result<()> {
    let candidates = texts(&[50, 80, 120]);
    let params = TargetParams::default().with_length(140.0);

    let exact: DynSolver = Arc::new(ExhaustiveSolver::new());
    let anneal: DynSolver = Arc::new(AnnealingSolver::new(7));

    let exact = Selector::new(SelectorConfig::default(), Some(exact))
        .run_parameter_selection(SelectionRequest::new(candidates.clone(), params.clone()))?;
    let annealed = Selector::new(SelectorConfig::default(), Some(anneal))
        .run_parameter_selection(SelectionRequest::new(candidates, params))?;

    assert_eq!(exact.candidates, annealed.candidates);
    Ok(())
}
