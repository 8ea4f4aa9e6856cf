//! Optimal pass/fail split for a worker run.
//!
//! A worker's output mixes samples that met the benchmark's target (passes)
//! with samples that did not (fails). The representative throughput of the
//! run is the threshold that best separates the two groups: passes should sit
//! at or above it, fails below it.

/// Compute the threshold that best separates `passes` from `fails`.
///
/// Candidates are the values present in either slice. A candidate `t`
/// misclassifies every pass with value `< t` and every fail with value
/// `>= t`; the candidate with the fewest misclassifications wins, and ties go
/// to the lowest candidate.
///
/// Degenerate inputs never fail:
/// - no fails: the smallest pass
/// - no passes: one more than the largest fail
/// - both empty: `0`
#[must_use]
pub fn find_optimal_split(passes: &[i64], fails: &[i64]) -> i64 {
    if passes.is_empty() {
        return fails.iter().max().map_or(0, |max| max.saturating_add(1));
    }

    let mut points: Vec<(i64, bool)> = passes
        .iter()
        .map(|&v| (v, true))
        .chain(fails.iter().map(|&v| (v, false)))
        .collect();
    points.sort_unstable();

    let mut best = points[0].0;
    let mut best_misclassified = usize::MAX;
    let mut passes_below = 0usize;
    let mut fails_below = 0usize;

    let mut i = 0;
    while i < points.len() {
        let candidate = points[i].0;
        let misclassified = passes_below + (fails.len() - fails_below);
        if misclassified < best_misclassified {
            best_misclassified = misclassified;
            best = candidate;
        }

        while i < points.len() && points[i].0 == candidate {
            if points[i].1 {
                passes_below += 1;
            } else {
                fails_below += 1;
            }
            i += 1;
        }
    }

    best
}

/// Count the samples a threshold misclassifies.
#[must_use]
pub fn misclassified(passes: &[i64], fails: &[i64], threshold: i64) -> usize {
    passes.iter().filter(|&&p| p < threshold).count()
        + fails.iter().filter(|&&f| f >= threshold).count()
}
