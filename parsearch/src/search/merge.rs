use crate::errors::{SearchError, SearchResult};

/// Concatenates per-task results, given in partition order, into one list.
///
/// Each task reports only offsets inside its own partition, in ascending order,
/// so concatenation is already sorted and free of duplicates. A position that
/// does not strictly increase means partitioning went wrong.
pub fn merge(results: Vec<Vec<usize>>) -> SearchResult<Vec<usize>> {
    let total = results.iter().map(Vec::len).sum();
    let mut merged: Vec<usize> = Vec::with_capacity(total);

    for (task, positions) in results.into_iter().enumerate() {
        if let (Some(&last), Some(&first)) = (merged.last(), positions.first()) {
            if first <= last {
                return Err(SearchError::invariant_violation(format!(
                    "task {} reported position {} after position {}",
                    task, first, last
                )));
            }
        }
        if positions.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SearchError::invariant_violation(format!(
                "task {} returned unordered positions",
                task
            )));
        }
        merged.extend(positions);
    }

    Ok(merged)
}
