use std::ops::Range;
use tracing::trace;

use crate::errors::{SearchError, SearchResult};

/// A slice of the buffer assigned to one task.
///
/// `owned` is the range whose match starts this partition reports. `search`
/// starts at the same offset but extends up to `pattern_len - 1` bytes further,
/// clamped to the text length, so a match starting near the end of `owned` is
/// still seen in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub owned: Range<usize>,
    pub search: Range<usize>,
}

impl Partition {
    /// A single partition covering the whole text with no widening
    pub fn whole(len: usize) -> Self {
        Self {
            owned: 0..len,
            search: 0..len,
        }
    }

    fn widened(owned: Range<usize>, pattern_len: usize, len: usize) -> Self {
        let search_end = (owned.end + pattern_len - 1).min(len);
        Self {
            search: owned.start..search_end,
            owned,
        }
    }

    /// Whether a match starting at `pos` belongs to this partition
    pub fn owns(&self, pos: usize) -> bool {
        self.owned.contains(&pos)
    }
}

/// Splits `[0, len)` into `task_count` contiguous partitions.
///
/// Every partition owns `len / task_count` bytes; the first
/// `len % task_count` partitions own one extra.
pub fn partition(len: usize, pattern_len: usize, task_count: usize) -> SearchResult<Vec<Partition>> {
    if task_count == 0 {
        return Err(SearchError::invalid_configuration(
            "number of tasks must be positive",
        ));
    }
    if pattern_len == 0 {
        return Err(SearchError::invalid_configuration("pattern is empty"));
    }
    if pattern_len > len {
        return Err(SearchError::invalid_configuration(format!(
            "pattern of length {} is longer than text of length {}",
            pattern_len, len
        )));
    }
    if task_count > len {
        return Err(SearchError::invalid_configuration(format!(
            "{} tasks requested for text of length {}",
            task_count, len
        )));
    }

    let quotient = len / task_count;
    let remainder = len % task_count;

    let mut partitions = Vec::with_capacity(task_count);
    let mut start = 0;
    for i in 0..task_count {
        let size = if i < remainder { quotient + 1 } else { quotient };
        let end = start + size;
        let partition = Partition::widened(start..end, pattern_len, len);
        trace!(
            "partition {}: owned {:?}, search {:?}",
            i,
            partition.owned,
            partition.search
        );
        partitions.push(partition);
        start = end;
    }

    Ok(partitions)
}
