use std::sync::Arc;
use tracing::trace;

use super::matcher::find_in_window;
use super::partition::Partition;
use crate::buffer::TextBuffer;
use crate::errors::SearchResult;

/// One unit of search work.
///
/// Holds shared handles to the text and pattern, so a task can be sent to any
/// worker thread and run any number of times.
#[derive(Debug, Clone)]
pub struct SearchTask {
    text: Arc<TextBuffer>,
    pattern: Arc<[u8]>,
    partition: Partition,
}

impl SearchTask {
    pub fn new(text: Arc<TextBuffer>, pattern: Arc<[u8]>, partition: Partition) -> Self {
        Self {
            text,
            pattern,
            partition,
        }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Runs the search and returns the owned match positions in ascending order
    pub fn call(&self) -> SearchResult<Vec<usize>> {
        let search = &self.partition.search;
        let mut positions = find_in_window(
            self.text.as_bytes(),
            &self.pattern,
            search.start,
            search.end,
        )?;
        positions.retain(|&pos| self.partition.owns(pos));
        trace!(
            "task {:?} found {} positions",
            self.partition.owned,
            positions.len()
        );
        Ok(positions)
    }
}
