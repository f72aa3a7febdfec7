//! Parent stream router

use super::types::{is_dot_segment, Partition};
use crate::decode::record_id;
use crate::types::Record;
use tracing::warn;

/// Collects parent ids and hands out one partition per id.
///
/// Ids keep the order the parent stream produced them in. Duplicates are
/// kept, so a parent listed twice is also read twice.
#[derive(Debug, Clone)]
pub struct ParentRouter {
    parent_stream: String,
    partition_field: String,
    parent_ids: Vec<String>,
    skipped: usize,
}

impl ParentRouter {
    /// Create an empty router
    pub fn new(parent_stream: impl Into<String>, partition_field: impl Into<String>) -> Self {
        Self {
            parent_stream: parent_stream.into(),
            partition_field: partition_field.into(),
            parent_ids: Vec::new(),
            skipped: 0,
        }
    }

    /// Create a router from already fetched parent records
    pub fn from_records<'a>(
        parent_stream: impl Into<String>,
        partition_field: impl Into<String>,
        records: impl IntoIterator<Item = &'a Record>,
    ) -> Self {
        let mut router = Self::new(parent_stream, partition_field);
        for record in records {
            router.push(record);
        }
        router
    }

    /// Add one parent record. Records without a usable id are skipped.
    pub fn push(&mut self, record: &Record) {
        match record_id(record).filter(|id| !is_dot_segment(id)) {
            Some(id) => self.parent_ids.push(id),
            None => {
                self.skipped += 1;
                warn!(
                    stream = %self.parent_stream,
                    "Skipping parent record without a usable id"
                );
            }
        }
    }

    /// Parent ids in encounter order
    pub fn parent_ids(&self) -> &[String] {
        &self.parent_ids
    }

    /// Number of parent records dropped for lacking an id
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Placeholder the partitions fill
    pub fn partition_field(&self) -> &str {
        &self.partition_field
    }

    /// One partition per collected parent id
    pub fn partitions(&self) -> Vec<Partition> {
        self.parent_ids
            .iter()
            .map(|id| Partition::new(self.partition_field.clone(), id.clone()))
            .collect()
    }
}
