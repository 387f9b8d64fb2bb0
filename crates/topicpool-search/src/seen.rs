use dashmap::DashMap;
use std::sync::Arc;

use topicpool_core::types::DocId;

/// Registry of document ids admitted into one pooled result.
///
/// Clones share the same registry. Create one per aggregation call and drop
/// it afterwards; it must never outlive the call that created it.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    ids: Arc<DashMap<DocId, ()>>,
}

impl SeenSet {
    pub fn new() -> Self { Self::default() }

    /// Registers `id` and reports whether this call was the one that added it.
    /// Check and insert happen under one shard lock.
    pub fn insert_if_absent(&self, id: &str) -> bool {
        self.ids.insert(id.to_string(), ()).is_none()
    }

    pub fn contains(&self, id: &str) -> bool { self.ids.contains_key(id) }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}
