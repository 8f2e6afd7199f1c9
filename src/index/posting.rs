use crate::core::types::StringId;

/// Posting list of one (bucket, n-gram) pair.
/// Note: Sorted by string id for efficient merging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    ids: Vec<u32>,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList { ids: Vec::new() }
    }

    pub fn add(&mut self, id: StringId) {
        // Ids normally arrive in insertion order, so this is a push.
        match self.ids.last() {
            Some(&last) if last >= id.0 => {
                if let Err(pos) = self.ids.binary_search(&id.0) {
                    self.ids.insert(pos, id.0);
                }
            }
            _ => self.ids.push(id.0),
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }
}
