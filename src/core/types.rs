use serde::{Serialize, Deserialize};

/// Identifier of a stored string, assigned in insertion order starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StringId(pub u32);

impl StringId {
    pub fn new(id: u32) -> Self {
        StringId(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for StringId {
    fn from(id: u32) -> Self {
        StringId(id)
    }
}

/// A stored string together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEntry {
    pub id: StringId,
    pub text: String,
}

impl StringEntry {
    pub fn new(id: StringId, text: String) -> Self {
        StringEntry { id, text }
    }
}
