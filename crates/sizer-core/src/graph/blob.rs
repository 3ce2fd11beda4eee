//! Blob sizes have no dependencies — a blob's body gives its size outright — so this
//! table is a plain map rather than a pending/listener structure like [`super::tree`]
//! or [`super::tag`].

use std::collections::HashMap;

use gix_hash::ObjectId;

use crate::object::BlobSize;

#[derive(Default)]
pub struct BlobTable {
    sizes: HashMap<ObjectId, BlobSize>,
}

impl BlobTable {
    pub fn new() -> Self {
        BlobTable::default()
    }

    pub fn insert(&mut self, oid: ObjectId, size: BlobSize) {
        self.sizes.insert(oid, size);
    }

    pub fn get(&self, oid: &ObjectId) -> Option<BlobSize> {
        self.sizes.get(oid).copied()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
