//! The two resolvers that never reconstruct a real path: [`NullResolver`], which
//! renders nothing, and [`HashResolver`], which renders the object's own hex OID.
//! Both are effectively free — they exist so a report that doesn't need real paths
//! (because it isn't listing biggest objects by name, or the caller passed
//! `--no-names`) doesn't pay for the bookkeeping [`super::full::FullResolver`] does.

use bstr::BString;
use gix_hash::ObjectId;

use super::{NameStyle, Placeholder, PathResolver};

/// Hands out placeholders but never records anything; [`PathResolver::request_path`]
/// always answers `None`.
#[derive(Debug, Default)]
pub struct NullResolver {
    next: u64,
}

impl NullResolver {
    pub fn new() -> Self {
        NullResolver::default()
    }

    fn next_placeholder(&mut self) -> Placeholder {
        let id = self.next;
        self.next += 1;
        Placeholder(id)
    }
}

impl PathResolver for NullResolver {
    fn style(&self) -> NameStyle {
        NameStyle::None
    }

    fn record_name(&mut self, _parent: Option<Placeholder>, _name: &[u8], _oid: ObjectId) -> Placeholder {
        self.next_placeholder()
    }

    fn record_root(&mut self, _label: &[u8], _oid: ObjectId) -> Placeholder {
        self.next_placeholder()
    }

    fn request_path(&mut self, _placeholder: Placeholder) -> Option<BString> {
        None
    }

    fn forget(&mut self, _placeholder: Placeholder) {}
}

/// Hands out placeholders keyed to an OID and always renders the hex form of that
/// OID as the "path" — useful when the report wants a stable identifier for the
/// object without the cost of tracking real path components.
#[derive(Debug, Default)]
pub struct HashResolver {
    next: u64,
    oids: std::collections::HashMap<u64, ObjectId>,
}

impl HashResolver {
    pub fn new() -> Self {
        HashResolver::default()
    }

    fn insert(&mut self, oid: ObjectId) -> Placeholder {
        let id = self.next;
        self.next += 1;
        self.oids.insert(id, oid);
        Placeholder(id)
    }
}

impl PathResolver for HashResolver {
    fn style(&self) -> NameStyle {
        NameStyle::Hash
    }

    fn record_name(&mut self, _parent: Option<Placeholder>, _name: &[u8], oid: ObjectId) -> Placeholder {
        self.insert(oid)
    }

    fn record_root(&mut self, _label: &[u8], oid: ObjectId) -> Placeholder {
        self.insert(oid)
    }

    fn request_path(&mut self, placeholder: Placeholder) -> Option<BString> {
        self.oids.get(&placeholder.0).map(|oid| BString::from(oid.to_hex().to_string()))
    }

    fn forget(&mut self, placeholder: Placeholder) {
        self.oids.remove(&placeholder.0);
    }
}
