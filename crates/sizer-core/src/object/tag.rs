//! Annotated tag body parsing.

use gix_hash::ObjectId;
use gix_object::{Kind as GixKind, TagRef};

use crate::error::{ParseErrorKind, SizerError};
use crate::oid::ObjectKind;

/// A decoded tag header: the object it points at, and that object's declared kind.
/// The chain of tags may point at another tag (`tag_depth` in [`crate::object::TagSize`]
/// tracks how many such hops occur before a non-tag target is reached).
#[derive(Debug, Clone)]
pub struct TagHeader {
    pub target: ObjectId,
    pub target_kind: ObjectKind,
}

fn convert_kind(kind: GixKind) -> ObjectKind {
    match kind {
        GixKind::Blob => ObjectKind::Blob,
        GixKind::Tree => ObjectKind::Tree,
        GixKind::Commit => ObjectKind::Commit,
        GixKind::Tag => ObjectKind::Tag,
    }
}

pub fn parse_tag(oid: &ObjectId, data: &[u8]) -> Result<TagHeader, SizerError> {
    let parse_error = || SizerError::Parse {
        oid: oid.to_owned(),
        kind: ParseErrorKind::Tag,
    };

    let tag = TagRef::from_bytes(data).map_err(|_| parse_error())?;

    Ok(TagHeader {
        target: tag.target(),
        target_kind: convert_kind(tag.target_kind),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample(target_kind: &str) -> Vec<u8> {
        let target = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";
        format!(
            "object {target}\ntype {target_kind}\ntag v1.0\ntagger A <a@example.com> 0 +0000\n\nmessage\n"
        )
        .into_bytes()
    }

    #[test]
    fn parses_tag_pointing_at_a_commit() {
        let oid = ObjectId::null(gix_hash::Kind::Sha1);
        let header = parse_tag(&oid, &sample("commit")).unwrap();
        assert_eq!(header.target_kind, ObjectKind::Commit);
    }

    #[test]
    fn parses_tag_pointing_at_another_tag() {
        let oid = ObjectId::null(gix_hash::Kind::Sha1);
        let header = parse_tag(&oid, &sample("tag")).unwrap();
        assert_eq!(header.target_kind, ObjectKind::Tag);
    }

    #[test]
    fn missing_object_header_is_a_parse_error() {
        let oid = ObjectId::null(gix_hash::Kind::Sha1);
        let result = parse_tag(&oid, b"type commit\ntag v1.0\n\nmessage\n");
        assert!(result.is_err());
    }
}
