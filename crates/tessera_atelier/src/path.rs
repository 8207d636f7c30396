//! Typed path model.
//!
//! A path addresses a live DOM node after first paint. It mixes two segment
//! kinds: range offsets select a node within a range of siblings that has no
//! element parent (the top-level nodes of a render, or the anchor of a
//! component boundary), and dom-child segments descend through literal child
//! positions. Range segments always come first.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Path segment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKind {
    RangeOffset,
    DomChild,
}

/// One step of a typed path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    pub kind: SegmentKind,
    pub index: usize,
}

impl PathSegment {
    pub const fn range(index: usize) -> Self {
        Self {
            kind: SegmentKind::RangeOffset,
            index,
        }
    }

    pub const fn dom(index: usize) -> Self {
        Self {
            kind: SegmentKind::DomChild,
            index,
        }
    }
}

/// Path construction and validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path starts with dom-child segment {index}; a range-offset segment must lead")]
    LeadingDomChild { index: usize },
    #[error("range-offset segment at position {position} follows a dom-child segment")]
    RangeAfterDom { position: usize },
}

/// A validated typed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<PathSegment>", into = "Vec<PathSegment>")]
pub struct Path(Vec<PathSegment>);

impl TryFrom<Vec<PathSegment>> for Path {
    type Error = PathError;

    fn try_from(segments: Vec<PathSegment>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl From<Path> for Vec<PathSegment> {
    fn from(path: Path) -> Self {
        path.0
    }
}

impl Path {
    /// The root anchor: `[RangeOffset(0)]`.
    pub fn root() -> Self {
        Self(vec![PathSegment::range(0)])
    }

    /// Build a path from raw segments, validating their order.
    pub fn new(segments: Vec<PathSegment>) -> Result<Self, PathError> {
        validate(&segments)?;
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match segment.kind {
                SegmentKind::RangeOffset => write!(f, "r{}", segment.index)?,
                SegmentKind::DomChild => write!(f, "d{}", segment.index)?,
            }
        }
        Ok(())
    }
}

/// Range-offset segments for the given indices.
pub fn range_segments(indices: &[usize]) -> Vec<PathSegment> {
    indices.iter().copied().map(PathSegment::range).collect()
}

/// Dom-child segments for the given indices.
pub fn dom_segments(indices: &[usize]) -> Vec<PathSegment> {
    indices.iter().copied().map(PathSegment::dom).collect()
}

/// Reject empty paths, paths not led by a range offset, and paths with a
/// range offset after a dom-child segment.
pub fn validate(segments: &[PathSegment]) -> Result<(), PathError> {
    let Some(first) = segments.first() else {
        return Err(PathError::Empty);
    };
    if first.kind == SegmentKind::DomChild {
        return Err(PathError::LeadingDomChild { index: first.index });
    }

    let mut seen_dom = false;
    for (position, segment) in segments.iter().enumerate() {
        match segment.kind {
            SegmentKind::DomChild => seen_dom = true,
            SegmentKind::RangeOffset if seen_dom => {
                return Err(PathError::RangeAfterDom { position });
            }
            SegmentKind::RangeOffset => {}
        }
    }
    Ok(())
}

/// Fallible form of [`combine`].
pub fn try_combine(range: &[PathSegment], dom: &[PathSegment]) -> Result<Path, PathError> {
    let mut segments = Vec::with_capacity(range.len().max(1) + dom.len());
    if range.is_empty() {
        segments.push(PathSegment::range(0));
    } else {
        segments.extend_from_slice(range);
    }
    segments.extend_from_slice(dom);
    Path::new(segments)
}

/// Combine a range path and a dom path into one typed path.
///
/// An empty range path defaults to the root anchor. The inputs are copied,
/// never aliased.
///
/// # Panics
///
/// Panics if the combined path is out of order. Lowering only ever builds
/// well-ordered paths, so this indicates an internal defect.
pub fn combine(range: &[PathSegment], dom: &[PathSegment]) -> Path {
    match try_combine(range, dom) {
        Ok(path) => path,
        Err(err) => panic!("tessera: invalid path construction: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combine_defaults_root_anchor() {
        let path = combine(&[], &dom_segments(&[2, 0]));
        assert_eq!(path.to_string(), "r0/d2/d0");
        assert_eq!(combine(&[], &[]), Path::root());
    }

    #[test]
    fn test_combine_keeps_range_prefix() {
        let path = combine(&range_segments(&[3, 1]), &dom_segments(&[4]));
        assert_eq!(path.to_string(), "r3/r1/d4");
    }

    #[test]
    #[should_panic(expected = "invalid path construction")]
    fn test_combine_panics_on_range_after_dom() {
        combine(&[PathSegment::dom(1)], &[]);
    }

    #[test]
    fn test_combine_does_not_alias_inputs() {
        let mut dom = dom_segments(&[1]);
        let path = combine(&[], &dom);
        dom[0].index = 9;
        assert_eq!(path.to_string(), "r0/d1");
    }

    #[test]
    fn test_validate_errors() {
        assert_eq!(validate(&[]), Err(PathError::Empty));
        assert_eq!(
            validate(&[PathSegment::dom(4)]),
            Err(PathError::LeadingDomChild { index: 4 })
        );
        assert_eq!(
            validate(&[
                PathSegment::range(0),
                PathSegment::dom(1),
                PathSegment::range(2)
            ]),
            Err(PathError::RangeAfterDom { position: 2 })
        );
    }

    #[test]
    fn test_path_serializes_as_segment_list() {
        let json = serde_json::to_string(&combine(&[], &dom_segments(&[1]))).unwrap();
        insta::assert_snapshot!(json, @r#"[{"kind":"rangeOffset","index":0},{"kind":"domChild","index":1}]"#);
    }

    #[test]
    fn test_deserialize_rejects_invalid_path() {
        let err = serde_json::from_str::<Path>(r#"[{"kind":"domChild","index":0}]"#);
        assert!(err.is_err());
        let ok: Path = serde_json::from_str(r#"[{"kind":"rangeOffset","index":2}]"#).unwrap();
        assert_eq!(ok.to_string(), "r2");
    }

    fn segment() -> impl Strategy<Value = PathSegment> {
        (any::<bool>(), 0usize..8).prop_map(|(range, index)| {
            if range {
                PathSegment::range(index)
            } else {
                PathSegment::dom(index)
            }
        })
    }

    proptest! {
        #[test]
        fn prop_validate_matches_ordering_rule(segments in prop::collection::vec(segment(), 0..8)) {
            let leads_with_range = segments
                .first()
                .is_some_and(|s| s.kind == SegmentKind::RangeOffset);
            let first_dom = segments.iter().position(|s| s.kind == SegmentKind::DomChild);
            let range_after_dom = first_dom.is_some_and(|i| {
                segments[i..].iter().any(|s| s.kind == SegmentKind::RangeOffset)
            });
            prop_assert_eq!(validate(&segments).is_ok(), leads_with_range && !range_after_dom);
        }

        #[test]
        fn prop_combine_of_ordered_parts_is_valid(
            range in prop::collection::vec(0usize..8, 0..3),
            dom in prop::collection::vec(0usize..8, 0..5),
        ) {
            let path = combine(&range_segments(&range), &dom_segments(&dom));
            prop_assert!(validate(path.segments()).is_ok());
            prop_assert_eq!(path.len(), range.len().max(1) + dom.len());
        }
    }
}
