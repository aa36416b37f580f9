//! Ownership classification of manifest entries.
//!
//! The engine marks every entry it writes with a trailing line comment
//! containing the `moorage` marker. Entries without the marker belong to
//! humans (or other tools) and are never touched. The text encoding lives
//! here and in the manifest adapter only; everything else works with the
//! `Ownership` union.

/// Reserved marker token identifying engine-owned entries.
pub const MARKER: &str = "moorage";

/// Who owns a manifest entry, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// Authored externally; read-only to the engine
    Foreign,
    /// Written by the engine for a direct workspace dependency
    Direct,
    /// Replayed by the engine from a dependency's foreign overrides
    Indirect {
        /// Originating package identity
        source: String,
    },
    /// Recognized as the engine's own, but exempt from teardown
    Ignore,
}

impl Ownership {
    /// Classify a raw trailing annotation.
    ///
    /// Absence of the marker means foreign, regardless of any sub-token
    /// match. With the marker present, ` indirect ` and ` ignore` sub-tokens
    /// select the sub-kind.
    pub fn classify(comment: Option<&str>) -> Ownership {
        let Some(comment) = comment else {
            return Ownership::Foreign;
        };
        if !comment.contains(MARKER) {
            return Ownership::Foreign;
        }

        if comment.contains(" indirect ") {
            let source = comment
                .split_once("from ")
                .map(|(_, rest)| rest.trim().to_string())
                .unwrap_or_default();
            Ownership::Indirect { source }
        } else if comment.contains(" ignore") {
            Ownership::Ignore
        } else {
            Ownership::Direct
        }
    }

    /// The trailing comment encoding this ownership, or None for foreign.
    pub fn annotation(&self) -> Option<String> {
        match self {
            Ownership::Foreign => None,
            Ownership::Direct => Some(format!("# {}", MARKER)),
            Ownership::Indirect { source } => {
                Some(format!("# {} indirect from {}", MARKER, source))
            }
            Ownership::Ignore => Some(format!("# {} ignore", MARKER)),
        }
    }

    /// Check whether the engine owns this entry (any owned sub-kind).
    pub fn is_owned(&self) -> bool {
        !matches!(self, Ownership::Foreign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_comment_is_foreign() {
        assert_eq!(Ownership::classify(None), Ownership::Foreign);
    }

    #[test]
    fn test_unmarked_comment_is_foreign() {
        assert_eq!(
            Ownership::classify(Some(" # pinned by ops")),
            Ownership::Foreign
        );
    }

    #[test]
    fn test_subtokens_without_marker_are_foreign() {
        // `indirect` alone is not ours
        assert_eq!(
            Ownership::classify(Some(" # indirect from somewhere")),
            Ownership::Foreign
        );
    }

    #[test]
    fn test_direct() {
        assert_eq!(Ownership::classify(Some(" # moorage")), Ownership::Direct);
    }

    #[test]
    fn test_indirect_with_source() {
        assert_eq!(
            Ownership::classify(Some(" # moorage indirect from frobs")),
            Ownership::Indirect {
                source: "frobs".to_string()
            }
        );
    }

    #[test]
    fn test_ignore() {
        assert_eq!(
            Ownership::classify(Some(" # moorage ignore")),
            Ownership::Ignore
        );
    }

    #[test]
    fn test_annotation_round_trip() {
        let cases = [
            Ownership::Direct,
            Ownership::Indirect {
                source: "widgets".to_string(),
            },
            Ownership::Ignore,
        ];
        for ownership in cases {
            let annotation = ownership.annotation().unwrap();
            assert_eq!(Ownership::classify(Some(&annotation)), ownership);
        }
    }

    #[test]
    fn test_foreign_has_no_annotation() {
        assert!(Ownership::Foreign.annotation().is_none());
    }
}
