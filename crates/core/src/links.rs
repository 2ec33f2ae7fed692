//! Content link extraction and orphan-flag carry-forward.
//!
//! Rendered page bodies reference other pages, documents and attachments
//! through marked anchors:
//!
//! ```html
//! <a data-content-link data-link-type="section"
//!    data-link-target-document-id="..." data-link-target-id="...">Intro</a>
//! ```
//!
//! [`content_links`] walks a body lazily and yields one [`ExtractedLink`] per
//! marked anchor. [`plan_links`] decides, for a freshly extracted link set,
//! which orphan flags survive from the previously stored links.

use std::iter::FusedIterator;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::RefId;

// ---------------------------------------------------------------------------
// Link type constants
// ---------------------------------------------------------------------------

/// Link to a specific page (section) of a document.
pub const LINK_TYPE_SECTION: &str = "section";
/// Link to a whole document.
pub const LINK_TYPE_DOCUMENT: &str = "document";
/// Link to a file attachment.
pub const LINK_TYPE_FILE: &str = "file";

/// All link types the extractor recognises.
pub const VALID_LINK_TYPES: &[&str] = &[LINK_TYPE_SECTION, LINK_TYPE_DOCUMENT, LINK_TYPE_FILE];

/// Attribute that marks an anchor as a content link.
pub const MARKER_ATTRIBUTE: &str = "data-content-link";

/// Matches an `<a>` start tag and captures its attribute list. Quoted
/// values are consumed whole, so a `>` inside one does not end the tag.
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a(\s(?:"[^"]*"|'[^']*'|[^>])*)?>"#).expect("valid regex")
});

/// Matches one attribute with a double-quoted, single-quoted, bare, or
/// missing value.
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid regex")
});

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// A candidate link found in a rendered body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLink {
    pub ref_id: Option<RefId>,
    pub space_id: Option<RefId>,
    pub link_type: String,
    pub target_document_id: Option<RefId>,
    pub target_id: Option<RefId>,
}

impl ExtractedLink {
    /// Document-level links are not page-qualified: drop the target id.
    pub fn normalized(mut self) -> Self {
        if self.link_type == LINK_TYPE_DOCUMENT {
            self.target_id = None;
        }
        self
    }

    /// The id this link points at: the document for document links, the
    /// page or attachment otherwise.
    pub fn target_key(&self) -> Option<RefId> {
        target_key(&self.link_type, self.target_document_id, self.target_id)
    }
}

fn target_key(
    link_type: &str,
    target_document_id: Option<RefId>,
    target_id: Option<RefId>,
) -> Option<RefId> {
    if link_type == LINK_TYPE_DOCUMENT {
        target_document_id
    } else {
        target_id
    }
}

/// Lazy iterator over the content links of a body.
///
/// Cheap to clone; a clone (or [`ContentLinks::restart`]) replays the body
/// from the beginning.
#[derive(Debug, Clone)]
pub struct ContentLinks<'a> {
    body: &'a str,
    pos: usize,
}

impl ContentLinks<'_> {
    /// Rewind to the start of the body.
    pub fn restart(&mut self) {
        self.pos = 0;
    }
}

impl Iterator for ContentLinks<'_> {
    type Item = ExtractedLink;

    fn next(&mut self) -> Option<ExtractedLink> {
        while self.pos < self.body.len() {
            let Some(caps) = ANCHOR_RE.captures(&self.body[self.pos..]) else {
                self.pos = self.body.len();
                return None;
            };

            // Group 0 always participates in a match.
            let end = caps.get(0).map_or(self.body.len() - self.pos, |m| m.end());
            self.pos += end;

            let attributes = caps.get(1).map_or("", |m| m.as_str());
            if let Some(link) = parse_anchor(attributes) {
                return Some(link);
            }
        }
        None
    }
}

impl FusedIterator for ContentLinks<'_> {}

/// Extract the content links of a rendered HTML body.
pub fn content_links(body: &str) -> ContentLinks<'_> {
    ContentLinks { body, pos: 0 }
}

fn parse_anchor(attributes: &str) -> Option<ExtractedLink> {
    let mut marked = false;
    let mut link = ExtractedLink::default();

    for caps in ATTRIBUTE_RE.captures_iter(attributes) {
        let name = caps[1].to_ascii_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str())
            .trim();

        match name.as_str() {
            MARKER_ATTRIBUTE => marked = true,
            "data-link-id" => link.ref_id = parse_id(value),
            "data-link-space-id" => link.space_id = parse_id(value),
            "data-link-target-document-id" => link.target_document_id = parse_id(value),
            "data-link-target-id" => link.target_id = parse_id(value),
            "data-link-type" => link.link_type = value.to_ascii_lowercase(),
            _ => {}
        }
    }

    (marked && !link.link_type.is_empty()).then_some(link)
}

fn parse_id(value: &str) -> Option<RefId> {
    RefId::parse_str(value).ok()
}

// ---------------------------------------------------------------------------
// Recomputation planning
// ---------------------------------------------------------------------------

/// What recomputation needs to know about a previously stored link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorLink {
    pub link_type: String,
    pub target_document_id: Option<RefId>,
    pub target_id: Option<RefId>,
    pub orphan: bool,
}

impl PriorLink {
    fn target_key(&self) -> Option<RefId> {
        target_key(&self.link_type, self.target_document_id, self.target_id)
    }
}

/// A link ready to be stored, with its resolved orphan flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLink {
    pub link: ExtractedLink,
    pub orphan: bool,
}

/// Normalise freshly extracted links and carry forward the orphan flag of
/// any previous link with the same (target, type). Everything else starts
/// out as not orphaned.
pub fn plan_links<I>(links: I, previous: &[PriorLink]) -> Vec<PlannedLink>
where
    I: IntoIterator<Item = ExtractedLink>,
{
    links
        .into_iter()
        .map(ExtractedLink::normalized)
        .map(|link| {
            let key = link.target_key();
            let orphan = previous
                .iter()
                .find(|p| p.link_type == link.link_type && p.target_key() == key)
                .is_some_and(|p| p.orphan);
            PlannedLink { link, orphan }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_A: &str = "0190a3b4-0000-7000-8000-00000000000a";
    const DOC_B: &str = "0190a3b4-0000-7000-8000-00000000000b";
    const PAGE_1: &str = "0190a3b4-0000-7000-8000-000000000001";

    fn id(s: &str) -> RefId {
        RefId::parse_str(s).unwrap()
    }

    fn section_anchor(doc: &str, page: &str) -> String {
        format!(
            r#"<a href="/d/{doc}" data-content-link data-link-type="section" data-link-target-document-id="{doc}" data-link-target-id="{page}">Go</a>"#
        )
    }

    fn document_anchor(doc: &str) -> String {
        format!(
            r#"<a data-content-link data-link-type="document" data-link-target-document-id="{doc}">Doc</a>"#
        )
    }

    // -- extraction ----------------------------------------------------------

    #[test]
    fn extracts_marked_anchors_only() {
        let body = format!(
            r#"<p>See <a href="https://example.com">plain</a> and {}</p>"#,
            section_anchor(DOC_A, PAGE_1)
        );
        let links: Vec<_> = content_links(&body).collect();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].link_type, LINK_TYPE_SECTION);
        assert_eq!(links[0].target_document_id, Some(id(DOC_A)));
        assert_eq!(links[0].target_id, Some(id(PAGE_1)));
    }

    #[test]
    fn empty_and_linkless_bodies_yield_nothing() {
        assert_eq!(content_links("").count(), 0);
        assert_eq!(content_links("<p>No links <abbr>here</abbr></p>").count(), 0);
    }

    #[test]
    fn anchor_without_type_is_not_a_candidate() {
        let body = format!(r#"<a data-content-link data-link-target-document-id="{DOC_A}">x</a>"#);
        assert_eq!(content_links(&body).count(), 0);
    }

    #[test]
    fn attribute_quoting_and_case_are_tolerated() {
        let body = format!(
            "<A DATA-CONTENT-LINK data-link-type=Document data-link-target-document-id='{DOC_B}'>x</A>"
        );
        let links: Vec<_> = content_links(&body).collect();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].link_type, LINK_TYPE_DOCUMENT);
        assert_eq!(links[0].target_document_id, Some(id(DOC_B)));
    }

    #[test]
    fn angle_bracket_inside_quoted_value_does_not_end_tag() {
        let body = format!(
            r#"<a title="a > b" data-content-link data-link-type="document" data-link-target-document-id="{DOC_A}">x</a><a data-content-link data-link-type='section' data-link-target-id='{PAGE_1}' title='c > d'>y</a>"#
        );
        let links: Vec<_> = content_links(&body).collect();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].target_document_id, Some(id(DOC_A)));
        assert_eq!(links[1].target_id, Some(id(PAGE_1)));
    }

    #[test]
    fn unterminated_quote_still_ends_at_bracket() {
        let body = format!(
            r#"<a data-content-link data-link-type="document" data-link-target-document-id="{DOC_A}" title="oops>x</a>"#
        );
        let links: Vec<_> = content_links(&body).collect();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_document_id, Some(id(DOC_A)));
    }

    #[test]
    fn malformed_ids_are_treated_as_absent() {
        let body = r#"<a data-content-link data-link-type="section" data-link-target-id="not-a-uuid">x</a>"#;
        let links: Vec<_> = content_links(body).collect();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_id, None);
    }

    #[test]
    fn iterator_is_restartable() {
        let body = format!("{}{}", section_anchor(DOC_A, PAGE_1), document_anchor(DOC_B));
        let mut links = content_links(&body);
        let replay = links.clone();

        assert_eq!(links.by_ref().count(), 2);
        assert_eq!(links.next(), None);

        links.restart();
        assert_eq!(links.count(), 2);
        assert_eq!(replay.count(), 2);
    }

    #[test]
    fn document_links_drop_target_id() {
        let body = format!(
            r#"<a data-content-link data-link-type="document" data-link-target-document-id="{DOC_A}" data-link-target-id="{PAGE_1}">x</a>"#
        );
        let link = content_links(&body).next().unwrap().normalized();

        assert_eq!(link.target_id, None);
        assert_eq!(link.target_key(), Some(id(DOC_A)));
    }

    // -- planning ------------------------------------------------------------

    fn prior_document(doc: &str, orphan: bool) -> PriorLink {
        PriorLink {
            link_type: LINK_TYPE_DOCUMENT.into(),
            target_document_id: Some(id(doc)),
            target_id: None,
            orphan,
        }
    }

    #[test]
    fn orphan_flag_carries_forward_for_matching_target() {
        let body = document_anchor(DOC_A);
        let planned = plan_links(content_links(&body), &[prior_document(DOC_A, true)]);

        assert_eq!(planned.len(), 1);
        assert!(planned[0].orphan);
    }

    #[test]
    fn new_targets_start_not_orphaned() {
        let body = document_anchor(DOC_B);
        let planned = plan_links(content_links(&body), &[prior_document(DOC_A, true)]);

        assert_eq!(planned.len(), 1);
        assert!(!planned[0].orphan);
    }

    #[test]
    fn same_target_different_type_does_not_match() {
        let body = section_anchor(DOC_A, PAGE_1);
        let prior = PriorLink {
            link_type: LINK_TYPE_FILE.into(),
            target_document_id: Some(id(DOC_A)),
            target_id: Some(id(PAGE_1)),
            orphan: true,
        };
        let planned = plan_links(content_links(&body), &[prior]);

        assert!(!planned[0].orphan);
    }

    #[test]
    fn planning_is_idempotent() {
        let body = format!("{}{}", section_anchor(DOC_A, PAGE_1), document_anchor(DOC_B));
        let first = plan_links(content_links(&body), &[prior_document(DOC_B, true)]);

        let stored: Vec<PriorLink> = first
            .iter()
            .map(|p| PriorLink {
                link_type: p.link.link_type.clone(),
                target_document_id: p.link.target_document_id,
                target_id: p.link.target_id,
                orphan: p.orphan,
            })
            .collect();
        let second = plan_links(content_links(&body), &stored);

        assert_eq!(first, second);
    }
}
