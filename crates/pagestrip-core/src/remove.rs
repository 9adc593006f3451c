//! Page removal over the lopdf object model.

use crate::error::PageStripError;
use lopdf::Document;

/// Outcome of a page-removal request.
///
/// A target past the last page is a no-op by policy, not an error; the
/// variant makes that visible to callers instead of an implicit
/// fallthrough.
#[derive(Debug, Clone, PartialEq)]
pub enum PageRemoval {
    /// The target page existed and was removed.
    Removed(Vec<u8>),
    /// The target page was out of range; the page set is untouched.
    Unchanged(Vec<u8>),
}

impl PageRemoval {
    pub fn bytes(&self) -> &[u8] {
        match self {
            PageRemoval::Removed(bytes) | PageRemoval::Unchanged(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            PageRemoval::Removed(bytes) | PageRemoval::Unchanged(bytes) => bytes,
        }
    }

    pub fn was_removed(&self) -> bool {
        matches!(self, PageRemoval::Removed(_))
    }
}

/// Remove a single page (1-indexed) from a PDF held in memory.
///
/// The document is decoded and re-encoded in both outcomes; when the
/// target is past the last page the page set is left as-is. Removing
/// the only page of a single-page document yields a zero-page document.
pub fn remove_page(bytes: &[u8], page: u32) -> Result<PageRemoval, PageStripError> {
    if page == 0 {
        return Err(PageStripError::InvalidPage);
    }

    let mut doc = Document::load_mem(bytes).map_err(|e| PageStripError::Parse(e.to_string()))?;

    let page_count = doc.get_pages().len() as u32;

    if page > page_count {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PageStripError::Save(e.to_string()))?;
        return Ok(PageRemoval::Unchanged(buffer));
    }

    doc.delete_pages(&[page]);

    // Drop objects orphaned by the deleted page
    doc.prune_objects();
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PageStripError::Save(e.to_string()))?;

    Ok(PageRemoval::Removed(buffer))
}

/// Build a minimal PDF with `num_pages` pages, one text line per page.
#[cfg(test)]
pub(crate) fn pdf_with_pages(num_pages: u32) -> Vec<u8> {
    use lopdf::{content::Content, content::Operation, Dictionary, Object, Stream};

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();

    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(14)],
                ),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("page {}", i + 1).into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_count;
    use proptest::prelude::*;

    #[test]
    fn removes_middle_page() {
        let pdf = pdf_with_pages(3);
        let result = remove_page(&pdf, 2).unwrap();
        assert!(result.was_removed());
        assert_eq!(page_count(result.bytes()).unwrap(), 2);
    }

    #[test]
    fn removes_first_and_last_pages() {
        let pdf = pdf_with_pages(4);
        for page in [1, 4] {
            let result = remove_page(&pdf, page).unwrap();
            assert!(result.was_removed());
            assert_eq!(page_count(result.bytes()).unwrap(), 3);
        }
    }

    #[test]
    fn out_of_range_page_is_explicit_noop() {
        let pdf = pdf_with_pages(3);
        let result = remove_page(&pdf, 4).unwrap();
        assert!(!result.was_removed());
        assert_eq!(page_count(result.bytes()).unwrap(), 3);
    }

    #[test]
    fn removing_only_page_yields_empty_document() {
        // Pins the boundary: lopdf edits the page tree without objecting
        // to an empty Kids array.
        let pdf = pdf_with_pages(1);
        let result = remove_page(&pdf, 1).unwrap();
        assert!(result.was_removed());
        assert_eq!(page_count(result.bytes()).unwrap(), 0);
    }

    #[test]
    fn page_zero_is_rejected() {
        let pdf = pdf_with_pages(2);
        let result = remove_page(&pdf, 0);
        assert!(matches!(result, Err(PageStripError::InvalidPage)));
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let result = remove_page(b"not a pdf at all", 1);
        assert!(matches!(result, Err(PageStripError::Parse(_))));
    }

    #[test]
    fn output_is_still_a_pdf() {
        let pdf = pdf_with_pages(2);
        let result = remove_page(&pdf, 1).unwrap();
        assert!(result.bytes().starts_with(b"%PDF"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn page_count_after_removal(pages in 1u32..6, target in 1u32..10) {
            let pdf = pdf_with_pages(pages);
            let result = remove_page(&pdf, target).unwrap();
            let remaining = page_count(result.bytes()).unwrap();
            if target <= pages {
                prop_assert!(result.was_removed());
                prop_assert_eq!(remaining, pages - 1);
            } else {
                prop_assert!(!result.was_removed());
                prop_assert_eq!(remaining, pages);
            }
        }
    }
}
