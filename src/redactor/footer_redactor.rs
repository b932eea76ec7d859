//! Footer band redaction over lopdf documents
//!
//! The core transform: open a PDF from bytes, strip the bottom band of
//! every page, and serialize a cleaned copy. Redaction here means the
//! content is gone, not covered: text-showing operators in the band are
//! removed from the content stream, the remaining content is clipped to
//! the region above the band, and an opaque fill is painted over it.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, instrument, warn};

use crate::config::RedactionConfig;
use crate::error::{DocumentOpenError, RedactionError, Result};
use crate::geometry::Rect;
use crate::redactor::content_filter;

/// Maximum depth when walking the page tree for an inherited MediaBox.
const MEDIA_BOX_LOOKUP_DEPTH: usize = 10;

/// Applies the footer band redaction to whole documents.
///
/// One instance is reusable across documents and carries no per-document
/// state; concurrent calls on different inputs never interfere.
///
/// Known limitation: text drawn inside form XObjects is clipped out of
/// the rendered page but its operators are not rewritten inside the
/// XObject stream.
#[derive(Debug, Clone)]
pub struct FooterRedactor {
    config: RedactionConfig,
}

/// Result of redacting a single document.
#[derive(Debug, Clone)]
pub struct RedactionOutcome {
    /// The cleaned document, serialized.
    pub bytes: Vec<u8>,
    /// Total pages in the document.
    pub pages_total: usize,
    /// Pages that received a band (all of them unless the band was
    /// degenerate for a page).
    pub pages_redacted: usize,
    /// Text-showing operators removed across all pages.
    pub text_ops_removed: usize,
}

impl FooterRedactor {
    /// Creates a redactor with the given configuration.
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// Creates a redactor with the default 60-point white band.
    pub fn with_defaults() -> Self {
        Self::new(RedactionConfig::default())
    }

    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    /// Redacts the footer band of every page.
    ///
    /// The input buffer is never mutated; output is a freshly serialized
    /// document with dead objects pruned and streams deflated. Fails with
    /// [`DocumentOpenError`] if the input is not a parseable PDF and with
    /// [`RedactionError`] if any page cannot be committed (strict abort —
    /// no partially redacted document is ever returned).
    #[instrument(skip_all, fields(input_len = input.len()))]
    pub fn redact(&self, input: &[u8]) -> Result<RedactionOutcome> {
        let mut doc = self.open(input)?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(DocumentOpenError::NoPages.into());
        }

        let mut pages_redacted = 0;
        let mut text_ops_removed = 0;

        for (&page_no, &page_id) in &pages {
            match self.redact_page(&mut doc, page_no, page_id)? {
                Some(removed) => {
                    pages_redacted += 1;
                    text_ops_removed += removed;
                }
                None => {
                    debug!(page = page_no, "degenerate band, page left untouched");
                }
            }
        }

        // Cleaned output: drop orphaned content streams, renumber, deflate.
        doc.prune_objects();
        doc.renumber_objects();
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RedactionError::Serialize(e.to_string()))?;

        info!(
            pages = pages.len(),
            redacted = pages_redacted,
            text_ops_removed,
            "footer redaction committed"
        );

        Ok(RedactionOutcome {
            bytes,
            pages_total: pages.len(),
            pages_redacted,
            text_ops_removed,
        })
    }

    fn open(&self, input: &[u8]) -> Result<Document> {
        if input.is_empty() {
            return Err(DocumentOpenError::Empty.into());
        }
        let doc = Document::load_mem(input).map_err(DocumentOpenError::Parse)?;
        if doc.trailer.get(b"Encrypt").is_ok() {
            return Err(DocumentOpenError::Encrypted.into());
        }
        Ok(doc)
    }

    /// Redacts one page in place. Returns the number of removed text
    /// operators, or `None` when the band was degenerate.
    fn redact_page(
        &self,
        doc: &mut Document,
        page_no: u32,
        page_id: ObjectId,
    ) -> Result<Option<usize>> {
        let media_box = resolve_media_box(doc, page_id)
            .ok_or(RedactionError::MissingMediaBox { page: page_no })?;

        let band = Rect::footer_band(&media_box, self.config.footer_height);
        if band.is_degenerate() {
            return Ok(None);
        }

        let raw = doc
            .get_page_content(page_id)
            .map_err(|e| RedactionError::ContentRead {
                page: page_no,
                reason: e.to_string(),
            })?;

        let content = Content::decode(&raw).map_err(|e| RedactionError::ContentDecode {
            page: page_no,
            reason: e.to_string(),
        })?;

        let filtered = content_filter::strip_band_text(content.operations, &band);

        // Clip the surviving content to the region above the band, then
        // paint the band fill on top.
        let mut operations = content_filter::clip_above_band(&band, &media_box);
        operations.extend(filtered.operations);
        operations.push(Operation::new("Q", vec![]));
        operations.extend(content_filter::fill_band(&band, &self.config.fill));

        let encoded = Content { operations }
            .encode()
            .map_err(|e| RedactionError::ContentEncode {
                page: page_no,
                reason: e.to_string(),
            })?;

        // Swap the page's Contents for the rewritten stream; the old
        // streams become orphans and fall to the prune pass.
        let stream_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
        let page = doc
            .get_object_mut(page_id)
            .map_err(|e| RedactionError::ContentWrite {
                page: page_no,
                reason: e.to_string(),
            })?;
        match page {
            Object::Dictionary(dict) => {
                dict.set("Contents", Object::Reference(stream_id));
            }
            _ => {
                return Err(RedactionError::ContentWrite {
                    page: page_no,
                    reason: "page object is not a dictionary".into(),
                }
                .into())
            }
        }

        debug!(
            page = page_no,
            removed = filtered.removed_ops,
            band_height = band.height(),
            "page band redacted"
        );

        Ok(Some(filtered.removed_ops))
    }
}

impl Default for FooterRedactor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Resolves a page's media box, following indirect references and the
/// `Parent` chain for inherited values, with a bounded depth.
fn resolve_media_box(doc: &Document, page_id: ObjectId) -> Option<Rect> {
    let mut dict = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MEDIA_BOX_LOOKUP_DEPTH {
        if let Ok(obj) = dict.get(b"MediaBox") {
            if let Some(rect) = rect_from_object(doc, obj) {
                return Some(rect);
            }
            warn!("unusable MediaBox entry, walking up the page tree");
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => {
                dict = doc.get_dictionary(*parent_id).ok()?;
            }
            _ => return None,
        }
    }
    None
}

fn rect_from_object(doc: &Document, obj: &Object) -> Option<Rect> {
    let arr = match obj {
        Object::Array(arr) => arr.clone(),
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(arr)) => arr.clone(),
            _ => return None,
        },
        _ => return None,
    };
    if arr.len() != 4 {
        return None;
    }
    let mut values = [0.0f64; 4];
    for (slot, obj) in values.iter_mut().zip(arr.iter()) {
        *slot = match obj {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => *r as f64,
            _ => return None,
        };
    }
    // Normalize: PDF permits media boxes with swapped corners.
    Some(Rect::new(
        values[0].min(values[2]),
        values[1].min(values[3]),
        values[0].max(values[2]),
        values[1].max(values[3]),
    ))
}
