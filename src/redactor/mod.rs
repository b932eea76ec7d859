//! Footer band redaction
//!
//! [`FooterRedactor`] is the reusable core transform; the content stream
//! rewriting it relies on lives in [`content_filter`].

pub(crate) mod content_filter;
pub mod footer_redactor;

pub use footer_redactor::{FooterRedactor, RedactionOutcome};
