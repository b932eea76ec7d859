//! Page preview rasterization (feature `preview`)
//!
//! Best-effort collaborator to the core redaction: renders the first few
//! pages of a cleaned document to PNG via PDFium. Requires a PDFium
//! shared library at runtime; when it cannot be bound the renderer fails
//! with [`PreviewError::LibraryUnavailable`] and callers carry on without
//! previews.

use std::io::Cursor;

use image::{ImageOutputFormat, RgbaImage};
use pdfium_render::prelude::*;
use tracing::{debug, instrument};

use crate::config::PreviewConfig;
use crate::error::PreviewError;

/// One rasterized page.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    /// Zero-based page index.
    pub page_index: usize,
    /// PNG-encoded pixels.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Renders page previews of a PDF held in memory.
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    config: PreviewConfig,
}

impl PreviewRenderer {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Rasterizes up to `max_pages` pages at the configured DPI.
    ///
    /// Pages render independently; the first failing page aborts the
    /// preview run (the caller treats the whole run as best-effort).
    #[instrument(skip_all, fields(dpi = self.config.dpi, max_pages = self.config.max_pages))]
    pub fn render(&self, pdf_bytes: &[u8]) -> Result<Vec<PreviewImage>, PreviewError> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| PreviewError::LibraryUnavailable(e.to_string()))?;
        let pdfium = Pdfium::new(bindings);

        let document = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| PreviewError::Open(e.to_string()))?;

        let scale = f64::from(self.config.dpi) / 72.0;
        let mut images = Vec::new();

        for (page_index, page) in document
            .pages()
            .iter()
            .enumerate()
            .take(self.config.max_pages)
        {
            let target_width = (f64::from(page.width().value) * scale).round() as i32;
            let render_config = PdfRenderConfig::new().set_target_width(target_width.max(1));

            let mut bitmap = page
                .render_with_config(&render_config)
                .map_err(|e| PreviewError::Render {
                    page: page_index,
                    reason: e.to_string(),
                })?;

            images.push(encode_png(page_index, &mut bitmap)?);
            debug!(page = page_index, "page rasterized");
        }

        Ok(images)
    }
}

/// Converts a rendered bitmap to PNG without going through PDFium's own
/// image-crate integration, so the pixel handoff stays version-agnostic.
fn encode_png(page_index: usize, bitmap: &mut PdfBitmap) -> Result<PreviewImage, PreviewError> {
    let width = bitmap.width() as u32;
    let height = bitmap.height() as u32;

    // PDFium renders BGRA by default; swizzle to RGBA for the encoder.
    let mut pixels = bitmap.as_bytes().to_vec();
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }

    let buffer = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
        PreviewError::ImageEncode(format!(
            "bitmap size mismatch for {}x{} page",
            width, height
        ))
    })?;

    let mut png = Vec::new();
    buffer
        .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
        .map_err(|e| PreviewError::ImageEncode(e.to_string()))?;

    Ok(PreviewImage {
        page_index,
        png,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Document, Object};

    fn blank_pdf(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let mut kids = Vec::new();
        let pages_id = doc.new_object_id();
        for _ in 0..pages {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(Object::Reference(page_id));
        }
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn renders_capped_page_count_or_skips() {
        let renderer = PreviewRenderer::new(PreviewConfig {
            enabled: true,
            max_pages: 3,
            dpi: 72,
        });
        match renderer.render(&blank_pdf(5)) {
            Ok(images) => {
                assert_eq!(images.len(), 3);
                for (i, img) in images.iter().enumerate() {
                    assert_eq!(img.page_index, i);
                    assert!(img.width > 0 && img.height > 0);
                    // PNG magic bytes.
                    assert_eq!(&img.png[..4], b"\x89PNG");
                }
            }
            // Without a system PDFium the renderer reports itself
            // unavailable; that is the expected degraded mode.
            Err(PreviewError::LibraryUnavailable(_)) => {}
            Err(e) => panic!("unexpected preview error: {e}"),
        }
    }
}
