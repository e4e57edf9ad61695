//! Image and PDF export of design pages.

mod fonts;
pub mod pdf;
pub mod raster;
pub mod resolve;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use egui::Vec2;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::config::{ExportConfig, GestureConfig};
use crate::page::Page;

pub use fonts::FontBook;
pub use pdf::PdfWriter;
pub use raster::{PageImages, RasterInput, render_page};
pub use resolve::{DecodedImage, Fetcher, ImageResolver, ResolveStrategy, ResourceError, ResourceResult, SessionCache};
#[cfg(not(target_arch = "wasm32"))]
pub use resolve::HttpFetcher;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("Cannot allocate a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to assemble PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("No pages to export")]
    NoPages,
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Replace characters that are invalid in file names with `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

/// A finished export, ready to be offered as a download
#[derive(Clone, PartialEq)]
pub struct ExportOutput {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ExportOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportOutput")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ExportOutput {
    /// Write into `dir` under the output's file name
    pub fn write_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        log::info!("💾 Exported {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Progress of a multi-page export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProgress {
    pub page: usize,
    pub total: usize,
}

impl ExportProgress {
    pub fn message(&self) -> String {
        format!("Processing page {} of {}...", self.page, self.total)
    }
}

fn encode_png(image: &DynamicImage) -> ExportResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

fn encode_jpeg(image: &DynamicImage) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    JpegEncoder::new_with_quality(&mut bytes, 100).encode_image(&rgb)?;
    Ok(bytes)
}

/// Renders pages and encodes them
pub struct Exporter {
    config: ExportConfig,
    resolver: ImageResolver,
    arrow_head_reservation: f32,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Exporter {
    pub fn new(config: ExportConfig, resolver: ImageResolver) -> Self {
        Self {
            config,
            resolver,
            arrow_head_reservation: GestureConfig::default().arrow_head_reservation,
        }
    }

    /// Exporter with the full fallback chain over HTTP
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_http(config: ExportConfig) -> ExportResult<Self> {
        let fetcher = std::sync::Arc::new(HttpFetcher::new(&config)?);
        let resolver = ImageResolver::standard(&config, fetcher);
        Ok(Self::new(config, resolver))
    }

    pub fn resolver(&self) -> &ImageResolver {
        &self.resolver
    }

    /// Resolve the page's images, then flatten it
    pub async fn render(&self, page: &Page, size: Vec2) -> ExportResult<DynamicImage> {
        let images = PageImages::resolve(page, &self.resolver).await;
        let mut input = RasterInput::for_page(page, size, &images);
        input.arrow_head_reservation = self.arrow_head_reservation;
        let pixmap = render_page(&input)?;
        Ok(DynamicImage::ImageRgba8(raster::image_from_pixmap(&pixmap)))
    }

    /// One page as PNG or JPEG at full resolution
    pub async fn export_image(&self, page: &Page, size: Vec2, format: ExportFormat) -> ExportResult<ExportOutput> {
        let image = self.render(page, size).await?;
        let bytes = match format {
            ExportFormat::Png => encode_png(&image)?,
            ExportFormat::Jpeg => encode_jpeg(&image)?,
        };
        Ok(ExportOutput {
            file_name: format!("{}.{}", self.config.default_file_stem, format.extension()),
            mime: format.mime(),
            bytes,
        })
    }

    /// All pages into one PDF, strictly one after another in display order.
    /// Each PDF page has the page's pixel dimensions.
    pub async fn export_pdf(
        &self,
        pages: &[Page],
        size: Vec2,
        file_name: &str,
        mut progress: impl FnMut(ExportProgress),
    ) -> ExportResult<ExportOutput> {
        if pages.is_empty() {
            return Err(ExportError::NoPages);
        }

        let mut writer = PdfWriter::new();
        for (index, page) in pages.iter().enumerate() {
            progress(ExportProgress {
                page: index + 1,
                total: pages.len(),
            });
            let image = self.render(page, size).await?;
            let jpeg = encode_jpeg(&image)?;
            writer.add_jpeg_page(jpeg, image.width(), image.height())?;
            log::debug!("PDF page {} of {} added", index + 1, pages.len());

            if index + 1 < pages.len() {
                self.page_delay();
            }
        }

        let stem = if file_name.trim().is_empty() {
            self.config.default_file_stem.as_str()
        } else {
            file_name.trim()
        };
        Ok(ExportOutput {
            file_name: format!("{}.pdf", sanitize_file_name(stem)),
            mime: "application/pdf",
            bytes: writer.finish()?,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn page_delay(&self) {
        std::thread::sleep(std::time::Duration::from_millis(self.config.page_delay_ms));
    }

    #[cfg(target_arch = "wasm32")]
    fn page_delay(&self) {}

    pub fn export_image_blocking(&self, page: &Page, size: Vec2, format: ExportFormat) -> ExportResult<ExportOutput> {
        futures::executor::block_on(self.export_image(page, size, format))
    }

    pub fn export_pdf_blocking(
        &self,
        pages: &[Page],
        size: Vec2,
        file_name: &str,
        progress: impl FnMut(ExportProgress),
    ) -> ExportResult<ExportOutput> {
        futures::executor::block_on(self.export_pdf(pages, size, file_name, progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name(r#"a\b/c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_file_name("Summer Flyer"), "Summer Flyer");
    }

    #[test]
    fn progress_message() {
        let progress = ExportProgress { page: 2, total: 3 };
        assert_eq!(progress.message(), "Processing page 2 of 3...");
    }
}
