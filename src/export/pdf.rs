//! PDF assembly: one full-bleed JPEG per page.
//!
//! ```text
//! Catalog -> Pages -> [Page -> (Contents, XObject /Im0)]...
//! ```

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use super::ExportResult;

const IMAGE_NAME: &str = "Im0";

/// Collects pages into a single PDF document
#[derive(Debug)]
pub struct PdfWriter {
    doc: Document,
    /// Reserved for the page tree, written in `finish`
    pages_id: ObjectId,
    pages: Vec<ObjectId>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append a page of exactly `width` x `height` covered by the JPEG,
    /// which must have the same pixel size
    pub fn add_jpeg_page(&mut self, jpeg: Vec<u8>, width: u32, height: u32) -> ExportResult<()> {
        let (w, h) = (i64::from(width), i64::from(height));
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => w,
                "Height" => h,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        );
        let image_id = self.doc.add_object(image);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(w),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(h),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(w),
                Object::Integer(h),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_NAME => image_id },
            },
        });
        self.pages.push(page_id);
        Ok(())
    }

    /// Write the page tree and catalog, then serialize the document
    pub fn finish(mut self) -> ExportResult<Vec<u8>> {
        let count = self.pages.len() as i64;
        let kids: Vec<Object> = std::mem::take(&mut self.pages)
            .into_iter()
            .map(Object::Reference)
            .collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        self.doc.save_to(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_box(doc: &Document, page: ObjectId) -> Vec<i64> {
        let dict = doc.get_dictionary(page).unwrap();
        dict.get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n.as_i64().unwrap())
            .collect()
    }

    #[test]
    fn pages_are_sized_to_pixels() {
        let mut writer = PdfWriter::new();
        writer.add_jpeg_page(b"jpegdata".to_vec(), 1080, 1920).unwrap();
        writer.add_jpeg_page(b"jpegdata".to_vec(), 800, 600).unwrap();
        assert_eq!(writer.page_count(), 2);

        let bytes = writer.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(media_box(&doc, pages[&1]), vec![0, 0, 1080, 1920]);
        assert_eq!(media_box(&doc, pages[&2]), vec![0, 0, 800, 600]);
    }
}
