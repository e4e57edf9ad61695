use eframe::egui;

use crate::element::{ElementId, MediaSource, MediaVariant};
use crate::state::EditorContext;

/// A dropped or picked file that can become an element
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub name: String,
    pub variant: MediaVariant,
    pub mime: String,
    pub bytes: Vec<u8>,
    /// Pixel size for images that decoded
    pub intrinsic_size: Option<egui::Vec2>,
}

/// Classify a file by MIME type, falling back to its extension
pub fn media_kind(name: &str, mime: &str) -> Option<(MediaVariant, String)> {
    if mime.starts_with("image/") {
        return Some((MediaVariant::Image, mime.to_owned()));
    }
    if mime.starts_with("video/") {
        return Some((MediaVariant::Video, mime.to_owned()));
    }
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())?;
    let found = match ext.as_str() {
        "png" => (MediaVariant::Image, "image/png"),
        "jpg" | "jpeg" => (MediaVariant::Image, "image/jpeg"),
        "gif" => (MediaVariant::Image, "image/gif"),
        "webp" => (MediaVariant::Image, "image/webp"),
        "bmp" => (MediaVariant::Image, "image/bmp"),
        "mp4" => (MediaVariant::Video, "video/mp4"),
        "webm" => (MediaVariant::Video, "video/webm"),
        "mov" => (MediaVariant::Video, "video/quicktime"),
        _ => return None,
    };
    Some((found.0, found.1.to_owned()))
}

impl MediaFile {
    /// Build from raw bytes. Images that fail to decode are rejected.
    pub fn from_bytes(name: &str, mime: &str, bytes: Vec<u8>) -> Option<Self> {
        let Some((variant, mime)) = media_kind(name, mime) else {
            log::warn!("Dropped file is not a supported type: {}", name);
            return None;
        };
        let intrinsic_size = match variant {
            MediaVariant::Image => match image::load_from_memory(&bytes) {
                Ok(img) => {
                    log::debug!("Successfully decoded image: {}x{}", img.width(), img.height());
                    Some(egui::vec2(img.width() as f32, img.height() as f32))
                }
                Err(err) => {
                    log::error!("Failed to decode image {}: {}", name, err);
                    return None;
                }
            },
            MediaVariant::Video => None,
        };
        Some(Self {
            name: name.to_owned(),
            variant,
            mime,
            bytes,
            intrinsic_size,
        })
    }

    /// Insert as a new element, centered on the page
    pub fn insert_into(self, editor: &mut EditorContext) -> ElementId {
        log::info!("Inserting {} ({} bytes)", self.name, self.bytes.len());
        editor.create_media_element(
            self.variant,
            MediaSource::inline(self.mime, self.bytes),
            self.intrinsic_size,
        )
    }
}

#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up files dropped this frame. Returns true if there are any.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
            }
        });
        !self.dropped_files.is_empty()
    }

    /// Turn the pending dropped files into media elements
    pub fn process_dropped_files(&mut self, editor: &mut EditorContext) -> Vec<ElementId> {
        let files = std::mem::take(&mut self.dropped_files);
        files
            .iter()
            .filter_map(Self::read_dropped_file)
            .map(|file| file.insert_into(editor))
            .collect()
    }

    fn read_dropped_file(file: &egui::DroppedFile) -> Option<MediaFile> {
        let name = match (&file.path, file.name.is_empty()) {
            (Some(path), _) => path.display().to_string(),
            (None, false) => file.name.clone(),
            (None, true) => "unknown".to_owned(),
        };

        if let Some(bytes) = &file.bytes {
            return MediaFile::from_bytes(&name, &file.mime, bytes.to_vec());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = &file.path {
            return match std::fs::read(path) {
                Ok(bytes) => MediaFile::from_bytes(&name, &file.mime, bytes),
                Err(err) => {
                    log::error!("Failed to read file: {}: {}", path.display(), err);
                    None
                }
            };
        }

        log::warn!("Dropped file has no accessible data: {}", name);
        None
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = ctx.input(|i| {
            let mut text = "Drop to add to the design:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}
