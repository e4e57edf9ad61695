use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use egui::Vec2;
use serde::{Deserialize, Serialize};

use super::common::MEDIA_FIT_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaVariant {
    Image,
    Video,
}

impl MediaVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaVariant::Image => "image",
            MediaVariant::Video => "video",
        }
    }
}

/// Where a media element's bytes come from
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MediaSource {
    /// Bytes held by the document (uploads, dropped files)
    Inline {
        mime: String,
        #[serde(with = "base64_bytes")]
        data: Arc<Vec<u8>>,
    },
    /// Remote or `data:` URL, resolved on demand
    Url { url: String },
}

impl std::fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaSource::Inline { mime, data } => f
                .debug_struct("Inline")
                .field("mime", mime)
                .field("len", &data.len())
                .finish(),
            MediaSource::Url { url } => f.debug_struct("Url").field("url", url).finish(),
        }
    }
}

impl MediaSource {
    pub fn inline(mime: impl Into<String>, data: Vec<u8>) -> Self {
        MediaSource::Inline {
            mime: mime.into(),
            data: Arc::new(data),
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        MediaSource::Url { url: url.into() }
    }

    /// Short human-readable reference, used in style strings and logs
    pub fn describe(&self) -> String {
        match self {
            MediaSource::Inline { mime, data } => format!("inline:{mime}:{}", data.len()),
            MediaSource::Url { url } if url.starts_with("data:") => "data-url".to_owned(),
            MediaSource::Url { url } => url.clone(),
        }
    }
}

/// Split a `data:[mime];base64,<payload>` URL into its mime type and bytes
pub fn parse_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let (mime, encoding) = match header.rsplit_once(';') {
        Some((mime, enc)) => (mime, Some(enc)),
        None => (header, None),
    };
    let data = match encoding {
        Some("base64") => STANDARD.decode(payload.trim()).ok()?,
        _ => payload.as_bytes().to_vec(),
    };
    let mime = if mime.is_empty() { "text/plain" } else { mime };
    Some((mime.to_owned(), data))
}

pub fn to_data_url(mime: &str, data: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(data))
}

/// Play state of a video element's own controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    pub playing: bool,
    /// 0.0..=1.0 in steps of 0.1
    pub volume: f32,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            playing: false,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaElement {
    pub variant: MediaVariant,
    pub source: MediaSource,
    /// Pixel size of the decoded source, when known
    pub intrinsic_size: Option<Vec2>,
    pub alt: String,
    #[serde(default)]
    pub playback: Playback,
}

impl MediaElement {
    pub fn new(variant: MediaVariant, source: MediaSource, intrinsic_size: Option<Vec2>) -> Self {
        Self {
            variant,
            source,
            intrinsic_size,
            alt: String::new(),
            playback: Playback::default(),
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.playback.volume = ((volume.clamp(0.0, 1.0)) * 10.0).round() / 10.0;
    }

    pub fn style_fragment(&self) -> String {
        match self.variant {
            MediaVariant::Image => format!("object-fit: contain; src: {};", self.source.describe()),
            MediaVariant::Video => format!(
                "background-color: #000000; src: {}; volume: {};",
                self.source.describe(),
                self.playback.volume
            ),
        }
    }
}

/// Scale `intrinsic` down (never up) to fit inside the insertion box, keeping its aspect ratio
pub fn fit_media_size(intrinsic: Vec2) -> Vec2 {
    if intrinsic.x <= 0.0 || intrinsic.y <= 0.0 {
        return Vec2::splat(MEDIA_FIT_SIZE);
    }
    let scale = (MEDIA_FIT_SIZE / intrinsic.x).min(MEDIA_FIT_SIZE / intrinsic.y).min(1.0);
    Vec2::new((intrinsic.x * scale).round(), (intrinsic.y * scale).round())
}

mod base64_bytes {
    use std::sync::Arc;

    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Arc<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data.as_slice()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<Vec<u8>>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map(Arc::new)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_ratio() {
        assert_eq!(fit_media_size(Vec2::new(1000.0, 500.0)), Vec2::new(500.0, 250.0));
        assert_eq!(fit_media_size(Vec2::new(200.0, 100.0)), Vec2::new(200.0, 100.0));
        assert_eq!(fit_media_size(Vec2::new(300.0, 1200.0)), Vec2::new(125.0, 500.0));
    }

    #[test]
    fn data_urls() {
        let url = to_data_url("image/png", &[1, 2, 3]);
        assert_eq!(parse_data_url(&url), Some(("image/png".to_owned(), vec![1, 2, 3])));
        assert_eq!(parse_data_url("https://example.com/a.png"), None);
    }

    #[test]
    fn volume_snaps_to_tenths() {
        let mut media = MediaElement::new(MediaVariant::Video, MediaSource::url("v.mp4"), None);
        media.set_volume(0.46);
        assert_eq!(media.playback.volume, 0.5);
        media.set_volume(7.0);
        assert_eq!(media.playback.volume, 1.0);
    }
}
