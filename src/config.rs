use egui::Vec2;
use serde::{Deserialize, Serialize};

/// Tunables for pointer gestures on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Pointer travel (per axis) before a press on an element becomes a drag
    pub drag_dead_zone: f32,
    /// Gap kept between an element and the page edge
    pub edge_margin: f32,
    /// Minimum width/height while resizing
    pub min_resize: f32,
    /// Minimum length of line and arrow shapes
    pub min_line_length: f32,
    /// Part of an arrow's box reserved for the arrowhead
    pub arrow_head_reservation: f32,
    /// Distance of the rotation handle above the element's top edge
    pub rotate_handle_offset: f32,
    /// Pointer radius around a handle that still counts as a hit
    pub handle_hit_radius: f32,
    /// Velocity multiplier applied each momentum frame
    pub momentum_friction: f32,
    /// Momentum stops below this speed (px/frame)
    pub momentum_min_speed: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_dead_zone: 5.0,
            edge_margin: 1.0,
            min_resize: 20.0,
            min_line_length: 100.0,
            arrow_head_reservation: 30.0,
            rotate_handle_offset: 30.0,
            handle_hit_radius: 8.0,
            momentum_friction: 0.95,
            momentum_min_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    /// Margin subtracted from each viewport axis when fitting the page
    pub fit_margin: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 3.0,
            step: 0.1,
            fit_margin: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Seconds between periodic saves
    pub interval_secs: f64,
    /// Quiet period after a change before the debounced save fires
    pub debounce_secs: f64,
    /// How long a status message stays visible
    pub status_secs: f64,
    /// Key the session snapshot is stored under
    pub storage_key: String,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30.0,
            debounce_secs: 1.0,
            status_secs: 3.0,
            storage_key: "designEditorState".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Upper bound for each image load attempt
    pub load_timeout_secs: u64,
    /// Pause between pages of a multi-page export
    pub page_delay_ms: u64,
    pub default_file_stem: String,
    /// Proxy mirrors tried in order. `{url}` is replaced verbatim, `{enc}` percent-encoded.
    pub proxy_templates: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            load_timeout_secs: 15,
            page_delay_ms: 100,
            default_file_stem: "my-design".to_owned(),
            proxy_templates: vec![
                "https://cors-anywhere.herokuapp.com/{url}".to_owned(),
                "https://api.allorigins.win/raw?url={enc}".to_owned(),
                "https://crossorigin.me/{url}".to_owned(),
                "https://thingproxy.freeboard.io/fetch/{url}".to_owned(),
            ],
        }
    }
}

/// Every tunable of an editor session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub default_canvas_size: Vec2,
    pub min_canvas_dimension: f32,
    pub max_canvas_dimension: f32,
    pub history_capacity: usize,
    pub zoom: ZoomConfig,
    pub gestures: GestureConfig,
    pub autosave: AutosaveConfig,
    pub export: ExportConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_canvas_size: Vec2::new(800.0, 600.0),
            min_canvas_dimension: 50.0,
            max_canvas_dimension: 4000.0,
            history_capacity: 50,
            zoom: ZoomConfig::default(),
            gestures: GestureConfig::default(),
            autosave: AutosaveConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Named page sizes offered in the canvas size picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasPreset {
    InstagramPost,
    InstagramStory,
    FacebookPost,
    TwitterPost,
    Presentation,
    BusinessCard,
    Resume,
    Custom,
}

impl CanvasPreset {
    pub const ALL: [CanvasPreset; 8] = [
        CanvasPreset::InstagramPost,
        CanvasPreset::InstagramStory,
        CanvasPreset::FacebookPost,
        CanvasPreset::TwitterPost,
        CanvasPreset::Presentation,
        CanvasPreset::BusinessCard,
        CanvasPreset::Resume,
        CanvasPreset::Custom,
    ];

    pub fn size(&self) -> Vec2 {
        match self {
            CanvasPreset::InstagramPost => Vec2::new(1080.0, 1080.0),
            CanvasPreset::InstagramStory => Vec2::new(1080.0, 1920.0),
            CanvasPreset::FacebookPost => Vec2::new(1200.0, 630.0),
            CanvasPreset::TwitterPost => Vec2::new(1200.0, 675.0),
            CanvasPreset::Presentation => Vec2::new(1920.0, 1080.0),
            CanvasPreset::BusinessCard => Vec2::new(900.0, 500.0),
            CanvasPreset::Resume => Vec2::new(1414.0, 2000.0),
            CanvasPreset::Custom => Vec2::new(800.0, 600.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CanvasPreset::InstagramPost => "Instagram Post",
            CanvasPreset::InstagramStory => "Instagram Story",
            CanvasPreset::FacebookPost => "Facebook Post",
            CanvasPreset::TwitterPost => "Twitter Post",
            CanvasPreset::Presentation => "Presentation",
            CanvasPreset::BusinessCard => "Business Card",
            CanvasPreset::Resume => "Resume",
            CanvasPreset::Custom => "Custom",
        }
    }

    /// Reverse lookup used to show the active preset in the picker
    pub fn matching(size: Vec2) -> Option<CanvasPreset> {
        Self::ALL.into_iter().find(|preset| preset.size() == size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_behaviour() {
        let config = EditorConfig::default();
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.gestures.drag_dead_zone, 5.0);
        assert_eq!(config.gestures.min_resize, 20.0);
        assert_eq!(config.zoom.max, 3.0);
        assert_eq!(config.autosave.interval_secs, 30.0);
        assert_eq!(config.export.proxy_templates.len(), 4);
    }

    #[test]
    fn preset_lookup() {
        assert_eq!(CanvasPreset::InstagramPost.size(), Vec2::new(1080.0, 1080.0));
        assert_eq!(
            CanvasPreset::matching(Vec2::new(1920.0, 1080.0)),
            Some(CanvasPreset::Presentation)
        );
        assert_eq!(CanvasPreset::matching(Vec2::new(10.0, 10.0)), None);
    }
}
