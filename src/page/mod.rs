use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::{Element, MediaSource};

mod manager;

pub use manager::PageManager;

/// Identifier of a page. Ids grow monotonically, so sorting by id gives creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page-{}", self.0)
    }
}

/// How a background image is scaled to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSize {
    /// Fill the page, cropping the overflow
    #[default]
    Cover,
    /// Fit inside the page, letterboxing
    Contain,
    /// Intrinsic pixel size
    Auto,
    /// Fill the page, ignoring aspect ratio
    Stretch,
}

impl BackgroundSize {
    pub const ALL: [BackgroundSize; 4] = [
        BackgroundSize::Cover,
        BackgroundSize::Contain,
        BackgroundSize::Auto,
        BackgroundSize::Stretch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundSize::Cover => "cover",
            BackgroundSize::Contain => "contain",
            BackgroundSize::Auto => "auto",
            BackgroundSize::Stretch => "100% 100%",
        }
    }
}

/// Where the scaled background image is aligned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundPosition {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl BackgroundPosition {
    pub const ALL: [BackgroundPosition; 9] = [
        BackgroundPosition::TopLeft,
        BackgroundPosition::Top,
        BackgroundPosition::TopRight,
        BackgroundPosition::Left,
        BackgroundPosition::Center,
        BackgroundPosition::Right,
        BackgroundPosition::BottomLeft,
        BackgroundPosition::Bottom,
        BackgroundPosition::BottomRight,
    ];

    /// Alignment factors on each axis, 0.0 = start, 0.5 = center, 1.0 = end
    pub fn factors(&self) -> (f32, f32) {
        match self {
            BackgroundPosition::TopLeft => (0.0, 0.0),
            BackgroundPosition::Top => (0.5, 0.0),
            BackgroundPosition::TopRight => (1.0, 0.0),
            BackgroundPosition::Left => (0.0, 0.5),
            BackgroundPosition::Center => (0.5, 0.5),
            BackgroundPosition::Right => (1.0, 0.5),
            BackgroundPosition::BottomLeft => (0.0, 1.0),
            BackgroundPosition::Bottom => (0.5, 1.0),
            BackgroundPosition::BottomRight => (1.0, 1.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundPosition::TopLeft => "top left",
            BackgroundPosition::Top => "top",
            BackgroundPosition::TopRight => "top right",
            BackgroundPosition::Left => "left",
            BackgroundPosition::Center => "center",
            BackgroundPosition::Right => "right",
            BackgroundPosition::BottomLeft => "bottom left",
            BackgroundPosition::Bottom => "bottom",
            BackgroundPosition::BottomRight => "bottom right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundRepeat {
    #[default]
    NoRepeat,
    Repeat,
}

impl BackgroundRepeat {
    pub const ALL: [BackgroundRepeat; 2] = [BackgroundRepeat::NoRepeat, BackgroundRepeat::Repeat];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundRepeat::NoRepeat => "no-repeat",
            BackgroundRepeat::Repeat => "repeat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub color: Color32,
    pub image: Option<MediaSource>,
    pub position: BackgroundPosition,
    pub repeat: BackgroundRepeat,
    pub size: BackgroundSize,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            color: Color32::WHITE,
            image: None,
            position: BackgroundPosition::Center,
            repeat: BackgroundRepeat::NoRepeat,
            size: BackgroundSize::Cover,
        }
    }
}

impl Background {
    pub fn with_image(image: MediaSource) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// An independent canvas surface: its own elements and background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub elements: Vec<Element>,
    pub background: Background,
}

impl Page {
    pub fn new(id: PageId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            elements: Vec::new(),
            background: Background::default(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.elements.is_empty() && self.background == Background::default()
    }
}
