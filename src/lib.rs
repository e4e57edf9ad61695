#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod auth;
pub mod canvas;
pub mod command;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod export;
pub mod file_handler;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod page;
pub mod panels;
pub mod properties;
pub mod renderer;
pub mod selection;
pub mod state;
pub mod texture_manager;
pub mod util;
pub mod widgets;

pub use app::{AppPreferences, DesignApp};
pub use canvas::Canvas;
pub use command::{CommandHistory, HistoryAction};
pub use config::{CanvasPreset, EditorConfig};
pub use element::{Element, ElementId, ElementKind};
pub use input::{InputEvent, InputHandler, Shortcut};
pub use page::{Page, PageId, PageManager};
pub use renderer::CanvasRenderer;
pub use state::{EditorContext, EditorState};
