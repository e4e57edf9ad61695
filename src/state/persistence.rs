use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EditorContext;
use crate::element::{Element, ElementBody, ElementId, MediaSource, color_from_hex, color_to_hex};
use crate::page::{Background, BackgroundPosition, BackgroundRepeat, BackgroundSize, Page, PageId, PageManager};

/// Errors that can occur during state persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize state: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write state: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read state: {0}")]
    ReadError(String),

    #[error("Invalid state data: {0}")]
    InvalidState(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Box of an element record. Missing fields fall back to a 100×100 box at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordPosition {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for RecordPosition {
    fn default() -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            width: 100.0,
            height: 100.0,
        }
    }
}

/// One element as written to storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: String,
    /// Inline style string, kept for inspection and round-trip comparison
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub position: RecordPosition,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default = "full_opacity")]
    pub opacity: f32,
    /// Kind-specific fields
    pub data: ElementBody,
}

fn full_opacity() -> f32 {
    1.0
}

impl ElementRecord {
    pub fn from_element(element: &Element) -> Self {
        Self {
            id: element.id,
            element_type: element.element_type().to_owned(),
            style: element.style_string(),
            position: RecordPosition {
                top: element.position.y,
                left: element.position.x,
                width: element.size.x,
                height: element.size.y,
            },
            content: element.content(),
            rotation: element.rotation,
            z_index: element.z_index,
            opacity: element.opacity,
            data: element.body.clone(),
        }
    }

    pub fn into_element(self) -> Element {
        let mut element = Element::new(
            self.data,
            Pos2::new(self.position.left, self.position.top),
            Vec2::new(self.position.width, self.position.height),
        );
        element.id = self.id;
        element.set_rotation(self.rotation);
        element.z_index = self.z_index;
        element.opacity = self.opacity.clamp(0.0, 1.0);
        element
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub id: PageId,
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub background: Background,
}

/// Represents a snapshot of the editor session that can be serialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub background_color: String,
    pub has_background: bool,
    #[serde(default)]
    pub background_image: Option<MediaSource>,
    #[serde(default)]
    pub background_position: BackgroundPosition,
    #[serde(default)]
    pub background_repeat: BackgroundRepeat,
    #[serde(default)]
    pub background_size: BackgroundSize,
    /// Elements of the active page
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub pages: Vec<PageRecord>,
    #[serde(default)]
    pub current_page: Option<PageId>,
    pub last_saved: DateTime<Utc>,
    /// Version of the application when the snapshot was taken
    pub version: String,
}

impl EditorSnapshot {
    /// Create a new snapshot from the current editor context
    pub fn new(ctx: &EditorContext) -> Self {
        let canvas = ctx.canvas();
        let background = canvas.background();
        let current = ctx.pages().current_id();
        let elements: Vec<ElementRecord> = canvas.elements().iter().map(ElementRecord::from_element).collect();

        let pages = ctx
            .pages()
            .pages()
            .iter()
            .map(|page| {
                if page.id == current {
                    PageRecord {
                        id: page.id,
                        name: page.name.clone(),
                        elements: elements.clone(),
                        background: background.clone(),
                    }
                } else {
                    PageRecord {
                        id: page.id,
                        name: page.name.clone(),
                        elements: page.elements.iter().map(ElementRecord::from_element).collect(),
                        background: page.background.clone(),
                    }
                }
            })
            .collect();

        Self {
            canvas_width: canvas.size().x,
            canvas_height: canvas.size().y,
            background_color: color_to_hex(background.color),
            has_background: background.has_image(),
            background_image: background.image.clone(),
            background_position: background.position,
            background_repeat: background.repeat,
            background_size: background.size,
            elements,
            pages,
            current_page: Some(current),
            last_saved: crate::util::time::now_utc(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn background(&self) -> Background {
        Background {
            color: color_from_hex(&self.background_color).unwrap_or(egui::Color32::WHITE),
            image: self.background_image.clone().filter(|_| self.has_background),
            position: self.background_position,
            repeat: self.background_repeat,
            size: self.background_size,
        }
    }

    /// Restore this snapshot to an editor context.
    ///
    /// Every element is remounted on the way in; bindings are never stored.
    pub fn restore(self, ctx: &mut EditorContext) -> PersistenceResult<()> {
        if self.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Snapshot version {} differs from current version {}",
                self.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        let config = ctx.config();
        let (min, max) = (config.min_canvas_dimension, config.max_canvas_dimension);
        let size = Vec2::new(self.canvas_width, self.canvas_height);
        if !(min..=max).contains(&size.x) || !(min..=max).contains(&size.y) {
            return Err(PersistenceError::InvalidState(format!(
                "canvas size {}×{} out of range",
                size.x, size.y
            )));
        }

        let background = self.background();
        let mut pages: Vec<Page> = self
            .pages
            .into_iter()
            .map(|record| Page {
                id: record.id,
                name: record.name,
                elements: record.elements.into_iter().map(ElementRecord::into_element).collect(),
                background: record.background,
            })
            .collect();

        let active_elements: Vec<Element> = self.elements.into_iter().map(ElementRecord::into_element).collect();
        let current = match self.current_page.filter(|id| pages.iter().any(|p| p.id == *id)) {
            Some(id) => id,
            None => {
                // Older snapshots only carry the active page
                let id = PageId(pages.iter().map(|p| p.id.0).max().unwrap_or(0) + 1);
                pages.push(Page::new(id, format!("Page {}", pages.len() + 1)));
                id
            }
        };
        if let Some(page) = pages.iter_mut().find(|p| p.id == current) {
            page.elements = active_elements;
            page.background = background;
        }

        let count: usize = pages.iter().map(|p| p.elements.len()).sum();
        ctx.load_session(size, PageManager::from_pages(pages, Some(current)));
        log::info!(
            "📂 Restored session saved {} ({} elements)",
            crate::util::time::iso_timestamp(self.last_saved),
            count
        );
        Ok(())
    }
}

impl EditorContext {
    /// Write the session under the configured storage key and report the
    /// outcome in the status indicator. Failures never propagate.
    pub fn save_session(&mut self, store: &mut dyn SnapshotStore, now: f64) -> bool {
        let key = self.config().autosave.storage_key.clone();
        match save_snapshot(self, store, &key) {
            Ok(()) => {
                self.event_bus.emit(crate::event::EditorEvent::SessionSaved);
                self.show_status(super::StatusMessage::SAVED, false, now);
                true
            }
            Err(err) => {
                log::error!("Error saving editor state: {}", err);
                self.show_status(super::StatusMessage::SAVE_FAILED, true, now);
                false
            }
        }
    }

    /// Load the stored session, if any. Returns true when something was restored.
    pub fn restore_session(&mut self, store: &dyn SnapshotStore, now: f64) -> bool {
        let key = self.config().autosave.storage_key.clone();
        let result = load_snapshot(store, &key).and_then(|snapshot| match snapshot {
            Some(snapshot) => snapshot.restore(self).map(|()| true),
            None => Ok(false),
        });
        match result {
            Ok(true) => {
                self.show_status(super::StatusMessage::RESTORED, false, now);
                true
            }
            Ok(false) => {
                log::info!("No saved state found");
                false
            }
            Err(err) => {
                log::error!("Error restoring editor state: {}", err);
                self.show_status(super::StatusMessage::RESTORE_FAILED, true, now);
                false
            }
        }
    }
}

/// Opaque key-value store the session is written to
pub trait SnapshotStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> PersistenceResult<()>;
    fn remove(&mut self, key: &str) -> PersistenceResult<()>;
}

/// Serialize the session into `store` under `key`
pub fn save_snapshot(ctx: &EditorContext, store: &mut dyn SnapshotStore, key: &str) -> PersistenceResult<()> {
    let json = EditorSnapshot::new(ctx).to_json()?;
    store.write(key, &json)?;
    log::info!("💾 Saved session under {} ({} bytes)", key, json.len());
    Ok(())
}

/// Read the snapshot stored under `key`, if there is one
pub fn load_snapshot(store: &dyn SnapshotStore, key: &str) -> PersistenceResult<Option<EditorSnapshot>> {
    store.read(key)?.map(|json| EditorSnapshot::from_json(&json)).transpose()
}

/// In-memory store, for tests and sessions without storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write, like a full quota
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        if self.read_only {
            return Err(PersistenceError::WriteError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "storage is read-only",
            )));
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Stores each key as `<key>.json` in a directory and keeps rotated
/// `autosave_*` copies of every write
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where state files are stored
    state_dir: PathBuf,
    /// Maximum number of auto-save files to keep
    max_autosaves: usize,
}

impl FileStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            max_autosaves: 5,
        }
    }

    pub fn with_max_autosaves(mut self, max_autosaves: usize) -> Self {
        self.max_autosaves = max_autosaves;
        self
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{}.json", key))
    }

    fn autosave_files(&self) -> PersistenceResult<Vec<PathBuf>> {
        let mut autosaves: Vec<PathBuf> = fs::read_dir(&self.state_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("autosave_"))
            .map(|entry| entry.path())
            .collect();
        // Names embed a zero-padded timestamp and a sequence number, so they sort chronologically
        autosaves.sort();
        Ok(autosaves)
    }

    /// Clean up old auto-save files
    fn cleanup_old_autosaves(&self) -> PersistenceResult<()> {
        let autosaves = self.autosave_files()?;
        let excess = autosaves.len().saturating_sub(self.max_autosaves);
        for oldest in &autosaves[..excess] {
            fs::remove_file(oldest)?;
        }
        Ok(())
    }

    /// Find the most recent auto-save file
    pub fn find_latest_autosave(&self) -> PersistenceResult<Option<PathBuf>> {
        if !self.state_dir.exists() {
            return Ok(None);
        }
        Ok(self.autosave_files()?.pop())
    }

    pub fn autosave_count(&self) -> PersistenceResult<usize> {
        if !self.state_dir.exists() {
            return Ok(0);
        }
        Ok(self.autosave_files()?.len())
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(path)
            .map(Some)
            .map_err(|e| PersistenceError::ReadError(e.to_string()))
    }

    fn write(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        fs::create_dir_all(&self.state_dir)?;
        fs::write(self.path_for(key), value)?;

        if self.max_autosaves > 0 {
            let sequence = self.autosave_files()?.len();
            let name = format!(
                "autosave_{:020}_{:06}_{}.json",
                Utc::now().timestamp_micros(),
                sequence,
                key
            );
            fs::write(self.state_dir.join(name), value)?;
            self.cleanup_old_autosaves()?;
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Adapter over eframe's app storage (local storage on the web, a file natively)
pub struct EframeStore<'a> {
    storage: &'a mut dyn eframe::Storage,
}

impl<'a> EframeStore<'a> {
    pub fn new(storage: &'a mut dyn eframe::Storage) -> Self {
        Self { storage }
    }
}

impl SnapshotStore for EframeStore<'_> {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.storage.get_string(key).filter(|value| !value.is_empty()))
    }

    fn write(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        self.storage.set_string(key, value.to_owned());
        self.storage.flush();
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        self.storage.set_string(key, String::new());
        Ok(())
    }
}
