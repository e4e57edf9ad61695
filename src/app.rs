use eframe::egui;

use crate::config::EditorConfig;
use crate::element::ElementId;
use crate::export::{ExportFormat, ExportOutput, ExportResult, Exporter, ImageResolver};
use crate::file_handler::FileHandler;
use crate::input::InputHandler;
use crate::page::PageId;
use crate::panels::{central_panel, pages_panel, properties_panel, toolbar};
use crate::renderer::CanvasRenderer;
use crate::state::{Autosave, EditorContext, EframeStore, MemoryStore, SaveReason, SnapshotStore};
use crate::util::time::current_time_secs;

/// Settings remembered between runs.
/// We derive Deserialize/Serialize so they can be persisted on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppPreferences {
    pub config: EditorConfig,
    pub show_history: bool,
    /// File name last typed into the PDF prompt
    pub pdf_file_name: String,
}

impl Default for AppPreferences {
    fn default() -> Self {
        let config = EditorConfig::default();
        let pdf_file_name = config.export.default_file_stem.clone();
        Self {
            config,
            show_history: false,
            pdf_file_name,
        }
    }
}

/// Transient widget state of the panels
#[derive(Debug, Default)]
pub(crate) struct PanelState {
    /// Page being renamed and the name typed so far
    pub rename: Option<(PageId, String)>,
    /// Last page validation failure, shown under the page list
    pub page_error: Option<String>,
    /// Open PDF file-name prompt
    pub pdf_prompt: Option<String>,
    pub image_url: String,
    pub background_url: String,
    pub custom_size: egui::Vec2,
    /// Text element the edit buffer was loaded from
    pub text_buffer_for: Option<ElementId>,
    pub text_buffer: String,
}

pub struct DesignApp {
    pub(crate) editor: EditorContext,
    pub(crate) preferences: AppPreferences,
    pub(crate) panels: PanelState,
    pub(crate) renderer: CanvasRenderer,
    pub(crate) input: InputHandler,
    file_handler: FileHandler,
    autosave: Autosave,
    exporter: Exporter,
    /// Zoom has been fitted to the viewport once
    pub(crate) fitted: bool,
}

impl std::fmt::Debug for DesignApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignApp")
            .field("editor", &self.editor)
            .field("preferences", &self.preferences)
            .field("autosave", &self.autosave)
            .finish_non_exhaustive()
    }
}

impl Default for DesignApp {
    fn default() -> Self {
        Self::with_preferences(AppPreferences::default())
    }
}

impl DesignApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let preferences: AppPreferences = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        let mut app = Self::with_preferences(preferences);

        if let Some(storage) = cc.storage {
            // eframe only lends the storage immutably here
            let key = app.editor.config().autosave.storage_key.clone();
            let mut store = MemoryStore::new();
            if let Some(json) = storage.get_string(&key) {
                if let Err(err) = store.write(&key, &json) {
                    log::error!("Could not stage saved session: {}", err);
                }
            }
            app.editor.restore_session(&store, current_time_secs());
        }
        app
    }

    pub fn with_preferences(preferences: AppPreferences) -> Self {
        let now = current_time_secs();
        let config = preferences.config.clone();
        let custom_size = config.default_canvas_size;
        Self {
            autosave: Autosave::new(&config.autosave, now),
            exporter: Self::make_exporter(&config),
            editor: EditorContext::new(config),
            preferences,
            panels: PanelState {
                custom_size,
                ..Default::default()
            },
            renderer: CanvasRenderer::new(),
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            fitted: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn make_exporter(config: &EditorConfig) -> Exporter {
        match Exporter::with_http(config.export.clone()) {
            Ok(exporter) => exporter,
            Err(err) => {
                log::warn!("HTTP image fetching unavailable, exporting inline images only: {}", err);
                Exporter::new(config.export.clone(), ImageResolver::offline())
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn make_exporter(config: &EditorConfig) -> Exporter {
        Exporter::new(config.export.clone(), ImageResolver::offline())
    }

    pub fn editor(&self) -> &EditorContext {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorContext {
        &mut self.editor
    }

    /// Export the active page as a PNG or JPEG
    pub fn export_image(&mut self, format: ExportFormat) {
        let now = current_time_secs();
        let current = self.editor.pages().current_id();
        let Some(page) = self.editor.pages_for_export().into_iter().find(|p| p.id == current) else {
            return;
        };
        log::info!("Exporting {} as {:?}", page.name, format);
        let result = self.exporter.export_image_blocking(&page, self.editor.page_size(), format);
        self.finish_export(result, now);
    }

    /// Export every page into one PDF
    pub fn export_pdf(&mut self, file_name: &str) {
        let now = current_time_secs();
        self.preferences.pdf_file_name = file_name.to_owned();
        let pages = self.editor.pages_for_export();
        log::info!("Exporting {} pages as PDF", pages.len());
        let result = self
            .exporter
            .export_pdf_blocking(&pages, self.editor.page_size(), file_name, |progress| {
                log::info!("{}", progress.message());
            });
        self.finish_export(result, now);
    }

    fn finish_export(&mut self, result: ExportResult<ExportOutput>, now: f64) {
        match result.and_then(|output| Self::deliver(&output)) {
            Ok(location) => self.editor.show_status(format!("Exported {location}"), false, now),
            Err(err) => {
                log::error!("Export failed: {}", err);
                self.editor.show_status(format!("Export failed: {err}"), true, now);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn deliver(output: &ExportOutput) -> ExportResult<String> {
        let dir = std::env::current_dir()?;
        crate::util::download::deliver(output, &dir)
    }

    #[cfg(target_arch = "wasm32")]
    fn deliver(output: &ExportOutput) -> ExportResult<String> {
        crate::util::download::deliver(output)
    }

    fn autosave(&mut self, frame: &mut eframe::Frame, now: f64) {
        let Some(reason) = self.autosave.tick(self.editor.dirty_generation(), now) else {
            return;
        };
        if let Some(storage) = frame.storage_mut() {
            log::debug!("autosave ({:?})", reason);
            self.editor.save_session(&mut EframeStore::new(storage), now);
        }
        self.autosave.mark_saved(now);
    }

    fn status_overlay(&mut self, ctx: &egui::Context, now: f64) {
        let Some(status) = self.editor.status(now).cloned() else {
            return;
        };
        egui::Area::new(egui::Id::new("status_message"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-20.0, -20.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(status.background())
                    .rounding(4.0)
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                    .show(ui, |ui| {
                        ui.colored_label(egui::Color32::WHITE, &status.text);
                    });
            });
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}

impl eframe::App for DesignApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.preferences);
        let now = current_time_secs();
        log::debug!("autosave ({:?})", SaveReason::Exit);
        self.editor.save_session(&mut EframeStore::new(storage), now);
        self.autosave.mark_saved(now);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let now = current_time_secs();

        if self.file_handler.check_for_dropped_files(ctx) {
            let added = self.file_handler.process_dropped_files(&mut self.editor);
            log::info!("Added {} dropped files", added.len());
        }
        self.file_handler.preview_files_being_dropped(ctx);

        toolbar(self, ctx);
        pages_panel(self, ctx);
        properties_panel(self, ctx);
        central_panel(self, ctx);

        self.status_overlay(ctx, now);
        self.autosave(frame, now);

        if self.autosave.has_pending_change() {
            let debounce = self.editor.config().autosave.debounce_secs;
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(debounce));
        }
    }
}
