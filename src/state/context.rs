/// The session object of the design editor.
///
/// `EditorContext` owns everything one editing session needs: the live
/// canvas, the page records, selection, history, the gesture engine and the
/// event bus. There is no global state, so several independent editors can
/// exist side by side (tests rely on this).
///
/// Every mutating operation emits an [`EditorEvent`]; a [`DirtyTracker`] on
/// the bus bumps the dirty generation that drives autosave.
///
/// # Example
///
/// ```rust,no_run
/// use eframe_design::config::EditorConfig;
/// use eframe_design::state::EditorContext;
///
/// let mut ctx = EditorContext::new(EditorConfig::default());
/// let id = ctx.create_text_element("Heading", 32.0);
/// ctx.end_text_edit();
/// assert_eq!(ctx.selection().selected(), Some(id));
/// ```
use egui::{Color32, Pos2, Vec2};

use super::{EditorState, StatusMessage};
use crate::canvas::Canvas;
use crate::command::{CommandContext, CommandHistory, HistoryAction};
use crate::config::{CanvasPreset, EditorConfig};
use crate::element::{Element, ElementId, MediaSource, MediaVariant, ShapeVariant, factory};
use crate::error::{ValidationError, ValidationResult};
use crate::event::{DirtySignal, DirtyTracker, EditorEvent, EventBus};
use crate::geometry::hit_testing::{hit_handle, topmost_element_at};
use crate::geometry::{Viewport, clamp_element, fit_zoom};
use crate::gesture::{GestureEngine, PointerTarget};
use crate::input::Shortcut;
use crate::page::{Background, Page, PageId, PageManager};
use crate::properties::{PropertyEdit, PropertyValues};
use crate::selection::{PanelKind, Selection};

#[derive(Debug)]
pub struct EditorContext {
    config: EditorConfig,
    zoom: f32,
    /// Last known size of the area the page is shown in, used to re-fit zoom
    viewport_size: Option<Vec2>,
    canvas: Canvas,
    pages: PageManager,
    selection: Selection,
    history: CommandHistory,
    gestures: GestureEngine,
    /// Text element as it was when its edit began
    edit_origin: Option<Element>,
    pub event_bus: EventBus,
    dirty: DirtySignal,
    status: Option<StatusMessage>,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorContext {
    pub fn new(config: EditorConfig) -> Self {
        let event_bus = EventBus::new();
        let dirty = DirtySignal::new();
        event_bus.subscribe(Box::new(DirtyTracker::new(dirty.clone())));

        Self {
            zoom: 1.0,
            viewport_size: None,
            canvas: Canvas::new(config.default_canvas_size),
            pages: PageManager::new(),
            selection: Selection::new(),
            history: CommandHistory::new(config.history_capacity),
            gestures: GestureEngine::new(config.gestures.clone()),
            edit_origin: None,
            event_bus,
            dirty,
            status: None,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn page_size(&self) -> Vec2 {
        self.canvas.size()
    }

    pub fn pages(&self) -> &PageManager {
        &self.pages
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// The gesture state machine
    pub fn current_state(&self) -> &EditorState {
        self.gestures.state()
    }

    pub fn dirty_generation(&self) -> u64 {
        self.dirty.generation()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.canvas.element(id)
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.selected().and_then(|id| self.canvas.element(id))
    }

    // ---- zoom and canvas size -------------------------------------------

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn viewport(&self, origin: Pos2) -> Viewport {
        Viewport::new(origin, self.zoom)
    }

    /// Continuous zoom, clamped to the configured range
    pub fn set_zoom(&mut self, zoom: f32) {
        let zoom = zoom.clamp(self.config.zoom.min, self.config.zoom.max);
        if (zoom - self.zoom).abs() > f32::EPSILON {
            self.zoom = zoom;
            self.event_bus.emit(EditorEvent::ZoomChanged { zoom });
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.quantized_zoom() + self.config.zoom.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.quantized_zoom() - self.config.zoom.step);
    }

    /// Ctrl+wheel: scrolling up zooms in one step, down zooms out
    pub fn zoom_by_wheel(&mut self, delta: f32) {
        if delta > 0.0 {
            self.zoom_in();
        } else if delta < 0.0 {
            self.zoom_out();
        }
    }

    fn quantized_zoom(&self) -> f32 {
        (self.zoom / self.config.zoom.step).round() * self.config.zoom.step
    }

    /// Fit the whole page into `available`, never zooming past 100%
    pub fn fit_to_viewport(&mut self, available: Vec2) -> f32 {
        self.viewport_size = Some(available);
        let zoom = fit_zoom(self.canvas.size(), available, &self.config.zoom);
        self.set_zoom(zoom);
        self.zoom
    }

    /// Remember the viewport size without changing zoom
    pub fn set_viewport_size(&mut self, available: Vec2) {
        self.viewport_size = Some(available);
    }

    /// Resize the page. Out-of-range dimensions are rejected without touching anything.
    pub fn set_canvas_size(&mut self, size: Vec2) -> ValidationResult<()> {
        let (min, max) = (self.config.min_canvas_dimension, self.config.max_canvas_dimension);
        if !(min..=max).contains(&size.x) || !(min..=max).contains(&size.y) {
            log::warn!("rejected canvas size {}×{}", size.x, size.y);
            return Err(ValidationError::CanvasSizeOutOfRange {
                width: size.x,
                height: size.y,
                min,
                max,
            });
        }

        self.gestures.cancel(&mut self.canvas, &self.event_bus);
        self.canvas.set_size(size);
        let margin = self.config.gestures.edge_margin;
        let mut moved = Vec::new();
        for element in self.canvas.elements_mut() {
            if clamp_element(element, size, margin) {
                moved.push(element.id);
            }
        }
        for id in moved {
            self.event_bus.emit(EditorEvent::ElementChanged { id });
        }
        self.event_bus.emit(EditorEvent::CanvasResized { size });
        log::info!("📐 Canvas resized to {}×{}", size.x, size.y);

        if let Some(available) = self.viewport_size {
            self.fit_to_viewport(available);
        }
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: CanvasPreset) -> ValidationResult<()> {
        self.set_canvas_size(preset.size())
    }

    // ---- element creation -----------------------------------------------

    /// Add a text element at the page center and start editing it
    pub fn create_text_element(&mut self, text: &str, font_size: f32) -> ElementId {
        let element = factory::create_text(text, font_size, self.canvas.size());
        let id = self.add_element(element);
        if let Err(err) = self.begin_text_edit(id) {
            log::warn!("new text element: {}", err);
        }
        id
    }

    pub fn create_shape_element(&mut self, variant: ShapeVariant) -> ElementId {
        let element = factory::create_shape(variant, self.canvas.size());
        self.add_element(element)
    }

    pub fn create_media_element(
        &mut self,
        variant: MediaVariant,
        source: MediaSource,
        intrinsic_size: Option<Vec2>,
    ) -> ElementId {
        let element = factory::create_media(variant, source, intrinsic_size, self.canvas.size());
        self.add_element(element)
    }

    /// Clamp, put on top, select and record an `Add` entry
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        self.commit_text_edit();
        clamp_element(&mut element, self.canvas.size(), self.config.gestures.edge_margin);
        let id = self.canvas.insert_top(element);
        let index = self.canvas.index_of(id).unwrap_or_default();
        if let Some(added) = self.canvas.element(id).cloned() {
            log::info!("➕ Added {} {}", added.element_type(), id);
            self.record(HistoryAction::Add { element: added, index });
        }
        self.event_bus.emit(EditorEvent::ElementAdded { id });
        self.select(id);
        id
    }

    // ---- selection ------------------------------------------------------

    pub fn select(&mut self, id: ElementId) {
        if self.canvas.element(id).is_none() {
            return;
        }
        if self.selection.editing().is_some_and(|editing| editing != id) {
            self.commit_text_edit();
        }
        let old = self.selection.select(id);
        if old != Some(id) {
            self.event_bus.emit(EditorEvent::SelectionChanged { old, new: Some(id) });
        }
    }

    pub fn deselect(&mut self) {
        self.commit_text_edit();
        let old = self.selection.clear();
        if old.is_some() {
            self.event_bus.emit(EditorEvent::SelectionChanged { old, new: None });
        }
    }

    pub fn panel(&self) -> PanelKind {
        self.selection.panel(&self.canvas)
    }

    /// Field values for the property panel of the selected element
    pub fn property_values(&self) -> Option<PropertyValues> {
        self.selected_element().map(PropertyValues::from_element)
    }

    /// Write one panel field into the selected element.
    ///
    /// With `coalesce`, successive edits of the same property of the same
    /// element (a slider being dragged) collapse into a single history entry.
    pub fn edit_selected(&mut self, edit: PropertyEdit, coalesce: bool) -> bool {
        let Some(id) = self.selection.selected() else {
            return false;
        };
        self.flush_text_edit(id);
        let page_size = self.canvas.size();
        let margin = self.config.gestures.edge_margin;
        let Some(element) = self.canvas.element_mut(id) else {
            return false;
        };
        let old = element.clone();
        if !edit.apply(element) {
            return false;
        }
        clamp_element(element, page_size, margin);
        if *element == old {
            return false;
        }
        let new = element.clone();
        self.event_bus.emit(EditorEvent::ElementChanged { id });
        log::debug!("property {} on {}", edit.name(), id);

        self.history
            .push_merged(HistoryAction::StyleUpdate { old, new }, edit.name(), coalesce);
        self.emit_history();
        self.rebase_text_edit();
        true
    }

    /// End the current run of coalesced panel edits
    pub fn seal_history(&mut self) {
        self.history.seal();
    }

    // ---- pointer gestures -----------------------------------------------

    /// What lies under a screen position: a handle of the selected element
    /// first, then the topmost element body
    pub fn hit_target(&self, pointer: Pos2, viewport: &Viewport) -> PointerTarget {
        let page_pos = viewport.screen_to_page(pointer);
        let gestures = self.gestures.config();

        if let Some(id) = self.selection.selected() {
            if let (Some(element), Some(binding)) = (self.canvas.element(id), self.canvas.binding(id)) {
                let radius = gestures.handle_hit_radius / viewport.zoom;
                let hit = hit_handle(
                    element,
                    &binding.resize_handles,
                    binding.rotatable,
                    gestures.rotate_handle_offset / viewport.zoom,
                    page_pos,
                    radius,
                );
                if let Some(handle) = hit {
                    return PointerTarget::Handle(id, handle);
                }
            }
        }

        topmost_element_at(self.canvas.elements(), page_pos).map_or(PointerTarget::Empty, PointerTarget::Body)
    }

    /// Pointer pressed at a screen position. Selects what is under it and
    /// starts the matching gesture.
    pub fn pointer_down(&mut self, pointer: Pos2, viewport: &Viewport) -> PointerTarget {
        let target = self.hit_target(pointer, viewport);
        match target {
            PointerTarget::Empty => {
                self.gestures.stop_glide();
                self.deselect();
                return target;
            }
            PointerTarget::Body(id) if self.selection.editing() == Some(id) => {
                // Clicks inside the text being edited place the cursor
                return target;
            }
            PointerTarget::Body(id) => self.select(id),
            PointerTarget::Handle(id, _) => {
                self.select(id);
                self.flush_text_edit(id);
            }
        }

        match self.gestures.begin(target, pointer, &self.canvas, &self.event_bus) {
            Ok(started) => {
                if started {
                    log::debug!("gesture {} started", self.gestures.state().name());
                }
            }
            Err(err) => log::warn!("pointer down ignored: {}", err),
        }
        target
    }

    pub fn pointer_move(&mut self, pointer: Pos2, viewport: &Viewport) {
        self.gestures.update(pointer, viewport, &mut self.canvas, &self.event_bus);
    }

    /// Pointer released: finish the gesture and record its net effect
    pub fn pointer_up(&mut self) {
        if let Some(action) = self.gestures.end(&self.canvas, &self.event_bus) {
            self.record(action);
            self.rebase_text_edit();
        }
    }

    /// Abandon the running gesture, restoring the element
    pub fn cancel_gesture(&mut self) {
        self.gestures.cancel(&mut self.canvas, &self.event_bus);
    }

    /// Advance animations by one frame. Returns true while something is still moving.
    pub fn step_animation(&mut self) -> bool {
        self.gestures.step_glide(&mut self.canvas, &self.event_bus)
    }

    // ---- history --------------------------------------------------------

    fn record(&mut self, action: HistoryAction) {
        self.history.push(action);
        self.emit_history();
    }

    fn emit_history(&self) {
        self.event_bus.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.prepare_history_step();
        let mut ctx = CommandContext::new(&mut self.canvas, &self.event_bus);
        let done = self.history.undo(&mut ctx).unwrap_or_else(|err| {
            log::warn!("undo skipped: {}", err);
            false
        });
        self.after_history_step();
        done
    }

    pub fn redo(&mut self) -> bool {
        self.prepare_history_step();
        let mut ctx = CommandContext::new(&mut self.canvas, &self.event_bus);
        let done = self.history.redo(&mut ctx).unwrap_or_else(|err| {
            log::warn!("redo skipped: {}", err);
            false
        });
        self.after_history_step();
        done
    }

    fn prepare_history_step(&mut self) {
        self.gestures.cancel(&mut self.canvas, &self.event_bus);
        self.gestures.stop_glide();
        self.commit_text_edit();
    }

    fn after_history_step(&mut self) {
        if let Some(id) = self.selection.selected() {
            if self.canvas.element(id).is_none() {
                self.selection.clear();
                self.event_bus.emit(EditorEvent::SelectionChanged { old: Some(id), new: None });
            }
        }
        self.emit_history();
    }

    // ---- deletion and z-order -------------------------------------------

    /// Delete the selected element. A text element being edited, or an
    /// element under an active gesture, is left alone.
    pub fn delete_selected(&mut self) -> ValidationResult<()> {
        let Some(id) = self.selection.selected() else {
            return Ok(());
        };
        if self.selection.editing() == Some(id) || self.gestures.state().target() == Some(id) {
            return Err(ValidationError::ElementBeingEdited(id));
        }
        self.delete_element(id)
    }

    pub fn delete_element(&mut self, id: ElementId) -> ValidationResult<()> {
        let (index, element) = self.canvas.remove(id).ok_or(ValidationError::ElementNotFound(id))?;
        if self.selection.is_selected(id) {
            self.selection.clear();
            self.event_bus.emit(EditorEvent::SelectionChanged { old: Some(id), new: None });
        }
        self.event_bus.emit(EditorEvent::ElementRemoved { id });
        log::info!("🗑️ Removed {} {}", element.element_type(), id);
        self.record(HistoryAction::Remove { element, index });
        Ok(())
    }

    /// Swap with the element directly above, or step up one level
    pub fn bring_forward(&mut self) {
        self.restack_selected(|canvas, z| {
            let above = canvas.elements().iter().find(|e| e.z_index == z + 1).map(|e| e.id);
            (z + 1, above)
        });
    }

    pub fn bring_to_front(&mut self) {
        self.restack_selected(|canvas, _| (canvas.max_z().unwrap_or(0) + 1, None));
    }

    /// Swap with the element directly below, or step down one level while above zero
    pub fn send_backward(&mut self) {
        self.restack_selected(|canvas, z| {
            match canvas.elements().iter().find(|e| e.z_index == z - 1).map(|e| e.id) {
                Some(below) => (z - 1, Some(below)),
                None => ((z - 1).max(0).min(z), None),
            }
        });
    }

    pub fn send_to_back(&mut self) {
        self.restack_selected(|canvas, _| ((canvas.min_z().unwrap_or(0) - 1).max(0), None));
    }

    /// `plan` returns the selected element's new z-index and, for a swap,
    /// the element that takes its old one
    fn restack_selected(&mut self, plan: impl FnOnce(&Canvas, i32) -> (i32, Option<ElementId>)) {
        let Some(id) = self.selection.selected() else {
            return;
        };
        let Some(current) = self.canvas.element(id).map(|e| e.z_index) else {
            return;
        };
        self.flush_text_edit(id);
        let (new_z, swap_with) = plan(&self.canvas, current);
        let mut changes = Vec::new();
        if new_z != current {
            changes.push((id, current, new_z));
        }
        if let Some(other) = swap_with.filter(|other| *other != id) {
            changes.push((other, new_z, current));
        }
        if changes.is_empty() {
            return;
        }

        let action = HistoryAction::Restack { changes };
        let mut ctx = CommandContext::new(&mut self.canvas, &self.event_bus);
        match action.apply(&mut ctx) {
            Ok(()) => {
                self.record(action);
                self.rebase_text_edit();
            }
            Err(err) => log::warn!("restack failed: {}", err),
        }
    }

    // ---- text editing ---------------------------------------------------

    pub fn begin_text_edit(&mut self, id: ElementId) -> ValidationResult<()> {
        let element = self.canvas.element(id).ok_or(ValidationError::ElementNotFound(id))?;
        if element.as_text().is_none() {
            return Ok(());
        }
        if self.selection.editing() == Some(id) {
            return Ok(());
        }
        let origin = element.clone();
        self.select(id);
        self.edit_origin = Some(origin);
        self.selection.set_editing_text(true);
        Ok(())
    }

    /// Replace the content of the text being edited. Its box is re-measured
    /// around the same center.
    pub fn set_text_content(&mut self, content: &str) {
        let Some(id) = self.selection.editing() else {
            return;
        };
        let page_size = self.canvas.size();
        let margin = self.config.gestures.edge_margin;
        let Some(element) = self.canvas.element_mut(id) else {
            return;
        };
        let Some(text) = element.as_text_mut() else {
            return;
        };
        if text.content == content {
            return;
        }
        text.content = content.to_owned();
        let measured = text.measure();
        element.size = measured;
        clamp_element(element, page_size, margin);
        self.event_bus.emit(EditorEvent::ElementChanged { id });
    }

    /// Record the typing done so far on `id` as an entry of its own, so the
    /// action about to change the same element gets a separate entry
    fn flush_text_edit(&mut self, id: ElementId) {
        if self.selection.editing() != Some(id) {
            return;
        }
        let Some(current) = self.canvas.element(id).cloned() else {
            return;
        };
        if let Some(old) = self.edit_origin.replace(current.clone()) {
            if old != current {
                self.record(HistoryAction::StyleUpdate { old, new: current });
            }
        }
    }

    /// Restart the pending text edit from the element as it is now
    fn rebase_text_edit(&mut self) {
        if let Some(id) = self.selection.editing() {
            self.edit_origin = self.canvas.element(id).cloned();
        }
    }

    /// Leave edit mode. Blank text is removed; changed text is recorded.
    pub fn end_text_edit(&mut self) {
        self.commit_text_edit();
    }

    fn commit_text_edit(&mut self) {
        let Some(id) = self.selection.editing() else {
            return;
        };
        self.selection.set_editing_text(false);
        let origin = self.edit_origin.take();
        let Some(current) = self.canvas.element(id).cloned() else {
            return;
        };

        if current.as_text().is_some_and(|t| t.is_blank()) {
            if let Some((index, _)) = self.canvas.remove(id) {
                self.selection.clear();
                self.event_bus.emit(EditorEvent::SelectionChanged { old: Some(id), new: None });
                self.event_bus.emit(EditorEvent::ElementRemoved { id });
                let element = origin.unwrap_or(current);
                self.record(HistoryAction::Remove { element, index });
            }
            return;
        }

        if let Some(old) = origin.filter(|old| *old != current) {
            self.record(HistoryAction::StyleUpdate { old, new: current });
        }
    }

    // ---- background -----------------------------------------------------

    pub fn background(&self) -> &Background {
        self.canvas.background()
    }

    /// Replace the page background as one undoable step
    pub fn set_background(&mut self, background: Background) {
        self.edit_background(background, false);
    }

    /// Background colour from a picker. With `coalesce`, successive colour
    /// changes fold into one entry.
    pub fn set_background_color(&mut self, color: Color32, coalesce: bool) {
        let background = Background {
            color,
            ..self.canvas.background().clone()
        };
        self.edit_background(background, coalesce);
    }

    fn edit_background(&mut self, background: Background, coalesce: bool) {
        let old = self.canvas.background().clone();
        if old == background {
            return;
        }
        let key = if old.color != background.color { "backgroundColor" } else { "background" };
        let action = HistoryAction::Background { old, new: background };
        let mut ctx = CommandContext::new(&mut self.canvas, &self.event_bus);
        if let Err(err) = action.apply(&mut ctx) {
            log::warn!("background change failed: {}", err);
            return;
        }
        self.history.push_merged(action, key, coalesce);
        self.emit_history();
    }

    /// Use an image as background with the default cover/center/no-repeat layout
    pub fn set_background_image(&mut self, source: MediaSource) {
        let background = Background {
            color: self.canvas.background().color,
            ..Background::with_image(source)
        };
        self.set_background(background);
    }

    pub fn clear_background(&mut self) {
        self.set_background(Background::default());
    }

    // ---- video controls -------------------------------------------------

    /// Play/pause a video element. Not recorded in history.
    pub fn toggle_playback(&mut self, id: ElementId) -> bool {
        let Some(media) = self.canvas.element_mut(id).and_then(|e| e.as_media_mut()) else {
            return false;
        };
        media.playback.playing = !media.playback.playing;
        let playing = media.playback.playing;
        self.event_bus.emit(EditorEvent::ElementChanged { id });
        playing
    }

    pub fn set_volume(&mut self, id: ElementId, volume: f32) {
        if let Some(media) = self.canvas.element_mut(id).and_then(|e| e.as_media_mut()) {
            media.set_volume(volume);
            self.event_bus.emit(EditorEvent::ElementChanged { id });
        }
    }

    // ---- keyboard -------------------------------------------------------

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
            Shortcut::Delete => {
                if let Err(err) = self.delete_selected() {
                    log::debug!("delete shortcut ignored: {}", err);
                }
            }
            Shortcut::ToggleBold | Shortcut::ToggleItalic | Shortcut::ToggleUnderline => {
                let Some(style) = self.selected_element().and_then(|e| e.as_text()).map(|t| t.style.clone())
                else {
                    return;
                };
                let edit = match shortcut {
                    Shortcut::ToggleBold => PropertyEdit::Bold(!style.bold),
                    Shortcut::ToggleItalic => PropertyEdit::Italic(!style.italic),
                    _ => PropertyEdit::Underline(!style.underline),
                };
                self.edit_selected(edit, false);
            }
        }
    }

    // ---- pages ----------------------------------------------------------

    /// Settle everything transient before the canvas is swapped out
    fn leave_page(&mut self) {
        self.gestures.cancel(&mut self.canvas, &self.event_bus);
        self.gestures.stop_glide();
        self.deselect();
    }

    fn after_page_change(&mut self) {
        self.history.clear();
        self.emit_history();
    }

    pub fn add_page(&mut self) -> PageId {
        self.leave_page();
        let id = self.pages.add_page(&mut self.canvas);
        self.event_bus.emit(EditorEvent::PageAdded { id });
        self.after_page_change();
        id
    }

    pub fn switch_to_page(&mut self, id: PageId) -> ValidationResult<()> {
        if id == self.pages.current_id() {
            return Ok(());
        }
        if self.pages.page(id).is_none() {
            return Err(ValidationError::PageNotFound(id));
        }
        self.leave_page();
        self.pages.switch_to_page(id, &mut self.canvas)?;
        self.event_bus.emit(EditorEvent::PageSwitched { id });
        self.after_page_change();
        Ok(())
    }

    pub fn delete_page(&mut self, id: PageId) -> ValidationResult<()> {
        if self.pages.page(id).is_none() {
            return Err(ValidationError::PageNotFound(id));
        }
        let was_current = id == self.pages.current_id();
        if was_current {
            self.leave_page();
        }
        self.pages.delete_page(id, &mut self.canvas)?;
        self.event_bus.emit(EditorEvent::PageDeleted { id });
        if was_current {
            self.after_page_change();
        }
        Ok(())
    }

    pub fn rename_page(&mut self, id: PageId, name: &str) -> ValidationResult<()> {
        self.pages.rename_page(id, name)?;
        self.event_bus.emit(EditorEvent::PageRenamed { id });
        Ok(())
    }

    /// Every page with the live canvas written back into the active one
    pub fn pages_for_export(&mut self) -> Vec<Page> {
        self.pages.save_current(&self.canvas);
        self.pages.pages().to_vec()
    }

    /// Replace the whole session, as when a snapshot is restored
    pub(crate) fn load_session(&mut self, size: Vec2, pages: PageManager) {
        self.leave_page();
        self.canvas.set_size(size);
        self.pages = pages;
        let current = self.pages.current_page().cloned();
        let (elements, background) = current
            .map(|page| (page.elements, page.background))
            .unwrap_or_default();
        self.canvas.load(elements, background);
        self.history.clear();
        self.emit_history();
        self.event_bus.emit(EditorEvent::CanvasResized { size });
        self.event_bus.emit(EditorEvent::SessionRestored);
        if let Some(available) = self.viewport_size {
            self.fit_to_viewport(available);
        }
    }

    // ---- status ---------------------------------------------------------

    pub fn show_status(&mut self, text: impl Into<String>, is_error: bool, now: f64) {
        let lifetime = self.config.autosave.status_secs;
        self.status = Some(if is_error {
            StatusMessage::error(text, now, lifetime)
        } else {
            StatusMessage::info(text, now, lifetime)
        });
    }

    /// The visible status message, dropping it once it has expired
    pub fn status(&mut self, now: f64) -> Option<&StatusMessage> {
        if self.status.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.status = None;
        }
        self.status.as_ref()
    }
}
