use eframe::egui;
use egui::{Color32, FontId, Pos2, Rect, Vec2};

use crate::app::DesignApp;
use crate::geometry::Viewport;
use crate::gesture::PointerTarget;
use crate::input::InputEvent;

const WORKSPACE_FILL: Color32 = Color32::from_rgb(0xe5, 0xe7, 0xeb);

/// Top-left of the page: centered when it fits, pinned to the corner otherwise
fn page_origin(area: Rect, page: Vec2) -> Pos2 {
    let x = if page.x <= area.width() {
        area.center().x - page.x / 2.0
    } else {
        area.left()
    };
    let y = if page.y <= area.height() {
        area.center().y - page.y / 2.0
    } else {
        area.top()
    };
    Pos2::new(x, y)
}

pub fn central_panel(app: &mut DesignApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::central_panel(&ctx.style()).fill(WORKSPACE_FILL))
        .show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            if app.fitted {
                app.editor.set_viewport_size(canvas_rect.size());
            } else {
                app.editor.fit_to_viewport(canvas_rect.size());
                app.fitted = true;
            }
            let page_size = app.editor.page_size() * app.editor.zoom();
            let viewport = app.editor.viewport(page_origin(canvas_rect, page_size));

            // Presses under an open dialog belong to the dialog
            let press_rect = if app.panels.pdf_prompt.is_some() {
                Rect::NOTHING
            } else {
                canvas_rect
            };
            let editing = app.editor.selection().is_editing_text();
            for event in app.input.process_input(ctx, press_rect, editing) {
                handle_event(app, event, &viewport);
            }
            if app.editor.step_animation() {
                ctx.request_repaint();
            }

            app.renderer.render(ui, &app.editor, viewport);
            text_edit_overlay(app, ui, &viewport);
        });
}

fn handle_event(app: &mut DesignApp, event: InputEvent, viewport: &Viewport) {
    match event {
        InputEvent::PointerDown { position } => {
            app.editor.pointer_down(position, viewport);
        }
        InputEvent::PointerMove { position } => app.editor.pointer_move(position, viewport),
        InputEvent::PointerUp => app.editor.pointer_up(),
        InputEvent::DoubleClick { position } => {
            if let PointerTarget::Body(id) = app.editor.hit_target(position, viewport) {
                if let Err(err) = app.editor.begin_text_edit(id) {
                    log::warn!("Cannot edit text: {}", err);
                }
            }
        }
        InputEvent::Zoom { delta } => app.editor.zoom_by_wheel(delta),
        InputEvent::Shortcut(shortcut) => app.editor.handle_shortcut(shortcut),
    }
}

/// In-place editor over the text element being typed into
fn text_edit_overlay(app: &mut DesignApp, ui: &mut egui::Ui, viewport: &Viewport) {
    let Some(id) = app.editor.selection().editing() else {
        app.panels.text_buffer_for = None;
        return;
    };
    let Some(element) = app.editor.element(id) else {
        return;
    };
    let Some(text) = element.as_text() else {
        return;
    };

    let fresh = app.panels.text_buffer_for != Some(id);
    if fresh {
        app.panels.text_buffer = text.content.clone();
        app.panels.text_buffer_for = Some(id);
    }
    let rect = viewport.page_rect_to_screen(element.rect());
    let font = FontId::proportional(text.style.font_size * viewport.zoom);
    let color = text.style.color;

    let editor = egui::TextEdit::multiline(&mut app.panels.text_buffer)
        .font(font)
        .text_color(color)
        .frame(false)
        .desired_width(rect.width());
    let response = ui.put(rect, editor);
    if fresh {
        response.request_focus();
    }
    if response.changed() {
        app.editor.set_text_content(&app.panels.text_buffer);
    }
    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.editor.end_text_edit();
    }
}
