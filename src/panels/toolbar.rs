use eframe::egui;

use crate::app::DesignApp;
use crate::config::CanvasPreset;
use crate::element::{MediaSource, MediaVariant, ShapeVariant, TextRole};
use crate::export::ExportFormat;
use crate::util::time::current_time_secs;

pub fn toolbar(app: &mut DesignApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            text_menu(app, ui);
            shape_menu(app, ui);
            image_menu(app, ui);
            ui.separator();

            let can_undo = app.editor.can_undo();
            let can_redo = app.editor.can_redo();
            if ui.add_enabled(can_undo, egui::Button::new("⟲ Undo")).clicked() {
                app.editor.undo();
            }
            if ui.add_enabled(can_redo, egui::Button::new("⟳ Redo")).clicked() {
                app.editor.redo();
            }
            ui.toggle_value(&mut app.preferences.show_history, "History");
            ui.separator();

            if ui.button("−").on_hover_text("Zoom out").clicked() {
                app.editor.zoom_out();
            }
            ui.label(format!("{:.0}%", app.editor.zoom() * 100.0));
            if ui.button("+").on_hover_text("Zoom in").clicked() {
                app.editor.zoom_in();
            }
            if ui.button("Fit").clicked() {
                app.fitted = false;
            }
            ui.separator();

            size_menu(app, ui);
            export_menu(app, ui);
        });
    });

    pdf_prompt(app, ctx);
    if app.preferences.show_history {
        history_window(app, ctx);
    }
}

fn text_menu(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.menu_button("Text", |ui| {
        for (role, label) in [
            (TextRole::Heading, "Add a heading"),
            (TextRole::Subheading, "Add a subheading"),
            (TextRole::Body, "Add body text"),
        ] {
            if ui.button(label).clicked() {
                app.editor.create_text_element(role.placeholder(), role.font_size());
                ui.close_menu();
            }
        }
    });
}

fn shape_label(variant: ShapeVariant) -> &'static str {
    match variant {
        ShapeVariant::Rectangle => "Rectangle",
        ShapeVariant::Circle => "Circle",
        ShapeVariant::Triangle => "Triangle",
        ShapeVariant::Line => "Line",
        ShapeVariant::Arrow => "Arrow",
        ShapeVariant::Star => "Star",
        ShapeVariant::Hexagon => "Hexagon",
    }
}

fn shape_menu(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.menu_button("Shapes", |ui| {
        for variant in ShapeVariant::ALL {
            if ui.button(shape_label(variant)).clicked() {
                app.editor.create_shape_element(variant);
                ui.close_menu();
            }
        }
    });
}

fn image_menu(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.menu_button("Image", |ui| {
        ui.label("Image address");
        ui.text_edit_singleline(&mut app.panels.image_url);
        let url = app.panels.image_url.trim().to_owned();
        if ui.add_enabled(!url.is_empty(), egui::Button::new("Insert")).clicked() {
            app.editor
                .create_media_element(MediaVariant::Image, MediaSource::url(url), None);
            app.panels.image_url.clear();
            ui.close_menu();
        }
        ui.separator();
        ui.weak("Or drop image and video files onto the window");
    });
}

fn size_menu(app: &mut DesignApp, ui: &mut egui::Ui) {
    let size = app.editor.page_size();
    let current = CanvasPreset::matching(size);
    ui.menu_button(format!("{}×{}", size.x, size.y), |ui| {
        for preset in CanvasPreset::ALL {
            let preset_size = preset.size();
            let label = format!("{} ({}×{})", preset.label(), preset_size.x, preset_size.y);
            if ui.selectable_label(current == Some(preset), label).clicked() {
                if let Err(err) = app.editor.apply_preset(preset) {
                    app.editor.show_status(err.to_string(), true, current_time_secs());
                }
                app.panels.custom_size = app.editor.page_size();
                ui.close_menu();
            }
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut app.panels.custom_size.x).speed(1.0).prefix("W "));
            ui.add(egui::DragValue::new(&mut app.panels.custom_size.y).speed(1.0).prefix("H "));
            if ui.button("Apply").clicked() {
                let custom = app.panels.custom_size.round();
                if let Err(err) = app.editor.set_canvas_size(custom) {
                    app.editor.show_status(err.to_string(), true, current_time_secs());
                }
            }
        });
    });
}

fn export_menu(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.menu_button("Export", |ui| {
        if ui.button("PNG").clicked() {
            ui.close_menu();
            app.export_image(ExportFormat::Png);
        }
        if ui.button("JPEG").clicked() {
            ui.close_menu();
            app.export_image(ExportFormat::Jpeg);
        }
        if ui.button("PDF (all pages)…").clicked() {
            ui.close_menu();
            app.panels.pdf_prompt = Some(app.preferences.pdf_file_name.clone());
        }
    });
}

/// Asks for the PDF file name before exporting every page
fn pdf_prompt(app: &mut DesignApp, ctx: &egui::Context) {
    let Some(mut name) = app.panels.pdf_prompt.take() else {
        return;
    };

    let mut confirmed = None;
    egui::Window::new("Export PDF")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label("Enter a name for your PDF file:");
            let response = ui.text_edit_singleline(&mut name);
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                confirmed = Some(true);
            }
            ui.label(format!("{} will be exported.", app.editor.pages().count_label()));
            ui.horizontal(|ui| {
                if ui.button("Export").clicked() {
                    confirmed = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    confirmed = Some(false);
                }
            });
        });

    match confirmed {
        Some(true) => app.export_pdf(&name),
        Some(false) => log::debug!("PDF export cancelled"),
        None => app.panels.pdf_prompt = Some(name),
    }
}

fn history_window(app: &mut DesignApp, ctx: &egui::Context) {
    let history = app.editor.history();
    egui::Window::new("History")
        .default_pos(egui::pos2(260.0, 80.0))
        .open(&mut app.preferences.show_history)
        .show(ctx, |ui| {
            egui::Grid::new("history_grid")
                .num_columns(2)
                .spacing([40.0, 4.0])
                .striped(true)
                .show(ui, |ui| {
                    ui.label("Undo stack size:");
                    ui.label(format!("{} / {}", history.undo_len(), history.capacity()));
                    ui.end_row();
                    ui.label("Redo stack size:");
                    ui.label(history.redo_len().to_string());
                    ui.end_row();
                    ui.label("Last action:");
                    ui.label(history.last().map_or("none", |action| action.label()));
                    ui.end_row();
                });
        });
}
