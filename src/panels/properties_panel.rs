use eframe::egui;

use crate::app::DesignApp;
use crate::element::text::FONT_FAMILIES;
use crate::element::{BorderStyle, MediaSource, MediaVariant, TextAlign, TextStyle};
use crate::page::{Background, BackgroundPosition, BackgroundRepeat, BackgroundSize};
use crate::properties::{PropertyEdit, PropertyValues, ShapeValues};
use crate::selection::PanelKind;
use crate::util::time::current_time_secs;

/// Field writes collected while the panel is drawn, applied afterwards.
/// The flag marks edits that should coalesce with the previous one.
type Edits = Vec<(PropertyEdit, bool)>;

/// Slider drags after the first frame fold into one history entry
fn coalesce(response: &egui::Response) -> bool {
    response.dragged() && !response.drag_started()
}

/// Colour pickers report changes from their popup, so continuity is judged
/// by the pointer: changes during one press fold together
fn picker_coalesce(ui: &egui::Ui) -> bool {
    ui.input(|i| i.pointer.any_down() && !i.pointer.any_pressed())
}

pub fn properties_panel(app: &mut DesignApp, ctx: &egui::Context) {
    egui::SidePanel::right("properties_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            if !ui.input(|i| i.pointer.any_down()) {
                app.editor.seal_history();
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                let panel = app.editor.panel();
                ui.heading(panel.title());
                ui.separator();

                if let Some(values) = app.editor.property_values() {
                    let mut edits = Edits::new();
                    match panel {
                        PanelKind::Text => {
                            if let Some(style) = &values.text {
                                text_fields(ui, style, &mut edits);
                            }
                        }
                        PanelKind::Shape => {
                            if let Some(shape) = &values.shape {
                                shape_fields(ui, shape, &mut edits);
                            }
                        }
                        PanelKind::Media => media_fields(app, ui),
                        PanelKind::NoSelection => {}
                    }
                    ui.separator();
                    transform_fields(ui, &values, &mut edits);
                    ui.separator();
                    arrange_buttons(app, ui);

                    for (edit, merge) in edits {
                        app.editor.edit_selected(edit, merge);
                    }
                } else {
                    ui.weak("Select an element to edit its properties.");
                }

                ui.separator();
                background_section(app, ui);
            });
        });
}

fn text_fields(ui: &mut egui::Ui, style: &TextStyle, edits: &mut Edits) {
    egui::Grid::new("text_properties").num_columns(2).show(ui, |ui| {
        ui.label("Font");
        let mut family = style.font_family.clone();
        egui::ComboBox::from_id_salt("font_family")
            .selected_text(&family)
            .show_ui(ui, |ui| {
                for candidate in FONT_FAMILIES {
                    ui.selectable_value(&mut family, candidate.to_owned(), candidate);
                }
            });
        if family != style.font_family {
            edits.push((PropertyEdit::FontFamily(family), false));
        }
        ui.end_row();

        ui.label("Size");
        let mut size = style.font_size;
        let response = ui.add(egui::DragValue::new(&mut size).range(1.0..=400.0).suffix(" px"));
        if response.changed() {
            edits.push((PropertyEdit::FontSize(size), coalesce(&response)));
        }
        ui.end_row();

        ui.label("Color");
        let mut color = style.color;
        if ui.color_edit_button_srgba(&mut color).changed() {
            edits.push((PropertyEdit::TextColor(color), picker_coalesce(ui)));
        }
        ui.end_row();
    });

    ui.horizontal(|ui| {
        if ui.selectable_label(style.bold, egui::RichText::new("B").strong()).clicked() {
            edits.push((PropertyEdit::Bold(!style.bold), false));
        }
        if ui.selectable_label(style.italic, egui::RichText::new("I").italics()).clicked() {
            edits.push((PropertyEdit::Italic(!style.italic), false));
        }
        if ui.selectable_label(style.underline, egui::RichText::new("U").underline()).clicked() {
            edits.push((PropertyEdit::Underline(!style.underline), false));
        }
        ui.separator();
        for align in TextAlign::ALL {
            if ui.selectable_label(style.align == align, align.as_str()).clicked() && style.align != align {
                edits.push((PropertyEdit::Align(align), false));
            }
        }
    });
}

fn shape_fields(ui: &mut egui::Ui, shape: &ShapeValues, edits: &mut Edits) {
    let linear = shape.variant.is_linear();
    egui::Grid::new("shape_properties").num_columns(2).show(ui, |ui| {
        ui.label(if linear { "Stroke color" } else { "Fill" });
        let mut fill = shape.fill;
        if ui.color_edit_button_srgba(&mut fill).changed() {
            edits.push((PropertyEdit::Fill(fill), picker_coalesce(ui)));
        }
        ui.end_row();

        if linear {
            ui.label("Stroke width");
            let mut width = shape.stroke_width;
            let response = ui.add(egui::Slider::new(&mut width, 1.0..=20.0));
            if response.changed() {
                edits.push((PropertyEdit::BorderWidth(width), coalesce(&response)));
            }
            ui.end_row();
            return;
        }
        if !shape.variant.accepts_border() {
            return;
        }

        ui.label("Border color");
        let mut border = shape.border_color;
        if ui.color_edit_button_srgba(&mut border).changed() {
            edits.push((PropertyEdit::BorderColor(border), picker_coalesce(ui)));
        }
        ui.end_row();

        ui.label("Border width");
        let mut width = shape.border_width;
        let response = ui.add(egui::Slider::new(&mut width, 0.0..=20.0));
        if response.changed() {
            edits.push((PropertyEdit::BorderWidth(width), coalesce(&response)));
        }
        ui.end_row();

        if shape.variant.accepts_border_style() {
            ui.label("Border style");
            let mut style = shape.border_style;
            egui::ComboBox::from_id_salt("border_style")
                .selected_text(style.as_str())
                .show_ui(ui, |ui| {
                    for candidate in BorderStyle::ALL {
                        ui.selectable_value(&mut style, candidate, candidate.as_str());
                    }
                });
            if style != shape.border_style {
                edits.push((PropertyEdit::BorderStyle(style), false));
            }
            ui.end_row();
        }
    });
}

fn media_fields(app: &mut DesignApp, ui: &mut egui::Ui) {
    let Some(element) = app.editor.selected_element() else {
        return;
    };
    let Some(media) = element.as_media() else {
        return;
    };
    let id = element.id;
    let variant = media.variant;
    let playback = media.playback;
    let source = media.source.clone();

    ui.label(source.describe());
    match variant {
        MediaVariant::Video => {
            ui.horizontal(|ui| {
                let label = if playback.playing { "⏸ Pause" } else { "▶ Play" };
                if ui.button(label).clicked() {
                    app.editor.toggle_playback(id);
                }
                let mut volume = playback.volume;
                let slider = egui::Slider::new(&mut volume, 0.0..=1.0).step_by(0.1).text("Volume");
                if ui.add(slider).changed() {
                    app.editor.set_volume(id, volume);
                }
            });
        }
        MediaVariant::Image => {
            if ui.button("Use as page background").clicked() {
                app.editor.set_background_image(source);
            }
        }
    }
}

fn transform_fields(ui: &mut egui::Ui, values: &PropertyValues, edits: &mut Edits) {
    egui::Grid::new("transform_properties").num_columns(2).show(ui, |ui| {
        ui.label("X");
        let mut x = values.position.x;
        let response = ui.add(egui::DragValue::new(&mut x).speed(1.0));
        if response.changed() {
            edits.push((PropertyEdit::PositionX(x.round()), coalesce(&response)));
        }
        ui.end_row();

        ui.label("Y");
        let mut y = values.position.y;
        let response = ui.add(egui::DragValue::new(&mut y).speed(1.0));
        if response.changed() {
            edits.push((PropertyEdit::PositionY(y.round()), coalesce(&response)));
        }
        ui.end_row();

        ui.label("Rotation");
        let mut rotation = values.rotation;
        let response = ui.add(egui::Slider::new(&mut rotation, -180.0..=180.0).suffix("°"));
        if response.changed() {
            edits.push((PropertyEdit::Rotation(rotation), coalesce(&response)));
        }
        ui.end_row();

        ui.label("Opacity");
        let mut opacity = values.opacity_percent;
        let response = ui.add(egui::Slider::new(&mut opacity, 0.0..=100.0).suffix("%"));
        if response.changed() {
            edits.push((PropertyEdit::Opacity(opacity), coalesce(&response)));
        }
        ui.end_row();
    });
}

fn arrange_buttons(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.label("Arrange");
    ui.horizontal_wrapped(|ui| {
        if ui.button("Bring forward").clicked() {
            app.editor.bring_forward();
        }
        if ui.button("Bring to front").clicked() {
            app.editor.bring_to_front();
        }
        if ui.button("Send backward").clicked() {
            app.editor.send_backward();
        }
        if ui.button("Send to back").clicked() {
            app.editor.send_to_back();
        }
    });
    if ui.button("🗑 Delete element").clicked() {
        if let Err(err) = app.editor.delete_selected() {
            app.editor.show_status(err.to_string(), true, current_time_secs());
        }
    }
}

fn background_section(app: &mut DesignApp, ui: &mut egui::Ui) {
    ui.strong("Page background");
    let mut color = app.editor.background().color;
    ui.horizontal(|ui| {
        ui.label("Color");
        if ui.color_edit_button_srgba(&mut color).changed() {
            app.editor.set_background_color(color, picker_coalesce(ui));
        }
    });

    let current = app.editor.background().clone();
    let mut background = current.clone();

    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut app.panels.background_url)
            .on_hover_text("Image address");
        let url = app.panels.background_url.trim().to_owned();
        if ui.add_enabled(!url.is_empty(), egui::Button::new("Set image")).clicked() {
            background.image = Some(MediaSource::url(url));
            app.panels.background_url.clear();
        }
    });

    if current.has_image() {
        egui::Grid::new("background_properties").num_columns(2).show(ui, |ui| {
            ui.label("Size");
            egui::ComboBox::from_id_salt("background_size")
                .selected_text(background.size.as_str())
                .show_ui(ui, |ui| {
                    for size in BackgroundSize::ALL {
                        ui.selectable_value(&mut background.size, size, size.as_str());
                    }
                });
            ui.end_row();

            ui.label("Position");
            egui::ComboBox::from_id_salt("background_position")
                .selected_text(background.position.as_str())
                .show_ui(ui, |ui| {
                    for position in BackgroundPosition::ALL {
                        ui.selectable_value(&mut background.position, position, position.as_str());
                    }
                });
            ui.end_row();

            ui.label("Repeat");
            egui::ComboBox::from_id_salt("background_repeat")
                .selected_text(background.repeat.as_str())
                .show_ui(ui, |ui| {
                    for repeat in BackgroundRepeat::ALL {
                        ui.selectable_value(&mut background.repeat, repeat, repeat.as_str());
                    }
                });
            ui.end_row();
        });
        if ui.button("Remove image").clicked() {
            background.image = None;
        }
    }

    if ui.button("Reset background").clicked() {
        background = Background::default();
    }

    if background != current {
        app.editor.set_background(background);
    }
}
