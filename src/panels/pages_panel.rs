use eframe::egui;

use crate::app::DesignApp;
use crate::page::PageId;

enum PageAction {
    Switch(PageId),
    Delete(PageId),
    StartRename(PageId, String),
    CommitRename,
    CancelRename,
    Add,
}

pub fn pages_panel(app: &mut DesignApp, ctx: &egui::Context) {
    egui::SidePanel::left("pages_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Pages");
            ui.label(app.editor.pages().count_label());
            ui.separator();

            let current = app.editor.pages().current_id();
            let pages: Vec<(PageId, String)> = app
                .editor
                .pages()
                .pages()
                .iter()
                .map(|page| (page.id, page.name.clone()))
                .collect();
            let can_delete = pages.len() > 1;

            let mut actions = Vec::new();
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (id, name) in pages {
                    ui.horizontal(|ui| match &mut app.panels.rename {
                        Some((renaming, buffer)) if *renaming == id => {
                            let response = ui.text_edit_singleline(buffer);
                            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                actions.push(PageAction::CommitRename);
                            }
                            if ui.small_button("✔").clicked() {
                                actions.push(PageAction::CommitRename);
                            }
                            if ui.small_button("✖").clicked() {
                                actions.push(PageAction::CancelRename);
                            }
                        }
                        _ => {
                            let label = ui.selectable_label(id == current, &name);
                            if label.clicked() {
                                actions.push(PageAction::Switch(id));
                            }
                            if label.double_clicked() || ui.small_button("✏").on_hover_text("Rename").clicked() {
                                actions.push(PageAction::StartRename(id, name.clone()));
                            }
                            let delete = ui.add_enabled(can_delete, egui::Button::new("🗑").small());
                            if delete.on_hover_text("Delete page").clicked() {
                                actions.push(PageAction::Delete(id));
                            }
                        }
                    });
                }
            });

            ui.separator();
            if ui.button("➕ Add page").clicked() {
                actions.push(PageAction::Add);
            }
            if let Some(error) = &app.panels.page_error {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }

            for action in actions {
                apply(app, action);
            }
        });
}

fn apply(app: &mut DesignApp, action: PageAction) {
    let result = match action {
        PageAction::Switch(id) => app.editor.switch_to_page(id),
        PageAction::Delete(id) => app.editor.delete_page(id),
        PageAction::Add => {
            app.editor.add_page();
            Ok(())
        }
        PageAction::StartRename(id, name) => {
            app.panels.rename = Some((id, name));
            Ok(())
        }
        PageAction::CancelRename => {
            app.panels.rename = None;
            Ok(())
        }
        PageAction::CommitRename => match app.panels.rename.take() {
            Some((id, name)) => {
                let result = app.editor.rename_page(id, &name);
                if result.is_err() {
                    // keep the field open so the name can be corrected
                    app.panels.rename = Some((id, name));
                }
                result
            }
            None => Ok(()),
        },
    };

    match result {
        Ok(()) => app.panels.page_error = None,
        Err(err) => {
            log::warn!("Page action rejected: {}", err);
            app.panels.page_error = Some(err.to_string());
        }
    }
}
