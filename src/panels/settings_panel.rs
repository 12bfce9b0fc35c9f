use crate::app::DrosteApp;
use crate::widgets::RangeSettingWidget;

pub fn settings_panel(app: &mut DrosteApp, ctx: &egui::Context) {
    egui::SidePanel::left("settings_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Droste");

            if ui.button("Open media…").clicked() {
                app.open_media_dialog(ctx);
            }
            if app.loader().is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(app.loader().pending_name().unwrap_or_default().to_owned());
                });
            }
            if let Some(err) = app.last_error() {
                ui.colored_label(ui.visuals().error_fg_color, err.to_owned());
            }
            ui.separator();

            let settings = app.session_mut().settings_mut();
            RangeSettingWidget::new(&mut settings.canvas_width).show(ui);
            RangeSettingWidget::new(&mut settings.nb_recursion).show(ui);
            ui.separator();

            let has_media = app.session().has_media();
            ui.horizontal(|ui| {
                if ui.add_enabled(has_media, egui::Button::new("Clear all")).clicked() {
                    app.clear_all();
                }
                if ui.add_enabled(has_media, egui::Button::new("Clear selection")).clicked() {
                    app.clear_selection();
                }
            });
            ui.separator();

            let session = app.session();
            egui::CollapsingHeader::new("Debug").show(ui, |ui| {
                egui::Grid::new("session_debug_grid")
                    .num_columns(2)
                    .spacing([40.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        let stage = session.stage().size();
                        ui.label("Canvas");
                        ui.label(format!("{:.0} x {:.0}", stage.width, stage.height));
                        ui.end_row();

                        ui.label("Media");
                        ui.label(session.media().map_or("none", |m| m.name()).to_owned());
                        ui.end_row();

                        ui.label("Selection");
                        ui.label(session.selection().map_or("none", |s| s.state().name()));
                        ui.end_row();

                        ui.label("Frames");
                        ui.label(session.composite().map_or(0, |c| c.len()).to_string());
                        ui.end_row();

                        ui.label("Depth");
                        ui.label(session.recursion_depth().to_string());
                        ui.end_row();

                        ui.label("Ticks");
                        ui.label(session.frame_count().to_string());
                        ui.end_row();

                        ui.label("Rebuilds");
                        ui.label(session.rebuild_count().to_string());
                        ui.end_row();

                        ui.label("Listeners");
                        ui.label(session.listener_count().to_string());
                        ui.end_row();
                    });
            });
        });
}
