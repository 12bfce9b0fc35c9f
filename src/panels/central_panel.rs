use egui::{Align, Layout, RichText, ScrollArea, Sense};

use crate::app::DrosteApp;

pub fn central_panel(app: &mut DrosteApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        app.session_mut().set_container_width(ui.available_width());

        if app.session().has_media() {
            canvas_view(app, ctx, ui);
        } else {
            picker_view(app, ctx, ui);
        }
    });
}

/// Drop zone shown while nothing is loaded
fn picker_view(app: &mut DrosteApp, ctx: &egui::Context, ui: &mut egui::Ui) {
    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.label(RichText::new("Drop an image here").heading());
        ui.label("then drag a rectangle on it to nest the picture inside itself");
        ui.small("Still images only; video files are not supported.");
        ui.add_space(8.0);
        if ui.button("Open media…").clicked() {
            app.open_media_dialog(ctx);
        }
    });
}

fn canvas_view(app: &mut DrosteApp, ctx: &egui::Context, ui: &mut egui::Ui) {
    let size = app.session().stage().size().to_vec2();

    ScrollArea::both().show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let rect = response.rect;

        app.handle_input(ctx, rect);

        if let Some(pos) = response.hover_pos() {
            if let Some(hint) = app.session().cursor_at((pos - rect.min).to_pos2()) {
                ctx.set_cursor_icon(hint.icon());
            }
        }

        app.render(ctx, &painter, rect.min);
    });
}
