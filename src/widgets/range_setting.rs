use egui::{Response, Slider, Ui};

use crate::settings::RangeSetting;

/// Slider, "default" checkbox and value label for one [`RangeSetting`].
///
/// The slider is disabled while the checkbox is set. Edits go through the
/// setting so its subscribers hear about them.
pub struct RangeSettingWidget<'a> {
    setting: &'a mut RangeSetting,
}

impl<'a> RangeSettingWidget<'a> {
    pub fn new(setting: &'a mut RangeSetting) -> Self {
        Self { setting }
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        let setting = self.setting;
        let enabled = setting.enabled();

        ui.vertical(|ui| {
            ui.label(setting.label());
            ui.horizontal(|ui| {
                let mut value = setting.raw_value().unwrap_or(*setting.range().start());
                let slider = ui
                    .add_enabled(enabled, Slider::new(&mut value, setting.range()).show_value(false))
                    .on_hover_text(setting.name());
                if slider.changed() {
                    setting.input(value);
                }

                let mut use_default = setting.uses_default();
                if ui.checkbox(&mut use_default, "default").changed() {
                    setting.set_use_default(use_default);
                }

                ui.monospace(setting.display());
            });
        })
        .response
    }
}
