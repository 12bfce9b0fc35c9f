use std::ops::RangeInclusive;

use crate::config::{RangeConfig, ViewerConfig};
use crate::event::{EventBus, Subscription};

/// A numeric range input with a companion "default" checkbox.
///
/// While the checkbox is set the input is disabled and reads as its
/// initial value. Subscribers are told the effective value on every edit.
#[derive(Debug)]
pub struct RangeSetting {
    name: &'static str,
    label: &'static str,
    range: RangeInclusive<f32>,
    value: f32,
    default_value: f32,
    use_default: bool,
    display: String,
    changes: EventBus<Option<f32>>,
}

impl RangeSetting {
    /// Inverted bounds are swapped; a range without any finite bound collapses to zero
    pub fn new(name: &'static str, label: &'static str, config: &RangeConfig) -> Self {
        let (min, max) = normalized_bounds(config);
        let value = config.value.clamp(min, max);
        Self {
            name,
            label,
            range: min..=max,
            value,
            default_value: value,
            use_default: config.use_default,
            display: format_value(value),
            changes: EventBus::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn range(&self) -> RangeInclusive<f32> {
        self.range.clone()
    }

    /// The slider position, whatever the checkbox says
    pub fn raw_value(&self) -> Option<f32> {
        Some(self.value).filter(|v| v.is_finite())
    }

    /// The effective value: the default while the checkbox is set, unless
    /// `force` asks for the slider position anyway.
    pub fn get_value(&self, force: bool) -> Option<f32> {
        if !self.use_default || force {
            self.raw_value()
        } else {
            Some(self.default_value)
        }
    }

    /// Whether the slider is in use, i.e. the checkbox is not set
    pub fn enabled(&self) -> bool {
        !self.use_default
    }

    pub fn uses_default(&self) -> bool {
        self.use_default
    }

    /// Text shown next to the slider
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Updates the shown text only; the slider and subscribers are untouched
    pub fn set_display_value(&mut self, value: f32) {
        self.display = format_value(value);
    }

    pub fn on_change(&self, listener: impl FnMut(&Option<f32>) + Send + 'static) -> Subscription {
        self.changes.subscribe(listener)
    }

    /// The slider was moved
    pub fn input(&mut self, value: f32) {
        self.value = value.clamp(*self.range.start(), *self.range.end());
        self.display = format_value(self.value);
        self.changes.emit(&self.get_value(false));
    }

    /// The checkbox was toggled
    pub fn set_use_default(&mut self, use_default: bool) {
        self.use_default = use_default;
        if use_default {
            self.value = self.default_value;
        }
        self.display = format_value(self.value);
        self.changes.emit(&self.get_value(false));
    }
}

fn normalized_bounds(config: &RangeConfig) -> (f32, f32) {
    let min = config.min.min(config.max);
    let max = config.min.max(config.max);
    if min <= max { (min, max) } else { (0.0, 0.0) }
}

fn format_value(value: f32) -> String {
    format!("{}", value.round())
}

/// The viewer's user-adjustable settings
#[derive(Debug)]
pub struct Settings {
    pub canvas_width: RangeSetting,
    pub nb_recursion: RangeSetting,
}

impl Settings {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            canvas_width: RangeSetting::new("canvasWidth", "Canvas width", &config.canvas_width),
            nb_recursion: RangeSetting::new("nbRecursion", "Recursions", &config.nb_recursion),
        }
    }
}
