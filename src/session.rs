use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use egui::Pos2;
use log::{debug, info};
use parking_lot::Mutex;

use crate::compositor::{self, CompositedContainer};
use crate::config::ViewerConfig;
use crate::event::{MouseEvent, Subscription, Tick};
use crate::geometry::{Area, Dimensions};
use crate::media::MediaHandle;
use crate::scene_fit::{self, FitBounds};
use crate::selection::{AreaSelection, Constraints, CursorHint};
use crate::settings::Settings;
use crate::stage::{BASE_Z, Bitmap, COMPOSITE_Z, ChildId, DisplayObject, Stage};

type Inbox<T> = Arc<Mutex<VecDeque<T>>>;

fn inbox<T>() -> Inbox<T> {
    Arc::new(Mutex::new(VecDeque::new()))
}

fn drain<T>(inbox: &Inbox<T>) -> VecDeque<T> {
    std::mem::take(&mut *inbox.lock())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SettingChange {
    CanvasWidth(Option<f32>),
    NbRecursion(Option<f32>),
}

/// Everything wired up for one media at one canvas size.
///
/// Listeners are registered on the stage when the pipeline starts and
/// released by [`Pipeline::teardown`], which consumes the pipeline.
struct Pipeline {
    media: MediaHandle,
    scene: Dimensions,
    selection: AreaSelection,
    composite: Option<(ChildId, CompositedContainer)>,
    /// Selection the last composite was built from, kept after it is replaced
    last_init_area: Option<Area>,
    mouse_inbox: Inbox<MouseEvent>,
    area_inbox: Inbox<Area>,
    frames: Arc<AtomicU64>,
    rebuilds: u64,
    subscriptions: Vec<Subscription>,
}

impl Pipeline {
    fn start(media: MediaHandle, scene: Dimensions, stage: &mut Stage, config: &ViewerConfig) -> Self {
        stage.set_size(scene);
        stage.enable_dom_events(true);
        stage.add_child_with_z(
            DisplayObject::Bitmap(Bitmap {
                media: media.clone(),
                dest: Area::from_dimensions(scene),
            }),
            BASE_Z,
        );

        let selection = AreaSelection::new(
            Constraints::with_ratio(scene.aspect_h_to_w()),
            config.selection,
        );

        let mouse_inbox = inbox();
        let area_inbox = inbox();
        let frames = Arc::new(AtomicU64::new(0));

        let mouse_sink = mouse_inbox.clone();
        let area_sink = area_inbox.clone();
        let frame_counter = frames.clone();
        let subscriptions = vec![
            stage.on_mouse(move |event| mouse_sink.lock().push_back(*event)),
            stage.on_tick(move |_| {
                frame_counter.fetch_add(1, Ordering::Relaxed);
            }),
            selection.on_change(move |area| area_sink.lock().push_back(*area)),
        ];

        debug!("Pipeline started for {} at {:?}", media.name(), scene);

        Self {
            media,
            scene,
            selection,
            composite: None,
            last_init_area: None,
            mouse_inbox,
            area_inbox,
            frames,
            rebuilds: 0,
            subscriptions,
        }
    }

    /// Feeds queued mouse events to the selection
    fn process_mouse(&mut self, stage: &mut Stage) {
        for event in drain(&self.mouse_inbox) {
            self.selection.handle(&event, stage);
        }
    }

    fn take_area_changes(&mut self) -> VecDeque<Area> {
        drain(&self.area_inbox)
    }

    fn remove_composite(&mut self, stage: &mut Stage) {
        if let Some((id, _)) = self.composite.take() {
            stage.remove_child(id);
        }
    }

    fn rebuild_composite(&mut self, area: Area, depth: usize, stage: &mut Stage) {
        self.remove_composite(stage);

        let container = compositor::compose(self.scene, area, &self.media, depth);
        debug!("Composite rebuilt: {} frames from {:?}", container.len(), area);

        let id = stage.add_child_with_z(container.to_display_object(), COMPOSITE_Z);
        self.composite = Some((id, container));
        self.last_init_area = Some(area);
        self.rebuilds += 1;
    }

    /// Detaches every listener and empties the display list
    fn teardown(mut self, stage: &mut Stage) {
        for subscription in &mut self.subscriptions {
            subscription.unsubscribe();
        }
        stage.enable_dom_events(false);
        stage.clear();
        debug!(
            "Pipeline for {} torn down after {} frames and {} rebuilds",
            self.media.name(),
            self.frames.load(Ordering::Relaxed),
            self.rebuilds
        );
    }
}

/// Owns the canvas, the settings and the active pipeline, and rebuilds
/// the pipeline when its inputs change.
pub struct Session {
    config: ViewerConfig,
    settings: Settings,
    stage: Stage,
    pipeline: Option<Pipeline>,
    container_width: f32,
    setting_inbox: Inbox<SettingChange>,
    _setting_subscriptions: Vec<Subscription>,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        let settings = Settings::new(&config);
        let stage = Stage::new(config.default_canvas);

        let setting_inbox = inbox();
        let width_sink = setting_inbox.clone();
        let depth_sink = setting_inbox.clone();
        let setting_subscriptions = vec![
            settings
                .canvas_width
                .on_change(move |v| width_sink.lock().push_back(SettingChange::CanvasWidth(*v))),
            settings
                .nb_recursion
                .on_change(move |v| depth_sink.lock().push_back(SettingChange::NbRecursion(*v))),
        ];

        let mut session = Self {
            container_width: config.default_canvas.width,
            config,
            settings,
            stage,
            pipeline: None,
            setting_inbox,
            _setting_subscriptions: setting_subscriptions,
        };
        session.reset_canvas_size();
        session
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Edits made here are picked up by the next [`Session::pump`]
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn media(&self) -> Option<&MediaHandle> {
        self.pipeline.as_ref().map(|p| &p.media)
    }

    pub fn has_media(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn scene_size(&self) -> Option<Dimensions> {
        self.pipeline.as_ref().map(|p| p.scene)
    }

    pub fn selection(&self) -> Option<&AreaSelection> {
        self.pipeline.as_ref().map(|p| &p.selection)
    }

    pub fn composite(&self) -> Option<&CompositedContainer> {
        self.pipeline.as_ref()?.composite.as_ref().map(|(_, c)| c)
    }

    /// Stage listeners currently registered
    pub fn listener_count(&self) -> usize {
        self.stage.listener_count()
    }

    /// Ticks seen by the current pipeline
    pub fn frame_count(&self) -> u64 {
        self.pipeline
            .as_ref()
            .map_or(0, |p| p.frames.load(Ordering::Relaxed))
    }

    /// Composites built by the current pipeline
    pub fn rebuild_count(&self) -> u64 {
        self.pipeline.as_ref().map_or(0, |p| p.rebuilds)
    }

    /// Available layout width, stored in the fit container
    pub fn set_container_width(&mut self, width: f32) {
        self.container_width = width;
    }

    /// Recursion depth from the setting, or the configured default when
    /// the setting is missing or not positive
    pub fn recursion_depth(&self) -> usize {
        self.settings
            .nb_recursion
            .get_value(true)
            .filter(|v| *v > 0.0)
            .map(|v| v.round() as usize)
            .unwrap_or(self.config.default_recursion)
    }

    /// Replaces the current media and everything built on it
    pub fn load_media(&mut self, media: MediaHandle) {
        info!(
            "Loading {} ({}, {}x{})",
            media.name(),
            media.mime(),
            media.natural_size().width,
            media.natural_size().height
        );
        self.start_pipeline(media);
    }

    fn start_pipeline(&mut self, media: MediaHandle) {
        // the old pipeline must be gone before the new one subscribes
        self.teardown();

        let required_width = if self.settings.canvas_width.enabled() {
            self.settings.canvas_width.get_value(false)
        } else {
            None
        };
        let bounds = FitBounds::new(self.container_width, &self.config.fit);
        let scene = scene_fit::fit(media.natural_size(), &bounds, required_width);
        self.settings.canvas_width.set_display_value(scene.width);

        self.pipeline = Some(Pipeline::start(media, scene, &mut self.stage, &self.config));
    }

    fn teardown(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.teardown(&mut self.stage);
        }
    }

    pub fn dispatch_mouse(&self, event: &MouseEvent) {
        self.stage.dispatch_mouse(event);
    }

    /// Applies queued input and setting changes
    pub fn pump(&mut self) {
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.process_mouse(&mut self.stage);
        }

        for change in drain(&self.setting_inbox) {
            match change {
                SettingChange::CanvasWidth(width) => self.on_canvas_width_changed(width),
                SettingChange::NbRecursion(_) => self.on_recursion_changed(),
            }
        }

        // only the latest area of this frame is visible
        let depth = self.recursion_depth();
        if let Some(pipeline) = self.pipeline.as_mut() {
            if let Some(area) = pipeline.take_area_changes().pop_back() {
                pipeline.rebuild_composite(area, depth, &mut self.stage);
            }
        }
    }

    fn on_canvas_width_changed(&mut self, width: Option<f32>) {
        debug!("Canvas width setting changed to {:?}", width);

        let Some(pipeline) = self.pipeline.as_ref() else {
            self.reset_canvas_size();
            return;
        };

        let media = pipeline.media.clone();
        let old_width = pipeline.scene.width;
        let previous = pipeline.selection.confirmed_area();

        self.start_pipeline(media);

        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };
        if let Some(area) = previous {
            let ratio = pipeline.scene.width / old_width;
            pipeline.selection.restore_scaled(area, ratio, &mut self.stage);
        }
    }

    fn on_recursion_changed(&mut self) {
        let depth = self.recursion_depth();
        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };

        let area = pipeline.selection.confirmed_area().or(pipeline.last_init_area);
        if let Some(area) = area {
            pipeline.rebuild_composite(area, depth, &mut self.stage);
        }
    }

    /// Drops the selection and the composite, keeping the base image
    pub fn clear_selection(&mut self) {
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.selection.clear(&mut self.stage);
            pipeline.remove_composite(&mut self.stage);
            pipeline.last_init_area = None;
        }
    }

    /// Tears everything down and goes back to the empty canvas
    pub fn clear_all(&mut self) {
        self.teardown();
        self.reset_canvas_size();
    }

    fn reset_canvas_size(&mut self) {
        if !self.settings.canvas_width.enabled() {
            self.stage.set_size(self.config.default_canvas);
        }
    }

    /// Runs one frame of the stage; true when it needs a repaint
    pub fn tick(&mut self, tick: Tick) -> bool {
        self.stage.tick(tick)
    }

    pub fn cursor_at(&self, pos: Pos2) -> Option<CursorHint> {
        self.selection().map(|selection| selection.cursor_at(pos))
    }

    pub fn paint(
        &self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        origin: Pos2,
        textures: &mut crate::texture_manager::TextureManager,
    ) {
        self.stage.paint(ctx, painter, origin, textures);
    }
}
