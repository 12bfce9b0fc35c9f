use log::{error, warn};

use crate::config::ViewerConfig;
use crate::error::MediaError;
use crate::file_handler::MediaLoader;
use crate::input::InputHandler;
use crate::panels::{central_panel, settings_panel};
use crate::session::Session;
use crate::texture_manager::TextureManager;
use crate::util::time::FrameClock;

/// The eframe application: owns the session and everything that feeds it
pub struct DrosteApp {
    session: Session,
    loader: MediaLoader,
    input: InputHandler,
    textures: TextureManager,
    clock: FrameClock,
    last_error: Option<String>,
}

impl DrosteApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        Self::with_config(config)
    }

    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            loader: MediaLoader::new(config.accepted_mime_prefixes.clone()),
            textures: TextureManager::new(config.texture_cache_size),
            session: Session::new(config),
            input: InputHandler::new(),
            clock: FrameClock::new(),
            last_error: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn loader(&self) -> &MediaLoader {
        &self.loader
    }

    /// Message of the last failed load, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn open_media_dialog(&mut self, ctx: &egui::Context) {
        self.loader.open_dialog(ctx);
    }

    pub fn clear_all(&mut self) {
        self.session.clear_all();
        self.input.reset();
        self.textures.clear_cache();
        self.last_error = None;
    }

    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    /// Hands a finished load to the session
    fn poll_loader(&mut self) {
        match self.loader.poll() {
            None => {}
            Some(Ok(media)) => {
                if let Some(old) = self.session.media() {
                    self.textures.invalidate(old.id());
                }
                self.input.reset();
                self.session.load_media(media);
                self.last_error = None;
            }
            Some(Err(MediaError::Cancelled)) => {}
            Some(Err(err @ MediaError::UnsupportedType { .. })) => {
                warn!("{}", err);
                self.last_error = Some(err.to_string());
            }
            Some(Err(err)) => {
                error!("{}", err);
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Feeds pointer input over `canvas_rect` to the stage and applies it
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        for event in self.input.process_input(ctx, canvas_rect) {
            self.session.dispatch_mouse(&event);
        }
        self.session.pump();
    }

    /// Ticks the stage and paints it with its top-left corner at `origin`
    pub fn render(&mut self, ctx: &egui::Context, painter: &egui::Painter, origin: egui::Pos2) {
        self.textures.begin_frame();
        // egui redraws the stage on every update it runs; the tick only
        // schedules an extra frame when the stage changed without input
        if self.session.tick(self.clock.tick()) {
            ctx.request_repaint();
        }
        self.session.paint(ctx, painter, origin, &mut self.textures);
    }
}

impl eframe::App for DrosteApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader();
        self.loader.check_for_dropped_files(ctx);
        if !self.session.has_media() {
            self.clock.reset();
        }

        settings_panel(self, ctx);
        central_panel(self, ctx);

        self.loader.preview_files_being_dropped(ctx);
    }
}
