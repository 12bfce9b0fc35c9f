use std::sync::Arc;

use futures::channel::oneshot;
use log::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::media::{self, Media, MediaHandle};

/// Extensions offered by the "Open media" dialog; video cannot be decoded
const DIALOG_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff", "ico"];

/// Where the encoded bytes of a media come from
#[derive(Debug)]
pub enum MediaSource {
    Bytes(Arc<[u8]>),
    #[cfg(not(target_arch = "wasm32"))]
    Path(std::path::PathBuf),
}

struct PendingLoad {
    name: String,
    receiver: oneshot::Receiver<MediaResult<MediaHandle>>,
}

/// Acquires media from dropped files or a file dialog and decodes it off the
/// UI thread.
///
/// At most one load is pending. Starting a new one drops the previous
/// receiver, so a slow earlier load can never replace a later one.
pub struct MediaLoader {
    accepted_mime_prefixes: Vec<String>,
    pending: Option<PendingLoad>,
}

impl MediaLoader {
    pub fn new(accepted_mime_prefixes: Vec<String>) -> Self {
        Self {
            accepted_mime_prefixes,
            pending: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Name of the media being loaded, if any
    pub fn pending_name(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.name.as_str())
    }

    /// Resolves the MIME type of a file, falling back to its extension
    fn resolve_mime(name: &str, declared: &str) -> String {
        if declared.is_empty() {
            media::mime_from_name(name).unwrap_or_default().to_owned()
        } else {
            declared.to_owned()
        }
    }

    /// Starts decoding `source` unless its type is filtered out
    pub fn request(
        &mut self,
        name: &str,
        declared_mime: &str,
        source: MediaSource,
        repaint: Option<egui::Context>,
    ) -> MediaResult<()> {
        let mime = Self::resolve_mime(name, declared_mime);
        if !media::is_accepted(&mime, &self.accepted_mime_prefixes) {
            return Err(MediaError::UnsupportedType {
                name: name.to_owned(),
                mime,
            });
        }

        info!("Loading media {} ({})", name, mime);
        let task_name = name.to_owned();
        self.spawn(name, repaint, move || {
            let bytes: Arc<[u8]> = match source {
                MediaSource::Bytes(bytes) => bytes,
                #[cfg(not(target_arch = "wasm32"))]
                MediaSource::Path(path) => std::fs::read(path)?.into(),
            };
            Media::decode(&task_name, &mime, &bytes)
        });
        Ok(())
    }

    /// Picks up files dropped on the window this frame.
    ///
    /// The first accepted file wins; rejected ones are logged and skipped.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        for file in dropped {
            let name = if let Some(path) = &file.path {
                path.display().to_string()
            } else if !file.name.is_empty() {
                file.name.clone()
            } else {
                "unknown".to_owned()
            };

            let source = match (file.bytes, file.path) {
                (Some(bytes), _) => MediaSource::Bytes(bytes),
                #[cfg(not(target_arch = "wasm32"))]
                (None, Some(path)) => MediaSource::Path(path),
                _ => {
                    warn!("{}", MediaError::NoData(name));
                    continue;
                }
            };

            match self.request(&name, &file.mime, source, Some(ctx.clone())) {
                Ok(()) => return true,
                Err(err) => warn!("Dropped file rejected: {}", err),
            }
        }
        false
    }

    /// Shows the native file dialog and loads whatever gets picked
    pub fn open_dialog(&mut self, ctx: &egui::Context) {
        let (sender, receiver) = oneshot::channel();
        let accepted = self.accepted_mime_prefixes.clone();
        let repaint = ctx.clone();

        // built on the thread that polls it; the dialog future need not be Send
        let task = move || async move {
            let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("media", DIALOG_EXTENSIONS)
                .pick_file()
                .await
            else {
                let _ = sender.send(Err(MediaError::Cancelled));
                repaint.request_repaint();
                return;
            };

            let name = handle.file_name();
            let mime = Self::resolve_mime(&name, "");
            let result = if media::is_accepted(&mime, &accepted) {
                let bytes = handle.read().await;
                Media::decode(&name, &mime, &bytes)
            } else {
                Err(MediaError::UnsupportedType { name, mime })
            };
            let _ = sender.send(result);
            repaint.request_repaint();
        };

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || futures::executor::block_on(task()));
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(task());

        self.pending = Some(PendingLoad {
            name: "file dialog".to_owned(),
            receiver,
        });
    }

    fn spawn<F>(&mut self, name: &str, repaint: Option<egui::Context>, job: F)
    where
        F: FnOnce() -> MediaResult<MediaHandle> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let run = move || {
            let _ = sender.send(job());
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(run);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move { run() });

        if let Some(previous) = self.pending.replace(PendingLoad {
            name: name.to_owned(),
            receiver,
        }) {
            debug!("Superseding pending load of {}", previous.name);
        }
    }

    /// Returns the finished load, if any. Called once per frame.
    pub fn poll(&mut self) -> Option<MediaResult<MediaHandle>> {
        let pending = self.pending.as_mut()?;
        match pending.receiver.try_recv() {
            Ok(None) => None,
            Ok(Some(result)) => {
                self.pending = None;
                Some(result)
            }
            Err(oneshot::Canceled) => {
                self.pending = None;
                Some(Err(MediaError::Cancelled))
            }
        }
    }

    /// Dims the window while files are dragged over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop an image to view it:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                } else {
                    text += "\n(unknown file)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("media_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}
