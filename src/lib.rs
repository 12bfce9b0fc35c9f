#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod compositor;
pub mod config;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod geometry;
pub mod input;
pub mod media;
pub mod panels;
pub mod scene_fit;
pub mod selection;
pub mod session;
pub mod settings;
pub mod stage;
pub mod texture_manager;
pub mod util;
pub mod widgets;

pub use app::DrosteApp;
pub use compositor::{CompositedContainer, RecursionFrame, compose, recursion_frames};
pub use config::ViewerConfig;
pub use error::{ConfigError, MediaError, MediaResult};
pub use geometry::{Area, Dimensions};
pub use media::{Media, MediaHandle};
pub use scene_fit::{FitBounds, fit};
pub use selection::{AreaSelection, Constraints, SelectionState};
pub use session::Session;
pub use settings::{RangeSetting, Settings};
pub use stage::Stage;
