pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod now_playing;
pub mod platform;
pub mod process;
pub mod resolver;
pub mod state;

pub use catalog::{Catalog, Station};
pub use controller::PlaybackController;
pub use error::{PlaybackError, ResolveError};
pub use state::{PlaybackSnapshot, PlayerState};
