//! HTTP API handlers for mlib-cs

pub mod docs;
pub mod health;
pub mod songs;

pub use docs::{swagger_ui, ApiDoc};
pub use health::{health_routes, BuildInfo};
pub use songs::{delete_song, list_songs, save_song, song_text, update_song};
