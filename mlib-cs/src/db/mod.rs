//! Song repository
//!
//! Every function runs on a connection borrowed from the caller's
//! transaction and never commits or rolls back itself.

mod songs;

pub use songs::{delete_song, get_lyrics, insert_song, query_songs, update_song};
