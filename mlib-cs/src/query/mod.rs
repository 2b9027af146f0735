//! Parameterized SQL construction
//!
//! Nothing in here touches the database. Every function renders SQL text
//! plus the ordered parameter list its `$n` placeholders refer to.

mod assignment;
mod predicate;
mod sql;
mod statements;

pub use assignment::build_assignment;
pub use predicate::build_predicate;
pub use sql::{BuiltQuery, ClauseList, Op, SqlParam};
pub use statements::{
    delete_song, insert_song, select_lyrics, select_songs, update_song, SONG_COLUMNS,
};
