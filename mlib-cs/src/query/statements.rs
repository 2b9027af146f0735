//! Complete statements against the `library` table

use super::assignment::build_assignment;
use super::predicate::build_predicate;
use super::sql::{BuiltQuery, SqlParam};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{FilterSet, NewSong, UpdateSet};
use crate::pagination::Page;

/// Columns selected for a full `Song` row
pub const SONG_COLUMNS: &str = "id, group_name, song, release_date, text, patronymic";

pub fn insert_song(song: &NewSong) -> BuiltQuery {
    BuiltQuery {
        sql: "INSERT INTO library (group_name, song, release_date, text, patronymic) \
              VALUES ($1, $2, $3, $4, $5) RETURNING id"
            .to_string(),
        params: vec![
            SqlParam::Text(song.group.clone()),
            SqlParam::Text(song.title.clone()),
            SqlParam::Date(song.release_date),
            SqlParam::Text(song.lyrics.clone()),
            SqlParam::Text(song.reference_link.clone()),
        ],
    }
}

/// Filtered, id-ordered page of songs; LIMIT and OFFSET are the last two params
pub fn select_songs(filters: &FilterSet, page: Page) -> BuiltQuery {
    let mut query = build_predicate(filters);
    let limit = query.push_param(SqlParam::BigInt(page.limit));
    let offset = query.push_param(SqlParam::BigInt(page.offset));

    query.sql = format!(
        "SELECT {} FROM library WHERE {} ORDER BY id LIMIT ${} OFFSET ${}",
        SONG_COLUMNS, query.sql, limit, offset
    );
    query
}

/// Lyrics of one song; NULL lyrics read as empty text
pub fn select_lyrics(id: i64) -> BuiltQuery {
    BuiltQuery {
        sql: "SELECT COALESCE(text, '') FROM library WHERE id = $1".to_string(),
        params: vec![SqlParam::BigInt(id)],
    }
}

pub fn delete_song(id: i64) -> BuiltQuery {
    BuiltQuery {
        sql: "DELETE FROM library WHERE id = $1 RETURNING id".to_string(),
        params: vec![SqlParam::BigInt(id)],
    }
}

/// Partial update; the target id is the final parameter
///
/// Fails with `BadRequest` instead of rendering an empty SET list.
pub fn update_song(update: &UpdateSet) -> CatalogResult<BuiltQuery> {
    let mut query = build_assignment(update);
    if query.params.is_empty() {
        return Err(CatalogError::BadRequest("no fields to update".to_string()));
    }

    let id = query.push_param(SqlParam::BigInt(update.id));
    query.sql = format!("UPDATE library SET {} WHERE id = ${} RETURNING id", query.sql, id);
    Ok(query)
}
