use sqlx::{PgConnection, Postgres};
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{FilterSet, NewSong, Song, UpdateSet};
use crate::pagination::Page;
use crate::query::{self, BuiltQuery};

fn log_sql(op: &str, query: &BuiltQuery) {
    debug!(op, sql = %query.one_line(), params = query.params.len(), "executing statement");
}

fn not_found(id: i64) -> CatalogError {
    CatalogError::NotFound(format!("song with id {} not found", id))
}

/// Insert a song and return its store-assigned id
pub async fn insert_song(conn: &mut PgConnection, song: &NewSong) -> CatalogResult<i64> {
    let query = query::insert_song(song);
    log_sql("insert", &query);

    let id = sqlx::query_scalar_with::<Postgres, i64, _>(&query.sql, query.to_arguments()?)
        .fetch_one(&mut *conn)
        .await?;

    info!(id, group = %song.group, song = %song.title, "song inserted");
    Ok(id)
}

/// Filtered page of songs, ordered by id
pub async fn query_songs(
    conn: &mut PgConnection,
    filters: &FilterSet,
    page: Page,
) -> CatalogResult<Vec<Song>> {
    let query = query::select_songs(filters, page);
    log_sql("query", &query);

    let songs = sqlx::query_as_with::<Postgres, Song, _>(&query.sql, query.to_arguments()?)
        .fetch_all(&mut *conn)
        .await?;

    info!(count = songs.len(), limit = page.limit, offset = page.offset, "songs queried");
    Ok(songs)
}

/// Full lyrics of one song
pub async fn get_lyrics(conn: &mut PgConnection, id: i64) -> CatalogResult<String> {
    let query = query::select_lyrics(id);
    log_sql("lyrics", &query);

    let lyrics = sqlx::query_scalar_with::<Postgres, String, _>(&query.sql, query.to_arguments()?)
        .fetch_optional(&mut *conn)
        .await?;

    lyrics.ok_or_else(|| not_found(id))
}

/// Delete one song and return the confirmed id
pub async fn delete_song(conn: &mut PgConnection, id: i64) -> CatalogResult<i64> {
    let query = query::delete_song(id);
    log_sql("delete", &query);

    let returned = sqlx::query_scalar_with::<Postgres, i64, _>(&query.sql, query.to_arguments()?)
        .fetch_optional(&mut *conn)
        .await?;

    match returned {
        None => Err(not_found(id)),
        Some(deleted) if deleted != id => Err(CatalogError::DeleteFailed(id)),
        Some(deleted) => {
            info!(id = deleted, "song deleted");
            Ok(deleted)
        }
    }
}

/// Apply a partial update and return the confirmed id
///
/// An update without fields fails with `BadRequest` before any SQL runs.
pub async fn update_song(conn: &mut PgConnection, update: &UpdateSet) -> CatalogResult<i64> {
    let query = query::update_song(update)?;
    log_sql("update", &query);

    let returned = sqlx::query_scalar_with::<Postgres, i64, _>(&query.sql, query.to_arguments()?)
        .fetch_optional(&mut *conn)
        .await?;

    match returned {
        None => Err(not_found(update.id)),
        Some(updated) if updated != update.id => Err(CatalogError::UpdateFailed(update.id)),
        Some(updated) => {
            info!(id = updated, fields = query.params.len() - 1, "song updated");
            Ok(updated)
        }
    }
}
