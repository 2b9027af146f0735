//! Catalog orchestrator: the transaction boundary of every operation
//!
//! Each operation checks out one transaction, runs to completion on it and
//! ends it. Writes commit only when every step succeeded; any error rolls
//! back. Reads always roll back. A transaction dropped without either (panic,
//! cancelled request future, timeout) is rolled back by sqlx when its
//! connection returns to the pool.

use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::{debug, error, info, warn, Instrument};

use crate::context::RequestContext;
use crate::db;
use crate::error::{CatalogError, CatalogResult};
use crate::lyrics;
use crate::models::{FilterSet, NewSong, SaveRequest, Song, SongText, UpdateSet};
use crate::pagination::Page;
use crate::song_info::SongInfoLookup;

type Tx = Transaction<'static, Postgres>;

/// Transactional catalog operations
#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
    lookup: Arc<dyn SongInfoLookup>,
}

impl CatalogService {
    pub fn new(pool: PgPool, lookup: Arc<dyn SongInfoLookup>) -> Self {
        Self { pool, lookup }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Look the song up, validate the payload and store it
    pub async fn save_song(
        &self,
        ctx: &RequestContext,
        request: &SaveRequest,
    ) -> CatalogResult<i64> {
        async {
            let mut tx = self.begin().await?;

            let result = async {
                let info = self.lookup.lookup(ctx, &request.group, &request.title).await?;
                let song = NewSong::try_from(info)?;
                db::insert_song(&mut *tx, &song).await
            }
            .await;

            finish(tx, result).await
        }
        .instrument(ctx.span("save_song"))
        .await
    }

    /// Filtered page of songs
    pub async fn list_songs(
        &self,
        ctx: &RequestContext,
        filters: &FilterSet,
        page: Page,
    ) -> CatalogResult<Vec<Song>> {
        async {
            let mut tx = self.begin().await?;
            let result = db::query_songs(&mut *tx, filters, page).await;
            close_read(tx, result).await
        }
        .instrument(ctx.span("list_songs"))
        .await
    }

    /// One couplet of a song's lyrics; index 0 reads as the first
    pub async fn song_text(
        &self,
        ctx: &RequestContext,
        id: i64,
        couplet: usize,
    ) -> CatalogResult<SongText> {
        async {
            let mut tx = self.begin().await?;
            let result = db::get_lyrics(&mut *tx, id).await;
            let lyrics = close_read(tx, result).await?;

            let index = couplet.max(1);
            let text = lyrics::couplet(&lyrics, index)?;
            debug!(id, couplet = index, "couplet selected");

            Ok(SongText {
                song_id: id,
                couplet: index,
                text: text.to_string(),
            })
        }
        .instrument(ctx.span("song_text"))
        .await
    }

    pub async fn delete_song(&self, ctx: &RequestContext, id: i64) -> CatalogResult<i64> {
        async {
            let mut tx = self.begin().await?;
            let result = db::delete_song(&mut *tx, id).await;
            finish(tx, result).await
        }
        .instrument(ctx.span("delete_song"))
        .await
    }

    /// Partial update; an update without fields is rejected before any transaction
    pub async fn update_song(
        &self,
        ctx: &RequestContext,
        update: &UpdateSet,
    ) -> CatalogResult<i64> {
        async {
            if !update.has_changes() {
                return Err(CatalogError::BadRequest("no fields to update".to_string()));
            }

            let mut tx = self.begin().await?;
            let result = db::update_song(&mut *tx, update).await;
            finish(tx, result).await
        }
        .instrument(ctx.span("update_song"))
        .await
    }

    async fn begin(&self) -> CatalogResult<Tx> {
        self.pool.begin().await.map_err(|e| {
            error!(error = %e, "failed to begin transaction");
            CatalogError::Connection(e)
        })
    }
}

/// Commit a successful write, roll back a failed one
async fn finish<T>(tx: Tx, result: CatalogResult<T>) -> CatalogResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(|e| {
                error!(error = %e, "commit failed");
                CatalogError::Commit(e)
            })?;
            debug!("transaction committed");
            Ok(value)
        }
        Err(err) => {
            rollback(tx).await;
            log_failure(&err);
            Err(err)
        }
    }
}

/// End a read-only transaction
async fn close_read<T>(tx: Tx, result: CatalogResult<T>) -> CatalogResult<T> {
    rollback(tx).await;
    if let Err(err) = &result {
        log_failure(err);
    }
    result
}

async fn rollback(tx: Tx) {
    match tx.rollback().await {
        Ok(()) => debug!("transaction rolled back"),
        Err(e) => warn!(error = %e, "rollback failed"),
    }
}

fn log_failure(err: &CatalogError) {
    if err.is_client_error() {
        info!(error = %err, "operation rejected");
    } else {
        error!(error = %err, "operation failed");
    }
}
