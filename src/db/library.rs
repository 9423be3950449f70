use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{LibraryItem, LibraryUpdate, NewLibraryItem},
};

const LIBRARY_COLUMNS: &str = "id, user_id, google_volume_id, title, authors, thumbnail, \
     is_favorite, has_read, created_at, tropes, representation, moods, formats";

/// Access to the `library_items` table
#[derive(Clone)]
pub struct LibraryRepository {
    pool: PgPool,
}

impl LibraryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Saves a volume to the user's library
    ///
    /// Saving the same volume twice updates the stored metadata in place;
    /// the status flags are left untouched.
    pub async fn add_to_library(&self, item: &NewLibraryItem) -> AppResult<LibraryItem> {
        let sql = format!(
            r#"
            INSERT INTO library_items
                (user_id, google_volume_id, title, authors, thumbnail,
                 tropes, representation, moods, formats)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id, google_volume_id) DO UPDATE SET
                title = EXCLUDED.title,
                authors = EXCLUDED.authors,
                thumbnail = EXCLUDED.thumbnail,
                tropes = EXCLUDED.tropes,
                representation = EXCLUDED.representation,
                moods = EXCLUDED.moods,
                formats = EXCLUDED.formats
            RETURNING {}
            "#,
            LIBRARY_COLUMNS
        );

        let saved = sqlx::query_as::<_, LibraryItem>(&sql)
            .bind(item.user_id)
            .bind(&item.google_volume_id)
            .bind(&item.title)
            .bind(&item.authors)
            .bind(&item.thumbnail)
            .bind(&item.tropes)
            .bind(&item.representation)
            .bind(&item.moods)
            .bind(&item.formats)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(
            user_id = %item.user_id,
            volume_id = %item.google_volume_id,
            "Book saved to library"
        );

        Ok(saved)
    }

    /// All library entries for a user, newest first
    pub async fn get_library(&self, user_id: Uuid) -> AppResult<Vec<LibraryItem>> {
        let sql = format!(
            "SELECT {} FROM library_items WHERE user_id = $1 ORDER BY created_at DESC",
            LIBRARY_COLUMNS
        );

        let items = sqlx::query_as::<_, LibraryItem>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn is_book_in_library(&self, user_id: Uuid, google_volume_id: &str) -> AppResult<bool> {
        let found: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM library_items WHERE user_id = $1 AND google_volume_id = $2 LIMIT 1",
        )
        .bind(user_id)
        .bind(google_volume_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Applies the set flags of `update`; unset flags keep their value
    pub async fn update_library_item(&self, id: Uuid, update: LibraryUpdate) -> AppResult<LibraryItem> {
        let sql = format!(
            r#"
            UPDATE library_items SET
                is_favorite = COALESCE($2, is_favorite),
                has_read = COALESCE($3, has_read)
            WHERE id = $1
            RETURNING {}
            "#,
            LIBRARY_COLUMNS
        );

        sqlx::query_as::<_, LibraryItem>(&sql)
            .bind(id)
            .bind(update.is_favorite)
            .bind(update.has_read)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library item {}", id)))
    }

    /// Flips one status flag of an entry and returns the updated row
    pub async fn toggle_flag(&self, id: Uuid, flag: LibraryFlag) -> AppResult<LibraryItem> {
        let column = match flag {
            LibraryFlag::Favorite => "is_favorite",
            LibraryFlag::HasRead => "has_read",
        };
        let sql = format!(
            "UPDATE library_items SET {col} = NOT {col} WHERE id = $1 RETURNING {}",
            LIBRARY_COLUMNS,
            col = column
        );

        sqlx::query_as::<_, LibraryItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library item {}", id)))
    }

    pub async fn delete_library_item(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM library_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Library item {}", id)));
        }

        tracing::info!(item_id = %id, "Library item removed");

        Ok(())
    }
}

/// Status flags that can be toggled on a library entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFlag {
    Favorite,
    HasRead,
}
