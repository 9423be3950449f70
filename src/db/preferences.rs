use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::PreferenceSet};

#[derive(Debug, sqlx::FromRow)]
struct PreferencesRow {
    genres: Vec<String>,
    moods: Vec<String>,
    tropes: Vec<String>,
    representation: Vec<String>,
    authors: Vec<String>,
    formats: Vec<String>,
}

impl From<PreferencesRow> for PreferenceSet {
    fn from(row: PreferencesRow) -> Self {
        PreferenceSet {
            genres: row.genres,
            moods: row.moods,
            tropes: row.tropes,
            representation: row.representation,
            authors: row.authors,
            formats: row.formats,
        }
    }
}

/// Access to the `user_preferences` table
#[derive(Clone)]
pub struct PreferencesRepository {
    pool: PgPool,
}

impl PreferencesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stored preferences, `None` if the user never saved any
    pub async fn get_user_preferences(&self, user_id: Uuid) -> AppResult<Option<PreferenceSet>> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r#"
            SELECT genres, moods, tropes, representation, authors, formats
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PreferenceSet::from))
    }

    /// Replaces the user's stored preferences
    pub async fn upsert_user_preferences(&self, user_id: Uuid, prefs: &PreferenceSet) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences
                (user_id, genres, moods, tropes, representation, authors, formats)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                genres = EXCLUDED.genres,
                moods = EXCLUDED.moods,
                tropes = EXCLUDED.tropes,
                representation = EXCLUDED.representation,
                authors = EXCLUDED.authors,
                formats = EXCLUDED.formats
            "#,
        )
        .bind(user_id)
        .bind(&prefs.genres)
        .bind(&prefs.moods)
        .bind(&prefs.tropes)
        .bind(&prefs.representation)
        .bind(&prefs.authors)
        .bind(&prefs.formats)
        .execute(&self.pool)
        .await?;

        tracing::info!(user_id = %user_id, genres = prefs.genres.len(), "Preferences saved");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_keeps_order() {
        let row = PreferencesRow {
            genres: vec!["Romance".into(), "Fantasy".into()],
            moods: vec![],
            tropes: vec!["Fake Dating".into()],
            representation: vec![],
            authors: vec![],
            formats: vec!["Series".into()],
        };

        let prefs = PreferenceSet::from(row);
        assert_eq!(prefs.genres, vec!["Romance", "Fantasy"]);
        assert_eq!(prefs.tropes, vec!["Fake Dating"]);
        assert!(prefs.moods.is_empty());
        assert_eq!(prefs.formats, vec!["Series"]);
    }
}
