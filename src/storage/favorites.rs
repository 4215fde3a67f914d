use std::collections::HashSet;

use anyhow::Result;

use super::schema::Database;

impl Database {
    // ========================================================================
    // Favorites Operations
    // ========================================================================

    /// Toggle the favorite state of a bookmark URL.
    ///
    /// Adds the URL if absent, removes it if present. The write is durable
    /// before this returns: the UI renders the new state synchronously with
    /// the caller's next read, so there is no batching.
    ///
    /// # Returns
    ///
    /// `true` if the URL is now favorited, `false` if it was removed.
    pub async fn toggle_favorite(&self, url: &str) -> Result<bool> {
        let removed = sqlx::query("DELETE FROM favorites WHERE url = ?")
            .bind(url)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed > 0 {
            return Ok(false);
        }

        sqlx::query("INSERT INTO favorites (url, added_at) VALUES (?, datetime('now'))")
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }

    /// Load the full favorites set. No ordering guarantee; the filter engine
    /// presents favorites in bookmark-store order regardless.
    pub async fn get_favorites(&self) -> Result<HashSet<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT url FROM favorites")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(url,)| url).collect())
    }

    /// Whether a single URL is currently favorited.
    pub async fn is_favorite(&self, url: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM favorites WHERE url = ?")
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_toggle_adds_then_removes() {
        let db = test_db().await;

        assert!(db.toggle_favorite("https://x.com").await.unwrap());
        assert!(db.is_favorite("https://x.com").await.unwrap());

        assert!(!db.toggle_favorite("https://x.com").await.unwrap());
        assert!(!db.is_favorite("https://x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_double_toggle_restores_original_state() {
        let db = test_db().await;

        let before = db.get_favorites().await.unwrap();
        db.toggle_favorite("https://x.com").await.unwrap();
        db.toggle_favorite("https://x.com").await.unwrap();
        let after = db.get_favorites().await.unwrap();

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_get_favorites_collects_all() {
        let db = test_db().await;

        db.toggle_favorite("https://a.com").await.unwrap();
        db.toggle_favorite("https://b.com").await.unwrap();

        let favorites = db.get_favorites().await.unwrap();
        assert_eq!(favorites.len(), 2);
        assert!(favorites.contains("https://a.com"));
        assert!(favorites.contains("https://b.com"));
    }

    #[tokio::test]
    async fn test_empty_favorites() {
        let db = test_db().await;
        assert!(db.get_favorites().await.unwrap().is_empty());
    }
}
