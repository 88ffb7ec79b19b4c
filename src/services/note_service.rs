use sqlx::PgPool;
use uuid::Uuid;

use crate::database::is_unique_violation;
use crate::database::models::note::NoteCategoryRow;
use crate::database::models::{Category, Note, NoteWithCategory};
use crate::error::ApiError;

/// Owner-scoped CRUD over notes, plus the global category operations.
///
/// Constructed per request from the verified caller identity. Every note
/// query issued here carries the `owner_id = caller` predicate, so a note
/// owned by someone else is indistinguishable from a nonexistent one.
pub struct NoteService {
    pool: PgPool,
    owner: Uuid,
}

/// Category auto-resolved when a note is created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Column list for note queries joined against `categories`.
const NOTE_COLUMNS: &str = "n.id, n.title, n.content, n.owner_id, n.created_at, n.updated_at, \
                            n.category_id, c.name AS category_name";

/// Partial update: only supplied fields are overwritten.
#[derive(Debug, Default)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<Uuid>,
}

impl UpdateNote {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category_id.is_none()
    }
}

impl NoteService {
    pub fn new(pool: PgPool, owner: Uuid) -> Self {
        Self { pool, owner }
    }

    /// All notes owned by the caller, categories resolved.
    pub async fn list_notes(&self) -> Result<Vec<NoteWithCategory>, ApiError> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes n \
             JOIN categories c ON c.id = n.category_id \
             WHERE n.owner_id = $1 \
             ORDER BY n.created_at DESC"
        );
        let rows: Vec<NoteCategoryRow> = sqlx::query_as(&query)
            .bind(self.owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(NoteWithCategory::from).collect())
    }

    /// Single owned note by id.
    pub async fn get_note(&self, note_id: Uuid) -> Result<NoteWithCategory, ApiError> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes n \
             JOIN categories c ON c.id = n.category_id \
             WHERE n.owner_id = $1 AND n.id = $2"
        );
        let row: Option<NoteCategoryRow> = sqlx::query_as(&query)
            .bind(self.owner)
            .bind(note_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(NoteWithCategory::from)
            .ok_or_else(|| ApiError::not_found("Note not found"))
    }

    /// Owned notes in the given category. An empty subset is a 404, which
    /// also keeps category existence unobservable through this route.
    pub async fn list_by_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<NoteWithCategory>, ApiError> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes n \
             JOIN categories c ON c.id = n.category_id \
             WHERE n.owner_id = $1 AND n.category_id = $2 \
             ORDER BY n.created_at DESC"
        );
        let rows: Vec<NoteCategoryRow> = sqlx::query_as(&query)
            .bind(self.owner)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Err(ApiError::not_found("No notes found in this category"));
        }

        Ok(rows.into_iter().map(NoteWithCategory::from).collect())
    }

    /// Create a note owned by the caller. With no category supplied, the
    /// "General" default is resolved (created on first use).
    pub async fn create_note(
        &self,
        title: &str,
        content: &str,
        category_id: Option<Uuid>,
    ) -> Result<NoteWithCategory, ApiError> {
        let category = self.resolve_category(category_id).await?;

        let note: Note = sqlx::query_as(
            "INSERT INTO notes (id, title, content, category_id, owner_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, title, content, category_id, owner_id, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(content)
        .bind(category.id)
        .bind(self.owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(NoteWithCategory::from_parts(note, category))
    }

    /// Overwrite the supplied fields of an owned note.
    pub async fn update_note(
        &self,
        note_id: Uuid,
        changes: UpdateNote,
    ) -> Result<NoteWithCategory, ApiError> {
        if changes.is_empty() {
            return Err(ApiError::bad_request(
                "At least one of title, content or categoryId is required",
            ));
        }

        if let Some(category_id) = changes.category_id {
            // A well-formed id pointing at nothing is a 404, not a silent keep
            self.category_by_id(category_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Category not found"))?;
        }

        let updated: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE notes SET \
                 title = COALESCE($3, title), \
                 content = COALESCE($4, content), \
                 category_id = COALESCE($5, category_id), \
                 updated_at = now() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING id",
        )
        .bind(note_id)
        .bind(self.owner)
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_none() {
            return Err(ApiError::not_found("Note not found or unauthorized"));
        }

        self.get_note(note_id).await
    }

    /// Delete an owned note.
    pub async fn delete_note(&self, note_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND owner_id = $2")
            .bind(note_id)
            .bind(self.owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Note not found or unauthorized"));
        }

        Ok(())
    }

    /// Create a global category. Duplicate names conflict, whether caught
    /// up front or lost in a race against the unique index.
    pub async fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        let category: Category =
            sqlx::query_as("INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING id, name")
                .bind(Uuid::new_v4())
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        ApiError::conflict("Category already exists")
                    } else {
                        ApiError::from(e)
                    }
                })?;

        Ok(category)
    }

    /// All categories. An empty corpus is an empty list, not an error.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let categories: Vec<Category> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Resolve the category for a new note: the referenced one when an id
    /// is supplied, the "General" default otherwise.
    async fn resolve_category(&self, category_id: Option<Uuid>) -> Result<Category, ApiError> {
        match category_id {
            Some(id) => self
                .category_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Category not found")),
            None => self.default_category().await,
        }
    }

    async fn category_by_id(&self, category_id: Uuid) -> Result<Option<Category>, ApiError> {
        let category: Option<Category> =
            sqlx::query_as("SELECT id, name FROM categories WHERE id = $1")
                .bind(category_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }

    /// Get-or-create the default category in one statement. Concurrent
    /// first-time creations converge on the existing row instead of one of
    /// them failing on the unique name index.
    async fn default_category(&self) -> Result<Category, ApiError> {
        let category: Category = sqlx::query_as(
            "INSERT INTO categories (id, name) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(DEFAULT_CATEGORY)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_note_empty_detection() {
        assert!(UpdateNote::default().is_empty());
        assert!(!UpdateNote {
            title: Some("t".to_string()),
            ..Default::default()
        }
        .is_empty());
        assert!(!UpdateNote {
            category_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
        .is_empty());
    }
}
