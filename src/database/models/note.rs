use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::category::Category;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row shape for note queries joined against `categories`.
#[derive(Debug, FromRow)]
pub struct NoteCategoryRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_id: Uuid,
    pub category_name: String,
}

/// API shape of a note: the category reference resolved to the full record.
#[derive(Debug, Clone, Serialize)]
pub struct NoteWithCategory {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub owner_id: Uuid,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NoteCategoryRow> for NoteWithCategory {
    fn from(row: NoteCategoryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            owner_id: row.owner_id,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl NoteWithCategory {
    pub fn from_parts(note: Note, category: Category) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            owner_id: note.owner_id,
            category,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}
