use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::Author;

/// Application lifecycle stage of a resume. Stored as the `resume_status` enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "resume_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResumeStatus {
    #[default]
    Apply,
    Drop,
    Pass,
    Interview1,
    Interview2,
    FinalPass,
}

/// A resume row exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub content: String,
    pub status: ResumeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored resume together with its author relation, when the read joined it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeRecord {
    pub resume: Resume,
    pub author: Option<Author>,
}

impl ResumeRecord {
    pub fn unjoined(resume: Resume) -> Self {
        Self {
            resume,
            author: None,
        }
    }

    pub fn joined(resume: Resume, author: Author) -> Self {
        Self {
            resume,
            author: Some(author),
        }
    }

    /// Replaces the author relation and foreign key with a flat `authorName`.
    /// Returns `None` when the author was not joined.
    pub fn flatten_author(self) -> Option<AuthoredResume> {
        let author = self.author?;
        let Resume {
            id,
            title,
            content,
            status,
            created_at,
            updated_at,
            ..
        } = self.resume;
        Some(AuthoredResume {
            id,
            title,
            content,
            status,
            created_at,
            updated_at,
            author_name: author.name,
        })
    }
}

/// Caller-facing shape of a resume read with its author joined.
/// Carries neither `authorId` nor the `author` relation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredResume {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub status: ResumeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
}

/// Result of a single-resume read: flattened when the author was requested,
/// raw otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResumeDetail {
    Authored(AuthoredResume),
    Stored(Resume),
}

/// The only thing a delete discloses back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletedResume {
    pub id: i32,
}
