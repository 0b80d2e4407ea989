//! Storage boundary for resumes and their authors.
//!
//! `ResumeStore` exposes the five logical operations the repository needs
//! (insert-one, find-many, find-one, update-one, delete-one) over a single
//! `resumes` table. `UserStore` resolves acting users. `PgStore` implements
//! both over PostgreSQL.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeRecord};
use crate::models::user::User;

pub use postgres::PgStore;

/// Insert payload. Status, id and timestamps are left to store defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumeData {
    pub author_id: i32,
    pub title: String,
    pub content: String,
}

/// Bulk-read predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFilter {
    pub author_id: i32,
}

/// Single-record predicate. Always carries both the key and the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeKey {
    pub id: i32,
    pub author_id: i32,
}

/// Sparse update payload: a field is written only when it is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResumeChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ResumeChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        if title.is_some() {
            self.title = title;
        }
        self
    }

    pub fn with_content(mut self, content: Option<String>) -> Self {
        if content.is_some() {
            self.content = content;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Names of the columns this payload writes, in write order.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::with_capacity(2);
        if self.title.is_some() {
            fields.push("title");
        }
        if self.content.is_some() {
            fields.push("content");
        }
        fields
    }
}

/// Ordering of a bulk read by `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Lenient parse of a query-string value. Case-insensitive; anything other
    /// than `asc`/`desc`, including absence, falls back to `desc`.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert_one(&self, data: CreateResumeData) -> Result<Resume, AppError>;

    async fn find_many(
        &self,
        filter: ResumeFilter,
        order: SortOrder,
        include_author: bool,
    ) -> Result<Vec<ResumeRecord>, AppError>;

    async fn find_one(
        &self,
        key: ResumeKey,
        include_author: bool,
    ) -> Result<Option<ResumeRecord>, AppError>;

    /// Fails with `sqlx::Error::RowNotFound` when no row matches `key`.
    async fn update_one(&self, key: ResumeKey, changes: ResumeChanges)
        -> Result<Resume, AppError>;

    /// Fails with `sqlx::Error::RowNotFound` when no row matches `key`.
    async fn delete_one(&self, key: ResumeKey) -> Result<Resume, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: i32) -> Result<Option<User>, AppError>;
}
