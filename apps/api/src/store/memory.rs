use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeRecord, ResumeStatus};
use crate::models::user::{Author, User};
use crate::store::{
    CreateResumeData, ResumeChanges, ResumeFilter, ResumeKey, ResumeStore, SortOrder, UserStore,
};

#[derive(Default)]
struct Tables {
    users: HashMap<i32, User>,
    // Insertion order doubles as the store-default order for ties.
    resumes: Vec<Resume>,
    next_id: i32,
    last_created: Option<DateTime<Utc>>,
}

impl Tables {
    fn position(&self, key: ResumeKey) -> Option<usize> {
        self.resumes
            .iter()
            .position(|r| r.id == key.id && r.author_id == key.author_id)
    }

    fn record(&self, resume: &Resume, include_author: bool) -> ResumeRecord {
        match self.users.get(&resume.author_id) {
            Some(user) if include_author => ResumeRecord::joined(resume.clone(), Author::from(user)),
            _ => ResumeRecord::unjoined(resume.clone()),
        }
    }

    // Strictly increasing so ordering assertions never depend on clock resolution.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let at = match self.last_created {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_created = Some(at);
        at
    }
}

/// In-memory store used by service and router tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, id: i32, name: &str) -> User {
        let user = User {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().await.users.insert(id, user.clone());
        user
    }

    pub async fn len(&self) -> usize {
        self.tables.lock().await.resumes.len()
    }
}

fn row_not_found() -> AppError {
    AppError::Database(sqlx::Error::RowNotFound)
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn insert_one(&self, data: CreateResumeData) -> Result<Resume, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&data.author_id) {
            return Err(AppError::Internal(anyhow!(
                "foreign key violation: user {} does not exist",
                data.author_id
            )));
        }

        tables.next_id += 1;
        let created_at = tables.next_timestamp();
        let resume = Resume {
            id: tables.next_id,
            author_id: data.author_id,
            title: data.title,
            content: data.content,
            status: ResumeStatus::default(),
            created_at,
            updated_at: created_at,
        };
        tables.resumes.push(resume.clone());
        Ok(resume)
    }

    async fn find_many(
        &self,
        filter: ResumeFilter,
        order: SortOrder,
        include_author: bool,
    ) -> Result<Vec<ResumeRecord>, AppError> {
        let tables = self.tables.lock().await;
        let mut matched: Vec<&Resume> = tables
            .resumes
            .iter()
            .filter(|r| r.author_id == filter.author_id)
            .collect();
        match order {
            SortOrder::Asc => matched.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Desc => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        Ok(matched
            .into_iter()
            .map(|r| tables.record(r, include_author))
            .collect())
    }

    async fn find_one(
        &self,
        key: ResumeKey,
        include_author: bool,
    ) -> Result<Option<ResumeRecord>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .position(key)
            .map(|i| tables.record(&tables.resumes[i], include_author)))
    }

    async fn update_one(
        &self,
        key: ResumeKey,
        changes: ResumeChanges,
    ) -> Result<Resume, AppError> {
        let mut tables = self.tables.lock().await;
        let index = tables.position(key).ok_or_else(row_not_found)?;
        let empty = changes.is_empty();
        let resume = &mut tables.resumes[index];
        if let Some(title) = changes.title {
            resume.title = title;
        }
        if let Some(content) = changes.content {
            resume.content = content;
        }
        if !empty {
            resume.updated_at = Utc::now();
        }
        Ok(resume.clone())
    }

    async fn delete_one(&self, key: ResumeKey) -> Result<Resume, AppError> {
        let mut tables = self.tables.lock().await;
        let index = tables.position(key).ok_or_else(row_not_found)?;
        Ok(tables.resumes.remove(index))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(author_id: i32, title: &str) -> CreateResumeData {
        CreateResumeData {
            author_id,
            title: title.to_string(),
            content: format!("{title} content"),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_default_status() {
        let store = MemoryStore::new();
        store.add_user(1, "Kim").await;

        let first = store.insert_one(create(1, "first")).await.unwrap();
        let second = store.insert_one(create(1, "second")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, ResumeStatus::Apply);
        assert!(second.created_at > first.created_at);
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_author() {
        let store = MemoryStore::new();
        let err = store.insert_one(create(9, "orphan")).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_find_one_is_scoped_by_author() {
        let store = MemoryStore::new();
        store.add_user(1, "Kim").await;
        store.add_user(2, "Lee").await;
        let resume = store.insert_one(create(1, "mine")).await.unwrap();

        let foreign = ResumeKey {
            id: resume.id,
            author_id: 2,
        };
        assert!(store.find_one(foreign, true).await.unwrap().is_none());
        assert!(matches!(
            store.delete_one(foreign).await,
            Err(AppError::Database(sqlx::Error::RowNotFound))
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_many_desc_orders_newest_first() {
        let store = MemoryStore::new();
        store.add_user(1, "Kim").await;
        store.insert_one(create(1, "old")).await.unwrap();
        store.insert_one(create(1, "new")).await.unwrap();

        let records = store
            .find_many(ResumeFilter { author_id: 1 }, SortOrder::Desc, true)
            .await
            .unwrap();
        let titles: Vec<_> = records.iter().map(|r| r.resume.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old"]);
        assert_eq!(records[0].author.as_ref().unwrap().name, "Kim");
    }
}
