//! Resume repository: the only translator between resume operations and the
//! store. Scopes every single-record predicate by id and author, builds sparse
//! update payloads and flattens the author relation on joined reads.

use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::resume::{AuthoredResume, DeletedResume, Resume, ResumeDetail, ResumeRecord};
use crate::store::{
    CreateResumeData, ResumeChanges, ResumeFilter, ResumeKey, ResumeStore, SortOrder,
};

pub struct CreateParams {
    pub author_id: i32,
    pub title: String,
    pub content: String,
}

pub struct ReadManyParams {
    pub author_id: i32,
    pub sort: SortOrder,
}

pub struct ReadOneParams<'a> {
    pub id: &'a str,
    pub author_id: i32,
    pub include_author: bool,
}

pub struct UpdateParams<'a> {
    pub id: &'a str,
    pub author_id: i32,
    pub title: Option<String>,
    pub content: Option<String>,
}

pub struct DeleteParams<'a> {
    pub id: &'a str,
    pub author_id: i32,
}

/// Coerces a textual id (as delivered in a route parameter) to the integer key.
/// Text that is not an integer matches no row.
fn coerce_id(id: &str) -> Option<i32> {
    id.trim().parse::<i32>().ok()
}

fn scoped_key(id: &str, author_id: i32) -> Option<ResumeKey> {
    coerce_id(id).map(|id| ResumeKey { id, author_id })
}

fn flatten(record: ResumeRecord) -> Result<AuthoredResume, AppError> {
    let id = record.resume.id;
    record
        .flatten_author()
        .ok_or_else(|| AppError::Internal(anyhow!("author relation missing for resume {id}")))
}

#[derive(Clone)]
pub struct ResumeRepository {
    store: Arc<dyn ResumeStore>,
}

impl ResumeRepository {
    pub fn new(store: Arc<dyn ResumeStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, params: CreateParams) -> Result<Resume, AppError> {
        let CreateParams {
            author_id,
            title,
            content,
        } = params;
        let resume = self
            .store
            .insert_one(CreateResumeData {
                author_id,
                title,
                content,
            })
            .await?;
        info!("Created resume {} for author {author_id}", resume.id);
        Ok(resume)
    }

    pub async fn read_many(
        &self,
        params: ReadManyParams,
    ) -> Result<Vec<AuthoredResume>, AppError> {
        let records = self
            .store
            .find_many(
                ResumeFilter {
                    author_id: params.author_id,
                },
                params.sort,
                true,
            )
            .await?;
        debug!(
            "Read {} resumes for author {}",
            records.len(),
            params.author_id
        );
        records.into_iter().map(flatten).collect()
    }

    /// Returns `None` when no resume with this id belongs to the author.
    pub async fn read_one(
        &self,
        params: ReadOneParams<'_>,
    ) -> Result<Option<ResumeDetail>, AppError> {
        let Some(key) = scoped_key(params.id, params.author_id) else {
            debug!("Resume id {:?} is not an integer; nothing to read", params.id);
            return Ok(None);
        };

        let Some(record) = self.store.find_one(key, params.include_author).await? else {
            return Ok(None);
        };

        if params.include_author {
            Ok(Some(ResumeDetail::Authored(flatten(record)?)))
        } else {
            Ok(Some(ResumeDetail::Stored(record.resume)))
        }
    }

    pub async fn update(&self, params: UpdateParams<'_>) -> Result<Resume, AppError> {
        let key = scoped_key(params.id, params.author_id).ok_or(sqlx::Error::RowNotFound)?;
        let changes = ResumeChanges::new()
            .with_title(params.title)
            .with_content(params.content);
        let fields = changes.fields();

        let resume = self.store.update_one(key, changes).await?;
        info!("Updated resume {} fields {:?}", resume.id, fields);
        Ok(resume)
    }

    pub async fn delete(&self, params: DeleteParams<'_>) -> Result<DeletedResume, AppError> {
        let key = scoped_key(params.id, params.author_id).ok_or(sqlx::Error::RowNotFound)?;
        let deleted = self.store.delete_one(key).await?;
        info!("Deleted resume {} for author {}", deleted.id, key.author_id);
        Ok(DeletedResume { id: deleted.id })
    }
}
