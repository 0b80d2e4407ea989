use crate::errors::AppError;
use crate::models::resume::{AuthoredResume, DeletedResume, Resume, ResumeDetail};
use crate::resumes::repository::{
    CreateParams, DeleteParams, ReadManyParams, ReadOneParams, ResumeRepository, UpdateParams,
};
use crate::store::SortOrder;

/// Business-rule layer over `ResumeRepository`. Every call is scoped to the
/// acting author's id.
#[derive(Clone)]
pub struct ResumeService {
    repository: ResumeRepository,
}

impl ResumeService {
    pub fn new(repository: ResumeRepository) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        author_id: i32,
        title: String,
        content: String,
    ) -> Result<Resume, AppError> {
        self.repository
            .create(CreateParams {
                author_id,
                title,
                content,
            })
            .await
    }

    /// Lists the author's resumes. `sort` is the raw query value; it defaults
    /// to newest-first when missing or unrecognised.
    pub async fn read_many(
        &self,
        author_id: i32,
        sort: Option<&str>,
    ) -> Result<Vec<AuthoredResume>, AppError> {
        self.repository
            .read_many(ReadManyParams {
                author_id,
                sort: SortOrder::from_query(sort),
            })
            .await
    }

    pub async fn read_one(
        &self,
        id: &str,
        author_id: i32,
    ) -> Result<Option<ResumeDetail>, AppError> {
        self.repository
            .read_one(ReadOneParams {
                id,
                author_id,
                include_author: true,
            })
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        author_id: i32,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Resume, AppError> {
        self.repository
            .update(UpdateParams {
                id,
                author_id,
                title,
                content,
            })
            .await
    }

    pub async fn delete(&self, id: &str, author_id: i32) -> Result<DeletedResume, AppError> {
        self.repository.delete(DeleteParams { id, author_id }).await
    }
}
