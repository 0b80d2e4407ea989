use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeRecord};
use crate::models::user::{Author, User};
use crate::store::{
    CreateResumeData, ResumeChanges, ResumeFilter, ResumeKey, ResumeStore, SortOrder, UserStore,
};

const RESUME_COLUMNS: &str = "id, author_id, title, content, status, created_at, updated_at";

const JOINED_COLUMNS: &str = "r.id, r.author_id, r.title, r.content, r.status, \
     r.created_at, r.updated_at, u.name AS author_name";

/// A resume row joined with `users.name`.
#[derive(Debug, FromRow)]
struct JoinedRow {
    #[sqlx(flatten)]
    resume: Resume,
    author_name: String,
}

impl From<JoinedRow> for ResumeRecord {
    fn from(row: JoinedRow) -> Self {
        let author = Author {
            id: row.resume.author_id,
            name: row.author_name,
        };
        ResumeRecord::joined(row.resume, author)
    }
}

/// Bulk read scoped by author, ordered by `created_at`.
fn find_many_query(
    filter: ResumeFilter,
    order: SortOrder,
    include_author: bool,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = if include_author {
        QueryBuilder::new(format!(
            "SELECT {JOINED_COLUMNS} FROM resumes r JOIN users u ON u.id = r.author_id WHERE r.author_id = "
        ))
    } else {
        QueryBuilder::new(format!(
            "SELECT {RESUME_COLUMNS} FROM resumes r WHERE r.author_id = "
        ))
    };
    qb.push_bind(filter.author_id)
        .push(" ORDER BY r.created_at ")
        .push(order.as_sql());
    qb
}

/// Scoped partial update. Only fields present in `changes` get a `SET` entry.
/// Callers handle the empty change set before getting here.
fn update_query(key: ResumeKey, changes: ResumeChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE resumes SET ");
    let mut set = qb.separated(", ");
    if let Some(title) = changes.title {
        set.push("title = ");
        set.push_bind_unseparated(title);
    }
    if let Some(content) = changes.content {
        set.push("content = ");
        set.push_bind_unseparated(content);
    }
    set.push("updated_at = NOW()");

    qb.push(" WHERE id = ")
        .push_bind(key.id)
        .push(" AND author_id = ")
        .push_bind(key.author_id)
        .push(" RETURNING ")
        .push(RESUME_COLUMNS);
    qb
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn insert_one(&self, data: CreateResumeData) -> Result<Resume, AppError> {
        let sql = format!(
            "INSERT INTO resumes (author_id, title, content) VALUES ($1, $2, $3) RETURNING {RESUME_COLUMNS}"
        );
        let resume = sqlx::query_as::<_, Resume>(&sql)
            .bind(data.author_id)
            .bind(data.title)
            .bind(data.content)
            .fetch_one(&self.pool)
            .await?;
        Ok(resume)
    }

    async fn find_many(
        &self,
        filter: ResumeFilter,
        order: SortOrder,
        include_author: bool,
    ) -> Result<Vec<ResumeRecord>, AppError> {
        let mut qb = find_many_query(filter, order, include_author);
        if include_author {
            let rows = qb.build_query_as::<JoinedRow>().fetch_all(&self.pool).await?;
            debug!(
                "Fetched {} joined resumes for author {}",
                rows.len(),
                filter.author_id
            );
            return Ok(rows.into_iter().map(ResumeRecord::from).collect());
        }

        let rows = qb.build_query_as::<Resume>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(ResumeRecord::unjoined).collect())
    }

    async fn find_one(
        &self,
        key: ResumeKey,
        include_author: bool,
    ) -> Result<Option<ResumeRecord>, AppError> {
        if include_author {
            let sql = format!(
                "SELECT {JOINED_COLUMNS} FROM resumes r JOIN users u ON u.id = r.author_id \
                 WHERE r.id = $1 AND r.author_id = $2"
            );
            let row = sqlx::query_as::<_, JoinedRow>(&sql)
                .bind(key.id)
                .bind(key.author_id)
                .fetch_optional(&self.pool)
                .await?;
            return Ok(row.map(ResumeRecord::from));
        }

        let sql = format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1 AND author_id = $2");
        let row = sqlx::query_as::<_, Resume>(&sql)
            .bind(key.id)
            .bind(key.author_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ResumeRecord::unjoined))
    }

    async fn update_one(
        &self,
        key: ResumeKey,
        changes: ResumeChanges,
    ) -> Result<Resume, AppError> {
        // Nothing to write: behave like a scoped read so a missing row still
        // surfaces as RowNotFound and updated_at is left untouched.
        if changes.is_empty() {
            let sql =
                format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1 AND author_id = $2");
            let resume = sqlx::query_as::<_, Resume>(&sql)
                .bind(key.id)
                .bind(key.author_id)
                .fetch_one(&self.pool)
                .await?;
            return Ok(resume);
        }

        let mut qb = update_query(key, changes);
        let resume = qb.build_query_as::<Resume>().fetch_one(&self.pool).await?;
        Ok(resume)
    }

    async fn delete_one(&self, key: ResumeKey) -> Result<Resume, AppError> {
        let sql = format!(
            "DELETE FROM resumes WHERE id = $1 AND author_id = $2 RETURNING {RESUME_COLUMNS}"
        );
        let resume = sqlx::query_as::<_, Resume>(&sql)
            .bind(key.id)
            .bind(key.author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(resume)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT id, name, created_at FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}
