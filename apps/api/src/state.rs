use std::sync::Arc;

use crate::resumes::repository::ResumeRepository;
use crate::resumes::service::ResumeService;
use crate::store::{ResumeStore, UserStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resumes: ResumeService,
    /// Resolves the acting user for `auth::identify`.
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Wires repository and service over one store.
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: ResumeStore + UserStore + 'static,
    {
        let repository = ResumeRepository::new(store.clone());
        AppState {
            resumes: ResumeService::new(repository),
            users: store,
        }
    }
}
