// Resume records: author-scoped CRUD.
// handlers → service → repository → store::ResumeStore.

pub mod handlers;
pub mod repository;
pub mod service;
