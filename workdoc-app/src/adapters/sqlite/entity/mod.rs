//! `SeaORM` entities for `SqliteStore`.

pub mod company;
pub mod generated_document;
pub mod subdomain_candidate;
