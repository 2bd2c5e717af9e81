mod auth;
mod configuration;
mod repository;
mod rows;

pub use auth::ServiceAccountKey;
pub use repository::SheetsRepository;
pub use rows::StatusRow;
