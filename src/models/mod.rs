pub mod dto;
pub mod film;
pub mod ingest;
pub mod query;
pub mod validation;

pub use dto::*;
pub use film::FilmRecord;
pub use ingest::{IngestProgress, IngestRunResponse, IngestStage, ProgressMap};
pub use query::{FilmQuery, SortField, SortKey, SortOrder};
pub use validation::{ValidationError, Validator};
