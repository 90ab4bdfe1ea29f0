pub mod ingest;
pub mod wiki_parser;

pub use ingest::IngestService;
pub use wiki_parser::{FilmDetails, ParsedFilm, WikiFilmParser};
