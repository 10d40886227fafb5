pub mod postgres;
pub mod sqlite;
pub mod tables;
pub mod trait_def;

pub use postgres::PostgresSource;
pub use sqlite::SqliteSource;
pub use tables::Tables;
pub use trait_def::{DataSource, SourceError, SourceResult};
