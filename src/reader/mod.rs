pub mod bucket_cache;
pub mod database_reader;
