pub mod database_writer;
