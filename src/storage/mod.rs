pub mod layout;
pub mod header;
pub mod bucket_file;
