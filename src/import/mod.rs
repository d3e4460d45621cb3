mod grid;
mod ingest;
mod label;
mod sheets;

pub(crate) use ingest::ingest_path;
