pub mod backend;
pub mod config_io;
pub mod csv_source;
pub mod data_store;
