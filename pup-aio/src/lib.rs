// pup-aio/src/lib.rs
//! Filesystem and JSON io used by pup (directories, atomic writes, json files)

pub mod fs;
pub mod json_io;

pub use fs::*;
pub use json_io::{read_json_sync, write_json_sync};
