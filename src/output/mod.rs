//! Output module for the delimited result table
//!
//! This module handles:
//! - Writing the aggregated rows with the fixed header
//! - Reading a written table back
//! - Removing a table once it has been served

mod table;

pub use table::{discard_table, read_table, write_records, write_table, HEADER};
