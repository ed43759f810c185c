//! Dataset input and report output.

pub mod csv_reader;
pub mod report;

pub use csv_reader::{infer_cell, read_csv, read_csv_from};
pub use report::{report_to_string, write_report, write_reports};
