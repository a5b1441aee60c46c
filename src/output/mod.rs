//! Terminal output.
//!
//! Human-readable rendering of scan headers, result tables and status
//! messages. File export lives in [`crate::export`].

mod plain;

pub use plain::{
    print_error, print_results, print_scan_header, print_success, print_warning,
    truncate_string, write_results,
};
