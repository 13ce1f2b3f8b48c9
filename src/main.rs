//! pathstore CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. The JSON response is
//! already on stdout; the error is repeated on stderr and the process exits
//! non-zero on failure.

use pathstore::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
