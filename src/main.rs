//! The solver binary: parse a DIMACS CNF file, run the DPLL search, and
//! report `s SATISFIABLE` with a model or `s UNSATISFIABLE`.

use clap::error::ErrorKind;
use clap::Parser;

mod cli;

fn main() {
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                // Unknown flags and missing arguments exit 1, not clap's 2.
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    std::process::exit(cli::run(&args));
}
