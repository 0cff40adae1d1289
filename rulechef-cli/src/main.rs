//! rulechef CLI — DSL rule file in, matcher/rewriter C++ source out.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input, parse, or emission error

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        print_usage();
        process::exit(1);
    }

    if matches!(args[1].as_str(), "--help" | "-h" | "help") {
        print_usage();
        process::exit(0);
    }

    let outfile = args.get(2).map(String::as_str);
    if let Err(code) = commands::run(&args[1], outfile) {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: rulechef <infile> [<outfile>]");
    eprintln!();
    eprintln!("Reads a rule DSL file, compiles it to a RuleSimplify* C++ class, and");
    eprintln!("writes the result to <outfile> (or standard output, if omitted).");
}
