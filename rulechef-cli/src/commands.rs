//! The single CLI command: parse a rule file and emit its C++ class.

use std::fs;

/// Parse `input`, emit its matcher/rewriter class, and write the result
/// to `output` (or standard output, if `None`).
pub fn run(input: &str, output: Option<&str>) -> Result<(), i32> {
    let text = fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })?;

    let rule = rulechef_parser::parse(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let outcome = rulechef_emit::emit_rule(&rule).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }

    match output {
        Some(path) => fs::write(path, &outcome.code).map_err(|e| {
            eprintln!("error: cannot write '{path}': {e}");
            1
        }),
        None => {
            print!("{}", outcome.code);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_rule(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn unreadable_input_is_exit_code_one() {
        assert_eq!(run("/nonexistent/path/to/a/rule", None), Err(1));
    }

    #[test]
    fn unparseable_input_is_exit_code_one() {
        let file = write_rule("not a valid rule at all");
        assert_eq!(run(file.path().to_str().unwrap(), None), Err(1));
    }

    #[test]
    fn bare_variable_replacement_is_exit_code_one() {
        let file = write_rule("AddZero: INT_ADD(x, 0) => x");
        assert_eq!(run(file.path().to_str().unwrap(), None), Err(1));
    }

    #[test]
    fn valid_rule_writes_to_named_output_file() {
        let file = write_rule("Swap: INT_XOR(x, y) => INT_XOR(y, x)");
        let out = NamedTempFile::new().unwrap();
        let out_path = out.path().to_str().unwrap().to_string();
        run(file.path().to_str().unwrap(), Some(&out_path)).unwrap();
        let written = fs::read_to_string(&out_path).unwrap();
        assert!(written.contains("class RuleSimplifySwap"));
    }
}
