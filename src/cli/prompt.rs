//! Interactive rule calculator.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the prompt provides the "type four numbers, get one rate" UX
//!
//! Values given as flags are not prompted for.

use std::io::{self, BufRead, Write};

use crate::cli::CalcArgs;
use crate::error::AppError;
use crate::models::calculate_interest_rate;

pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid numeric values.";

/// Run the calculator against stdin/stdout.
pub fn run_calculator(args: &CalcArgs) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_calculator_with(args, &mut input, &mut output)
}

/// Run the calculator against arbitrary streams.
///
/// Non-numeric input prints [`INVALID_INPUT_MESSAGE`] and returns `Ok`; it is
/// not a process error.
pub fn run_calculator_with<R: BufRead, W: Write>(
    args: &CalcArgs,
    input: &mut R,
    output: &mut W,
) -> Result<(), AppError> {
    writeln!(output, "ECB Interest Rate Calculator based on Modified Taylor Rule").map_err(write_err)?;

    let fields = [
        ("Enter the equilibrium rate (%): ", args.equilibrium_rate),
        ("Enter the current inflation rate (%): ", args.inflation),
        ("Enter the target inflation rate (%): ", args.target_inflation),
        ("Enter the output gap (%): ", args.output_gap),
    ];

    let mut values = [0.0; 4];
    for (slot, (prompt, preset)) in values.iter_mut().zip(fields) {
        let value = match preset {
            Some(v) => Some(v),
            None => prompt_number(prompt, input, output)?,
        };
        let Some(value) = value else {
            writeln!(output, "{INVALID_INPUT_MESSAGE}").map_err(write_err)?;
            return Ok(());
        };
        *slot = value;
    }

    let [equilibrium_rate, inflation, target_inflation, output_gap] = values;
    let rate = calculate_interest_rate(equilibrium_rate, inflation, target_inflation, output_gap);
    writeln!(output, "The calculated interest rate is: {rate:.2}%").map_err(write_err)?;
    Ok(())
}

/// Print `prompt` and read one line. `None` means the line was not a number.
fn prompt_number<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> Result<Option<f64>, AppError> {
    write!(output, "{prompt}").map_err(write_err)?;
    output.flush().map_err(write_err)?;

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;
    if bytes == 0 {
        return Err(AppError::usage("No input received. Pass values as flags, e.g. `taylor calc --inflation 2.5`."));
    }

    Ok(parse_number(&line))
}

/// Parse a user-typed number, ignoring surrounding whitespace.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn write_err(e: io::Error) -> AppError {
    AppError::usage(format!("Failed to write prompt: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(args: &CalcArgs, typed: &str) -> (Result<(), AppError>, String) {
        let mut input = Cursor::new(typed.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = run_calculator_with(args, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn prompts_for_all_four_values() {
        let (result, out) = run(&CalcArgs::default(), "1.0\n2.5\n2.0\n0\n");
        assert!(result.is_ok());
        assert!(out.contains("Enter the output gap (%): "));
        assert!(out.ends_with("The calculated interest rate is: 1.75%\n"));
    }

    #[test]
    fn non_numeric_input_is_not_an_error() {
        let (result, out) = run(&CalcArgs::default(), "1.0\nabc\n");
        assert!(result.is_ok());
        assert!(out.ends_with("Please enter valid numeric values.\n"));
        assert!(!out.contains("calculated interest rate"));
    }

    #[test]
    fn flags_skip_their_prompts() {
        let args = CalcArgs {
            equilibrium_rate: Some(1.0),
            inflation: Some(4.0),
            target_inflation: Some(2.0),
            output_gap: None,
        };
        let (result, out) = run(&args, "-2\n");
        assert!(result.is_ok());
        assert!(!out.contains("equilibrium rate"));
        assert!(out.ends_with("The calculated interest rate is: 3.00%\n"));
    }

    #[test]
    fn eof_is_reported() {
        let (result, _) = run(&CalcArgs::default(), "");
        assert_eq!(result.unwrap_err().exit_code(), 2);
    }

    #[test]
    fn parse_number_trims() {
        assert_eq!(parse_number("  2.5 \n"), Some(2.5));
        assert_eq!(parse_number("2,5"), None);
    }
}
