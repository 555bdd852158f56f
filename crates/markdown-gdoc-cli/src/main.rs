use std::process;

use markdown_gdoc_cli::{CliError, ExitCode};

fn main() {
    match markdown_gdoc_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("markdown-gdoc error: {err}");
            let code = err
                .downcast_ref::<CliError>()
                .map(CliError::exit_code)
                .unwrap_or(ExitCode::InvalidInput);
            process::exit(code.code());
        }
    }
}
