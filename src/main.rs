use rdoit::runner::SETUP_ERROR_EXIT_CODE;
use std::process;

fn main() {
    match rdoit::cli::run() {
        Ok(result) => process::exit(result.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(SETUP_ERROR_EXIT_CODE);
        }
    }
}
