use std::process;

fn main() {
    ledger_core::init();
    if let Err(err) = ledger_core::cli::run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
