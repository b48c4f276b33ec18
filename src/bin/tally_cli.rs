use std::{env, process};

use tally_core::{
    cli::{output, run_cli, CliError, USAGE},
    init,
};

fn main() {
    init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(err) = run_cli(&args) {
        output::error(&err);
        if matches!(err, CliError::Usage(_)) {
            eprintln!("{USAGE}");
        }
        process::exit(err.exit_code());
    }
}
