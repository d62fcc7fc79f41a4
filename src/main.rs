use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    pds_setup::util::logging::init();

    let cli = pds_setup::cli::Cli::parse();
    match cli.run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(pds_setup::exit_code_for(&err))
        }
    }
}
