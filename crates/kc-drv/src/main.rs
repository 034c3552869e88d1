use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match kc_drv::parse_args(&args) {
        Ok(Some(config)) => config,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[cli] {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.verbose {
        kc_drv::install_tracing();
    }

    if let Err(e) = kc_drv::run(&config) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
