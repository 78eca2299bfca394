use std::process::ExitCode;

use log::error;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = match batchflow_rust::run_from_env() {
        Ok(result) => result,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(2);
        }
    };
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("cannot serialize job result: {e}"),
    }
    if result.is_completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
