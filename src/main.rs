use std::process::ExitCode;

fn main() -> ExitCode {
    match vela_build_summary::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
