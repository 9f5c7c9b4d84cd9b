use std::process::ExitCode;

fn main() -> ExitCode {
    awaybot_cli::run()
}
