use std::process::ExitCode;

fn main() -> ExitCode {
    affirmbot_cli::run()
}
