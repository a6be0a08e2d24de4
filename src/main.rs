use std::process::ExitCode;

fn main() -> ExitCode {
    sutra_assert::cli::run()
}
