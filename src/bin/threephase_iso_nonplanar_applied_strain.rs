use std::process::ExitCode;

fn main() -> ExitCode {
    threephase::cli::finish(threephase::cli::run_problem("cylindrical_applied_strain"))
}
