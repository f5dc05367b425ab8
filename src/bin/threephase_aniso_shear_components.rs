use std::process::ExitCode;

fn main() -> ExitCode {
    threephase::cli::finish(threephase::cli::run_problem("aniso_shear_components"))
}
