use reqpad::core;
use reqpad::status::ExitStatus;

/// Entry point - calls core::run()
///
/// Returns ExitStatus directly, which implements std::process::Termination.
fn main() -> ExitStatus {
    let args: Vec<String> = std::env::args().collect();
    core::run(args)
}
