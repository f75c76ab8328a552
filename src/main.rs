// src/main.rs

use mkrun::config::Settings;
use mkrun::{logging, run};

#[tokio::main]
async fn main() {
    let settings = Settings::from_env();
    if let Err(err) = logging::init_logging(settings.log_level) {
        eprintln!("mkrun: failed to initialise logging: {err:?}");
    }

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let code = run(settings, args).await;
    std::process::exit(code.code());
}
