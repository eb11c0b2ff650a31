use std::path::Path;
use std::process::ExitCode;

use framework_dx11::config::{self, Config};
use framework_dx11::logging;
use tracing::error;

#[cfg(windows)]
fn run() -> framework_dx11::Result<()> {
    use framework_dx11::platform::App;

    let config = Config::from_env()?;
    App::new(config)?.run()
}

#[cfg(not(windows))]
fn run() -> framework_dx11::Result<()> {
    let config = Config::from_env()?;
    Err(framework_dx11::Error::Config {
        key: "platform",
        message: format!("{} needs Direct3D 11 and only runs on Windows", config.title),
    })
}

fn main() -> ExitCode {
    config::load_env_file();
    logging::init(Some(Path::new("framework-dx11.log")));

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        },
    }
}
