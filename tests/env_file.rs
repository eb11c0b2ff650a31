use std::env;
use std::fs;

use framework_dx11::config::{self, Config};
use framework_dx11::logging;

#[test]
fn env_file_feeds_the_log_filter_and_config() {
    // The process environment takes precedence over the file.
    if env::var_os("RUST_LOG").is_some() || env::var_os("FRAMEWORK_WIDTH").is_some() {
        return;
    }

    let dir = env::temp_dir().join(format!("framework-dx11-env-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(".env");
    fs::write(&path, "RUST_LOG=framework_dx11=trace\nFRAMEWORK_WIDTH=1024\n").unwrap();

    config::load_env_file_from(&path).unwrap();

    assert!(logging::env_filter().to_string().contains("framework_dx11=trace"));
    assert_eq!(Config::from_env().unwrap().window_width, 1024);

    assert!(config::load_env_file_from(&dir.join("missing.env")).is_err());
    fs::remove_dir_all(&dir).unwrap();
}
