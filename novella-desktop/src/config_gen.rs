use std::fs;
use std::path::Path;

use novella_core::config::{CompilerConfig, SystemConfig};
use serde::Serialize;

#[derive(Serialize, Default)]
struct FullConfig {
    system: SystemConfig,
    compiler: CompilerConfig,
}

pub fn ensure_config_exists(path: &str) {
    if Path::new(path).exists() {
        return;
    }

    println!("Creating default configuration at '{}'...", path);

    let toml_str = match toml::to_string_pretty(&FullConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to serialize default config: {}", e);
            return;
        }
    };

    if let Err(e) = fs::write(path, toml_str) {
        eprintln!("Failed to write config file: {}", e);
    } else {
        println!("Config file created successfully.");
    }
}
