use novella_script::CompileOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub script_path: String,
    /// Scenario started when the player boots.
    pub init_script: String,
    pub save_path: String,
    pub log_path: String,
    pub log_level: String,
    /// Locale matched against `+xx+` line prefixes.
    pub locale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub page_mode: bool,
    pub capacity: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            script_path: "game/".into(),
            init_script: "init.txt".into(),
            save_path: "saves/".into(),
            log_path: "logs/".into(),
            log_level: "info".into(),
            locale: "en".into(),
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let options = CompileOptions::default();
        Self { page_mode: options.page_mode, capacity: options.capacity }
    }
}

impl CompilerConfig {
    pub fn options(&self) -> CompileOptions {
        CompileOptions { page_mode: self.page_mode, capacity: self.capacity }
    }
}
