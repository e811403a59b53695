use std::sync::RwLock;
use std::path::Path;
use std::fs;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use toml::Table;

static GLOBAL_CONFIG: OnceCell<RwLock<Table>> = OnceCell::new();

/// Loads the process-wide config from `path`. A missing file means defaults.
/// Calling it again replaces the previous contents.
pub fn init<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();

    let content = if path.exists() {
        log::info!("Loading config from {:?}", path);
        fs::read_to_string(path)?
    } else {
        log::warn!("Config file not found at {:?}, using defaults.", path);
        String::new()
    };

    init_from_str(&content)
}

pub fn init_from_str(content: &str) -> anyhow::Result<()> {
    let table: Table = toml::from_str(content).unwrap_or_else(|e| {
        log::error!("Config syntax error: {}, using empty config.", e);
        Table::new()
    });

    match GLOBAL_CONFIG.get() {
        Some(store) => {
            let mut guard = store
                .write()
                .map_err(|_| anyhow::anyhow!("Config lock poisoned"))?;
            *guard = table;
        }
        None => {
            GLOBAL_CONFIG
                .set(RwLock::new(table))
                .map_err(|_| anyhow::anyhow!("Config already initialized"))?;
        }
    }

    Ok(())
}

/// Reads section `key`, falling back to `T::default()` when the config is
/// not loaded, the section is absent, or it does not fit `T`.
pub fn get<T: DeserializeOwned + Default>(key: &str) -> T {
    let Some(store) = GLOBAL_CONFIG.get() else {
        log::warn!("Config read before init, using defaults for '[{}]'.", key);
        return T::default();
    };
    let Ok(read_guard) = store.read() else {
        return T::default();
    };

    if let Some(value) = read_guard.get(key) {
        value.clone().try_into().unwrap_or_else(|e| {
            log::warn!("Config section '[{}]' mismatch: {}. Using default.", key, e);
            T::default()
        })
    } else {
        T::default()
    }
}
