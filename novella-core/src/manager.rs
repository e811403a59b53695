use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use novella_script::{CompileError, CompileOptions, Program, ScriptSource};
use walkdir::WalkDir;

use crate::config::{CompilerConfig, SystemConfig};

/// Extension of scenario files picked up by [`DirSource::scan`].
pub const SCRIPT_EXTENSION: &str = "txt";

/// Scenario files under one directory, addressed by relative path.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every scenario file, sorted, with `/` separators.
    pub fn scan(&self) -> Result<Vec<String>> {
        info!("Scanning scenario directory {:?}", self.root);
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.with_context(|| format!("Failed to scan {:?}", self.root))?;
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|e| e != SCRIPT_EXTENSION) {
                continue;
            }
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let name: Vec<_> = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect();
            names.push(name.join("/"));
        }
        names.sort();
        Ok(names)
    }
}

impl ScriptSource for DirSource {
    fn exists(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(self.root.join(name))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Compiles scenario scripts on demand.
///
/// Every load compiles from scratch, so a reload always sees the files as
/// they are now.
pub struct ScriptManager {
    source: Box<dyn ScriptSource + Send + Sync>,
    dir: Option<DirSource>,
    options: CompileOptions,
}

impl ScriptManager {
    pub fn new(root: impl Into<PathBuf>, options: CompileOptions) -> Self {
        let dir = DirSource::new(root);
        Self { source: Box::new(dir.clone()), dir: Some(dir), options }
    }

    pub fn with_source(source: impl ScriptSource + Send + Sync + 'static, options: CompileOptions) -> Self {
        Self { source: Box::new(source), dir: None, options }
    }

    /// Uses `[system].script_path` and the `[compiler]` section.
    pub fn from_config() -> Self {
        let system: SystemConfig = novella_shared::config::get("system");
        let compiler: CompilerConfig = novella_shared::config::get("compiler");
        Self::new(system.script_path, compiler.options())
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn exists(&self, name: &str) -> bool {
        self.source.exists(name)
    }

    pub fn load(&self, name: &str) -> std::result::Result<Program, CompileError> {
        Program::compile(self.source.as_ref(), name, &self.options)
    }

    /// Scenario files available to [`ScriptManager::load`]. Empty for
    /// sources that cannot be listed.
    pub fn scan(&self) -> Result<Vec<String>> {
        match &self.dir {
            Some(dir) => dir.scan(),
            None => Ok(Vec::new()),
        }
    }

    /// Compiles every scanned file and returns how many commands they hold.
    pub fn check_all(&self) -> Result<usize> {
        let mut total = 0;
        for name in self.scan()? {
            let program = self.load(&name).with_context(|| format!("Failed to compile {name}"))?;
            total += program.len();
        }
        info!("Checked all scenarios: {} commands", total);
        Ok(total)
    }
}
