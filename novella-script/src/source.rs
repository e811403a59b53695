//! Where script text comes from.

use std::io::{self, BufRead, Cursor};

use rustc_hash::FxHashMap;

/// Read access to scenario files by name.
pub trait ScriptSource {
    fn exists(&self, name: &str) -> bool;

    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>>;
}

/// In-memory scripts, mostly for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: FxHashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.files.insert(name.into(), text.into());
    }
}

impl ScriptSource for MemorySource {
    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>> {
        let text = self.files.get(name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no script named `{name}`"))
        })?;
        Ok(Box::new(Cursor::new(text.as_bytes())))
    }
}
