//! The command store and the loader that fills it.

use std::io::BufRead;
use std::sync::Arc;

use crate::command::{Command, CommandKind};
use crate::error::{CompileError, ErrorKind, Result};
use crate::parser::{Line, LineParser};
use crate::source::{MemorySource, ScriptSource};
use crate::structured;

/// Default maximum number of commands in one loaded script.
pub const DEFAULT_CAPACITY: usize = 65536;

/// Maximum number of files opened by one load: the main file plus every
/// include directive, repeats included.
pub const MAX_FILES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Page mode disables the `name「message」` dialogue shorthand.
    pub page_mode: bool,
    pub capacity: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { page_mode: false, capacity: DEFAULT_CAPACITY }
    }
}

/// A fully compiled scenario script.
#[derive(Debug, Clone)]
pub struct Program {
    name: Arc<str>,
    commands: Vec<Command>,
    files: Vec<Arc<str>>,
}

impl Program {
    /// Reads `name` (and anything it includes) from `source`, then desugars
    /// structured blocks.
    pub fn compile(source: &dyn ScriptSource, name: &str, options: &CompileOptions) -> Result<Self> {
        let mut loader = Loader::new(source, options);
        let result = loader.load(name);
        if let Err(err) = &result {
            err.report();
        }
        result
    }

    /// Compiles a single in-memory script with no includes available.
    pub fn from_text(name: &str, text: &str, options: &CompileOptions) -> Result<Self> {
        let source = MemorySource::new().with(name, text);
        Self::compile(&source, name, options)
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Interned file names in first-seen order. The main file comes first.
    pub fn files(&self) -> &[Arc<str>] {
        &self.files
    }

    /// Commands that are not null placeholders.
    pub fn live(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| !c.is_null())
    }

    /// Index of the first label or labeled goto named `name`.
    pub fn find_label(&self, name: &str) -> Option<usize> {
        self.commands.iter().position(|c| c.label_name() == Some(name))
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

struct Loader<'s> {
    source: &'s dyn ScriptSource,
    options: &'s CompileOptions,
    parser: LineParser,
    commands: Vec<Command>,
    files: Vec<Arc<str>>,
    opened: usize,
    expanded_line: usize,
}

impl<'s> Loader<'s> {
    fn new(source: &'s dyn ScriptSource, options: &'s CompileOptions) -> Self {
        Loader {
            source,
            options,
            parser: LineParser::new(options),
            commands: Vec::new(),
            files: Vec::new(),
            opened: 0,
            expanded_line: 0,
        }
    }

    fn load(&mut self, name: &str) -> Result<Program> {
        let file = self.intern(name, None)?;
        self.read_file(&file, None)?;

        if self.commands.is_empty() {
            return Err(CompileError::new(file, 0, "", ErrorKind::NoCommand(name.to_string())));
        }

        structured::desugar(&mut self.commands, self.options)?;

        log::info!(
            "compiled `{}`: {} commands from {} file(s)",
            name,
            self.commands.len(),
            self.files.len()
        );
        Ok(Program {
            name: file,
            commands: std::mem::take(&mut self.commands),
            files: std::mem::take(&mut self.files),
        })
    }

    fn intern(&mut self, name: &str, at: Option<(&Arc<str>, usize, &str)>) -> Result<Arc<str>> {
        if self.opened >= MAX_FILES {
            return Err(match at {
                Some((file, line, text)) => {
                    CompileError::new(file.clone(), line, text, ErrorKind::TooManyFiles)
                }
                None => CompileError::new(Arc::from(name), 0, "", ErrorKind::TooManyFiles),
            });
        }
        self.opened += 1;
        if let Some(file) = self.files.iter().find(|f| f.as_ref() == name) {
            return Ok(file.clone());
        }
        let file: Arc<str> = Arc::from(name);
        self.files.push(file.clone());
        Ok(file)
    }

    /// `included_from` is the including file and line, if any.
    fn read_file(&mut self, file: &Arc<str>, included_from: Option<(&Arc<str>, usize, &str)>) -> Result<()> {
        let io_error = |reason: std::io::Error| {
            let kind = ErrorKind::Io { file: file.to_string(), reason: reason.to_string() };
            match included_from {
                Some((parent, line, text)) => CompileError::new(parent.clone(), line, text, kind),
                None => CompileError::new(file.clone(), 0, "", kind),
            }
        };
        let source = self.source;
        let reader = source.open(file).map_err(io_error)?;

        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(io_error)?;
            let line_no = i + 1;
            let raw = match i {
                0 => line.strip_prefix('\u{feff}').unwrap_or(&line),
                _ => line.as_str(),
            };

            let parsed = self
                .parser
                .parse(raw)
                .map_err(|kind| CompileError::new(file.clone(), line_no, raw, kind))?;

            match parsed {
                Line::Blank => {}
                Line::Include(name) => {
                    if included_from.is_some() {
                        return Err(CompileError::new(
                            file.clone(),
                            line_no,
                            raw,
                            ErrorKind::NestedInclude(name),
                        ));
                    }
                    let child = self.intern(&name, Some((file, line_no, raw)))?;
                    self.read_file(&child, Some((file, line_no, raw)))?;
                }
                Line::Command(body) => {
                    if self.commands.len() >= self.options.capacity {
                        return Err(CompileError::new(
                            file.clone(),
                            line_no,
                            raw,
                            ErrorKind::StoreFull(self.options.capacity),
                        ));
                    }
                    let mut command = Command {
                        file: file.clone(),
                        line: line_no,
                        expanded_line: self.expanded_line,
                        kind: CommandKind::Null,
                        text: raw.to_string(),
                        keyword: None,
                        params: Default::default(),
                        locale: None,
                    };
                    body.apply(&mut command);
                    self.commands.push(command);
                    self.expanded_line += 1;
                }
            }
        }
        Ok(())
    }
}
