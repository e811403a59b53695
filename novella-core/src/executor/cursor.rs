use std::sync::Arc;

use novella_script::{Command, CommandKind, Program};

use super::error::{ExecError, Result};
use super::eval::atoi;

/// Position inside one loaded script.
///
/// The index always points at a command: a compiled program is never empty and
/// every move is checked before it is applied, so a failed move leaves the
/// cursor where it was.
#[derive(Debug, Clone)]
pub struct Cursor {
    program: Arc<Program>,
    index: usize,
}

impl Cursor {
    pub fn new(program: impl Into<Arc<Program>>) -> Self {
        Self { program: program.into(), index: 0 }
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn script_name(&self) -> &str {
        self.program.name()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn command_count(&self) -> usize {
        self.program.len()
    }

    pub fn is_final_command(&self) -> bool {
        self.index + 1 >= self.program.len()
    }

    pub fn command(&self) -> &Command {
        &self.program.commands()[self.index]
    }

    pub fn kind(&self) -> CommandKind {
        self.command().kind
    }

    pub fn param(&self, slot: usize) -> &str {
        self.command().param(slot)
    }

    pub fn int_param(&self, slot: usize) -> i32 {
        atoi(self.param(slot))
    }

    pub fn float_param(&self, slot: usize) -> f32 {
        self.param(slot).trim().parse().unwrap_or(0.0)
    }

    /// Line number inside the command's own file.
    pub fn line(&self) -> usize {
        self.command().line
    }

    pub fn file(&self) -> &str {
        &self.command().file
    }

    pub fn text(&self) -> &str {
        &self.command().text
    }

    pub fn locale(&self) -> Option<&str> {
        self.command().locale.as_deref()
    }

    pub fn move_to_next_command(&mut self) -> Result<()> {
        if self.is_final_command() {
            return Err(ExecError::NoNextCommand);
        }
        self.index += 1;
        Ok(())
    }

    /// Jumps to the first label called `name`. A labeled goto is entered one
    /// past itself so it does not fire on arrival.
    pub fn move_to_label(&mut self, name: &str) -> Result<()> {
        let found = self
            .program
            .find_label(name)
            .ok_or_else(|| ExecError::LabelNotFound(name.to_string()))?;
        let target = match self.program.commands()[found].kind {
            CommandKind::LabeledGoto => found + 1,
            _ => found,
        };
        self.move_to_command_index(target)
    }

    /// Jumps to `name`, or to `finally` when `name` does not exist.
    pub fn move_to_label_finally(&mut self, name: &str, finally: &str) -> Result<()> {
        match self.move_to_label(name) {
            Err(ExecError::LabelNotFound(_)) => self.move_to_label(finally),
            other => other,
        }
    }

    pub fn move_to_command_index(&mut self, index: usize) -> Result<()> {
        let len = self.program.len();
        if index >= len {
            return Err(ExecError::IndexOutOfRange { index, len });
        }
        self.index = index;
        Ok(())
    }
}
