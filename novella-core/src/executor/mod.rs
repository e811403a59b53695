mod call_stack;
mod cursor;
mod error;
mod eval;
mod walk;

use std::sync::Arc;

use crate::event::{InputEvent, OutputEvent};
use crate::manager::ScriptManager;
use crate::runtime::Ctx;
use crate::storager::types::CursorSnapshot;
use walk::{walk_command, NextAction, StepEffect};

pub use call_stack::CallRegisters;
pub use cursor::Cursor;
pub use error::{ExecError, Result};

/// Runs a compiled script one command at a time.
///
/// Output goes to the event queue of the [`Ctx`] passed to [`Executor::step`];
/// input comes back through [`Executor::feed`].
#[derive(Clone)]
pub struct Executor {
    manager: Arc<ScriptManager>,
    cursor: Option<Cursor>,
    registers: CallRegisters,
    pending_choice: Option<Vec<String>>,
    pause: bool,
    //A menu screen is open; `@return` runs again once it closes
    in_gui: bool,
    finished: bool,
}

impl Executor {
    pub fn new(manager: Arc<ScriptManager>) -> Self {
        Executor {
            manager,
            cursor: None,
            registers: CallRegisters::default(),
            pending_choice: None,
            pause: false,
            in_gui: false,
            finished: false,
        }
    }

    pub fn start(&mut self, ctx: &mut Ctx, script: &str) -> Result<()> {
        self.load_script(ctx, script, None)
    }

    /// Compiles `name` and puts the cursor on its first command, or on
    /// `label` when given. Any previous script state is dropped.
    pub fn load_script(&mut self, ctx: &mut Ctx, name: &str, label: Option<&str>) -> Result<()> {
        let program = self.manager.load(name)?;
        let mut cursor = Cursor::new(program);
        if let Some(label) = label {
            cursor.move_to_label(label)?;
        }
        log::info!("Running '{}' from command {}", name, cursor.index());

        self.cursor = Some(cursor);
        self.registers.clear();
        self.pending_choice = None;
        self.pause = false;
        self.in_gui = false;
        self.finished = false;
        ctx.push(OutputEvent::ScriptLoaded { name: name.to_string() });
        Ok(())
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn cursor_mut(&mut self) -> Option<&mut Cursor> {
        self.cursor.as_mut()
    }

    pub fn registers(&self) -> &CallRegisters {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut CallRegisters {
        &mut self.registers
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_waiting(&self) -> bool {
        self.pending_choice.is_some() || self.pause || self.in_gui
    }

    /// Executes the current command. Returns `true` while blocked on input.
    pub fn step(&mut self, ctx: &mut Ctx) -> Result<bool> {
        if self.is_waiting() {
            return Ok(true);
        }
        if self.finished {
            return Ok(false);
        }
        let cursor = self.cursor.as_ref().ok_or(ExecError::NoScript)?;
        let program = Arc::clone(cursor.program());
        let index = cursor.index();
        let command = &program.commands()[index];

        if let Some(locale) = command.locale.as_deref() {
            if locale != ctx.locale {
                log::trace!("skip {}:{} for locale {}", command.file, command.line, locale);
                self.advance(ctx)?;
                return Ok(false);
            }
        }

        let StepEffect { events, next } = walk_command(ctx, command)?;
        ctx.event_queue.extend(events);

        match next {
            NextAction::Continue => self.advance(ctx)?,
            NextAction::Jump(label) => self.cursor_or_err()?.move_to_label(&label)?,
            NextAction::JumpOr { label, finally } => {
                self.cursor_or_err()?.move_to_label_finally(&label, &finally)?
            }
            NextAction::Call(label) => {
                self.cursor_or_err()?.move_to_label(&label)?;
                self.registers.push_return_point(index);
            }
            NextAction::Return => self.return_from_call(ctx, index)?,
            NextAction::Load { file, label } => self.load_script(ctx, &file, label.as_deref())?,
            NextAction::WaitChoice(labels) => self.pending_choice = Some(labels),
            NextAction::WaitInput => self.pause = true,
        }
        Ok(false)
    }

    pub fn feed(&mut self, ctx: &mut Ctx, ev: InputEvent) -> Result<()> {
        match ev {
            InputEvent::ChoiceMade { index } => {
                if let Some(labels) = self.pending_choice.take() {
                    match labels.get(index) {
                        Some(label) => self.cursor_or_err()?.move_to_label(label)?,
                        None => {
                            log::warn!("choice {} out of {} options, ignored", index, labels.len());
                            self.pending_choice = Some(labels);
                        }
                    }
                }
            }
            InputEvent::Continue => {
                if self.in_gui {
                    self.in_gui = false;
                } else if self.pause {
                    self.pause = false;
                    self.advance(ctx)?;
                }
            }
            InputEvent::Exit => {
                self.pause = false;
                self.in_gui = false;
                self.pending_choice = None;
                self.finish(ctx);
            }
            InputEvent::SaveRequest { .. } | InputEvent::LoadRequest { .. } => {
                log::debug!("save/load requests are handled by the driver");
            }
        }
        Ok(())
    }

    /// Calls `label` from a menu screen. Returning re-runs the current
    /// command. When `gui` is given, the first `@return` hands it back to
    /// the renderer and waits; the return itself happens on the next
    /// `Continue`.
    pub fn gosub_from_menu(&mut self, label: &str, gui: Option<&str>) -> Result<()> {
        let cursor = self.cursor.as_mut().ok_or(ExecError::NoScript)?;
        let index = cursor.index();
        cursor.move_to_label(label)?;
        if self.registers.get_return_point().is_some() {
            self.registers.set_deep_return_point(index as isize - 1);
        } else {
            self.registers.push_return_point_minus_one(index);
        }
        if let Some(gui) = gui {
            self.registers.push_return_gui(gui);
        }
        self.pause = false;
        self.in_gui = false;
        self.pending_choice = None;
        Ok(())
    }

    pub fn snapshot(&self) -> Option<CursorSnapshot> {
        self.cursor.as_ref().map(|c| CursorSnapshot {
            script: c.script_name().to_string(),
            index: c.index(),
            return_point: self.registers.get_return_point(),
        })
    }

    pub fn restore(&mut self, ctx: &mut Ctx, snap: CursorSnapshot) -> Result<()> {
        self.load_script(ctx, &snap.script, None)?;
        let cursor = self.cursor_or_err()?;
        cursor.move_to_command_index(snap.index)?;
        let count = cursor.command_count();
        self.registers.set_return_point(snap.return_point, count)
    }

    fn cursor_or_err(&mut self) -> Result<&mut Cursor> {
        self.cursor.as_mut().ok_or(ExecError::NoScript)
    }

    fn advance(&mut self, ctx: &mut Ctx) -> Result<()> {
        match self.cursor_or_err()?.move_to_next_command() {
            Err(ExecError::NoNextCommand) => {
                self.finish(ctx);
                Ok(())
            }
            other => other,
        }
    }

    fn finish(&mut self, ctx: &mut Ctx) {
        if !self.finished {
            log::info!("Script finished");
            self.finished = true;
            ctx.push(OutputEvent::End);
        }
    }

    fn return_from_call(&mut self, ctx: &mut Ctx, index: usize) -> Result<()> {
        if let Some(gui) = self.registers.get_return_gui() {
            log::debug!("returning to menu {} before resuming", gui);
            ctx.push(OutputEvent::ReturnToGui { name: gui });
            self.in_gui = true;
            return Ok(());
        }
        match self.registers.pop_return_point() {
            Some(point) => {
                let resume = usize::try_from(point + 1).unwrap_or(0);
                self.cursor_or_err()?.move_to_command_index(resume)
            }
            None if index == 0 => {
                log::warn!("@return without a caller on the first line, ignored");
                self.advance(ctx)
            }
            None => Err(ExecError::NoReturnPoint),
        }
    }
}
