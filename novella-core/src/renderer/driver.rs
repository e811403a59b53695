use std::sync::Arc;

use crate::event::{InputEvent, OutputEvent};
use crate::executor::Result;
use crate::manager::ScriptManager;
use crate::renderer::Renderer;
use crate::{storager, Ctx, Executor};

pub struct ExecutorHandle {
    exe: Executor,
    manager: Arc<ScriptManager>,
}

impl ExecutorHandle {
    pub fn new(ctx: &mut Ctx, manager: Arc<ScriptManager>, script: &str) -> Result<Self> {
        let mut exe = Executor::new(manager.clone());
        exe.start(ctx, script)?;
        Ok(Self { exe, manager })
    }

    pub fn executor(&self) -> &Executor {
        &self.exe
    }

    pub fn executor_mut(&mut self) -> &mut Executor {
        &mut self.exe
    }

    #[inline]
    pub fn step(&mut self, ctx: &mut Ctx) -> Result<bool> {
        self.exe.step(ctx)
    }

    pub fn feed(&mut self, ctx: &mut Ctx, ev: InputEvent) -> Result<()> {
        match ev {
            InputEvent::SaveRequest { slot } => {
                log::info!("Save request slot: {}", slot);
                storager::save(&storager::slot_file(slot), ctx, &self.exe)
                    .unwrap_or_else(|e| log::error!("Save failed: {:#}", e));
                self.exe.feed(ctx, InputEvent::Continue)
            }
            InputEvent::LoadRequest { slot } => {
                log::info!("Load request slot: {}", slot);
                match storager::load(&storager::slot_file(slot), self.manager.clone()) {
                    Ok((new_ctx, new_exe)) => {
                        *ctx = new_ctx;
                        // the saved command runs again and records itself anew
                        ctx.dialogue_history.pop();
                        self.exe = new_exe;
                        log::info!("Load finished");
                    }
                    Err(e) => log::error!("Load failed: {:#}", e),
                }
                Ok(())
            }
            _ => self.exe.feed(ctx, ev),
        }
    }
}

/// Pumps events between an executor and a renderer until the script ends.
pub struct Driver<R: Renderer> {
    handle: ExecutorHandle,
    renderer: R,
}

impl<R: Renderer> Driver<R> {
    pub fn new(handle: ExecutorHandle, renderer: R) -> Self {
        Self { handle, renderer }
    }

    pub fn handle(&self) -> &ExecutorHandle {
        &self.handle
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn run(&mut self, ctx: &mut Ctx) -> Result<()> {
        loop {
            let waiting = self.handle.step(ctx)?;
            let events = ctx.drain();
            let mut answered = false;

            for ev in &events {
                if let Some(input) = self.renderer.render(ev) {
                    answered = true;
                    if input == InputEvent::Exit {
                        log::info!("Exit requested");
                        return self.handle.feed(ctx, input);
                    }
                    self.handle.feed(ctx, input)?;
                }
            }

            if self.handle.executor().is_finished() {
                return Ok(());
            }
            if waiting && !answered {
                match self.renderer.render(&OutputEvent::StepDone) {
                    Some(input) => self.handle.feed(ctx, input)?,
                    None => {
                        log::warn!("Renderer left the script waiting for input");
                        return Ok(());
                    }
                }
            }
        }
    }
}
