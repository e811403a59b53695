pub mod config;
pub mod event;
pub mod executor;
pub mod manager;
pub mod renderer;
pub mod runtime;
pub mod storager;

pub use event::{InputEvent, OutputEvent};
pub use executor::{CallRegisters, Cursor, ExecError, Executor};
pub use manager::{DirSource, ScriptManager};
pub use runtime::Ctx;
