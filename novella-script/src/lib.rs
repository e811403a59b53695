pub mod command;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod source;
pub mod store;
mod structured;

pub use command::{slot, Command, CommandKind, Params, PARAM_SIZE};
pub use error::{CompileError, ErrorKind};
pub use source::{MemorySource, ScriptSource};
pub use store::{CompileOptions, Program};
pub use structured::{REGION_END, REGION_START};
