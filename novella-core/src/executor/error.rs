use novella_script::CompileError;

/// Why the current script cannot keep running.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecError {
    #[error("label `{0}` not found")]
    LabelNotFound(String),
    #[error("no next command")]
    NoNextCommand,
    #[error("command index {index} out of range (script has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("return without a return point")]
    NoReturnPoint,
    #[error("bad variable `{0}`")]
    BadVariable(String),
    #[error("bad operator `{0}`")]
    BadOperator(String),
    #[error("choice `{0}` has no text")]
    MissingChoiceText(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("no script is loaded")]
    NoScript,
    #[error(transparent)]
    Compile(#[from] CompileError),
}

pub type Result<T> = std::result::Result<T, ExecError>;
