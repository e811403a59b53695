use std::sync::Arc;

/// Why a line failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("unknown instruction `{0}`")]
    UnknownInstruction(String),
    #[error("unknown parameter name `{name}` for @{kind}")]
    UnknownParameter { kind: String, name: String },
    #[error("parameter `{0}` is out of order")]
    ParameterOrder(String),
    #[error("parameter name is required here")]
    ParameterNameRequired,
    #[error("empty parameter")]
    EmptyParameter,
    #[error("too few parameters: expected at least {min}, got {got}")]
    TooFewParameters { min: usize, got: usize },
    #[error("too many parameters: expected at most {max}, got {got}")]
    TooManyParameters { max: usize, got: usize },
    #[error("dialogue line needs a name and a message")]
    EmptyDialogue,
    #[error("nested `using` of `{0}` is not allowed")]
    NestedInclude(String),
    #[error("too many script files")]
    TooManyFiles,
    #[error("script exceeds {0} commands")]
    StoreFull(usize),
    #[error("script `{0}` contains no command")]
    NoCommand(String),
    #[error("unexpected end of file inside `{0}`")]
    UnexpectedEof(&'static str),
    #[error("`{0}` is not allowed here")]
    Misplaced(&'static str),
    #[error("`}}` before `break`")]
    CloseBeforeBreak,
    #[error("switch closed before all of its cases")]
    MissingCase,
    #[error("more cases than switch options")]
    TooManyCases,
    #[error("too many switch options (at most {0})")]
    TooManyOptions(usize),
    #[error("switch needs at least one option")]
    MissingSelector,
    #[error("malformed condition `{0}`")]
    MalformedCondition(String),
    #[error("cannot read `{file}`: {reason}")]
    Io { file: String, reason: String },
}

/// A compile failure, located at the offending line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{file}:{line}: {kind}")]
pub struct CompileError {
    pub file: Arc<str>,
    pub line: usize,
    pub text: String,
    pub kind: ErrorKind,
}

impl CompileError {
    pub fn new(file: Arc<str>, line: usize, text: impl Into<String>, kind: ErrorKind) -> Self {
        Self { file, line, text: text.into(), kind }
    }

    /// Logs the error footer. Called once per failed load.
    pub fn report(&self) {
        log::error!("{}:{}: {}", self.file, self.line, self.kind);
        if !self.text.is_empty() {
            log::error!("> {}", self.text);
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
