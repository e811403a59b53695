//! Line classifier: one source line in, at most one command body out.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::command::{slot, Command, CommandKind, Params, PARAM_SIZE};
use crate::error::ErrorKind;
use crate::lexer::{is_quoted, split_named, tokenize, unquote};
use crate::registry;
use crate::store::CompileOptions;

/// Prefix of the include directive.
pub const INCLUDE_PREFIX: &str = "using ";

static LOCALE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+([A-Za-z]{2})\+").unwrap());

const OPEN_QUOTE: &str = "「";
const CLOSE_QUOTE: &str = "」";

/// Everything a line contributes to its command slot. File and line
/// identity stay with the slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub kind: CommandKind,
    pub keyword: Option<String>,
    pub params: Params,
    pub locale: Option<String>,
}

impl Body {
    pub fn new(kind: CommandKind) -> Self {
        Body { kind, keyword: None, params: Params::new(), locale: None }
    }

    pub fn label(name: impl Into<String>) -> Self {
        let mut body = Body::new(CommandKind::Label);
        body.params.set(slot::label::NAME, name);
        body
    }

    pub fn instruction<I, S>(kind: CommandKind, keyword: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Body {
            kind,
            keyword: Some(keyword.to_string()),
            params: Params::from_values(values),
            locale: None,
        }
    }

    /// Overwrites `cmd` in place, keeping its origin and raw text.
    pub(crate) fn apply(self, cmd: &mut Command) {
        cmd.kind = self.kind;
        cmd.keyword = self.keyword;
        cmd.params = self.params;
        cmd.locale = self.locale;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Empty line or comment. Produces nothing.
    Blank,
    /// `using <file>`.
    Include(String),
    Command(Body),
}

pub struct LineParser {
    page_mode: bool,
}

impl LineParser {
    pub fn new(options: &CompileOptions) -> Self {
        LineParser { page_mode: options.page_mode }
    }

    pub fn parse(&self, raw: &str) -> Result<Line, ErrorKind> {
        if let Some(file) = raw.strip_prefix(INCLUDE_PREFIX) {
            return Ok(Line::Include(file.trim().to_string()));
        }

        let (locale, line) = match LOCALE.captures(raw) {
            Some(caps) => (Some(caps[1].to_string()), &raw[caps[0].len()..]),
            None => (None, raw),
        };

        let mut body = match line.chars().next() {
            None | Some('#') => return Ok(Line::Blank),
            Some('@') => self.instruction(line)?,
            Some('*') => self.serif(&line[1..])?,
            //the label name is the rest of the line as written, possibly empty
            Some(':') => Body::label(&line[1..]),
            Some('&') => self.call(&line[1..])?,
            Some(_) => self.message(line),
        };
        body.locale = locale;
        Ok(Line::Command(body))
    }

    fn instruction(&self, line: &str) -> Result<Body, ErrorKind> {
        let mut tokens = tokenize(line).into_iter();
        let keyword = tokens.next().unwrap_or(line);
        let (kind, arity) = registry::lookup_instruction(keyword)
            .ok_or_else(|| ErrorKind::UnknownInstruction(keyword.to_string()))?;

        let mut params = Params::new();
        let mut count = 0;
        for (position, token) in tokens.enumerate() {
            if position >= PARAM_SIZE {
                return Err(ErrorKind::TooManyParameters { max: PARAM_SIZE, got: position + 1 });
            }
            count = position + 1;

            if registry::is_raw(kind) {
                params.set(position, token);
                continue;
            }

            match split_named(token) {
                Some((name, value)) => {
                    let slot = registry::lookup_param(kind, name).ok_or_else(|| {
                        ErrorKind::UnknownParameter { kind: kind.to_string(), name: name.to_string() }
                    })?;
                    if !registry::check_order(kind, position, slot) {
                        return Err(ErrorKind::ParameterOrder(name.to_string()));
                    }
                    params.set(slot, value_of(value)?);
                }
                None => {
                    if registry::requires_names(kind) {
                        return Err(ErrorKind::ParameterNameRequired);
                    }
                    params.set(position, value_of(token)?);
                }
            }
        }

        if count < arity.min {
            return Err(ErrorKind::TooFewParameters { min: arity.min, got: count });
        }
        if let Some(max) = arity.max.filter(|&max| count > max) {
            return Err(ErrorKind::TooManyParameters { max, got: count });
        }

        Ok(Body { kind, keyword: Some(keyword.to_string()), params, locale: None })
    }

    //`name*message` or `name*voice*message`
    fn serif(&self, rest: &str) -> Result<Body, ErrorKind> {
        let parts: Vec<&str> = rest.split('*').filter(|s| !s.is_empty()).collect();
        let mut body = Body::new(CommandKind::Serif);
        match parts.as_slice() {
            [name, message] => {
                body.params.set(slot::serif::NAME, *name);
                body.params.set(slot::serif::MESSAGE, *message);
            }
            [name, voice, message, ..] => {
                body.params.set(slot::serif::NAME, *name);
                body.params.set(slot::serif::VOICE, *voice);
                body.params.set(slot::serif::MESSAGE, *message);
            }
            _ => return Err(ErrorKind::EmptyDialogue),
        }
        Ok(body)
    }

    fn call(&self, rest: &str) -> Result<Body, ErrorKind> {
        let mut tokens = tokenize(rest).into_iter();
        let label = tokens.next().ok_or(ErrorKind::EmptyParameter)?;
        let mut body = Body::new(CommandKind::Gosub);
        body.keyword = Some("&".to_string());
        body.params.set(slot::gosub::LABEL, label);
        for (i, arg) in tokens.enumerate() {
            if i >= slot::gosub::MAX_ARGS {
                return Err(ErrorKind::TooManyParameters {
                    max: slot::gosub::MAX_ARGS,
                    got: i + 1,
                });
            }
            body.params.set(slot::gosub::ARGS + i, value_of(arg)?);
        }
        Ok(body)
    }

    fn message(&self, line: &str) -> Body {
        if let Some(body) = self.bracketed_serif(line) {
            return body;
        }
        let mut body = Body::new(CommandKind::Message);
        body.params.set(slot::message::TEXT, line);
        body
    }

    //`name「message」` reads as dialogue unless page mode is on or the line
    //continues the previous one
    fn bracketed_serif(&self, line: &str) -> Option<Body> {
        if self.page_mode || line.starts_with('\\') {
            return None;
        }
        let open = line.find(OPEN_QUOTE)?;
        if open == 0 || !line.ends_with(CLOSE_QUOTE) {
            return None;
        }
        let inner_start = open + OPEN_QUOTE.len();
        let inner_end = line.len() - CLOSE_QUOTE.len();
        if inner_end < inner_start {
            return None;
        }

        let mut body = Body::new(CommandKind::Serif);
        body.params.set(slot::serif::NAME, &line[..open]);
        body.params.set(slot::serif::MESSAGE, &line[inner_start..inner_end]);
        Some(body)
    }
}

fn value_of(token: &str) -> Result<String, ErrorKind> {
    let value = if is_quoted(token) { unquote(token) } else { token };
    if value.is_empty() {
        return Err(ErrorKind::EmptyParameter);
    }
    Ok(value.to_string())
}
