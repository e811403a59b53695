//! Block syntax between `<<<` and `>>>`.
//!
//! The flat pass stores every line of a region as whatever it looks like on
//! its own; block keywords end up as plain messages. This pass walks each
//! region and rewrites those lines in place:
//!
//! ```text
//! switch "Yes" "No" {     ->  @choose CHOOSE_n_0 Yes CHOOSE_n_1 No
//! case yes {              ->  :CHOOSE_n_0
//!   ...
//! break                   ->  @goto CHOOSE_n_FINALLY
//! }                       ->  (null)
//! case no                 ->  :CHOOSE_n_1
//!   ...
//! break                   ->  @goto CHOOSE_n_FINALLY
//! }                       ->  :CHOOSE_n_FINALLY
//!
//! if $1 == 1 {            ->  @unless $1 == 1 IF_m_SKIP IF_m_FINALLY
//!   ...
//! }-                      ->  @labeledgoto IF_m_SKIP IF_m_FINALLY
//! else if $1 == 2 {       ->  @unless $1 == 2 ELIF_k_SKIP IF_m_FINALLY
//!   ...
//! }-                      ->  @labeledgoto ELIF_k_SKIP IF_m_FINALLY
//! else {                  ->  (null)
//!   ...
//! }                       ->  :IF_m_FINALLY
//! ```
//!
//! `n`, `m` and `k` are the expanded line numbers of the opening lines, so
//! nested blocks never collide. No command is ever inserted or removed.

use std::ops::BitOr;

use crate::command::{slot, Command, CommandKind};
use crate::error::{CompileError, ErrorKind, Result};
use crate::lexer::{tokenize, unquote};
use crate::parser::{Body, Line, LineParser, INCLUDE_PREFIX};
use crate::store::CompileOptions;

pub const REGION_START: &str = "<<<";
pub const REGION_END: &str = ">>>";

/// What a line inside a region turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Construct {
    Plain,
    Switch,
    Case,
    Break,
    SwitchClose,
    CaseClose,
    If,
    IfClose,
    IfCloseCont,
    ElseIf,
    Else,
    ElseClose,
}

impl Construct {
    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of constructs the current position accepts. Plain lines are always
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Accept(u16);

impl Accept {
    fn has(self, construct: Construct) -> bool {
        self.0 & construct.bit() != 0
    }
}

impl From<Construct> for Accept {
    fn from(construct: Construct) -> Self {
        Accept(construct.bit())
    }
}

impl BitOr<Construct> for Accept {
    type Output = Accept;

    fn bitor(self, rhs: Construct) -> Accept {
        Accept(self.0 | rhs.bit())
    }
}

impl BitOr for Construct {
    type Output = Accept;

    fn bitor(self, rhs: Construct) -> Accept {
        Accept::from(self) | rhs
    }
}

/// Jump targets visible from the current block.
#[derive(Debug, Clone, Default)]
struct Targets {
    /// Join point of the innermost block.
    finally: Option<String>,
    /// Where the innermost `if` chain lands when its condition fails.
    skip: Option<String>,
    /// Label for the next `case` of the innermost switch.
    case: Option<String>,
    /// Where `break` goes: the finally label of the innermost switch.
    breaks_to: Option<String>,
}

/// A structural keyword at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Switch(&'a str),
    Case(&'a str),
    Break,
    If(&'a str),
    ElseIf(&'a str),
    Else,
    Close,
    CloseCont,
}

impl Token<'_> {
    fn name(self) -> &'static str {
        match self {
            Token::Switch(_) => "switch",
            Token::Case(_) => "case",
            Token::Break => "break",
            Token::If(_) => "if",
            Token::ElseIf(_) => "else if",
            Token::Else => "else",
            Token::Close => "}",
            Token::CloseCont => "}-",
        }
    }
}

//`word` followed by whitespace or the end of the line
fn after_word<'a>(line: &'a str, word: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(word)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest.trim_start()),
        Some(_) => None,
    }
}

fn keyword(line: &str) -> Option<Token<'_>> {
    match line.trim_end() {
        "}" => return Some(Token::Close),
        "}-" => return Some(Token::CloseCont),
        "break" => return Some(Token::Break),
        _ => {}
    }
    if let Some(rest) = after_word(line, "switch") {
        return Some(Token::Switch(rest));
    }
    if let Some(rest) = after_word(line, "case") {
        return Some(Token::Case(rest));
    }
    if let Some(rest) = after_word(line, "else") {
        return Some(match after_word(rest, "if") {
            Some(cond) => Token::ElseIf(cond),
            None => Token::Else,
        });
    }
    after_word(line, "if").map(Token::If)
}

//Lines starting with a sigil are never block syntax
fn is_plain(line: &str) -> bool {
    !matches!(line.chars().next(), None | Some('@' | '*' | ':' | '&' | '#'))
}

//Everything before the opening brace
fn header(rest: &str) -> &str {
    rest.split('{').next().unwrap_or(rest)
}

/// Rewrites every structured region of `commands` in place.
pub(crate) fn desugar(commands: &mut [Command], options: &CompileOptions) -> Result<()> {
    let mut pass = Desugarer { commands, parser: LineParser::new(options) };
    let mut index = 0;
    while index < pass.commands.len() {
        let command = &pass.commands[index];
        if command.kind == CommandKind::Message && command.text.trim() == REGION_START {
            pass.commands[index].nullify();
            index = pass.region(index)?;
            pass.commands[index].nullify();
        }
        index += 1;
    }
    Ok(())
}

struct Desugarer<'a> {
    commands: &'a mut [Command],
    parser: LineParser,
}

impl Desugarer<'_> {
    /// Returns the index of the closing `>>>`.
    fn region(&mut self, start: usize) -> Result<usize> {
        let accept = Construct::Switch | Construct::If;
        let mut index = start;
        loop {
            index += 1;
            if index >= self.commands.len() {
                return Err(self.error(start, ErrorKind::UnexpectedEof(REGION_START)));
            }
            if self.is_region_end(index) {
                return Ok(index);
            }
            let (_, end) = self.line(index, accept, &mut Targets::default())?;
            index = end;
        }
    }

    fn is_region_end(&self, index: usize) -> bool {
        self.commands[index].text.trim() == REGION_END
    }

    //Next line of a block opened at `open`
    fn next_line(&self, index: usize, open: usize, what: &'static str) -> Result<usize> {
        let next = index + 1;
        if next >= self.commands.len() || self.is_region_end(next) {
            return Err(self.error(open, ErrorKind::UnexpectedEof(what)));
        }
        Ok(next)
    }

    /// Handles one line. Returns what it was and the last index it consumed.
    fn line(&mut self, index: usize, accept: Accept, targets: &mut Targets) -> Result<(Construct, usize)> {
        let text = self.commands[index].text.clone();
        let body = text.trim_start();

        if is_plain(body) {
            if let Some(token) = keyword(body) {
                return self.structural(index, token, accept, targets);
            }
        }

        if body.len() != text.len() {
            self.reparse(index, body)?;
        }
        Ok((Construct::Plain, index))
    }

    fn structural(
        &mut self,
        index: usize,
        token: Token<'_>,
        accept: Accept,
        targets: &mut Targets,
    ) -> Result<(Construct, usize)> {
        match token {
            Token::Switch(rest) if accept.has(Construct::Switch) => {
                Ok((Construct::Switch, self.switch(index, rest)?))
            }
            Token::Case(rest) if accept.has(Construct::Case) => {
                Ok((Construct::Case, self.case(index, rest, targets)?))
            }
            Token::Case(_) if accept.has(Construct::SwitchClose) => {
                Err(self.error(index, ErrorKind::TooManyCases))
            }
            Token::Break if accept.has(Construct::Break) => {
                let target = self.target(index, &targets.breaks_to, token)?;
                self.rewrite(index, Body::instruction(CommandKind::Goto, "@goto", [target]));
                Ok((Construct::Break, index))
            }
            Token::If(rest) if accept.has(Construct::If) => {
                Ok((Construct::If, self.if_chain(index, rest, targets)?))
            }
            Token::ElseIf(rest) if accept.has(Construct::ElseIf) => {
                let finally = self.target(index, &targets.finally, token)?;
                let skip = format!("ELIF_{}_SKIP", self.commands[index].expanded_line);
                let unless = self.unless(index, rest, &skip, &finally)?;
                self.rewrite(index, unless);
                targets.skip = Some(skip);
                Ok((Construct::ElseIf, index))
            }
            Token::Else if accept.has(Construct::Else) => {
                self.commands[index].nullify();
                Ok((Construct::Else, index))
            }
            Token::CloseCont if accept.has(Construct::IfCloseCont) => {
                let skip = self.target(index, &targets.skip, token)?;
                let finally = self.target(index, &targets.finally, token)?;
                self.rewrite(
                    index,
                    Body::instruction(CommandKind::LabeledGoto, "@labeledgoto", [skip, finally]),
                );
                Ok((Construct::IfCloseCont, index))
            }
            Token::Close => self.close(index, accept, targets),
            _ => Err(self.error(index, ErrorKind::Misplaced(token.name()))),
        }
    }

    fn close(&mut self, index: usize, accept: Accept, targets: &Targets) -> Result<(Construct, usize)> {
        let construct = [
            Construct::SwitchClose,
            Construct::IfClose,
            Construct::ElseClose,
            Construct::CaseClose,
        ]
        .into_iter()
        .find(|&c| accept.has(c));

        let Some(construct) = construct else {
            let kind = if accept.has(Construct::Break) {
                ErrorKind::CloseBeforeBreak
            } else if accept.has(Construct::Case) {
                ErrorKind::MissingCase
            } else {
                ErrorKind::Misplaced("}")
            };
            return Err(self.error(index, kind));
        };

        if construct == Construct::CaseClose {
            self.commands[index].nullify();
        } else {
            let finally = self.target(index, &targets.finally, Token::Close)?;
            self.rewrite(index, Body::label(finally));
        }
        Ok((construct, index))
    }

    /// `switch opt... {`: a choice menu with one case per option.
    fn switch(&mut self, open: usize, rest: &str) -> Result<usize> {
        let options: Vec<&str> = tokenize(header(rest)).into_iter().map(unquote).collect();
        if options.is_empty() {
            return Err(self.error(open, ErrorKind::MissingSelector));
        }
        if options.len() > slot::choose::MAX_OPTIONS {
            return Err(self.error(open, ErrorKind::TooManyOptions(slot::choose::MAX_OPTIONS)));
        }

        let exp = self.commands[open].expanded_line;
        let labels: Vec<String> = (0..options.len()).map(|i| format!("CHOOSE_{exp}_{i}")).collect();
        let finally = format!("CHOOSE_{exp}_FINALLY");
        let pairs = labels
            .iter()
            .zip(&options)
            .flat_map(|(label, text)| [label.clone(), text.to_string()]);
        self.rewrite(open, Body::instruction(CommandKind::Choose, "@choose", pairs));
        log::debug!(
            "{}:{}: switch with {} option(s)",
            self.commands[open].file,
            self.commands[open].line,
            options.len()
        );

        let mut inner = Targets {
            finally: Some(finally.clone()),
            skip: None,
            case: None,
            breaks_to: Some(finally),
        };
        let mut next_case = 0;
        let mut index = open;
        loop {
            index = self.next_line(index, open, "switch")?;
            inner.case = labels.get(next_case).cloned();
            let accept = match inner.case {
                Some(_) => Accept::from(Construct::Case),
                None => Accept::from(Construct::SwitchClose),
            };
            let (construct, end) = self.line(index, accept, &mut inner)?;
            index = end;
            match construct {
                Construct::Case => next_case += 1,
                Construct::SwitchClose => return Ok(index),
                _ => {}
            }
        }
    }

    /// `case x` or `case x {`. The case text itself is not used; cases bind
    /// to the switch options in order. A braced case also needs its `}`
    /// after the `break`.
    fn case(&mut self, open: usize, rest: &str, targets: &Targets) -> Result<usize> {
        let label = self.target(open, &targets.case, Token::Case(rest))?;
        self.rewrite(open, Body::label(label));
        let braced = rest.trim_end().ends_with('{');

        let mut inner = Targets {
            finally: targets.finally.clone(),
            skip: None,
            case: None,
            breaks_to: targets.breaks_to.clone(),
        };
        let mut accept = Construct::Break | Construct::If | Construct::Switch;
        let mut index = open;
        loop {
            index = self.next_line(index, open, "case")?;
            let (construct, end) = self.line(index, accept, &mut inner)?;
            index = end;
            match construct {
                Construct::Break if braced => accept = Accept::from(Construct::CaseClose),
                Construct::Break | Construct::CaseClose => return Ok(index),
                _ => {}
            }
        }
    }

    /// `if cond {` and its `else if` / `else` continuations.
    fn if_chain(&mut self, open: usize, rest: &str, targets: &Targets) -> Result<usize> {
        let exp = self.commands[open].expanded_line;
        let skip = format!("IF_{exp}_SKIP");
        let finally = format!("IF_{exp}_FINALLY");
        let unless = self.unless(open, rest, &skip, &finally)?;
        self.rewrite(open, unless);

        let mut inner = Targets {
            finally: Some(finally),
            skip: Some(skip),
            case: None,
            breaks_to: targets.breaks_to.clone(),
        };
        let mut nested = Construct::Switch | Construct::If;
        if inner.breaks_to.is_some() {
            nested = nested | Construct::Break;
        }
        let body = nested | Construct::IfClose | Construct::IfCloseCont;

        let mut accept = body;
        let mut index = open;
        loop {
            index = self.next_line(index, open, "if")?;
            let (construct, end) = self.line(index, accept, &mut inner)?;
            index = end;
            match construct {
                Construct::IfClose | Construct::ElseClose => return Ok(index),
                Construct::IfCloseCont => accept = Construct::ElseIf | Construct::Else,
                Construct::ElseIf => accept = body,
                Construct::Else => accept = nested | Construct::ElseClose,
                _ => {}
            }
        }
    }

    //`@unless lhs op rhs skip finally`
    fn unless(&self, index: usize, rest: &str, skip: &str, finally: &str) -> Result<Body> {
        let cond = header(rest);
        let tokens = tokenize(cond);
        let [lhs, op, rhs] = tokens.as_slice() else {
            return Err(self.error(index, ErrorKind::MalformedCondition(cond.trim().to_string())));
        };
        Ok(Body::instruction(CommandKind::Unless, "@unless", [*lhs, *op, *rhs, skip, finally]))
    }

    fn reparse(&mut self, index: usize, line: &str) -> Result<()> {
        match self.parser.parse(line) {
            Ok(Line::Blank) => self.commands[index].nullify(),
            Ok(Line::Command(body)) => self.rewrite(index, body),
            Ok(Line::Include(_)) => {
                return Err(self.error(index, ErrorKind::Misplaced(INCLUDE_PREFIX.trim_end())));
            }
            Err(kind) => return Err(self.error(index, kind)),
        }
        Ok(())
    }

    fn target(&self, index: usize, target: &Option<String>, token: Token<'_>) -> Result<String> {
        target
            .clone()
            .ok_or_else(|| self.error(index, ErrorKind::Misplaced(token.name())))
    }

    fn rewrite(&mut self, index: usize, body: Body) {
        body.apply(&mut self.commands[index]);
    }

    fn error(&self, index: usize, kind: ErrorKind) -> CompileError {
        let command = &self.commands[index];
        CompileError::new(command.file.clone(), command.line, command.text.clone(), kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_need_a_word_boundary() {
        assert_eq!(keyword("if $1 == 0 {"), Some(Token::If("$1 == 0 {")));
        assert_eq!(keyword("iffy weather"), None);
        assert_eq!(keyword("else if $1 == 0 {"), Some(Token::ElseIf("$1 == 0 {")));
        assert_eq!(keyword("else {"), Some(Token::Else));
        assert_eq!(keyword("breakfast"), None);
        assert_eq!(keyword("}-"), Some(Token::CloseCont));
        assert_eq!(keyword("switchboard"), None);
    }

    #[test]
    fn sigil_lines_are_not_plain() {
        assert!(!is_plain("@if $1 == 0 L"));
        assert!(!is_plain(":if"));
        assert!(is_plain("if $1 == 0 {"));
    }

    #[test]
    fn accept_set_membership() {
        let accept = Construct::IfClose | Construct::If;
        assert!(accept.has(Construct::If));
        assert!(!accept.has(Construct::Break));
        assert!((accept | Construct::Break).has(Construct::Break));
    }
}
