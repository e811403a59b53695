use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::event::{InputEvent, OutputEvent};
use crate::renderer::Renderer;

/// Line-based player: Enter continues, a number picks a choice, `:save N`
/// and `:load N` use save slots, `exit` quits.
pub struct TerminalRenderer<I, O> {
    input: I,
    output: O,
}

impl TerminalRenderer<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<I: BufRead, O: Write> TerminalRenderer<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn print(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.output, "{}", line) {
            log::error!("Terminal write failed: {}", e);
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let _ = write!(self.output, "> ");
        let _ = self.output.flush();
        let mut buf = String::new();
        match self.input.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end().to_string()),
            Err(e) => {
                log::error!("Terminal read failed: {}", e);
                None
            }
        }
    }

    fn command(line: &str) -> Option<InputEvent> {
        if line.eq_ignore_ascii_case("exit") {
            return Some(InputEvent::Exit);
        }
        if let Some(slot) = line.strip_prefix(":save") {
            return slot.trim().parse().ok().map(|slot| InputEvent::SaveRequest { slot });
        }
        if let Some(slot) = line.strip_prefix(":load") {
            return slot.trim().parse().ok().map(|slot| InputEvent::LoadRequest { slot });
        }
        None
    }

    fn wait_continue(&mut self) -> Option<InputEvent> {
        loop {
            let Some(line) = self.read_line() else {
                return Some(InputEvent::Exit);
            };
            if line.is_empty() {
                return Some(InputEvent::Continue);
            }
            if let Some(ev) = Self::command(&line) {
                return Some(ev);
            }
        }
    }

    fn wait_choice(&mut self, count: usize) -> Option<InputEvent> {
        loop {
            let Some(line) = self.read_line() else {
                return Some(InputEvent::Exit);
            };
            if let Ok(n) = line.trim().parse::<usize>() {
                if (1..=count).contains(&n) {
                    return Some(InputEvent::ChoiceMade { index: n - 1 });
                }
            }
            if let Some(ev) = Self::command(&line) {
                return Some(ev);
            }
        }
    }
}

impl<I: BufRead, O: Write> Renderer for TerminalRenderer<I, O> {
    fn render(&mut self, out: &OutputEvent) -> Option<InputEvent> {
        match out {
            OutputEvent::ShowMessage { text } => {
                self.print(format_args!("{}", text));
                self.wait_continue()
            }
            OutputEvent::ShowDialogue { name, content, .. } => {
                self.print(format_args!("{}「{}」", name, content));
                self.wait_continue()
            }
            OutputEvent::ShowChoice { options } => {
                for (i, o) in options.iter().enumerate() {
                    self.print(format_args!("  [{}] {}", i + 1, o));
                }
                self.wait_choice(options.len())
            }
            OutputEvent::Command { kind, params, .. } => {
                log::debug!("[{}] {}", kind, params.join(" "));
                None
            }
            OutputEvent::ReturnToGui { name } => {
                log::info!("Back to menu {}", name);
                None
            }
            OutputEvent::ScriptLoaded { name } => {
                log::info!("Scenario {}", name);
                None
            }
            OutputEvent::StepDone => self.wait_continue(),
            OutputEvent::End => {
                self.print(format_args!("[End]"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(input: &str) -> TerminalRenderer<&[u8], Vec<u8>> {
        TerminalRenderer::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn message_waits_for_enter() {
        let mut r = renderer("\n");
        let ev = r.render(&OutputEvent::ShowMessage { text: "hello".into() });
        assert_eq!(ev, Some(InputEvent::Continue));
        let out = String::from_utf8(r.into_output()).unwrap();
        assert!(out.starts_with("hello\n"));
    }

    #[test]
    fn choice_skips_invalid_numbers() {
        let mut r = renderer("0\n9\n2\n");
        let ev = r.render(&OutputEvent::ShowChoice { options: vec!["a".into(), "b".into()] });
        assert_eq!(ev, Some(InputEvent::ChoiceMade { index: 1 }));
    }

    #[test]
    fn commands_and_eof() {
        let mut r = renderer(":save 3\n");
        let ev = r.render(&OutputEvent::ShowMessage { text: String::new() });
        assert_eq!(ev, Some(InputEvent::SaveRequest { slot: 3 }));
        let ev = r.render(&OutputEvent::ShowMessage { text: String::new() });
        assert_eq!(ev, Some(InputEvent::Exit));
    }
}
