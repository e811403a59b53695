use novella_script::{slot, Command, CommandKind};

use super::error::{ExecError, Result};
use super::eval;
use crate::event::OutputEvent;
use crate::runtime::{Ctx, DialogueRecord};

#[derive(Debug, Clone)]
pub struct StepEffect {
    pub events: Vec<OutputEvent>,
    pub next: NextAction,
}

/// What the executor does with the cursor after a command ran.
#[derive(Debug, Clone, PartialEq)]
pub enum NextAction {
    Continue,
    Jump(String),
    /// Jump to `label`, or to `finally` when there is no such label.
    JumpOr { label: String, finally: String },
    Call(String),
    Return,
    Load { file: String, label: Option<String> },
    /// Wait for a choice; holds one jump label per option.
    WaitChoice(Vec<String>),
    WaitInput,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn forward(cmd: &Command) -> OutputEvent {
    let params = cmd.params.iter().map(|p| p.unwrap_or_default().to_string()).collect();
    OutputEvent::Command { kind: cmd.kind, keyword: cmd.keyword.clone(), params }
}

pub fn walk_command(ctx: &mut Ctx, cmd: &Command) -> Result<StepEffect> {
    log::trace!("walk_command: {}:{} {}", cmd.file, cmd.line, cmd.kind);
    let mut events = Vec::new();
    let next = match cmd.kind {
        CommandKind::Null | CommandKind::Label => NextAction::Continue,
        CommandKind::Message => {
            let text = cmd.param(slot::message::TEXT).to_string();
            ctx.dialogue_history.push(DialogueRecord { speaker: None, text: text.clone(), voice_path: None });
            events.push(OutputEvent::ShowMessage { text });
            NextAction::WaitInput
        }
        CommandKind::Serif => {
            let name = cmd.param(slot::serif::NAME).to_string();
            let voice = non_empty(cmd.param(slot::serif::VOICE));
            let content = cmd.param(slot::serif::MESSAGE).to_string();
            ctx.dialogue_history.push(DialogueRecord {
                speaker: Some(name.clone()),
                text: content.clone(),
                voice_path: voice.clone(),
            });
            events.push(OutputEvent::ShowDialogue { name, voice, content });
            NextAction::WaitInput
        }
        CommandKind::Goto => NextAction::Jump(cmd.param(slot::goto::LABEL).to_string()),
        CommandKind::LabeledGoto => {
            NextAction::Jump(cmd.param(slot::labeled_goto::TARGET).to_string())
        }
        CommandKind::Gosub => {
            ctx.call_args = cmd
                .params
                .iter()
                .skip(slot::gosub::ARGS)
                .map_while(|p| p.map(str::to_string))
                .collect();
            NextAction::Call(cmd.param(slot::gosub::LABEL).to_string())
        }
        CommandKind::Return => NextAction::Return,
        CommandKind::Set => {
            eval::assign(ctx, cmd.param(slot::set::LHS), cmd.param(slot::set::OP), cmd.param(slot::set::RHS))?;
            NextAction::Continue
        }
        CommandKind::If | CommandKind::Unless => {
            let holds = eval::condition(
                ctx,
                cmd.param(slot::cond::LHS),
                cmd.param(slot::cond::OP),
                cmd.param(slot::cond::RHS),
            )?;
            let jump = if cmd.kind == CommandKind::If { holds } else { !holds };
            let label = cmd.param(slot::cond::LABEL).to_string();
            match (jump, cmd.param(slot::cond::FINALLY)) {
                (false, _) => NextAction::Continue,
                (true, "") => NextAction::Jump(label),
                (true, finally) => NextAction::JumpOr { label, finally: finally.to_string() },
            }
        }
        CommandKind::Choose | CommandKind::IChoose => {
            let mut labels = Vec::new();
            let mut options = Vec::new();
            for n in 0..slot::choose::MAX_OPTIONS {
                let label = cmd.param(slot::choose::label(n));
                if label.is_empty() {
                    break;
                }
                labels.push(label.to_string());
                options.push(cmd.param(slot::choose::text(n)).to_string());
            }
            events.push(OutputEvent::ShowChoice { options });
            NextAction::WaitChoice(labels)
        }
        CommandKind::MChoose | CommandKind::MIChoose => {
            let mut labels = Vec::new();
            let mut options = Vec::new();
            for n in 0..slot::mchoose::MAX_OPTIONS {
                let var = cmd.param(slot::mchoose::var(n));
                if var.is_empty() {
                    break;
                }
                if !eval::flag(ctx, var)? {
                    continue;
                }
                let label = cmd.param(slot::mchoose::label(n));
                if label.is_empty() {
                    break;
                }
                let text = cmd.param(slot::mchoose::text(n));
                if text.is_empty() {
                    return Err(ExecError::MissingChoiceText(label.to_string()));
                }
                labels.push(label.to_string());
                options.push(text.to_string());
            }
            if labels.is_empty() {
                log::debug!("{}:{}: every option is hidden, skipping the menu", cmd.file, cmd.line);
                NextAction::Continue
            } else {
                events.push(OutputEvent::ShowChoice { options });
                NextAction::WaitChoice(labels)
            }
        }
        CommandKind::Load => NextAction::Load {
            file: cmd.param(slot::load::FILE).to_string(),
            label: non_empty(cmd.param(slot::load::LABEL)),
        },
        CommandKind::Click | CommandKind::Wait => {
            events.push(forward(cmd));
            NextAction::WaitInput
        }
        _ => {
            events.push(forward(cmd));
            NextAction::Continue
        }
    };
    Ok(StepEffect { events, next })
}
