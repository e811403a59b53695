//! The compiled form of a scenario script.
//!
//! A script compiles to a flat sequence of [`Command`]s. Every command keeps the
//! file and line it came from, the raw text of that line, and a bounded list of
//! string parameter slots whose meaning depends on the [`CommandKind`]. Slot
//! numbers for each kind live in [`slot`].

use std::fmt;
use std::sync::Arc;

/// Number of parameter slots a command can hold.
pub const PARAM_SIZE: usize = 136;

/// What a command does when the executor reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Placeholder left behind by a rewritten line. Does nothing.
    Null,
    /// A plain line of narration.
    Message,
    /// A line of dialogue with a speaker and an optional voice file.
    Serif,
    /// A jump target.
    Label,
    Bg,
    Bgm,
    Ch,
    Click,
    Wait,
    /// Unconditional jump.
    Goto,
    /// A label that, when run sequentially, jumps to another label.
    LabeledGoto,
    /// Switches to another scenario file.
    Load,
    Vol,
    /// Variable assignment.
    Set,
    /// Jump when a comparison holds.
    If,
    /// Jump when a comparison does not hold, with a fallback target.
    Unless,
    Se,
    Cha,
    Shake,
    Chsx,
    Video,
    /// Choice menu, label/text pairs.
    Choose,
    IChoose,
    MChoose,
    MIChoose,
    Chapter,
    Gui,
    Wms,
    Skip,
    SetSave,
    Anime,
    Layer,
    /// Subroutine call. Produced by `@gosub` and by `&label` lines.
    Gosub,
    /// Return from a subroutine.
    Return,
    SetConfig,
    Pencil,
    /// Any `@cl.` instruction.
    Ciel,
    News,
    Switch,
    Chs,
}

impl CommandKind {
    /// True for kinds that [`crate::Program::find_label`] can land on.
    pub fn is_label(self) -> bool {
        matches!(self, CommandKind::Label | CommandKind::LabeledGoto)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Null => "null",
            CommandKind::Message => "message",
            CommandKind::Serif => "serif",
            CommandKind::Label => "label",
            CommandKind::Bg => "bg",
            CommandKind::Bgm => "bgm",
            CommandKind::Ch => "ch",
            CommandKind::Click => "click",
            CommandKind::Wait => "wait",
            CommandKind::Goto => "goto",
            CommandKind::LabeledGoto => "labeledgoto",
            CommandKind::Load => "load",
            CommandKind::Vol => "vol",
            CommandKind::Set => "set",
            CommandKind::If => "if",
            CommandKind::Unless => "unless",
            CommandKind::Se => "se",
            CommandKind::Cha => "cha",
            CommandKind::Shake => "shake",
            CommandKind::Chsx => "chsx",
            CommandKind::Video => "video",
            CommandKind::Choose => "choose",
            CommandKind::IChoose => "ichoose",
            CommandKind::MChoose => "mchoose",
            CommandKind::MIChoose => "michoose",
            CommandKind::Chapter => "chapter",
            CommandKind::Gui => "gui",
            CommandKind::Wms => "wms",
            CommandKind::Skip => "skip",
            CommandKind::SetSave => "setsave",
            CommandKind::Anime => "anime",
            CommandKind::Layer => "layer",
            CommandKind::Gosub => "gosub",
            CommandKind::Return => "return",
            CommandKind::SetConfig => "setconfig",
            CommandKind::Pencil => "pencil",
            CommandKind::Ciel => "ciel",
            CommandKind::News => "news",
            CommandKind::Switch => "switch",
            CommandKind::Chs => "chs",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded list of optional string slots.
///
/// Reading an unset slot yields `""`, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    slots: Vec<Option<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Params {
            slots: values
                .into_iter()
                .take(PARAM_SIZE)
                .map(|v| Some(v.into()))
                .collect(),
        }
    }

    pub fn get(&self, slot: usize) -> &str {
        self.get_opt(slot).unwrap_or("")
    }

    pub fn get_opt(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(|s| s.as_deref())
    }

    /// Stores `value` at `slot`. Returns `false` if the slot is out of range.
    pub fn set(&mut self, slot: usize, value: impl Into<String>) -> bool {
        if slot >= PARAM_SIZE {
            return false;
        }
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(value.into());
        true
    }

    /// Number of slots up to and including the last one ever written.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.slots.iter().map(|s| s.as_deref())
    }
}

/// One compiled line of script.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Interned name of the file this line came from.
    pub file: Arc<str>,
    /// 1-based line number inside `file`.
    pub line: usize,
    /// 0-based position after include expansion.
    pub expanded_line: usize,
    pub kind: CommandKind,
    /// The line exactly as written.
    pub text: String,
    /// Instruction keyword for `@` lines, as written.
    pub keyword: Option<String>,
    pub params: Params,
    /// Two-letter locale the command is restricted to.
    pub locale: Option<String>,
}

impl Command {
    pub fn param(&self, slot: usize) -> &str {
        self.params.get(slot)
    }

    /// Name this command answers to when searched for as a jump target.
    pub fn label_name(&self) -> Option<&str> {
        match self.kind {
            CommandKind::Label => self.params.get_opt(slot::label::NAME),
            CommandKind::LabeledGoto => self.params.get_opt(slot::labeled_goto::LABEL),
            _ => None,
        }
    }

    /// Turns the command into a no-op while keeping its position and origin.
    pub fn nullify(&mut self) {
        self.kind = CommandKind::Null;
        self.keyword = None;
        self.params.clear();
    }

    pub fn is_null(&self) -> bool {
        self.kind == CommandKind::Null
    }
}

/// Parameter slot numbers, grouped by command kind.
pub mod slot {
    pub mod message {
        pub const TEXT: usize = 0;
    }

    pub mod serif {
        pub const NAME: usize = 0;
        pub const VOICE: usize = 1;
        pub const MESSAGE: usize = 2;
    }

    pub mod label {
        pub const NAME: usize = 0;
    }

    pub mod labeled_goto {
        pub const LABEL: usize = 0;
        pub const TARGET: usize = 1;
    }

    pub mod goto {
        pub const LABEL: usize = 0;
    }

    pub mod gosub {
        pub const LABEL: usize = 0;
        /// First argument slot; arguments follow contiguously.
        pub const ARGS: usize = 1;
        pub const MAX_ARGS: usize = 9;
    }

    pub mod load {
        pub const FILE: usize = 0;
        pub const LABEL: usize = 1;
    }

    /// Shared by `@if` and `@unless`.
    pub mod cond {
        pub const LHS: usize = 0;
        pub const OP: usize = 1;
        pub const RHS: usize = 2;
        pub const LABEL: usize = 3;
        pub const FINALLY: usize = 4;
    }

    pub mod set {
        pub const LHS: usize = 0;
        pub const OP: usize = 1;
        pub const RHS: usize = 2;
    }

    /// `@choose` and `@ichoose` hold destination/text pairs.
    pub mod choose {
        pub const MAX_OPTIONS: usize = 10;

        pub const fn label(n: usize) -> usize {
            n * 2
        }

        pub const fn text(n: usize) -> usize {
            n * 2 + 1
        }
    }

    /// `@mchoose` and `@michoose` hold destination/variable/text triples.
    /// An option is offered only while its variable is non-zero.
    pub mod mchoose {
        pub const MAX_OPTIONS: usize = 10;

        pub const fn label(n: usize) -> usize {
            n * 3
        }

        pub const fn var(n: usize) -> usize {
            n * 3 + 1
        }

        pub const fn text(n: usize) -> usize {
            n * 3 + 2
        }
    }

    pub mod bg {
        pub const FILE: usize = 0;
        pub const SPAN: usize = 1;
        pub const METHOD: usize = 2;
        pub const X: usize = 3;
        pub const Y: usize = 4;
    }

    pub mod bgm {
        pub const FILE: usize = 0;
    }

    pub mod ch {
        pub const POS: usize = 0;
        pub const FILE: usize = 1;
        pub const SPAN: usize = 2;
        pub const METHOD: usize = 3;
        pub const OFFSET_X: usize = 4;
        pub const OFFSET_Y: usize = 5;
        pub const ALPHA: usize = 6;
    }

    pub mod wait {
        pub const SPAN: usize = 0;
    }

    pub mod vol {
        pub const STREAM: usize = 0;
        pub const VOL: usize = 1;
        pub const SPAN: usize = 2;
    }

    pub mod se {
        pub const FILE: usize = 0;
    }

    pub mod cha {
        pub const POS: usize = 0;
        pub const SPAN: usize = 1;
        pub const ACCEL: usize = 2;
        pub const OFFSET_X: usize = 3;
        pub const OFFSET_Y: usize = 4;
        pub const ALPHA: usize = 5;
    }

    pub mod shake {
        pub const MOVE: usize = 0;
        pub const SPAN: usize = 1;
        pub const TIMES: usize = 2;
        pub const AMOUNT: usize = 3;
    }

    pub mod chs {
        pub const CENTER: usize = 0;
        pub const RIGHT: usize = 1;
        pub const LEFT: usize = 2;
        pub const BACK: usize = 3;
        pub const SPAN: usize = 4;
        pub const BG: usize = 5;
        pub const METHOD: usize = 6;
    }

    pub mod video {
        pub const FILE: usize = 0;
    }

    pub mod chapter {
        pub const NAME: usize = 0;
    }

    pub mod gui {
        pub const FILE: usize = 0;
    }

    pub mod wms {
        pub const FILE: usize = 0;
    }

    pub mod anime {
        pub const FILE: usize = 0;
    }

    pub mod layer {
        pub const NAME: usize = 0;
        pub const FILE: usize = 1;
        pub const X: usize = 2;
        pub const Y: usize = 3;
        pub const A: usize = 4;
    }

    pub mod setconfig {
        pub const KEY: usize = 0;
        pub const VALUE: usize = 1;
    }

    /// `@all` / `@chsx`. Names are mandatory and may come in any order.
    pub mod chsx {
        pub const C: usize = 0;
        pub const CX: usize = 1;
        pub const CY: usize = 2;
        pub const CA: usize = 3;
        pub const CD: usize = 4;
        pub const R: usize = 5;
        pub const RX: usize = 6;
        pub const RY: usize = 7;
        pub const RA: usize = 8;
        pub const RD: usize = 9;
        pub const RC: usize = 10;
        pub const RCX: usize = 11;
        pub const RCY: usize = 12;
        pub const RCA: usize = 13;
        pub const RCD: usize = 14;
        pub const L: usize = 15;
        pub const LX: usize = 16;
        pub const LY: usize = 17;
        pub const LA: usize = 18;
        pub const LD: usize = 19;
        pub const LC: usize = 20;
        pub const LCX: usize = 21;
        pub const LCY: usize = 22;
        pub const LCA: usize = 23;
        pub const LCD: usize = 24;
        pub const B: usize = 25;
        pub const BX: usize = 26;
        pub const BY: usize = 27;
        pub const BA: usize = 28;
        pub const BD: usize = 29;
        pub const BG: usize = 30;
        pub const BGX: usize = 31;
        pub const BGY: usize = 32;
        pub const BGA: usize = 33;
        pub const METHOD: usize = 34;
        pub const SPAN: usize = 35;
    }

    /// `@cl.*`. Names are mandatory and may come in any order.
    pub mod ciel {
        pub const NAME: usize = 0;
        pub const FILE: usize = 1;
        pub const ALIGN: usize = 2;
        pub const VALIGN: usize = 3;
        pub const XEQUAL: usize = 4;
        pub const XPLUS: usize = 5;
        pub const XMINUS: usize = 6;
        pub const YEQUAL: usize = 7;
        pub const YPLUS: usize = 8;
        pub const YMINUS: usize = 9;
        pub const ALPHA: usize = 10;
        pub const TIME: usize = 11;
        pub const EFFECT: usize = 12;
        pub const DIM: usize = 13;
    }
}
