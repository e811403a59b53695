use std::collections::{BTreeMap, VecDeque};
use std::ops::RangeInclusive;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::event::OutputEvent;

/// `$0` up to this index belong to one playthrough.
pub const LOCAL_VAR_COUNT: usize = 10000;

/// Global variables follow the local ones and persist across playthroughs.
pub const GLOBAL_VAR_COUNT: usize = 1000;

/// Number of `$N` integer variables.
pub const VAR_COUNT: usize = LOCAL_VAR_COUNT + GLOBAL_VAR_COUNT;

/// Letters usable as `%x` name variables.
pub const NAME_VAR_RANGE: RangeInclusive<char> = 'a'..='z';

/// Everything a running scenario reads and writes besides the cursor.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Ctx {
    pub vars: FxHashMap<usize, i32>,
    pub name_vars: BTreeMap<char, String>,
    pub dialogue_history: Vec<DialogueRecord>,
    /// Arguments of the last subroutine call.
    pub call_args: Vec<String>,
    pub locale: String,
    #[serde(skip)]
    pub event_queue: VecDeque<OutputEvent>,
}

impl Default for Ctx {
    fn default() -> Self {
        Self {
            vars: FxHashMap::default(),
            name_vars: BTreeMap::new(),
            dialogue_history: Vec::new(),
            call_args: Vec::new(),
            locale: "en".into(),
            event_queue: VecDeque::new(),
        }
    }
}

impl Ctx {
    pub fn with_locale(locale: impl Into<String>) -> Self {
        Self { locale: locale.into(), ..Self::default() }
    }

    pub fn push(&mut self, event: OutputEvent) {
        self.event_queue.push_back(event);
    }
    pub fn pop(&mut self) -> Option<OutputEvent> {
        self.event_queue.pop_front()
    }
    pub fn drain(&mut self) -> Vec<OutputEvent> {
        self.event_queue.drain(..).collect()
    }

    /// Unset variables read as 0.
    pub fn var(&self, index: usize) -> i32 {
        self.vars.get(&index).copied().unwrap_or(0)
    }

    pub fn set_var(&mut self, index: usize, value: i32) {
        self.vars.insert(index, value);
    }

    pub fn name_var(&self, name: char) -> &str {
        self.name_vars.get(&name).map(String::as_str).unwrap_or("")
    }

    pub fn set_name_var(&mut self, name: char, value: impl Into<String>) {
        self.name_vars.insert(name, value.into());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub speaker: Option<String>,
    pub text: String,
    pub voice_path: Option<String>,
}
