use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::runtime::Ctx;

/// Where execution stands, enough to resume it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub script: String,
    pub index: usize,
    pub return_point: Option<isize>,
}

#[derive(Serialize, Deserialize)]
pub struct SaveFile {
    pub ctx: Ctx,
    pub cursor: CursorSnapshot,
}

/// Variables that survive across playthroughs.
#[derive(Serialize, Deserialize, Default)]
pub struct GlobalSave {
    pub vars: BTreeMap<usize, i32>,
}
