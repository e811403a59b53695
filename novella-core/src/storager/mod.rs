pub mod types;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::config::SystemConfig;
use crate::runtime::{Ctx, LOCAL_VAR_COUNT};
use crate::storager::types::{GlobalSave, SaveFile};
use crate::{Executor, ScriptManager};

fn get_save_path(filename: &str) -> PathBuf {
    let cfg: SystemConfig = novella_shared::config::get("system");
    save_path_in(&cfg.save_path, filename)
}

fn save_path_in(dir: impl AsRef<Path>, filename: &str) -> PathBuf {
    let dir = dir.as_ref();
    if !dir.exists() {
        let _ = fs::create_dir_all(dir);
    }
    dir.join(filename)
}

pub fn slot_file(slot: u32) -> String {
    format!("save{}.json", slot)
}

pub fn save(filename: &str, ctx: &Ctx, exe: &Executor) -> anyhow::Result<()> {
    save_to(&get_save_path(filename), ctx, exe)
}

pub fn load(filename: &str, manager: Arc<ScriptManager>) -> anyhow::Result<(Ctx, Executor)> {
    load_from(&get_save_path(filename), manager)
}

pub fn save_to(path: &Path, ctx: &Ctx, exe: &Executor) -> anyhow::Result<()> {
    let cursor = exe.snapshot().context("Nothing to save: no script is running")?;
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    let save = SaveFile { ctx: ctx.clone(), cursor };
    serde_json::to_writer_pretty(&mut writer, &save)?;
    writer.flush()?;
    Ok(())
}

pub fn load_from(path: &Path, manager: Arc<ScriptManager>) -> anyhow::Result<(Ctx, Executor)> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let save: SaveFile = serde_json::from_reader(BufReader::new(file))?;
    let mut ctx = save.ctx;
    let mut exe = Executor::new(manager);
    exe.restore(&mut ctx, save.cursor)?;
    Ok((ctx, exe))
}

/// Writes the global variables (`$10000` and up).
pub fn save_global(filename: &str, ctx: &Ctx) -> anyhow::Result<()> {
    save_global_to(&get_save_path(filename), ctx)
}

/// Merges saved global variables into `ctx`. A missing file is not an error.
pub fn load_global(filename: &str, ctx: &mut Ctx) -> anyhow::Result<()> {
    load_global_from(&get_save_path(filename), ctx)
}

pub fn save_global_to(path: &Path, ctx: &Ctx) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);

    let save = GlobalSave {
        vars: ctx
            .vars
            .iter()
            .filter(|(index, _)| **index >= LOCAL_VAR_COUNT)
            .map(|(index, value)| (*index, *value))
            .collect(),
    };

    serde_json::to_writer_pretty(&mut writer, &save)?;
    writer.flush()?;

    Ok(())
}

pub fn load_global_from(path: &Path, ctx: &mut Ctx) -> anyhow::Result<()> {
    if !path.exists() {
        log::debug!("No global save at {:?}", path);
        return Ok(());
    }

    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let save: GlobalSave = serde_json::from_reader(BufReader::new(file))?;
    for (index, value) in save.vars {
        if index >= LOCAL_VAR_COUNT {
            ctx.set_var(index, value);
        }
    }
    Ok(())
}
