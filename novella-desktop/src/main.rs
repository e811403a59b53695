mod config_gen;
mod setup;

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use novella_core::config::SystemConfig;
use novella_core::renderer::driver::{Driver, ExecutorHandle};
use novella_core::renderer::terminal::TerminalRenderer;
use novella_core::{Ctx, ScriptManager};

const CONFIG_PATH: &str = "config.toml";
const GLOBAL_SAVE: &str = "global.json";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let check_only = args.iter().any(|a| a == "--check");

    setup::init(CONFIG_PATH);
    log::info!(">>> Novella Player Started (check: {}) <<<", check_only);

    let result = if check_only { check() } else { play() };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Compiles every scenario file and lists the init script's commands.
fn check() -> anyhow::Result<()> {
    let sys_cfg: SystemConfig = novella_shared::config::get("system");
    let manager = ScriptManager::from_config();

    let total = manager.check_all()?;
    println!("{} commands in {:?}", total, sys_cfg.script_path);

    let program = manager
        .load(&sys_cfg.init_script)
        .with_context(|| format!("Failed to compile {}", sys_cfg.init_script))?;
    for (i, command) in program.iter().enumerate().filter(|(_, c)| !c.is_null()) {
        println!("{:>5} {:<12} {}:{} {}", i, command.kind, command.file, command.line, command.text);
    }
    Ok(())
}

fn play() -> anyhow::Result<()> {
    let sys_cfg: SystemConfig = novella_shared::config::get("system");
    let manager = Arc::new(ScriptManager::from_config());

    if !manager.exists(&sys_cfg.init_script) {
        anyhow::bail!(
            "Script '{}' not found in '{}'. Please check config.toml.",
            sys_cfg.init_script,
            sys_cfg.script_path
        );
    }

    let mut ctx = Ctx::with_locale(&sys_cfg.locale);
    novella_core::storager::load_global(GLOBAL_SAVE, &mut ctx)?;

    let handle = ExecutorHandle::new(&mut ctx, manager, &sys_cfg.init_script)?;
    let mut driver = Driver::new(handle, TerminalRenderer::stdio());
    let outcome = driver.run(&mut ctx);

    novella_core::storager::save_global(GLOBAL_SAVE, &ctx)?;
    outcome?;
    Ok(())
}
