use std::sync::Arc;

use novella_core::event::{InputEvent, OutputEvent};
use novella_core::renderer::driver::{Driver, ExecutorHandle};
use novella_core::renderer::Renderer;
use novella_core::{Ctx, ExecError, Executor, ScriptManager};
use novella_script::{CompileOptions, ErrorKind, MemorySource};

fn manager(files: &[(&str, &str)]) -> Arc<ScriptManager> {
    let source = files.iter().fold(MemorySource::new(), |s, (name, text)| s.with(*name, *text));
    Arc::new(ScriptManager::with_source(source, CompileOptions::default()))
}

fn start_in(files: &[(&str, &str)], mut ctx: Ctx) -> (Executor, Ctx) {
    let mut exe = Executor::new(manager(files));
    exe.start(&mut ctx, files[0].0).unwrap_or_else(|e| panic!("start failed: {e}"));
    (exe, ctx)
}

fn start(text: &str) -> (Executor, Ctx) {
    start_in(&[("main.txt", text)], Ctx::default())
}

/// Steps until the executor blocks or ends, returning what it emitted.
fn run(exe: &mut Executor, ctx: &mut Ctx) -> Vec<OutputEvent> {
    for _ in 0..1000 {
        if exe.is_finished() || exe.step(ctx).unwrap_or_else(|e| panic!("step failed: {e}")) {
            return ctx.drain();
        }
        if exe.is_waiting() {
            return ctx.drain();
        }
    }
    panic!("script did not block or end");
}

fn shown(events: &[OutputEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|ev| match ev {
            OutputEvent::ShowMessage { text } => Some(text.clone()),
            OutputEvent::ShowDialogue { name, content, .. } => Some(format!("{name}: {content}")),
            _ => None,
        })
        .collect()
}

/// Continues past every message until the script ends.
fn play(exe: &mut Executor, ctx: &mut Ctx) -> Vec<String> {
    let mut lines = Vec::new();
    for _ in 0..100 {
        lines.extend(shown(&run(exe, ctx)));
        if exe.is_finished() {
            return lines;
        }
        exe.feed(ctx, InputEvent::Continue).unwrap();
    }
    panic!("script did not end");
}

#[test]
fn test_missing_label_does_not_move_cursor() {
    let (mut exe, _) = start("a\nb\nc");
    let cursor = exe.cursor_mut().unwrap();
    cursor.move_to_next_command().unwrap();
    assert_eq!(cursor.move_to_label("start"), Err(ExecError::LabelNotFound("start".into())));
    assert_eq!(cursor.index(), 1);
}

#[test]
fn test_messages_wait_for_input() {
    let (mut exe, mut ctx) = start("one\n*Alice*alice01.ogg*two");
    let events = run(&mut exe, &mut ctx);
    assert_eq!(events[0], OutputEvent::ScriptLoaded { name: "main.txt".into() });
    assert_eq!(shown(&events), vec!["one"]);
    assert!(exe.is_waiting());
    assert_eq!(run(&mut exe, &mut ctx), vec![]);

    exe.feed(&mut ctx, InputEvent::Continue).unwrap();
    let events = run(&mut exe, &mut ctx);
    assert_eq!(
        events,
        vec![OutputEvent::ShowDialogue {
            name: "Alice".into(),
            voice: Some("alice01.ogg".into()),
            content: "two".into(),
        }]
    );

    exe.feed(&mut ctx, InputEvent::Continue).unwrap();
    assert!(exe.is_finished());
    assert_eq!(ctx.drain(), vec![OutputEvent::End]);
    assert_eq!(ctx.dialogue_history.len(), 2);
    assert_eq!(ctx.dialogue_history[1].speaker.as_deref(), Some("Alice"));
}

#[test]
fn test_gosub_returns_after_the_call() {
    let (mut exe, mut ctx) =
        start("&sub 1 2\nafter\n@goto end\n:sub\ninside\n@return\n:end\nlast");
    assert_eq!(play(&mut exe, &mut ctx), vec!["inside", "after", "last"]);
    assert_eq!(ctx.call_args, vec!["1", "2"]);
}

#[test]
fn test_return_without_caller() {
    let (mut exe, mut ctx) = start("@return\nhello");
    assert_eq!(play(&mut exe, &mut ctx), vec!["hello"]);

    let (mut exe, mut ctx) = start("a\n@return");
    run(&mut exe, &mut ctx);
    exe.feed(&mut ctx, InputEvent::Continue).unwrap();
    assert_eq!(exe.step(&mut ctx), Err(ExecError::NoReturnPoint));
}

#[test]
fn test_menu_call_uses_the_deep_register() {
    let (mut exe, mut ctx) = start(
        "&sub\nmain\n@goto end\n:sub\nin sub\n@return\n:menu\nmenu text\n@return\n:end",
    );
    assert_eq!(shown(&run(&mut exe, &mut ctx)), vec!["in sub"]);

    exe.gosub_from_menu("menu", Some("config.txt")).unwrap();
    assert_eq!(shown(&run(&mut exe, &mut ctx)), vec!["menu text"]);

    exe.feed(&mut ctx, InputEvent::Continue).unwrap();
    let events = run(&mut exe, &mut ctx);
    assert!(events.contains(&OutputEvent::ReturnToGui { name: "config.txt".into() }));
    assert_eq!(shown(&events), Vec::<String>::new());
    assert!(exe.is_waiting());
    assert_eq!(exe.registers().get_return_point(), Some(0));

    // the menu closes and the same @return now resumes the caller
    exe.feed(&mut ctx, InputEvent::Continue).unwrap();
    let events = run(&mut exe, &mut ctx);
    assert!(!events.iter().any(|ev| matches!(ev, OutputEvent::ReturnToGui { .. })));
    assert_eq!(shown(&events), vec!["in sub"]);
    assert!(exe.registers_mut().is_return_from_sysmenu_gosub());
    assert!(!exe.registers_mut().is_return_from_sysmenu_gosub());

    exe.feed(&mut ctx, InputEvent::Continue).unwrap();
    assert_eq!(play(&mut exe, &mut ctx), vec!["main"]);
}

#[test]
fn test_structured_if_else_runs_one_branch() {
    for (value, expected) in [(1, "one"), (2, "two"), (3, "other")] {
        let script = format!(
            "@set $1 = {value}\n\
             <<<\n\
             if $1 == 1 {{\n\
             \x20 one\n\
             }}-\n\
             else if $1 == 2 {{\n\
             \x20 two\n\
             }}-\n\
             else {{\n\
             \x20 other\n\
             }}\n\
             >>>\n\
             done"
        );
        let (mut exe, mut ctx) = start(&script);
        assert_eq!(play(&mut exe, &mut ctx), vec![expected, "done"], "with $1 = {value}");
    }
}

#[test]
fn test_plain_if_falls_through_to_finally() {
    let (mut exe, mut ctx) = start("<<<\nif $1 == 1 {\n  inside\n}\n>>>\nafter");
    assert_eq!(play(&mut exe, &mut ctx), vec!["after"]);
}

#[test]
fn test_structured_switch_follows_the_choice() {
    let (mut exe, mut ctx) = start(
        "<<<\n\
         switch \"Left\" \"Right\" {\n\
         case left\n\
         \x20 went left\n\
         break\n\
         case right\n\
         \x20 went right\n\
         break\n\
         }\n\
         >>>\n\
         end",
    );
    let events = run(&mut exe, &mut ctx);
    assert!(events.contains(&OutputEvent::ShowChoice { options: vec!["Left".into(), "Right".into()] }));

    exe.feed(&mut ctx, InputEvent::ChoiceMade { index: 5 }).unwrap();
    assert!(exe.is_waiting());
    exe.feed(&mut ctx, InputEvent::ChoiceMade { index: 1 }).unwrap();
    assert_eq!(play(&mut exe, &mut ctx), vec!["went right", "end"]);
}

const GATED_MENU: &str = "@mchoose a $1 \"Open door\" b $2 \"Pick lock\" c $3 Leave\n\
                          fell through\n\
                          @goto end\n\
                          :a\nopened\n@goto end\n\
                          :b\npicked\n@goto end\n\
                          :c\nleft\n\
                          :end";

#[test]
fn test_gated_menu_hides_unset_options() {
    let (mut exe, mut ctx) = start(GATED_MENU);
    ctx.set_var(1, 1);
    ctx.set_var(3, 2);
    let events = run(&mut exe, &mut ctx);
    assert!(events.contains(&OutputEvent::ShowChoice { options: vec!["Open door".into(), "Leave".into()] }));
    assert!(exe.is_waiting());

    // indices count visible options only
    exe.feed(&mut ctx, InputEvent::ChoiceMade { index: 1 }).unwrap();
    assert_eq!(play(&mut exe, &mut ctx), vec!["left"]);
}

#[test]
fn test_gated_menu_with_every_option_hidden_is_skipped() {
    let (mut exe, mut ctx) = start(GATED_MENU);
    let events = run(&mut exe, &mut ctx);
    assert!(!events.iter().any(|ev| matches!(ev, OutputEvent::ShowChoice { .. })));
    assert_eq!(shown(&events), vec!["fell through"]);
}

#[test]
fn test_gated_menu_errors() {
    let (mut exe, mut ctx) = start("@michoose a %a A");
    assert_eq!(exe.step(&mut ctx), Err(ExecError::BadVariable("%a".into())));

    let (mut exe, mut ctx) = start("@set $1 = 1\n@michoose a $1 A b $1\n:a\n:b");
    exe.step(&mut ctx).unwrap();
    assert_eq!(exe.step(&mut ctx), Err(ExecError::MissingChoiceText("b".into())));
}

#[test]
fn test_locale_filter_is_applied_at_run_time() {
    let files = [("main.txt", "+en+Hello\n+ja+こんにちは\nBoth")];
    let (mut exe, mut ctx) = start_in(&files, Ctx::with_locale("ja"));
    assert_eq!(play(&mut exe, &mut ctx), vec!["こんにちは", "Both"]);

    let (mut exe, mut ctx) = start_in(&files, Ctx::default());
    assert_eq!(play(&mut exe, &mut ctx), vec!["Hello", "Both"]);
}

#[test]
fn test_set_and_if() {
    let (mut exe, mut ctx) = start("@set $1 = 5\n@set $1 *= 2\n@if $1 > 9 big\nsmall\n:big\nbig");
    assert_eq!(play(&mut exe, &mut ctx), vec!["big"]);
    assert_eq!(ctx.var(1), 10);

    let (mut exe, mut ctx) = start("@set $1 /= 0");
    assert_eq!(exe.step(&mut ctx), Err(ExecError::DivisionByZero));
}

#[test]
fn test_load_switches_scripts() {
    let files = [
        ("main.txt", "first\n@load file=second.txt label=start"),
        ("second.txt", "skipped\n:start\nsecond"),
    ];
    let (mut exe, mut ctx) = start_in(&files, Ctx::default());
    assert_eq!(play(&mut exe, &mut ctx), vec!["first", "second"]);
    assert_eq!(exe.cursor().unwrap().script_name(), "second.txt");
}

#[test]
fn test_other_commands_are_forwarded() {
    let (mut exe, mut ctx) = start("@bg sky.png 1.0\n@click\nafter");
    let events = run(&mut exe, &mut ctx);
    let forwarded: Vec<_> = events
        .iter()
        .filter_map(|ev| match ev {
            OutputEvent::Command { kind, params, .. } => Some((kind.as_str(), params.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(forwarded[0], ("bg", vec!["sky.png".to_string(), "1.0".to_string()]));
    assert_eq!(forwarded[1].0, "click");
    assert!(exe.is_waiting());
}

#[test]
fn test_snapshot_and_restore() {
    let (mut exe, mut ctx) = start("&sub\nafter\n@goto end\n:sub\nin sub\n@return\n:end");
    run(&mut exe, &mut ctx);
    let snap = exe.snapshot().unwrap();
    assert_eq!((snap.script.as_str(), snap.index, snap.return_point), ("main.txt", 4, Some(0)));

    let mut restored = Executor::new(manager(&[("main.txt", "&sub\nafter\n@goto end\n:sub\nin sub\n@return\n:end")]));
    restored.restore(&mut ctx, snap).unwrap();
    assert_eq!(restored.cursor().unwrap().index(), 4);
    ctx.drain();
    assert_eq!(play(&mut restored, &mut ctx), vec!["in sub", "after"]);
}

#[test]
fn test_errors_surface() {
    let mut exe = Executor::new(manager(&[("bad.txt", "@nothing")]));
    let mut ctx = Ctx::default();
    assert_eq!(exe.step(&mut ctx), Err(ExecError::NoScript));
    match exe.start(&mut ctx, "bad.txt") {
        Err(ExecError::Compile(e)) => {
            assert_eq!(e.kind, ErrorKind::UnknownInstruction("@nothing".into()))
        }
        other => panic!("expected a compile error, got {other:?}"),
    }

    let (mut exe, mut ctx) = start("@goto nowhere");
    assert_eq!(exe.step(&mut ctx), Err(ExecError::LabelNotFound("nowhere".into())));
}

struct ScriptedRenderer {
    seen: Vec<String>,
}

impl Renderer for ScriptedRenderer {
    fn render(&mut self, out: &OutputEvent) -> Option<InputEvent> {
        match out {
            OutputEvent::ShowMessage { text } => {
                self.seen.push(text.clone());
                Some(InputEvent::Continue)
            }
            OutputEvent::ShowChoice { .. } => Some(InputEvent::ChoiceMade { index: 0 }),
            _ => None,
        }
    }
}

#[test]
fn test_driver_runs_to_the_end() {
    let mut ctx = Ctx::default();
    let files = manager(&[("main.txt", "hello\n@choose a A b B\n:a\nchose a\n@goto end\n:b\nchose b\n:end\nbye")]);
    let handle = ExecutorHandle::new(&mut ctx, files, "main.txt").unwrap();
    let mut driver = Driver::new(handle, ScriptedRenderer { seen: Vec::new() });
    driver.run(&mut ctx).unwrap();
    assert_eq!(driver.renderer().seen, vec!["hello", "chose a", "bye"]);
    assert!(driver.handle().executor().is_finished());
}
