use novella_script::{
    slot, CommandKind, CompileError, CompileOptions, ErrorKind, MemorySource, Program,
};

fn compile(input: &str) -> Result<Program, CompileError> {
    Program::from_text("main.txt", input, &CompileOptions::default())
}

fn compile_ok(input: &str) -> Program {
    compile(input).unwrap_or_else(|e| panic!("compile failed: {e}"))
}

fn error_kind(input: &str) -> ErrorKind {
    match compile(input) {
        Ok(p) => panic!("expected an error, got {} commands", p.len()),
        Err(e) => e.kind,
    }
}

#[test]
fn test_load_with_named_params() {
    let p = compile_ok("@load file=chapter2.txt label=start");
    assert_eq!(p.len(), 1);
    let c = p.get(0).unwrap();
    assert_eq!(c.kind, CommandKind::Load);
    assert_eq!(c.param(0), "chapter2.txt");
    assert_eq!(c.param(1), "start");
}

#[test]
fn test_positional_params() {
    let p = compile_ok("@bg sky.png 1.5 fade");
    let c = p.get(0).unwrap();
    assert_eq!(c.param(slot::bg::FILE), "sky.png");
    assert_eq!(c.param(slot::bg::SPAN), "1.5");
    assert_eq!(c.param(slot::bg::METHOD), "fade");
    assert_eq!(c.param(slot::bg::X), "");
}

#[test]
fn test_localized_keyword_and_names() {
    let p = compile_ok("@背景 ファイル=sky.png 秒=2");
    let c = p.get(0).unwrap();
    assert_eq!(c.kind, CommandKind::Bg);
    assert_eq!(c.keyword.as_deref(), Some("@背景"));
    assert_eq!(c.param(slot::bg::FILE), "sky.png");
    assert_eq!(c.param(slot::bg::SPAN), "2");
}

#[test]
fn test_quoted_file_name() {
    let p = compile_ok(r#"@se file="a b.ogg""#);
    assert_eq!(p.get(0).unwrap().param(slot::se::FILE), "a b.ogg");
}

#[test]
fn test_ordering_is_enforced_for_strict_kinds() {
    assert_eq!(
        error_kind("@bg duration=1 file=sky.png"),
        ErrorKind::ParameterOrder("duration".into())
    );
}

#[test]
fn test_reorderable_kind_accepts_any_order() {
    let p = compile_ok("@chsx t=1.0 bg=sky.png c=alice.png");
    let c = p.get(0).unwrap();
    assert_eq!(c.kind, CommandKind::Chsx);
    assert_eq!(c.param(slot::chsx::SPAN), "1.0");
    assert_eq!(c.param(slot::chsx::BG), "sky.png");
    assert_eq!(c.param(slot::chsx::C), "alice.png");
}

#[test]
fn test_reorderable_kind_requires_names() {
    assert_eq!(error_kind("@chsx sky.png"), ErrorKind::ParameterNameRequired);
    assert_eq!(error_kind("@cl.show sky.png"), ErrorKind::ParameterNameRequired);
}

#[test]
fn test_ciel_prefix() {
    let p = compile_ok("@cl.move name=alice x+=40 t=0.5");
    let c = p.get(0).unwrap();
    assert_eq!(c.kind, CommandKind::Ciel);
    assert_eq!(c.keyword.as_deref(), Some("@cl.move"));
    assert_eq!(c.param(slot::ciel::NAME), "alice");
    assert_eq!(c.param(slot::ciel::XPLUS), "40");
    assert_eq!(c.param(slot::ciel::TIME), "0.5");
}

#[test]
fn test_unknown_names() {
    assert_eq!(error_kind("@nothing"), ErrorKind::UnknownInstruction("@nothing".into()));
    assert!(matches!(
        error_kind("@bg colour=red"),
        ErrorKind::UnknownParameter { name, .. } if name == "colour"
    ));
}

#[test]
fn test_arity() {
    assert_eq!(error_kind("@bg"), ErrorKind::TooFewParameters { min: 1, got: 0 });
    assert_eq!(error_kind("@goto a b"), ErrorKind::TooManyParameters { max: 1, got: 2 });
    compile_ok("@return");
}

#[test]
fn test_raw_kinds_keep_equals() {
    let p = compile_ok("@set $1 += 2\n@if $1 == 3 DONE");
    let set = p.get(0).unwrap();
    assert_eq!(set.kind, CommandKind::Set);
    assert_eq!(set.param(slot::set::OP), "+=");
    let cond = p.get(1).unwrap();
    assert_eq!(cond.param(slot::cond::OP), "==");
    assert_eq!(cond.param(slot::cond::LABEL), "DONE");
}

#[test]
fn test_serif_with_and_without_voice() {
    let p = compile_ok("*Alice*Hello\n*Bob*bob001.ogg*Hi there");
    let a = p.get(0).unwrap();
    assert_eq!(a.kind, CommandKind::Serif);
    assert_eq!(a.param(slot::serif::NAME), "Alice");
    assert_eq!(a.params.get_opt(slot::serif::VOICE), None);
    assert_eq!(a.param(slot::serif::MESSAGE), "Hello");
    let b = p.get(1).unwrap();
    assert_eq!(b.param(slot::serif::VOICE), "bob001.ogg");
    assert_eq!(b.param(slot::serif::MESSAGE), "Hi there");

    assert_eq!(error_kind("*Alice"), ErrorKind::EmptyDialogue);
}

#[test]
fn test_bracketed_message_becomes_serif() {
    let p = compile_ok("Alice「Hello there」");
    assert_eq!(p.len(), 1);
    let c = p.get(0).unwrap();
    assert_eq!(c.kind, CommandKind::Serif);
    assert_eq!(c.param(slot::serif::NAME), "Alice");
    assert_eq!(c.param(slot::serif::MESSAGE), "Hello there");
    assert_eq!(c.params.get_opt(slot::serif::VOICE), None);
}

#[test]
fn test_no_serif_in_page_mode_or_continuation() {
    let options = CompileOptions { page_mode: true, ..Default::default() };
    let p = Program::from_text("main.txt", "Alice「Hello」", &options).unwrap();
    assert_eq!(p.get(0).unwrap().kind, CommandKind::Message);

    let p = compile_ok("\\Alice「Hello」");
    assert_eq!(p.get(0).unwrap().kind, CommandKind::Message);
}

#[test]
fn test_label_and_call() {
    let p = compile_ok(":start\n&sub 1 \"two words\"");
    let label = p.get(0).unwrap();
    assert_eq!(label.kind, CommandKind::Label);
    assert_eq!(label.label_name(), Some("start"));
    let call = p.get(1).unwrap();
    assert_eq!(call.kind, CommandKind::Gosub);
    assert_eq!(call.param(slot::gosub::LABEL), "sub");
    assert_eq!(call.param(slot::gosub::ARGS), "1");
    assert_eq!(call.param(slot::gosub::ARGS + 1), "two words");
}

#[test]
fn test_label_name_is_taken_verbatim() {
    let p = compile_ok(":\n: spaced out \nafter");
    assert_eq!(p.get(0).unwrap().kind, CommandKind::Label);
    assert_eq!(p.get(0).unwrap().label_name(), Some(""));
    assert_eq!(p.get(1).unwrap().label_name(), Some(" spaced out "));
    assert_eq!(p.find_label(""), Some(0));
}

#[test]
fn test_comments_consume_no_expanded_line() {
    let p = compile_ok("# header\n\nfirst\n# note\nsecond");
    assert_eq!(p.len(), 2);
    let first = p.get(0).unwrap();
    let second = p.get(1).unwrap();
    assert_eq!((first.line, first.expanded_line), (3, 0));
    assert_eq!((second.line, second.expanded_line), (5, 1));
}

#[test]
fn test_locale_filter_is_recorded() {
    let p = compile_ok("+en+Hello\n+ja+こんにちは\nBoth");
    let locales: Vec<_> = p.iter().map(|c| c.locale.as_deref()).collect();
    assert_eq!(locales, vec![Some("en"), Some("ja"), None]);
    assert_eq!(p.get(0).unwrap().param(slot::message::TEXT), "Hello");
    assert_eq!(p.get(0).unwrap().text, "+en+Hello");
}

#[test]
fn test_include_is_inlined() {
    let source = MemorySource::new()
        .with("main.txt", "before\nusing common.txt\nafter")
        .with("common.txt", ":shared\nshared text");
    let p = Program::compile(&source, "main.txt", &CompileOptions::default()).unwrap();
    assert_eq!(p.len(), 4);
    assert_eq!(p.files().len(), 2);

    let shared = p.get(1).unwrap();
    assert_eq!(&*shared.file, "common.txt");
    assert_eq!(shared.line, 1);
    assert_eq!(shared.expanded_line, 1);

    let after = p.get(3).unwrap();
    assert_eq!(&*after.file, "main.txt");
    assert_eq!(after.line, 3);
    assert_eq!(after.expanded_line, 3);
}

#[test]
fn test_nested_include_is_rejected() {
    let source = MemorySource::new()
        .with("main.txt", "using a.txt")
        .with("a.txt", "using b.txt")
        .with("b.txt", "text");
    let err = Program::compile(&source, "main.txt", &CompileOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NestedInclude("b.txt".into()));
    assert_eq!(&*err.file, "a.txt");
    assert_eq!(err.line, 1);
}

#[test]
fn test_missing_include_reports_the_directive() {
    let source = MemorySource::new().with("main.txt", "line\nusing gone.txt");
    let err = Program::compile(&source, "main.txt", &CompileOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io { ref file, .. } if file == "gone.txt"));
    assert_eq!(err.line, 2);
}

#[test]
fn test_repeated_includes_count_against_the_file_limit() {
    use novella_script::store::MAX_FILES;

    let includes = |n: usize| "using common.txt\n".repeat(n);
    let within = MemorySource::new()
        .with("main.txt", includes(MAX_FILES - 1))
        .with("common.txt", "shared");
    let p = Program::compile(&within, "main.txt", &CompileOptions::default()).unwrap();
    assert_eq!(p.len(), MAX_FILES - 1);
    assert_eq!(p.files().len(), 2);

    let over = MemorySource::new()
        .with("main.txt", includes(MAX_FILES))
        .with("common.txt", "shared");
    let err = Program::compile(&over, "main.txt", &CompileOptions::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TooManyFiles);
    assert_eq!(&*err.file, "main.txt");
    assert_eq!(err.line, MAX_FILES);
}

#[test]
fn test_empty_script_fails() {
    assert_eq!(error_kind("# only a comment\n"), ErrorKind::NoCommand("main.txt".into()));
}

#[test]
fn test_capacity_is_enforced() {
    let options = CompileOptions { capacity: 2, ..Default::default() };
    let err = Program::from_text("main.txt", "a\nb\nc", &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreFull(2));
    assert_eq!(err.line, 3);
}

#[test]
fn test_error_carries_location() {
    let err = compile("fine\n@bg\n").unwrap_err();
    assert_eq!(&*err.file, "main.txt");
    assert_eq!(err.line, 2);
    assert_eq!(err.text, "@bg");
    assert_eq!(err.to_string(), "main.txt:2: too few parameters: expected at least 1, got 0");
}

#[test]
fn test_find_label_first_match_wins() {
    let p = compile_ok(":dup\nfirst\n:dup\nsecond");
    assert_eq!(p.find_label("dup"), Some(0));
    assert_eq!(p.find_label("missing"), None);
}
