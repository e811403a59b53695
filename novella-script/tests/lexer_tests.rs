use novella_script::lexer::{split_named, tokenize, unquote};

#[test]
fn whitespace_splits() {
    assert_eq!(tokenize("@bg  a.png\t1.0 "), vec!["@bg", "a.png", "1.0"]);
    assert!(tokenize("   ").is_empty());
}

#[test]
fn quoted_value_keeps_spaces() {
    let tokens = tokenize(r#"@se file="a b.ogg""#);
    assert_eq!(tokens, vec!["@se", r#"file="a b.ogg""#]);
    let (name, value) = split_named(tokens[1]).unwrap();
    assert_eq!(name, "file");
    assert_eq!(unquote(value), "a b.ogg");
}

#[test]
fn single_quotes_work_too() {
    let tokens = tokenize("@choose L1 'go left' L2 \"go right\"");
    assert_eq!(tokens.len(), 5);
    assert_eq!(unquote(tokens[2]), "go left");
    assert_eq!(unquote(tokens[4]), "go right");
}

#[test]
fn unterminated_quote_runs_to_end() {
    let tokens = tokenize(r#"@bg "never closed here"#);
    assert_eq!(tokens, vec!["@bg", r#""never closed here"#]);
}

#[test]
fn mixed_quote_kinds_do_not_close_each_other() {
    let tokens = tokenize(r#"a="it's fine" b"#);
    assert_eq!(tokens, vec![r#"a="it's fine""#, "b"]);
}
