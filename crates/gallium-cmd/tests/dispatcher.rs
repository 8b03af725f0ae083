//! Integration tests for the whole-message parser.

use gallium_cmd::dispatcher::{
    CommandDecl, FailureKind, MessageParser, ParamDecl, ParamKind, ParsedCommand,
};

fn parser() -> MessageParser {
    MessageParser::new(vec![
        CommandDecl {
            name: "embed".to_owned(),
            description: "Embed a deviation".to_owned(),
            params: vec![
                ParamDecl::new("title", ParamKind::Named, "Title override"),
                ParamDecl::new("nsfw", ParamKind::Switch, "Mark as mature"),
                ParamDecl::new("url", ParamKind::Word, "Deviation link"),
                ParamDecl::new("message", ParamKind::Trailing, "Caption text"),
            ],
        },
        CommandDecl {
            name: "pair".to_owned(),
            description: "Two words".to_owned(),
            params: vec![
                ParamDecl::new("a", ParamKind::Word, "First"),
                ParamDecl::new("b", ParamKind::Word, "Second"),
            ],
        },
        CommandDecl {
            name: "tags".to_owned(),
            description: "Collect tags".to_owned(),
            params: vec![ParamDecl::new("tag", ParamKind::Array, "One tag")],
        },
        CommandDecl {
            name: "list".to_owned(),
            description: "No arguments".to_owned(),
            params: Vec::new(),
        },
    ])
}

fn ok(msg: &str) -> ParsedCommand {
    parser()
        .parse_message(msg, None)
        .expect("message should be accepted")
        .expect("message should parse")
}

fn fail(msg: &str) -> FailureKind {
    parser()
        .parse_message(msg, None)
        .expect("message should be accepted")
        .expect_err("message should fail to parse")
        .kind
}

#[test]
fn test_unaddressed_message_is_ignored() {
    let parser = parser();
    assert!(parser.parse_message("pair x y", Some("42")).is_none());
    assert!(parser.parse_message("<@99> pair x y", Some("42")).is_none());
}

#[test]
fn test_addressed_message_parses() {
    let parsed = parser()
        .parse_message("<@42> pair x y", Some("42"))
        .unwrap()
        .unwrap();
    assert_eq!(parsed.command_name, "pair");
    assert_eq!(parsed.value("a"), Some("x"));
    assert_eq!(parsed.value("b"), Some("y"));
}

#[test]
fn test_nickname_highlight_and_punctuation() {
    let parsed = parser()
        .parse_message("<@!42>: pair x y", Some("42"))
        .unwrap()
        .unwrap();
    assert_eq!(parsed.command_name, "pair");
}

#[test]
fn test_empty_after_highlight_is_default_command() {
    let parsed = parser().parse_message("<@42> ", Some("42")).unwrap().unwrap();
    assert_eq!(parsed.command_name, "_ping");
    assert!(parsed.arguments.is_empty());
}

#[test]
fn test_no_such_command() {
    assert_eq!(fail("conjure"), FailureKind::NoSuchCommand);
}

#[test]
fn test_no_such_option() {
    assert_eq!(fail("pair --mystery x"), FailureKind::NoSuchOption);
}

#[test]
fn test_option_flag_on_positional() {
    assert_eq!(fail("pair --a x"), FailureKind::ArgIsPositional);
}

#[test]
fn test_missing_option_value_at_end() {
    assert_eq!(fail("embed --title"), FailureKind::MissingOptionValue);
}

#[test]
fn test_too_many_arguments() {
    assert_eq!(fail("pair x y z"), FailureKind::TooManyArguments);
}

#[test]
fn test_quoted_value_binds_whole() {
    let parsed = ok(r#"embed --title "My Piece" http://example.com/a hi"#);
    assert_eq!(parsed.value("title"), Some("My Piece"));
    assert_eq!(parsed.value("url"), Some("http://example.com/a"));
    assert_eq!(parsed.value("message"), Some("hi"));
}

#[test]
fn test_codespan_value_binds_inner_text() {
    let parsed = ok("pair `code word` y");
    assert_eq!(parsed.value("a"), Some("code word"));
    assert_eq!(parsed.value("b"), Some("y"));
}

#[test]
fn test_codespan_fence_may_contain_shorter_runs() {
    // a double-backtick fence closes at the next double run, so a single
    // backtick stays inside the span
    let parsed = ok("pair ``a`b`` y");
    assert_eq!(parsed.value("a"), Some("a`b"));
    assert_eq!(parsed.value("b"), Some("y"));
}

#[test]
fn test_quoted_span_is_greedy_to_last_quote() {
    // one quoted token spanning both pairs, interior quotes kept
    let parsed = ok(r#"pair "a" "b""#);
    assert_eq!(parsed.value("a"), Some(r#"a" "b"#));
    assert_eq!(parsed.value("b"), None);
}

#[test]
fn test_switch_binds_without_value() {
    let parsed = ok("embed --nsfw http://example.com/a hi");
    let nsfw = parsed
        .arguments
        .iter()
        .find(|a| a.name == "nsfw")
        .expect("switch should bind");
    assert!(nsfw.values.is_empty());
    assert_eq!(parsed.value("url"), Some("http://example.com/a"));
}

#[test]
fn test_trailing_captures_rest_verbatim() {
    let parsed = ok("embed http://example.com/a hello this is  the rest of it");
    assert_eq!(parsed.value("message"), Some("hello this is  the rest of it"));
}

#[test]
fn test_trailing_keeps_newlines() {
    let parsed = ok("embed http://example.com/a first line\nsecond line");
    assert_eq!(parsed.value("message"), Some("first line\nsecond line"));
}

#[test]
fn test_trailing_empty_when_nothing_follows() {
    let parsed = ok("embed http://example.com/a");
    assert_eq!(parsed.value("message"), Some(""));
}

#[test]
fn test_array_binds_each_word() {
    let parsed = ok("tags alpha beta gamma");
    let tags: Vec<&str> = parsed
        .arguments
        .iter()
        .filter(|a| a.name == "tag")
        .filter_map(|a| a.values.first())
        .map(String::as_str)
        .collect();
    assert_eq!(tags, ["alpha", "beta", "gamma"]);
}

#[test]
fn test_end_options_makes_dashes_literal() {
    let parsed = ok("pair -- --nsfw y");
    assert_eq!(parsed.value("a"), Some("--nsfw"));
    assert_eq!(parsed.value("b"), Some("y"));
}

#[test]
fn test_command_without_positionals_ignores_arguments() {
    // The argument loop only runs when the command has a leading word
    // positional, so anything after the name is dropped on the floor.
    let parsed = ok("list --whatever junk");
    assert_eq!(parsed.command_name, "list");
    assert!(parsed.arguments.is_empty());
}

#[test]
fn test_original_text_is_preserved() {
    let msg = "<@42> pair x y";
    let parsed = parser().parse_message(msg, Some("42")).unwrap().unwrap();
    assert_eq!(parsed.original_text, msg);
}
