//! Whole-message command parser (first generation).
//!
//! This is the original single-pass parser that tokenizes an entire inbound
//! message - addressing prefix, command name, and argument list - in one
//! [`Scanner`] loop with explicit `more_options` / `expect_option_value`
//! state. The registry pipeline ([`crate::argv`] + [`crate::registry`]) is
//! the canonical path for new code; this module is kept because several
//! behaviors it defined are still load-bearing for callers and tests:
//! `--` end-of-options handling, trailing capture, the
//! option-versus-positional error split, and the "not addressed to me means
//! say nothing" rule.
//!
//! Grammar:
//!
//! ```text
//! <commandline> := <highlight> (","|":")? <commandname> (<wsp> <parameter>)* (<wsp> <trailing>)?
//! <commandname> := <word>
//! <parameter>   := <option> | <quoted-word> | <code-span> | <word> | "--"
//! <option>      := "--" <word>
//! ```

use regex::Regex;

use crate::scanner::Scanner;

/// Command name bound when a message addresses the bot but contains nothing
/// else.
pub const DEFAULT_COMMAND: &str = "_ping";

/// Binding kinds understood by the whole-message parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `--name` with no value.
    Switch,
    /// `--name value`.
    Named,
    /// One whitespace-delimited (or quoted) positional word.
    Word,
    /// The entire rest of the message, verbatim, as one value.
    Trailing,
    /// Every remaining word, bound repeatedly under the same name.
    Array,
}

impl ParamKind {
    fn is_positional(self) -> bool {
        matches!(self, ParamKind::Word | ParamKind::Trailing | ParamKind::Array)
    }
}

/// One declared parameter.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    /// Identifier, matched case-insensitively against `--name` options.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Binding kind.
    pub kind: ParamKind,
}

impl ParamDecl {
    /// Shorthand constructor.
    pub fn new(name: &str, kind: ParamKind, description: &str) -> Self {
        ParamDecl {
            name: name.to_owned(),
            description: description.to_owned(),
            kind,
        }
    }
}

/// One command known to the parser.
#[derive(Debug, Clone)]
pub struct CommandDecl {
    /// Name matched (case-insensitively) against the first word.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Parameters in declared order.
    pub params: Vec<ParamDecl>,
}

/// One bound argument: the parameter name plus its values (empty for a
/// switch, one value for everything else; repeated entries for `Array`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArg {
    /// Parameter name as declared.
    pub name: String,
    /// Bound raw values.
    pub values: Vec<String>,
}

/// Successful parse of a whole message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The message exactly as received.
    pub original_text: String,
    /// First word after the addressing prefix ([`DEFAULT_COMMAND`] when the
    /// message was empty). Case preserved.
    pub command_name: String,
    /// Arguments in binding order.
    pub arguments: Vec<ParsedArg>,
}

impl ParsedCommand {
    fn new(original_text: &str) -> Self {
        ParsedCommand {
            original_text: original_text.to_owned(),
            command_name: DEFAULT_COMMAND.to_owned(),
            arguments: Vec::new(),
        }
    }

    /// First bound value for `name`, if any.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|arg| arg.name.eq_ignore_ascii_case(name))
            .and_then(|arg| arg.values.first())
            .map(String::as_str)
    }
}

/// Why a parse failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The first word is not a registered command.
    NoSuchCommand,
    /// No token alternative matched at the cursor.
    GenericSyntax,
    /// Input ended while a named option still expected its value.
    MissingOptionValue,
    /// A positional token arrived after every positional slot was filled.
    TooManyArguments,
    /// `--name` does not match any declared parameter.
    NoSuchOption,
    /// `--name` matched a parameter that is positional, not an option.
    ArgIsPositional,
}

/// Failed parse, carrying whatever was bound before the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Failure class.
    pub kind: FailureKind,
    /// The partial result built so far.
    pub partial: ParsedCommand,
}

/// The pre-compiled token patterns plus the command table.
pub struct MessageParser {
    commands: Vec<CommandDecl>,
    highlight: Regex,
    word: Regex,
    wsp: Regex,
    option: Regex,
    end_options: Regex,
    quoted: Regex,
    remainder: Regex,
}

impl MessageParser {
    /// Build a parser over a fixed command table.
    pub fn new(commands: Vec<CommandDecl>) -> Self {
        MessageParser {
            commands,
            highlight: Regex::new(r"<@!?(\d+)>[,:]?\s+").expect("static pattern"),
            word: Regex::new(r"\S+").expect("static pattern"),
            wsp: Regex::new(r"\s+").expect("static pattern"),
            option: Regex::new(r"--(\S+)").expect("static pattern"),
            end_options: Regex::new(r"--").expect("static pattern"),
            // Greedy: the span runs to the last quote on the line.
            quoted: Regex::new(r#""(.*)""#).expect("static pattern"),
            remainder: Regex::new(r"(?s).*").expect("static pattern"),
        }
    }

    /// The command table.
    pub fn commands(&self) -> &[CommandDecl] {
        &self.commands
    }

    /// Parse one message.
    ///
    /// `require_uid` is the addressing contract: when set, the message must
    /// open with a highlight token (`<@id>` or `<@!id>`, optionally followed
    /// by `,` or `:`, then whitespace) carrying exactly that id - anything
    /// else means the message is not for us and the result is `None`, not a
    /// failure. When unset, a leading highlight token is consumed if present
    /// but nothing is required.
    pub fn parse_message(
        &self,
        msg: &str,
        require_uid: Option<&str>,
    ) -> Option<Result<ParsedCommand, ParseFailure>> {
        let mut scanner = Scanner::new(msg);
        let mut result = ParsedCommand::new(msg);

        let highlight = scanner.advance(&[("highlight", &self.highlight)]);
        if let Some(required) = require_uid {
            match highlight {
                Some(ref tok) if tok.captures[1] == required => {}
                _ => return None,
            }
        }

        let Some(word) = scanner.advance(&[("word", &self.word)]) else {
            // Addressed with nothing else: the default command answers.
            return Some(Ok(result));
        };
        result.command_name = word.captures[0].clone();

        let Some(decl) = self
            .commands
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(&result.command_name))
        else {
            return Some(Err(ParseFailure {
                kind: FailureKind::NoSuchCommand,
                partial: result,
            }));
        };

        let mut positionals: Vec<&ParamDecl> = decl
            .params
            .iter()
            .filter(|p| p.kind.is_positional())
            .collect();
        let mut more_options = true;
        let mut expect_value = false;

        let tokens: [(&'static str, &Regex); 5] = [
            ("option", &self.option),
            ("end_options", &self.end_options),
            ("quoted", &self.quoted),
            ("word", &self.word),
            ("wsp", &self.wsp),
        ];

        // The main loop only runs for commands whose first positional is an
        // ordinary word; a leading trailing parameter swallows everything
        // and commands without positionals take no arguments at all.
        if positionals
            .first()
            .is_some_and(|p| p.kind != ParamKind::Trailing)
        {
            loop {
                // Backtick fences need a closing run equal to the opening
                // run, which a backreference-free pattern cannot express;
                // they are matched by hand ahead of the regex alternatives.
                // Only a cursor sitting on a backtick can produce one, so
                // the option/quoted priorities are unaffected.
                let value = if let Some((inner, len)) = code_span(scanner.rest()) {
                    scanner.skip(len);
                    inner
                } else {
                    let Some(token) = scanner.advance(&tokens) else {
                        if scanner.at_end() {
                            break;
                        }
                        return Some(Err(ParseFailure {
                            kind: FailureKind::GenericSyntax,
                            partial: result,
                        }));
                    };

                    match token.kind {
                        "wsp" => continue,
                        "quoted" => token.captures[1].clone(),
                        "word" => token.captures[0].clone(),
                        "option" if more_options => {
                            let attempted = &token.captures[1];
                            let Some(param) = decl
                                .params
                                .iter()
                                .find(|p| p.name.eq_ignore_ascii_case(attempted))
                            else {
                                return Some(Err(ParseFailure {
                                    kind: FailureKind::NoSuchOption,
                                    partial: result,
                                }));
                            };
                            match param.kind {
                                ParamKind::Named => {
                                    result.arguments.push(ParsedArg {
                                        name: param.name.clone(),
                                        values: Vec::new(),
                                    });
                                    expect_value = true;
                                }
                                ParamKind::Switch => {
                                    result.arguments.push(ParsedArg {
                                        name: param.name.clone(),
                                        values: Vec::new(),
                                    });
                                }
                                _ => {
                                    return Some(Err(ParseFailure {
                                        kind: FailureKind::ArgIsPositional,
                                        partial: result,
                                    }));
                                }
                            }
                            continue;
                        }
                        // After a bare `--`, option-looking text is ordinary
                        // positional text, dashes included.
                        "option" => token.captures[0].clone(),
                        "end_options" if more_options => {
                            more_options = false;
                            continue;
                        }
                        "end_options" => token.captures[0].clone(),
                        other => unreachable!("unknown token kind {other}"),
                    }
                };

                if expect_value {
                    if let Some(last) = result.arguments.last_mut() {
                        last.values.push(value);
                    }
                    expect_value = false;
                } else if let Some(param) = positionals.first().copied() {
                    result.arguments.push(ParsedArg {
                        name: param.name.clone(),
                        values: vec![value],
                    });
                    if param.kind != ParamKind::Array {
                        positionals.remove(0);
                        if positionals
                            .first()
                            .is_some_and(|p| p.kind == ParamKind::Trailing)
                        {
                            break;
                        }
                    }
                } else {
                    return Some(Err(ParseFailure {
                        kind: FailureKind::TooManyArguments,
                        partial: result,
                    }));
                }
            }
        }

        if expect_value {
            return Some(Err(ParseFailure {
                kind: FailureKind::MissingOptionValue,
                partial: result,
            }));
        }

        if let Some(trailing) = positionals
            .first()
            .filter(|p| p.kind == ParamKind::Trailing)
        {
            // One separating whitespace run is consumed; the rest of the
            // message (newlines included) is the value, end untrimmed.
            let _ = scanner.advance(&[("wsp", &self.wsp)]);
            if let Some(rest) = scanner.advance(&[("trailing", &self.remainder)]) {
                result.arguments.push(ParsedArg {
                    name: trailing.name.clone(),
                    values: vec![rest.captures[0].clone()],
                });
            }
        }

        Some(Ok(result))
    }
}

/// Backtick-fenced code span at the start of `rest`: an opening run of
/// backticks, at least one inner character, and a closing run equal to the
/// opening one, all on one line. Greedy on both counts - the longest opening
/// run that can close wins, and its span runs to the last closing run on the
/// line. Returns the inner text and the total matched length in bytes.
fn code_span(rest: &str) -> Option<(String, usize)> {
    let max_open = rest.bytes().take_while(|&b| b == b'`').count();
    if max_open == 0 {
        return None;
    }
    let line_end = rest.find('\n').unwrap_or(rest.len());
    for open in (1..=max_open).rev() {
        let fence = &rest[..open];
        let body = &rest[open..line_end];
        if let Some(pos) = body.rfind(fence) {
            if pos > 0 {
                return Some((body[..pos].to_owned(), open + pos + open));
            }
        }
    }
    None
}
