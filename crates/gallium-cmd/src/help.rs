//! Help text rendering.
//!
//! Pure formatting over [`CommandDef`]: a one-line usage signature and a
//! per-parameter description list. Named and switch parameters render
//! first, then positionals in index order; optional positionals open a
//! bracket each and the closing brackets accumulate at the end of the line.

use crate::command::{CommandDef, Param, ParamPosition};

/// One-line usage signature, fenced in backticks.
///
/// Examples: `` `help [<command>]` ``, `` `listfolder [--offset <offset>] <user> <galleryid>` ``.
pub fn usage_line(def: &CommandDef) -> String {
    let mut out = format!("`{}", def.name);

    for param in def.params.iter().filter(|p| p.takes_option_syntax()) {
        let (open, close) = if param.optional { ("[", "]") } else { ("", "") };
        let value = match param.position {
            ParamPosition::Named => format!(" <{}>", param.name),
            _ => String::new(),
        };
        out.push_str(&format!(" {open}--{}{value}{close}", param.name));
    }

    let mut bracket_depth = 0;
    for param in positionals_in_order(def) {
        let open = if param.optional {
            bracket_depth += 1;
            "["
        } else {
            ""
        };
        out.push_str(&format!(" {open}<{}>", param.name));
    }
    out.push_str(&"]".repeat(bracket_depth));
    out.push('`');
    out
}

/// Per-parameter description lines, positionals first, then named/switch.
pub fn parameter_lines(def: &CommandDef) -> Vec<String> {
    let mut lines = Vec::new();
    for param in positionals_in_order(def) {
        lines.push(format!("`<{}>` {}", param.name, param.description));
    }
    for param in def.params.iter().filter(|p| p.takes_option_syntax()) {
        if matches!(param.position, ParamPosition::Switch) {
            lines.push(format!("`--{}` {}", param.name, param.description));
        } else {
            lines.push(format!("`<{}>` {}", param.name, param.description));
        }
    }
    lines
}

fn positionals_in_order(def: &CommandDef) -> Vec<&Param> {
    let mut positionals: Vec<&Param> = def.params.iter().filter(|p| p.index().is_some()).collect();
    positionals.sort_by_key(|p| p.index());
    positionals
}
