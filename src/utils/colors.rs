/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";

/// Score color relative to the lab's base score:
/// full marks → green, some points lost → yellow, nothing → red.
pub fn color_for_score(score: i64, base_score: Option<i64>) -> &'static str {
    match base_score {
        _ if score <= 0 => RED,
        Some(base) if score >= base => GREEN,
        Some(_) => YELLOW,
        None => RESET,
    }
}

/// Audit-log operation color.
pub fn color_for_operation(op: &str) -> &'static str {
    match op {
        "event" => GREEN,
        "lab" => CYAN,
        "override" => YELLOW,
        "init" => BLUE,
        "migration_applied" => MAGENTA,
        _ => RESET,
    }
}

/// Grey out placeholders such as `--`.
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
