//! # Rendering Module
//!
//! Turns command results into terminal text. Layout math (column widths,
//! truncation, padding) is Unicode-aware since country names are not ASCII
//! in general. Every `render_*` function returns a `String`; the internal
//! variants take an explicit color switch so tests can compare plain text.

use colored::{ColoredString, Colorize};
use dialbook::api::{CmdMessage, MessageLevel, Record};
use dialbook::commands::{ListedCountry, ListedPrefix};
use dialbook::config::{DialbookConfig, CONFIG_KEYS};
use dialbook::model::{Country, Prefix};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest country name shown before truncation.
const NAME_WIDTH: usize = 40;

#[derive(Clone, Copy)]
enum Tone {
    Index,
    Key,
    Dim,
    Success,
    Warning,
    Error,
}

fn paint(text: &str, tone: Tone, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    let colored: ColoredString = match tone {
        Tone::Index => text.yellow(),
        Tone::Key => text.bold(),
        Tone::Dim => text.dimmed(),
        Tone::Success => text.green(),
        Tone::Warning => text.yellow(),
        Tone::Error => text.red(),
    };
    colored.to_string()
}

fn use_color() -> bool {
    colored::control::SHOULD_COLORIZE.should_colorize()
}

pub fn render_country_list(countries: &[ListedCountry]) -> String {
    render_country_list_internal(countries, use_color())
}

fn render_country_list_internal(countries: &[ListedCountry], color: bool) -> String {
    if countries.is_empty() {
        return String::new();
    }
    let index_w = max_width(countries.iter().map(|c| format!("{}.", c.index)));
    let code_w = max_width(countries.iter().map(|c| c.country.code.clone()));
    let name_w = max_width(countries.iter().map(|c| c.country.name.clone())).min(NAME_WIDTH);

    let mut out = String::new();
    for listed in countries {
        let c = &listed.country;
        out.push_str(&format!(
            "  {} {}  {}  {}\n",
            paint(&pad_left(&format!("{}.", listed.index), index_w), Tone::Index, color),
            paint(&pad_right(&c.code, code_w), Tone::Key, color),
            pad_right(&truncate_to_width(&c.name, NAME_WIDTH), name_w),
            paint(&c.phone_code, Tone::Dim, color),
        ));
    }
    out
}

pub fn render_prefix_list(prefixes: &[ListedPrefix]) -> String {
    render_prefix_list_internal(prefixes, use_color())
}

fn render_prefix_list_internal(prefixes: &[ListedPrefix], color: bool) -> String {
    if prefixes.is_empty() {
        return String::new();
    }
    let index_w = max_width(prefixes.iter().map(|p| format!("{}.", p.index)));
    let id_w = max_width(prefixes.iter().map(|p| prefix_id(&p.prefix)));
    let prefix_w = max_width(prefixes.iter().map(|p| p.prefix.prefix.clone()));
    let code_w = max_width(prefixes.iter().map(|p| p.prefix.country_code.clone()));

    let mut out = String::new();
    for listed in prefixes {
        let p = &listed.prefix;
        let line = format!(
            "  {} {}  {}  {}  {}",
            paint(&pad_left(&format!("{}.", listed.index), index_w), Tone::Index, color),
            paint(&pad_left(&prefix_id(p), id_w), Tone::Dim, color),
            paint(&pad_right(&p.prefix, prefix_w), Tone::Key, color),
            pad_right(&p.country_code, code_w),
            truncate_to_width(&listed.country_name, NAME_WIDTH),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Records a command touched or fetched, one per line.
pub fn render_records(records: &[Record]) -> String {
    render_records_internal(records, use_color())
}

fn render_records_internal(records: &[Record], color: bool) -> String {
    records
        .iter()
        .map(|record| match record {
            Record::Country(c) => format_country(c, color),
            Record::Prefix(p) => format_prefix(p, color),
        })
        .map(|line| format!("  {}\n", line))
        .collect()
}

fn format_country(c: &Country, color: bool) -> String {
    format!(
        "{}  {}  {}",
        paint(&c.code, Tone::Key, color),
        c.name,
        paint(&c.phone_code, Tone::Dim, color)
    )
}

fn format_prefix(p: &Prefix, color: bool) -> String {
    format!(
        "{}  {}  {}",
        paint(&prefix_id(p), Tone::Dim, color),
        paint(&p.prefix, Tone::Key, color),
        p.country_code
    )
}

fn prefix_id(p: &Prefix) -> String {
    match p.id {
        Some(id) => format!("#{}", id),
        None => "#-".to_string(),
    }
}

pub fn render_config(config: &DialbookConfig) -> String {
    let key_w = max_width(CONFIG_KEYS.iter().map(|k| k.to_string()));
    CONFIG_KEYS
        .iter()
        .filter_map(|key| {
            config
                .get(key)
                .map(|value| format!("{} = {}\n", pad_right(key, key_w), value))
        })
        .collect()
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    render_messages_internal(messages, use_color())
}

fn render_messages_internal(messages: &[CmdMessage], color: bool) -> String {
    messages
        .iter()
        .map(|msg| {
            let tone = match msg.level {
                MessageLevel::Info => Tone::Dim,
                MessageLevel::Success => Tone::Success,
                MessageLevel::Warning => Tone::Warning,
                MessageLevel::Error => Tone::Error,
            };
            format!("{}\n", paint(&msg.content, tone, color))
        })
        .collect()
}

/// Prints command messages to stdout.
pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

/// Same as [`print_messages`] but on stderr, for output that must not mix
/// with a listing.
pub fn eprint_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        eprint!("{}", output);
    }
}

fn max_width(items: impl Iterator<Item = String>) -> usize {
    items.map(|s| s.width()).max().unwrap_or(0)
}

fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

fn pad_left(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", " ".repeat(fill), s)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
