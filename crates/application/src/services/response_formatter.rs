use crate::use_cases::lookup::ReplySet;
use hickory_proto::rr::Record;
use std::fmt::Write;
use std::time::Duration;

pub const RESET: &str = "\x1b[0m";

/// Bold ANSI foreground colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Purple,
    Magenta,
    Teal,
    White,
}

impl Color {
    pub const fn escape(self) -> &'static str {
        match self {
            Color::Black => "\x1b[1;30m",
            Color::Red => "\x1b[1;31m",
            Color::Green => "\x1b[1;32m",
            Color::Yellow => "\x1b[1;33m",
            Color::Purple => "\x1b[1;34m",
            Color::Magenta => "\x1b[1;35m",
            Color::Teal => "\x1b[1;36m",
            Color::White => "\x1b[1;37m",
        }
    }
}

pub fn paint(color: Color, text: impl std::fmt::Display) -> String {
    format!("{}{}{}", color.escape(), text, RESET)
}

/// Renders a TTL in seconds the way durations read elsewhere in the output: `5m0s`, `1h0m0s`, `30s`.
pub fn format_ttl(ttl: u32) -> String {
    let hours = ttl / 3600;
    let minutes = (ttl % 3600) / 60;
    let seconds = ttl % 60;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Rounds to the millisecond and renders as `23ms`, `1.5s` or `1m2.345s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_ms = (elapsed.as_nanos() + 500_000) / 1_000_000;
    if total_ms == 0 {
        return "0s".to_string();
    }
    if total_ms < 1000 {
        return format!("{}ms", total_ms);
    }

    let millis = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{}h{}m", hours, minutes);
    } else if minutes > 0 {
        let _ = write!(out, "{}m", minutes);
    }
    let _ = write!(out, "{}", seconds);
    if millis > 0 {
        let frac = format!("{:03}", millis);
        let _ = write!(out, ".{}", frac.trim_end_matches('0'));
    }
    out.push('s');
    out
}

/// Appends `sep` and the rdata, or nothing for a record that carries none.
fn push_rdata(line: &mut String, sep: char, record: &Record) {
    if let Some(rdata) = record.data() {
        let _ = write!(line, "{}{}", sep, rdata);
    }
}

pub struct ResponseFormatter {
    raw: bool,
}

impl ResponseFormatter {
    pub fn new(raw: bool) -> Self {
        Self { raw }
    }

    pub fn render(&self, set: &ReplySet) -> Vec<String> {
        let mut lines: Vec<String> = set
            .replies
            .iter()
            .flat_map(|reply| reply.answers().iter())
            .map(|record| {
                if self.raw {
                    Self::raw_line(record)
                } else {
                    Self::terse_line(record)
                }
            })
            .collect();

        if self.raw {
            lines.push(format!(
                ";; Received {} replies from {} in {}",
                set.len(),
                set.server,
                format_elapsed(set.elapsed)
            ));
        }
        lines
    }

    /// Presentation-format layout: `owner TTL CLASS TYPE RDATA`, tab separated.
    fn raw_line(record: &Record) -> String {
        let mut line = format!(
            "{}\t{}\t{}\t{}",
            record.name(),
            record.ttl(),
            record.dns_class(),
            record.record_type()
        );
        push_rdata(&mut line, '\t', record);
        line
    }

    fn terse_line(record: &Record) -> String {
        let mut line = format!(
            "{} {} {}",
            paint(Color::Purple, record.name()),
            paint(Color::Green, format_ttl(record.ttl())),
            paint(Color::Magenta, record.record_type())
        );
        push_rdata(&mut line, ' ', record);
        line
    }
}
