//! User-facing status lines
//!
//! Colours are dropped automatically when the stream is not a terminal or
//! `NO_COLOR` is set.

use owo_colors::{OwoColorize, Stream, Style};

fn line(stream: Stream, style: Style, msg: &str) -> String {
    msg.if_supports_color(stream, |t| t.style(style)).to_string()
}

/// Announce a command before it runs, tagged local or remote
pub fn exec(tag: &str, command: &str) {
    let msg = format!("{tag}: {command}");
    println!("{}", line(Stream::Stdout, Style::new().cyan(), &msg));
}

/// Section header or progress notice
pub fn info(msg: &str) {
    println!("{}", line(Stream::Stdout, Style::new().blue(), msg));
}

pub fn success(msg: &str) {
    println!("{}", line(Stream::Stdout, Style::new().green(), msg));
}

pub fn warn(msg: &str) {
    println!("{}", line(Stream::Stdout, Style::new().yellow(), msg));
}

/// Plain, unstyled line
pub fn plain(msg: &str) {
    println!("{msg}");
}

/// Errors go to stderr and are never suppressed.
pub fn error(msg: &str) {
    eprintln!("{}", line(Stream::Stderr, Style::new().red(), msg));
}
