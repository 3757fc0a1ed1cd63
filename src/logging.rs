use std::io::Write;

use chrono::Utc;
use colored::{Color, Colorize as _};
use env_logger::{Builder, Env, Target};
use log::Level;

/// Logs go to stderr so they never mix with generated JSON on stdout.
pub fn init(verbose: bool) {
    let mut builder = Builder::new();

    builder.parse_env(get_env(verbose));
    builder.target(Target::Stderr);

    builder.format(|f, record| {
        let time = Utc::now().format("%H:%M:%S").to_string().dimmed();
        let color = color_by_level(record.level());
        let level = level_to_str(record.level()).color(color);
        let message = record.args().to_string().color(color);

        // Our own modules are implied; only name foreign targets
        let target = record.target();
        if target.starts_with("embed_composer") {
            writeln!(f, "{time} [{level}] {message}")
        } else {
            writeln!(f, "{time} [{level}@{}] {message}", target.dimmed())
        }
    });

    builder.init();
}

fn get_env(verbose: bool) -> Env<'static> {
    let default_level = if verbose || cfg!(debug_assertions) {
        "embed_composer=debug,warn"
    } else {
        "embed_composer=info,warn"
    };
    Env::default().default_filter_or(default_level)
}

const fn color_by_level(level: Level) -> Color {
    match level {
        Level::Trace => Color::Magenta,
        Level::Debug => Color::Blue,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error => Color::Red,
    }
}

const fn level_to_str(level: Level) -> &'static str {
    match level {
        Level::Trace => "T",
        Level::Debug => "D",
        Level::Info => "I",
        Level::Warn => "W",
        Level::Error => "E",
    }
}
