//! Logging setup: env_logger, bridged through indicatif when bars are drawn

use std::io::Write;

use indicatif::MultiProgress;

/// Fixed-width level tag, optionally wrapped in ANSI color.
fn level_tag(level: log::Level, color: bool) -> String {
    let (label, ansi) = match level {
        log::Level::Error => ("ERROR", "31"),
        log::Level::Warn => ("WARN ", "33"),
        log::Level::Info => ("INFO ", "32"),
        log::Level::Debug => ("DEBUG", "36"),
        log::Level::Trace => ("TRACE", "35"),
    };
    if color {
        format!("\x1b[{ansi}m{label}\x1b[0m")
    } else {
        label.to_string()
    }
}

/// Routes log lines through `MultiProgress::suspend` so they do not tear
/// the row progress bar.
pub struct ProgressLogger {
    filter: env_logger::Logger,
    multi: MultiProgress,
}

impl log::Log for ProgressLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.filter.matches(record) {
            let line = format!("[{}] {}", level_tag(record.level(), true), record.args());
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {}
}

/// Default filter when `RUST_LOG` is unset.
pub fn default_level(quiet: bool, debug: bool) -> &'static str {
    match (debug, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    }
}

/// Install the global logger. `RUST_LOG` overrides the default level.
///
/// With `multi`, output goes through the progress bars (TTY); otherwise lines
/// are plain `[LEVEL] message` for log capture.
pub fn init_logging(quiet: bool, debug: bool, multi: Option<&MultiProgress>) {
    let env = env_logger::Env::default().default_filter_or(default_level(quiet, debug));

    let Some(multi) = multi else {
        let _ = env_logger::Builder::from_env(env)
            .format(|buf, record| {
                writeln!(buf, "[{}] {}", level_tag(record.level(), false), record.args())
            })
            .try_init();
        return;
    };

    let filter = env_logger::Builder::from_env(env).build();
    let max_level = filter.filter();
    let logger = ProgressLogger {
        filter,
        multi: multi.clone(),
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max_level);
    }
}
