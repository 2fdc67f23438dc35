use std::cell::RefCell;
use std::fmt::Arguments;
use std::time::Duration;

use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use fern::FormatCallback;
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use log::{LevelFilter, Record};
use yt_downloader::Progress;

#[derive(Parser)]
pub struct LogArgs {
    /// Sets the log-level of yt_downloader [default: Info]
    /// (-v = Error, ..., -vvvvv = Trace)
    /// (other crates have log level Warn)
    #[clap(
        long,
        short,
        action = clap::ArgAction::Count,
        global = true,
    )]
    verbose: u8,

    /// Show a progress bar
    #[clap(long, conflicts_with = "verbose")]
    pub progress: bool,

    /// Turn off logging for all crates
    #[clap(long, short, conflicts_with = "verbose")]
    quiet: bool,
}

impl LogArgs {
    pub fn init_logger(&self) {
        if self.quiet || self.progress {
            return;
        }

        let formatter = self.log_msg_formatter();

        fern::Dispatch::new()
            .level(log::LevelFilter::Warn)
            .level_for("yt_downloader", self.level_filter())
            .format(formatter)
            .chain(std::io::stderr())
            .apply()
            .expect("The global logger was already initialized");
    }

    pub fn init_progress_bar(&self) -> ProgressReporter {
        let style = match ProgressStyle::with_template("{msg}\n\n{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})") {
            Ok(style) => style
                .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                })
                .progress_chars("█░░")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            Err(_) => ProgressStyle::default_bar(),
        };

        ProgressReporter::new(style)
    }

    fn log_msg_formatter(&self) -> fn(FormatCallback, &Arguments, &Record) {
        #[inline(always)]
        fn format_msg(
            out: FormatCallback,
            level: impl std::fmt::Display,
            record: &Record,
            msg: &Arguments,
        ) {
            out.finish(format_args!(
                "{:<5} [{}:{}]: {}",
                level,
                record.target(),
                record.line().unwrap_or_default(),
                msg,
            ))
        }

        |out: FormatCallback, message: &Arguments, record: &Record| {
            static COLORS: ColoredLevelConfig = ColoredLevelConfig {
                error: Color::Red,
                warn: Color::Yellow,
                info: Color::Green,
                debug: Color::BrightBlue,
                trace: Color::White,
            };

            format_msg(out, COLORS.color(record.level()), record, message);
        }
    }

    fn level_filter(&self) -> log::LevelFilter {
        match self.verbose {
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            0 | 3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Drives an [`indicatif`] bar from download progress.
///
/// Every transfer gets its own bar, a finished one is never drawn again.
pub struct ProgressReporter {
    style: ProgressStyle,
    bar: RefCell<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(style: ProgressStyle) -> Self {
        Self {
            style,
            bar: RefCell::new(ProgressBar::hidden()),
        }
    }
}

impl Progress for ProgressReporter {
    fn start(&self, label: &str, total: Option<u64>) {
        let bar = ProgressBar::new(total.unwrap_or(0))
            .with_style(self.style.clone())
            .with_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        let previous = self.bar.replace(bar);
        if !previous.is_finished() {
            previous.finish_and_clear();
        }
    }

    fn advance(&self, bytes: u64) {
        let bar = self.bar.borrow();

        // Estimated sizes can be short of the real one
        if bar.position() + bytes > bar.length().unwrap_or(0) {
            bar.set_length(bar.position() + bytes);
        }

        bar.inc(bytes);
    }

    fn finish(&self) {
        self.bar.borrow().finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_transfer_gets_a_fresh_bar() {
        let reporter = ProgressReporter::new(ProgressStyle::default_bar());

        reporter.start("itag 136", Some(100));
        reporter.advance(150);
        assert_eq!(reporter.bar.borrow().length(), Some(150));
        reporter.finish();
        assert!(reporter.bar.borrow().is_finished());

        reporter.start("itag 251", Some(40));
        {
            let bar = reporter.bar.borrow();
            assert!(!bar.is_finished());
            assert_eq!(bar.position(), 0);
            assert_eq!(bar.length(), Some(40));
            assert_eq!(bar.message(), "itag 251");
        }

        reporter.advance(10);
        assert_eq!(reporter.bar.borrow().position(), 10);
        reporter.finish();
    }
}
