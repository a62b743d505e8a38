mod app;
mod calendar;
mod help;
mod jumpto;
mod theme;
use crate::app::App;
use crate::calendar::{Clock, FixedClock, LocalClock, WeekStrip};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::ffi::OsString;
use std::fs::File;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, UtcOffset};
use tracing_subscriber::EnvFilter;

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Environment variable holding the log filter directives
const LOG_ENV: &str = "WEEKSTRIP_LOG";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    selected: Option<Date>,
    start: Option<Date>,
    days: Option<NonZeroU32>,
    overscan: Option<usize>,
    today: Option<Date>,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('s') | Arg::Long("start") => {
                    opts.start = Some(parse_date(parser.value()?)?);
                }
                Arg::Short('n') | Arg::Long("days") => {
                    opts.days = Some(parser.value()?.parse()?);
                }
                Arg::Long("overscan") => opts.overscan = Some(parser.value()?.parse()?),
                Arg::Long("today") => opts.today = Some(parse_date(parser.value()?)?),
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if opts.selected.is_none() => {
                    opts.selected = Some(parse_date(value)?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                init_logging(opts.log_file.as_deref())?;
                match opts.today {
                    Some(today) => opts.run_with(FixedClock(today)),
                    None => {
                        // This must be called while the process is still
                        // single-threaded
                        let offset = UtcOffset::current_local_offset()
                            .context("failed to determine local UTC offset")?;
                        opts.run_with(LocalClock::new(offset))
                    }
                }
            }
            Command::Help => {
                println!("Usage: weekstrip [OPTIONS] [YYYY-MM-DD]");
                println!();
                println!("Endlessly scrollable terminal strip of calendar weeks");
                println!();
                println!("The given date is selected on startup (default: today).");
                println!();
                println!("Options:");
                println!("  -s, --start <YYYY-MM-DD>  Show the week starting on this Sunday at the top");
                println!("  -n, --days <N>            Only show enough weeks to cover N days");
                println!("      --overscan <N>        Build N rows beyond each edge of the screen");
                println!("      --today <YYYY-MM-DD>  Pretend that the current date is this date");
                println!("      --log-file <PATH>     Write logs to the given file");
                println!("  -h, --help                Display this help message and exit");
                println!("  -V, --version             Show the program version and exit");
                println!();
                println!("Logging is filtered by the {LOG_ENV} environment variable.");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl Options {
    fn run_with<C: Clock>(self, clock: C) -> anyhow::Result<()> {
        let selected = self.selected.unwrap_or_else(|| clock.today());
        let mut builder = WeekStrip::builder(selected);
        if let Some(start) = self.start {
            builder = builder.start_date(start);
        }
        if let Some(days) = self.days {
            builder = builder.day_count(days);
        }
        if let Some(rows) = self.overscan {
            builder = builder.overscan(rows);
        }
        let strip = builder.build().context("invalid calendar configuration")?;
        with_terminal(|mut terminal| {
            terminal.hide_cursor().context("failed to hide cursor")?;
            App::new(strip, clock).run(&mut terminal)?;
            Ok(())
        })
    }
}

fn parse_date(value: OsString) -> Result<Date, lexopt::Error> {
    value.parse_with(|s| Date::parse(s, YMD_FMT))
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install log subscriber")
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("weekstrip").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(Options::default()));
    }

    #[test]
    fn test_all_options() {
        let cmd = parse(&[
            "--start",
            "2019-06-09",
            "-n",
            "30",
            "--overscan=5",
            "--today",
            "2025-01-22",
            "--log-file",
            "weekstrip.log",
            "2019-06-14",
        ])
        .unwrap();
        assert_eq!(
            cmd,
            Command::Run(Options {
                selected: Some(date!(2019 - 06 - 14)),
                start: Some(date!(2019 - 06 - 09)),
                days: NonZeroU32::new(30),
                overscan: Some(5),
                today: Some(date!(2025 - 01 - 22)),
                log_file: Some(PathBuf::from("weekstrip.log")),
            })
        );
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(&["2019-06-14", "-h"]).unwrap(), Command::Help);
        assert_eq!(parse(&["--version"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_bad_values() {
        assert!(parse(&["2019-13-01"]).is_err());
        assert!(parse(&["-n", "0"]).is_err());
        assert!(parse(&["2019-06-14", "2019-06-15"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
    }
}
