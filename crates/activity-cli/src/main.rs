//! `activities` CLI — expand, check, and print activity schedules from JSON files.
//!
//! Input is a JSON array of base activities in the portal's camelCase shape.
//! Every subcommand except `expand` works on the expanded catalog, so recurring
//! instances can be addressed by their generated ids.
//!
//! ## Usage
//!
//! ```sh
//! # Expand recurring activities (stdin → stdout)
//! cat activities.json | activities expand
//!
//! # Expand from file to file
//! activities expand -i activities.json -o expanded.json
//!
//! # Would signing up for "art" clash with what the user already has?
//! activities conflicts -i activities.json --candidate art --registered yoga,talk
//!
//! # Date-grouped agenda with Chinese headings
//! activities agenda -i activities.json --locale zh
//!
//! # Signup status for a volunteer, "today" taken in Hong Kong time
//! activities status -i activities.json --role volunteer --timezone Asia/Hong_Kong
//! ```
//!
//! Diagnostics go to stderr. Set `RUST_LOG` (e.g. `RUST_LOG=debug`) or pass
//! `-v` to see skipped entries and expansion counts.

use activity_engine::activity::require_date;
use activity_engine::{Activity, Locale, Role, SignupBook};
use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "activities",
    version,
    about = "Recurring activity expansion, schedule conflict checks and agendas"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug diagnostics to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand recurring activities into their dated instances
    Expand {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check whether an activity clashes with already-registered ones
    Conflicts {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Id of the activity to sign up for
        #[arg(long)]
        candidate: String,
        /// Comma-separated ids the user is already registered for, checked in order
        #[arg(long, value_delimiter = ',')]
        registered: Vec<String>,
    },
    /// Print activities grouped by day
    Agenda {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Label language: en or zh
        #[arg(long, env = "ACTIVITIES_LOCALE", default_value = "en")]
        locale: String,
    },
    /// Show OPEN / FULL / CLOSED / SIGNED UP for every activity
    Status {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Whose capacity to check: participant or volunteer
        #[arg(long, default_value = "participant")]
        role: String,
        /// Comma-separated ids the user is already signed up for
        #[arg(long, value_delimiter = ',')]
        signed_up: Vec<String>,
        /// Evaluate deadlines as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<String>,
        /// IANA timezone used to determine today's date
        #[arg(long, env = "ACTIVITIES_TZ", default_value = "UTC")]
        timezone: String,
        /// Title language: en or zh
        #[arg(long, env = "ACTIVITIES_LOCALE", default_value = "en")]
        locale: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Expand { input, output } => {
            let catalog = load_catalog(input.as_deref())?;
            let json = serde_json::to_string_pretty(&catalog)
                .context("Failed to serialize expanded activities")?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Conflicts {
            input,
            candidate,
            registered,
        } => {
            let catalog = load_catalog(input.as_deref())?;
            let candidate = find_activity(&catalog, &candidate)?;
            let registered = registered
                .iter()
                .map(|id| find_activity(&catalog, id))
                .collect::<Result<Vec<_>>>()?;

            match activity_engine::detect_schedule_conflict(candidate, &registered) {
                Some(existing) => println!(
                    "Conflict: {} ({}) on {} {}",
                    existing.id, existing.title, existing.date, existing.time
                ),
                None => println!("No schedule conflict"),
            }
        }
        Commands::Agenda { input, locale } => {
            let locale = parse_locale(&locale)?;
            let catalog = load_catalog(input.as_deref())?;
            print!("{}", render_agenda(&catalog, locale));
        }
        Commands::Status {
            input,
            role,
            signed_up,
            today,
            timezone,
            locale,
        } => {
            let role: Role = role.parse()?;
            let locale = parse_locale(&locale)?;
            let today = resolve_today(today.as_deref(), &timezone)?;
            let catalog = load_catalog(input.as_deref())?;
            let book = SignupBook::with_signups(role, signed_up);

            debug!(%today, role = %book.role(), "evaluating signup status");
            for activity in activity_engine::sort_by_date_time(&catalog) {
                println!(
                    "{:<9}  {}  {}  {} ({})",
                    book.status(&activity, today).to_string(),
                    activity.date,
                    activity.time,
                    activity.display_title(locale),
                    activity.id
                );
            }
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `-v` forces debug; otherwise `RUST_LOG`, else warn.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read base activities and expand their recurrences.
fn load_catalog(path: Option<&str>) -> Result<Vec<Activity>> {
    let json = read_input(path)?;
    let bases = activity_engine::load_activities(&json).context("Failed to parse activities")?;
    let catalog = activity_engine::expand_all(&bases);
    debug!(
        bases = bases.len(),
        expanded = catalog.len(),
        "loaded activity catalog"
    );
    Ok(catalog)
}

fn find_activity<'a>(catalog: &'a [Activity], id: &str) -> Result<&'a Activity> {
    catalog
        .iter()
        .find(|activity| activity.id == id)
        .ok_or_else(|| anyhow!("Unknown activity id: '{}'", id))
}

fn parse_locale(text: &str) -> Result<Locale> {
    text.parse()
        .map_err(|_| anyhow!("Unknown locale: '{}'. Available locales: en, zh", text))
}

/// `--today` wins; otherwise the current date in `timezone`.
fn resolve_today(today: Option<&str>, timezone: &str) -> Result<NaiveDate> {
    if let Some(text) = today {
        return require_date(text).context("Invalid --today date. Expected YYYY-MM-DD");
    }

    let tz: Tz = timezone
        .parse()
        .map_err(|_| anyhow!("Unknown timezone: '{}'", timezone))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

fn render_agenda(catalog: &[Activity], locale: Locale) -> String {
    let mut out = String::new();
    for group in activity_engine::group_by_date(catalog, locale) {
        out.push_str(&group.label);
        out.push('\n');
        for activity in &group.activities {
            out.push_str(&format!(
                "  {}  {} ({})",
                activity.time,
                activity.display_title(locale),
                activity.id
            ));
            let venue = activity.display_venue(locale);
            if !venue.is_empty() {
                out.push_str(" @ ");
                out.push_str(venue);
            }
            out.push('\n');
        }
    }
    out
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_today_overrides_timezone() {
        let today = resolve_today(Some("2026-03-01"), "Not/AZone").unwrap();
        assert_eq!(today, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn bad_timezone_is_an_error() {
        let err = resolve_today(None, "Mars/Olympus_Mons").unwrap_err();
        assert!(err.to_string().contains("Unknown timezone"));
    }

    #[test]
    fn known_timezone_resolves() {
        assert!(resolve_today(None, "Asia/Hong_Kong").is_ok());
    }

    #[test]
    fn bad_today_is_an_error() {
        let err = resolve_today(Some("03/01/2026"), "UTC").unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid date: 03/01/2026"));
    }

    #[test]
    fn agenda_shows_localized_venue() {
        let catalog = vec![Activity {
            id: "art".into(),
            title: "Art Jamming".into(),
            venue: "Studio".into(),
            venue_chinese: "工作室".into(),
            date: "2026-03-09".into(),
            time: "10:30 AM - 12:00 PM".into(),
            ..Activity::default()
        }];

        let en = render_agenda(&catalog, Locale::En);
        assert!(en.contains("  10:30 AM - 12:00 PM  Art Jamming (art) @ Studio\n"));
        let zh = render_agenda(&catalog, Locale::Zh);
        assert!(zh.contains("(art) @ 工作室\n"));
    }

    #[test]
    fn bad_locale_is_an_error() {
        let err = parse_locale("fr").unwrap_err();
        assert!(err.to_string().contains("Available locales"));
    }
}
