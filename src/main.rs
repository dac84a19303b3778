//! Chime CLI entry point.

use chime::{
    default_period_labels, AppState, ChimeError, ClassFieldExtractor, Clock, ClockMapper, Config,
    ConfigError, FixedClock, Result, SystemClock, TimetableView,
};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Chime: school timetable and bell-schedule queries over calendar exports
#[derive(Parser, Debug)]
#[command(name = "chime")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Evaluate queries at this RFC 3339 instant instead of the system clock
    #[arg(long, global = true)]
    at: Option<String>,

    /// Signed minutes added to the clock (user-adjustable time offset)
    #[arg(long, global = true, allow_hyphen_values = true)]
    shift_minutes: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show today's class table
    Today {
        /// Calendar export file (.ics)
        file: String,
    },
    /// Show the week timetable grid
    Week {
        /// Calendar export file (.ics)
        file: String,
    },
    /// Show today's bell schedule
    Bells {
        /// Calendar export file (.ics)
        file: String,
    },
    /// Show the current day and period clock positions
    Now {
        /// Calendar export file (.ics)
        file: String,
    },
    /// Show timetable statistics
    Stats {
        /// Calendar export file (.ics)
        file: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let clock: Box<dyn Clock> = match &args.at {
        Some(at) => Box::new(FixedClock(parse_reference(at)?)),
        None => Box::new(SystemClock),
    };

    let mut state = AppState::new();
    if let Some(minutes) = args.shift_minutes {
        state.set_clock_offset(Duration::minutes(minutes));
    }

    let parser = chime::CalendarTextParser::with_offset_minutes(config.calendar.utc_offset_minutes);
    let view = TimetableView::new(config.offset());
    let extractor = ClassFieldExtractor::new(config.field_patterns()?, config.offset());
    let mapper = ClockMapper::new(config.day_span(), config.offset());

    let file = match &args.command {
        Command::Today { file }
        | Command::Week { file }
        | Command::Bells { file }
        | Command::Now { file }
        | Command::Stats { file } => file.clone(),
    };
    let text = std::fs::read_to_string(&file)?;
    state.replace_events(parser.parse(&text), Some(file));

    let events = state.events();
    let reference = state.reference_instant(clock.as_ref());

    match args.command {
        Command::Today { .. } => {
            let mut shown = 0;
            for event in view.events_on_day(&events, reference) {
                match extractor.class_data(event) {
                    Ok(data) => {
                        println!(
                            "{:<24} {:<16} {:<6} {:<8} {} - {}",
                            data.subject, data.teacher, data.room, data.period, data.start,
                            data.end
                        );
                        shown += 1;
                    }
                    Err(err) => {
                        tracing::warn!(field = err.field(), error = %err, "skipping event");
                    }
                }
            }
            if shown == 0 {
                println!("No events to show");
            }
        }
        Command::Week { .. } => {
            let grid = view.week_grid(&events, reference, &extractor, &default_period_labels());
            if grid.iter().all(|row| row.subjects.is_empty()) {
                println!("No events to show");
            } else {
                for row in grid {
                    println!("Period {:<4} {}", row.period, row.subjects.join(", "));
                }
            }
        }
        Command::Bells { .. } => {
            let bells = view.bells_on_day(&events, reference);
            if bells.is_empty() {
                println!("No bells today");
            } else {
                for bell in bells.bells() {
                    println!("{}", bell.with_timezone(&config.offset()).format("%-I:%M %p"));
                }
            }
        }
        Command::Now { .. } => {
            let bells = view.bells_on_day(&events, reference);
            println!("day position:    {:.4}", mapper.day_position(reference, &bells));
            println!("period position: {:.4}", mapper.period_position(reference, &bells));
            if let Some(previous) = bells.previous_bell(reference) {
                println!(
                    "previous bell:   {}",
                    previous.with_timezone(&config.offset()).format("%-I:%M %p")
                );
            }
            if let Some(next) = bells.next_bell(reference) {
                println!(
                    "next bell:       {}",
                    next.with_timezone(&config.offset()).format("%-I:%M %p")
                );
            }
        }
        Command::Stats { .. } => {
            let stats = view.stats(&events, reference);
            println!("events:          {}", stats.total_events);
            println!("events today:    {}", stats.events_today);
            println!("events this week: {}", stats.events_this_week);
            println!("bells today:     {}", stats.bells_today);
        }
    }

    Ok(())
}

fn parse_reference(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            ChimeError::Config(ConfigError::Invalid(format!(
                "invalid --at instant {value:?}: {err}"
            )))
        })
}
