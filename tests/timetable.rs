//! End-to-end test over a realistic calendar export: parse, bucket, extract,
//! ring the bells and read the clock.

use chime::{
    default_period_labels, AppState, BellSchedule, CalendarTextParser, ClassFieldExtractor,
    ClockMapper, Config, FixedClock, TimetableView, ViewMode,
};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

// Thursday 2023-04-27 (AEST) with four periods, a malformed assembly entry,
// a Friday class in the same ISO week and a class in the following week.
const EXPORT: &str = "\
BEGIN:VCALENDAR\n\
PRODID:-//School//Timetable//EN\n\
VERSION:2.0\n\
BEGIN:VEVENT\n\
DTSTART;VALUE=DATE-TIME:20230427T084000\n\
DTEND;VALUE=DATE-TIME:20230427T094000\n\
SUMMARY:Course: Yr 10 Mathematics\n\
DESCRIPTION:Teacher:  SMITH\\, J\\nPeriod: Period 1\n\
LOCATION:Room: A12\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
DTSTART;VALUE=DATE-TIME:20230427T094000\n\
DTEND;VALUE=DATE-TIME:20230427T104000\n\
SUMMARY:Course: Yr 10 Science\n\
DESCRIPTION:Teacher:  JONES, K\\nPeriod: Period 2\n\
LOCATION:Room: Gymnasium 1\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
DTSTART;VALUE=DATE-TIME:20230427T104000\n\
DTEND;VALUE=DATE-TIME:20230427T110000\n\
SUMMARY:Course: Rec Recess\n\
DESCRIPTION:Teacher:  STAFF\\nPeriod: Period Recess\n\
LOCATION:\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
DTSTART;VALUE=DATE-TIME:20230427T110000\n\
DTEND;VALUE=DATE-TIME:20230427T120000\n\
SUMMARY:Course: 6's Homeroom\n\
DESCRIPTION:Teacher:  LEE, M\\nPeriod: Period 3\n\
LOCATION:Room: B7\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
DTSTART;VALUE=DATE-TIME:20230427T130000\n\
DTEND;VALUE=DATE-TIME:20230427T140000\n\
SUMMARY:Whole School Assembly\n\
DESCRIPTION:Hall\n\
LOCATION:\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
DTSTART;VALUE=DATE-TIME:20230428T084000\n\
DTEND;VALUE=DATE-TIME:20230428T094000\n\
SUMMARY:Course: Yr 10 English\n\
DESCRIPTION:Teacher:  BROWN, P\\nPeriod: Period 1\n\
LOCATION:Room: C2\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
DTSTART;VALUE=DATE-TIME:20230502T084000\n\
DTEND;VALUE=DATE-TIME:20230502T094000\n\
SUMMARY:Course: Yr 10 History\n\
DESCRIPTION:Teacher:  GREEN, A\\nPeriod: Period 1\n\
LOCATION:Room: D4\n\
END:VEVENT\n\
END:VCALENDAR\n";

fn aest() -> FixedOffset {
    FixedOffset::east_opt(600 * 60).unwrap()
}

fn local(hour: u32, minute: u32) -> DateTime<Utc> {
    aest()
        .with_ymd_and_hms(2023, 4, 27, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn setup() -> (Config, Vec<chime::CalendarEvent>) {
    let config = Config::default();
    let parser = CalendarTextParser::with_offset_minutes(config.calendar.utc_offset_minutes);
    (config, parser.parse(EXPORT))
}

#[test]
fn parses_every_well_formed_block() {
    let (_, events) = setup();
    assert_eq!(events.len(), 7);
}

#[test]
fn buckets_the_reference_day_and_week() {
    let (config, events) = setup();
    let view = TimetableView::new(config.offset());
    let reference = local(9, 10);

    assert_eq!(view.events_on_day(&events, reference).count(), 5);
    // Thursday + Friday classes share the ISO week; the following Tuesday
    // does not.
    assert_eq!(view.events_in_week(&events, reference).count(), 6);
}

#[test]
fn extracts_class_data_and_skips_the_malformed_event() {
    let (config, events) = setup();
    let view = TimetableView::new(config.offset());
    let extractor = ClassFieldExtractor::new(config.field_patterns().unwrap(), config.offset());
    let reference = local(9, 10);

    let classes: Vec<_> = view
        .events_on_day(&events, reference)
        .filter_map(|event| extractor.class_data(event).ok())
        .collect();
    assert_eq!(classes.len(), 4);

    let maths = &classes[0];
    assert_eq!(maths.subject, "Mathematics");
    assert_eq!(maths.teacher, "Smith, J");
    assert_eq!(maths.room, "A12");
    assert_eq!(maths.period, "1");
    assert_eq!(maths.start, "8:40 AM");
    assert_eq!(maths.end, "9:40 AM");

    assert_eq!(classes[1].room, "Gym");
    assert_eq!(classes[2].subject, "Recess");
    assert_eq!(classes[2].room, "-");
    assert_eq!(classes[2].period, "Recess");
    assert_eq!(classes[3].subject, "6's Homeroom");
}

#[test]
fn bell_schedule_is_deduplicated_and_ordered() {
    let (config, events) = setup();
    let view = TimetableView::new(config.offset());
    let bells = view.bells_on_day(&events, local(9, 10));

    // Five events with shared boundaries collapse to seven distinct bells.
    assert_eq!(
        bells.bells().to_vec(),
        vec![
            local(8, 40),
            local(9, 40),
            local(10, 40),
            local(11, 0),
            local(12, 0),
            local(13, 0),
            local(14, 0),
        ]
    );
    for pair in bells.bells().windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn clock_positions_track_the_current_period() {
    let (config, events) = setup();
    let view = TimetableView::new(config.offset());
    let mapper = ClockMapper::new(config.day_span(), config.offset());
    let bells = view.bells_on_day(&events, local(9, 10));

    // Halfway through period one.
    let position = mapper.period_position(local(9, 10), &bells);
    assert!((position - 0.5).abs() < 1e-9);

    // Clamped outside the bell range.
    assert_eq!(mapper.period_position(local(7, 0), &bells), 0.0);
    assert_eq!(mapper.period_position(local(15, 0), &bells), 1.0);

    // Day position under the fixed 08:40-15:06 convention.
    assert_eq!(mapper.day_position(local(8, 40), &bells), 0.0);
    assert!(mapper.day_position(local(9, 10), &bells) > 0.0);
    assert_eq!(mapper.day_position(local(16, 0), &bells), 1.0);
}

#[test]
fn empty_day_is_a_defined_state() {
    let (config, events) = setup();
    let view = TimetableView::new(config.offset());
    let mapper = ClockMapper::new(config.day_span(), config.offset());

    // A Sunday with no events at all.
    let sunday = aest()
        .with_ymd_and_hms(2023, 4, 30, 9, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    let bells = view.bells_on_day(&events, sunday);
    assert!(bells.is_empty());
    assert_eq!(mapper.period_position(sunday, &bells), 0.0);
    assert!(mapper.day_position(sunday, &bells).is_finite());
}

#[test]
fn week_grid_collects_subjects_per_period() {
    let (config, events) = setup();
    let view = TimetableView::new(config.offset());
    let extractor = ClassFieldExtractor::new(config.field_patterns().unwrap(), config.offset());

    let grid = view.week_grid(&events, local(9, 10), &extractor, &default_period_labels());
    assert_eq!(grid.len(), 8);
    assert_eq!(grid[0].period, "1");
    assert_eq!(grid[0].subjects, vec!["Mathematics", "English"]);
    assert_eq!(grid[1].subjects, vec!["Science"]);
    assert_eq!(grid[2].subjects, vec!["6's Homeroom"]);
}

#[test]
fn snapshot_survives_a_save_load_cycle() {
    let (_, events) = setup();
    let mut state = AppState::new();
    state.replace_events(events, Some("term2.ics".to_string()));
    state.set_mode(ViewMode::Clock);

    let path = std::env::temp_dir().join("chime-snapshot-test.json");
    state.save_snapshot(&path).unwrap();
    let snapshot = AppState::load_snapshot(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut restored = AppState::new();
    restored.restore(snapshot);
    assert_eq!(restored.events().len(), 7);
    assert_eq!(restored.filename(), Some("term2.ics"));
    assert_eq!(restored.mode(), ViewMode::Clock);

    // The restored events still drive the bell schedule.
    let bells = BellSchedule::from_events(
        TimetableView::new(aest())
            .events_on_day(&restored.events(), local(9, 10)),
    );
    assert_eq!(bells.len(), 7);
}
