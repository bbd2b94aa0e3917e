use chrono::NaiveDate;
use opsconsole_core::{
    BucketStore, CalendarEntry, CalendarEntryPatch, CalendarError, CalendarService, Channel,
    DropRequest, ItemId, WeekStart,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn setup() -> CalendarService<BucketStore<CalendarEntry>> {
    let mut calendar = CalendarService::new(BucketStore::new());
    for (id, date, title) in [
        ("X", day(1), "Reel teaser"),
        ("Y", day(1), "Story poll"),
        ("Z", day(1), "Carousel"),
        ("W", day(4), "Newsletter"),
    ] {
        calendar
            .insert_entry(ItemId::from(id), date, CalendarEntry::new(title, Channel::Social))
            .unwrap();
    }
    calendar
}

fn ids(calendar: &CalendarService<BucketStore<CalendarEntry>>, date: NaiveDate) -> Vec<String> {
    calendar
        .day(date)
        .into_iter()
        .map(|item| item.id.to_string())
        .collect()
}

#[test]
fn entries_are_bucketed_by_iso_date() {
    let calendar = setup();

    let entries = calendar.day(day(1));
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|item| item.bucket_key == "2024-06-01"));
    assert_eq!(calendar.date_of(&ItemId::from("W")), Some(day(4)));
}

#[test]
fn reorder_within_day_places_entry_before_target() {
    let mut calendar = setup();

    calendar
        .reschedule(&ItemId::from("Z"), day(1), Some(&ItemId::from("Y")))
        .unwrap();

    assert_eq!(ids(&calendar, day(1)), vec!["X", "Z", "Y"]);
}

#[test]
fn reschedule_to_other_day_appends_by_default() {
    let mut calendar = setup();

    calendar
        .reschedule(&ItemId::from("X"), day(4), None)
        .unwrap();

    assert_eq!(ids(&calendar, day(1)), vec!["Y", "Z"]);
    assert_eq!(ids(&calendar, day(4)), vec!["W", "X"]);
    let orders: Vec<usize> = calendar.day(day(1)).iter().map(|item| item.order).collect();
    assert_eq!(orders, vec![0, 1]);
}

#[test]
fn reschedule_missing_entry_reports_not_found() {
    let mut calendar = setup();

    let err = calendar
        .reschedule(&ItemId::from("ghost"), day(2), None)
        .unwrap_err();

    assert_eq!(err, CalendarError::EntryNotFound(ItemId::from("ghost")));
    assert!(calendar.day(day(2)).is_empty());
}

#[test]
fn week_view_has_seven_days_from_configured_start() {
    let calendar = setup();

    // 2024-06-05 is a Wednesday; the Monday week starts 2024-06-03.
    let week = calendar.week(day(5));
    assert_eq!(week.start, day(3));
    assert_eq!(week.days.len(), 7);
    assert_eq!(week.days[1].date, day(4));
    assert_eq!(week.days[1].entries.len(), 1);
    assert_eq!(week.entry_count(), 1);

    let sunday_calendar = CalendarService::with_week_start(BucketStore::new(), WeekStart::Sunday);
    assert_eq!(sunday_calendar.week(day(5)).start, day(2));
}

#[test]
fn apply_drop_parses_day_key() {
    let mut calendar = setup();

    let moved = calendar.apply_drop(&DropRequest {
        item_id: ItemId::from("W"),
        bucket_key: "2024-06-01".to_string(),
        before: Some(ItemId::from("X")),
    });
    assert!(moved);
    assert_eq!(ids(&calendar, day(1)), vec!["W", "X", "Y", "Z"]);
    assert!(calendar.day(day(4)).is_empty());

    let revision = calendar.revision();
    let bad_day = calendar.apply_drop(&DropRequest {
        item_id: ItemId::from("W"),
        bucket_key: "someday".to_string(),
        before: None,
    });
    assert!(!bad_day);
    assert_eq!(calendar.revision(), revision);
}

#[test]
fn update_and_cancel_entry() {
    let mut calendar = setup();

    let updated = calendar
        .update_entry(
            &ItemId::from("Y"),
            CalendarEntryPatch {
                channel: Some(Channel::Email),
                owner: Some(Some("ana".to_string())),
                ..CalendarEntryPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.payload.channel, Channel::Email);
    assert_eq!(updated.order, 1);

    calendar.cancel_entry(&ItemId::from("X")).unwrap();
    assert_eq!(ids(&calendar, day(1)), vec!["Y", "Z"]);
    assert!(calendar.entry(&ItemId::from("X")).is_none());

    let err = calendar
        .schedule(day(2), CalendarEntry::new(" ", Channel::Blog))
        .unwrap_err();
    assert_eq!(err, CalendarError::InvalidTitle);
}
