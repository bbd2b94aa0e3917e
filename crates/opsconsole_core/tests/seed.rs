use chrono::NaiveDate;
use opsconsole_core::{
    demo_board_seed, demo_calendar_seed, BoardSeed, BucketStore, CalendarSeed, CalendarService,
    Channel, ItemId, SeedError, TaskBoardService, TaskPriority, TaskStatus,
};

#[test]
fn board_seed_keeps_file_order_per_column() {
    let seed = BoardSeed::from_json_str(
        r#"{
            "tasks": [
                { "id": "T1", "status": "A_FAZER", "title": "First", "priority": "high" },
                { "status": "CONCLUIDO", "title": "Shipped" },
                { "id": "T2", "status": "A_FAZER", "title": "Second", "tags": ["copy"] }
            ]
        }"#,
    )
    .unwrap();
    let mut board = TaskBoardService::new(BucketStore::new());

    assert_eq!(seed.load_into(&mut board).unwrap(), 3);

    let todo = board.column(TaskStatus::Todo);
    assert_eq!(todo[0].id, ItemId::from("T1"));
    assert_eq!(todo[0].payload.priority, TaskPriority::High);
    assert_eq!(todo[1].id, ItemId::from("T2"));
    assert_eq!(todo[1].payload.tags, vec!["copy".to_string()]);
    assert_eq!(board.column(TaskStatus::Done).len(), 1);
}

#[test]
fn rejected_seed_leaves_board_untouched() {
    let seed = BoardSeed::from_json_str(
        r#"{
            "tasks": [
                { "id": "T1", "status": "A_FAZER", "title": "First" },
                { "id": "T1", "status": "CONCLUIDO", "title": "Again" }
            ]
        }"#,
    )
    .unwrap();
    let mut board = TaskBoardService::new(BucketStore::new());

    let err = seed.load_into(&mut board).unwrap_err();
    assert!(matches!(err, SeedError::DuplicateId(id) if id == ItemId::from("T1")));
    assert_eq!(board.revision(), 0);

    let blank = BoardSeed::from_json_str(r#"{ "tasks": [ { "status": "A_FAZER" } ] }"#).unwrap();
    assert!(matches!(
        blank.load_into(&mut board),
        Err(SeedError::BlankTitle(0))
    ));
}

#[test]
fn unknown_status_is_a_parse_error() {
    let err = BoardSeed::from_json_str(r#"{ "tasks": [ { "status": "DONE", "title": "x" } ] }"#)
        .unwrap_err();
    assert!(matches!(err, SeedError::Parse(_)));
}

#[test]
fn calendar_seed_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.json");
    std::fs::write(
        &path,
        r#"{ "entries": [
            { "id": "E1", "date": "2024-06-03", "title": "Post", "channel": "social" },
            { "date": "2024-06-03", "title": "Call", "channel": "meeting" }
        ] }"#,
    )
    .unwrap();

    let seed = CalendarSeed::from_path(&path).unwrap();
    let mut calendar = CalendarService::new(BucketStore::new());
    seed.load_into(&mut calendar).unwrap();

    let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let entries = calendar.day(monday);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, ItemId::from("E1"));
    assert_eq!(entries[1].payload.channel, Channel::Meeting);
}

#[test]
fn demo_data_loads_cleanly() {
    let mut board = TaskBoardService::new(BucketStore::new());
    demo_board_seed().load_into(&mut board).unwrap();
    for column in board.board() {
        assert!(!column.tasks.is_empty(), "{:?} is empty", column.status);
    }

    let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let mut calendar = CalendarService::new(BucketStore::new());
    demo_calendar_seed(monday).load_into(&mut calendar).unwrap();
    assert_eq!(calendar.week(monday).entry_count(), 5);

    // Loading the same fixture twice collides on the fixed ids.
    assert!(matches!(
        demo_board_seed().load_into(&mut board),
        Err(SeedError::DuplicateId(_))
    ));
}
