//! Core domain logic for the agency operations console.
//! Owns the ordered bucket store and the task board and calendar views built
//! on top of it.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod seed;
pub mod service;
pub mod store;

pub use config::{
    BoardConfig, CalendarConfig, ConfigError, ConsoleConfig, LoggingConfig, WeekStart,
    CONFIG_PATH_ENV,
};
pub use error::{InvariantViolation, StoreError, StoreResult};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, init_stderr_logging,
    logging_status, LogSink, LoggingError,
};
pub use model::event::{date_key, parse_date_key, CalendarEntry, CalendarEntryPatch, Channel};
pub use model::item::{Item, ItemId, Payload};
pub use model::task::{TaskCard, TaskCardPatch, TaskPriority, TaskStatus};
pub use seed::{demo_board_seed, demo_calendar_seed, BoardSeed, CalendarSeed, SeedError};
pub use service::board_service::{BoardColumn, BoardError, TaskBoardService};
pub use service::calendar_service::{CalendarError, CalendarService, DayColumn, WeekView};
pub use service::drag::{DragSession, DropRequest, DropTarget};
pub use store::bucket_store::{BucketStore, MoveTarget};
pub use store::facade::BucketFacade;
pub use store::notify::{ListenerId, StoreChange};
pub use store::shared::SharedBucketStore;
pub use store::snapshot::StoreSnapshot;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
