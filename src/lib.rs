pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod schedule;
pub mod store;

pub use export::csv::schedule_to_csv;
pub use export::xlsx::write_workbook;
pub use export::{ExportError, Fill, ScheduleSheet, SheetRow, build_schedule_sheet, fill_for_section};
pub use schedule::{DAYS_OF_WEEK, SCHEDULE_SLOTS, ScheduleData, weekday_name};
pub use store::file::FileBackend;
pub use store::memory::MemoryBackend;
pub use store::{
    DocumentStore, RESTRICTED_SLOTS_KEY, SCHEDULE_WORKBOOK_KEY, STAFF_AVAILABILITY_KEY,
    StaffAvailabilityDoc, StorageBackend, StoreError, StoreResult,
};
