use chrono::{DateTime, FixedOffset};

use crate::{report::EntryId, status::Status};

/// Receives the entries produced while converting a test-result document.
///
/// Top-level entries ("tests") hold the nodes created beneath them. System
/// info pairs belong to the report as a whole, not to any entry.
pub trait ReportSink {
    fn create_test(&mut self, name: &str) -> EntryId;

    fn create_node(&mut self, parent: EntryId, name: &str, description: &str) -> EntryId;

    fn log(&mut self, entry: EntryId, status: Status, details: String);

    fn assign_category(&mut self, entry: EntryId, category: &str);

    fn set_start_time(&mut self, entry: EntryId, time: DateTime<FixedOffset>);

    fn set_end_time(&mut self, entry: EntryId, time: DateTime<FixedOffset>);

    fn add_system_info(&mut self, key: &str, value: &str);
}
