pub mod markup;
pub mod report;
pub mod sink;
pub mod status;

pub use markup::CodeBlock;
pub use report::{Entry, EntryId, ExtentReport, Log, ReportSummary, SystemInfo};
pub use sink::ReportSink;
pub use status::Status;
