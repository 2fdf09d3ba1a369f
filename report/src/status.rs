use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Fail,
    Error,
    Warning,
    Skip,
    Info,
}

const PASS: &str = "Pass";
const FAIL: &str = "Fail";
const ERROR: &str = "Error";
const WARNING: &str = "Warning";
const SKIP: &str = "Skip";
const INFO: &str = "Info";

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Pass,
        Status::Fail,
        Status::Error,
        Status::Warning,
        Status::Skip,
        Status::Info,
    ];

    /// Resolves the `result` attribute of a test-result element.
    ///
    /// Matching ignores case and surrounding whitespace. Anything outside the
    /// known vocabulary, including an empty value, resolves to `Warning` so
    /// that it stays visible without being counted as a failure.
    pub fn from_result<T: AsRef<str>>(result: T) -> Self {
        match result.as_ref().trim().to_lowercase().as_str() {
            "pass" | "passed" | "success" | "succeeded" => Status::Pass,
            "fail" | "failed" | "failure" => Status::Fail,
            "error" | "errored" => Status::Error,
            "skip" | "skipped" | "ignored" | "notrun" | "notexecuted" => Status::Skip,
            "warning" | "inconclusive" => Status::Warning,
            "info" => Status::Info,
            _ => Status::Warning,
        }
    }

    /// Rank used to pick the status that represents an entry. Higher is worse.
    pub fn severity(&self) -> u8 {
        match self {
            Status::Fail => 5,
            Status::Error => 4,
            Status::Warning => 3,
            Status::Skip => 2,
            Status::Pass => 1,
            Status::Info => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Fail | Status::Error)
    }
}

impl From<Status> for &str {
    fn from(val: Status) -> Self {
        match val {
            Status::Pass => PASS,
            Status::Fail => FAIL,
            Status::Error => ERROR,
            Status::Warning => WARNING,
            Status::Skip => SKIP,
            Status::Info => INFO,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).into())
    }
}
