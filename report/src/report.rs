use std::{
    collections::{BTreeMap, BTreeSet},
    io::Write,
};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{sink::ReportSink, status::Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub status: Status,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub description: String,
    pub parent: Option<EntryId>,
    pub children: Vec<EntryId>,
    pub logs: Vec<Log>,
    pub categories: BTreeSet<String>,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
}

impl Entry {
    fn new(id: EntryId, name: &str, description: &str, parent: Option<EntryId>) -> Self {
        Self {
            id,
            name: String::from(name),
            description: String::from(description),
            parent,
            children: Vec::new(),
            logs: Vec::new(),
            categories: BTreeSet::new(),
            start_time: None,
            end_time: None,
        }
    }

    pub fn is_node(&self) -> bool {
        self.parent.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub tests: usize,
    pub nodes: usize,
    pub node_statuses: BTreeMap<Status, usize>,
}

/// In-memory report: an arena of entries addressed by [`EntryId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtentReport {
    entries: Vec<Entry>,
    tests: Vec<EntryId>,
    system_info: Vec<SystemInfo>,
}

impl ExtentReport {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.system_info.is_empty()
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn tests(&self) -> impl Iterator<Item = &Entry> {
        self.tests.iter().filter_map(|id| self.entry(*id))
    }

    pub fn test_named<T: AsRef<str>>(&self, name: T) -> Option<&Entry> {
        self.tests().find(|test| test.name == name.as_ref())
    }

    pub fn children(&self, id: EntryId) -> impl Iterator<Item = &Entry> {
        self.entry(id)
            .map(|entry| entry.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.entry(*child))
    }

    pub fn system_info(&self) -> &[SystemInfo] {
        &self.system_info
    }

    /// Most severe status among the entry's own logs and all of its children.
    pub fn status_of(&self, id: EntryId) -> Status {
        let Some(entry) = self.entry(id) else {
            return Status::Pass;
        };
        entry
            .logs
            .iter()
            .map(|log| log.status)
            .chain(entry.children.iter().map(|child| self.status_of(*child)))
            .fold(Status::Pass, |worst, status| {
                if status.severity() > worst.severity() {
                    status
                } else {
                    worst
                }
            })
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .flat_map(|entry| entry.categories.iter().map(String::as_str))
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        self.entries
            .iter()
            .fold(ReportSummary::default(), |mut summary, entry| {
                if entry.is_node() {
                    summary.nodes += 1;
                    *summary
                        .node_statuses
                        .entry(self.status_of(entry.id))
                        .or_default() += 1;
                } else {
                    summary.tests += 1;
                }
                summary
            })
    }

    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.get_mut(id.0)
    }

    fn push_entry(&mut self, name: &str, description: &str, parent: Option<EntryId>) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(Entry::new(id, name, description, parent));
        id
    }
}

impl ReportSink for ExtentReport {
    fn create_test(&mut self, name: &str) -> EntryId {
        let id = self.push_entry(name, "", None);
        self.tests.push(id);
        id
    }

    /// A node whose parent is unknown becomes a top-level test.
    fn create_node(&mut self, parent: EntryId, name: &str, description: &str) -> EntryId {
        if self.entry(parent).is_none() {
            return self.create_test(name);
        }
        let id = self.push_entry(name, description, Some(parent));
        if let Some(parent) = self.entry_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    fn log(&mut self, entry: EntryId, status: Status, details: String) {
        if let Some(entry) = self.entry_mut(entry) {
            entry.logs.push(Log { status, details });
        }
    }

    fn assign_category(&mut self, entry: EntryId, category: &str) {
        if let Some(entry) = self.entry_mut(entry) {
            entry.categories.insert(String::from(category));
        }
    }

    fn set_start_time(&mut self, entry: EntryId, time: DateTime<FixedOffset>) {
        if let Some(entry) = self.entry_mut(entry) {
            entry.start_time = Some(time);
        }
    }

    fn set_end_time(&mut self, entry: EntryId, time: DateTime<FixedOffset>) {
        if let Some(entry) = self.entry_mut(entry) {
            entry.end_time = Some(time);
        }
    }

    fn add_system_info(&mut self, key: &str, value: &str) {
        if let Some(existing) = self.system_info.iter_mut().find(|info| info.key == key) {
            existing.value = String::from(value);
        } else {
            self.system_info.push(SystemInfo {
                key: String::from(key),
                value: String::from(value),
            });
        }
    }
}
