use std::{collections::BTreeSet, path::Path};

use report::{CodeBlock, EntryId, ReportSink, Status};
use thiserror::Error;

use crate::{
    date_parser::TimestampParser,
    document::{Element, LoadError, XmlDocument},
    string_safety::{eq_ignore_case, non_blank},
    tags::{collect_tags, TagScope},
};

const TAG_ASSEMBLY: &str = "assembly";
const TAG_COLLECTION: &str = "collection";
const TAG_TEST: &str = "test";
const TAG_TEST_SUITE: &str = "test-suite";
const TAG_FAILURE: &str = "failure";
const TAG_MESSAGE: &str = "message";
const TAG_STACK_TRACE: &str = "stack-trace";
const TAG_REASON: &str = "reason";
const TAG_OUTPUT: &str = "output";
const TAG_PROPERTY: &str = "property";

mod attrs {
    pub const NAME: &str = "name";
    pub const RESULT: &str = "result";
    pub const START_TIME: &str = "start-time";
    pub const END_TIME: &str = "end-time";
    pub const VALUE: &str = "value";
    pub const TYPE: &str = "type";
    pub const OS_VERSION: &str = "os-version";
}

pub const COLLECTION_NAME_PREFIX: &str = "Test collection for ";
const DESCRIPTION_PROPERTY: &str = "Description";
const PARAMETERIZED_SUITE_TYPE: &str = "ParameterizedTest";
const UNKNOWN_OS_VERSION: &str = "unknown";

/// Label of the single environment entry.
///
/// NOTE: the value recorded under this key is the assembly's `os-version`
/// attribute, not a framework version. The label is kept as-is until the
/// intended key is confirmed.
pub const ENVIRONMENT_INFO_KEY: &str = "NUnit Version";

#[derive(Error, Debug)]
pub enum MapError {
    #[error("root element not found for {path}")]
    RootNotFound { path: String },
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Publishes the collections and test cases of an xUnit results document
/// into a [`ReportSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMapper;

impl ResultMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map_file<P: AsRef<Path>, S: ReportSink + ?Sized>(
        &self,
        path: P,
        sink: &mut S,
    ) -> Result<(), MapError> {
        let document = XmlDocument::load(path)?;
        self.map(&document, sink)
    }

    /// Maps every collection of `document` into `sink`.
    ///
    /// The only error is a document without a root element, reported before
    /// anything reaches the sink. Missing attributes, blank elements and
    /// unparsable timestamps are treated as absent.
    pub fn map<S: ReportSink + ?Sized>(
        &self,
        document: &XmlDocument,
        sink: &mut S,
    ) -> Result<(), MapError> {
        if document.root().is_none() {
            return Err(MapError::RootNotFound {
                path: String::from(document.source()),
            });
        }

        add_system_info(document, sink);

        let mut timestamp_parser = TimestampParser::new();
        for collection in document.descendants(TAG_COLLECTION) {
            map_collection(collection, sink, &mut timestamp_parser);
        }

        Ok(())
    }
}

fn add_system_info<S: ReportSink + ?Sized>(document: &XmlDocument, sink: &mut S) {
    let Some(assembly) = document.descendants(TAG_ASSEMBLY).next() else {
        return;
    };
    if let Some(os_version) = assembly.attribute(attrs::OS_VERSION).and_then(non_blank) {
        if !eq_ignore_case(os_version, UNKNOWN_OS_VERSION) {
            sink.add_system_info(ENVIRONMENT_INFO_KEY, os_version);
        }
    }
}

fn map_collection<S: ReportSink + ?Sized>(
    collection: Element<'_>,
    sink: &mut S,
    timestamp_parser: &mut TimestampParser,
) {
    let name = collection_name(collection);
    tracing::debug!("mapping collection {}", name);
    let test = sink.create_test(name);

    if let Some(failure) = collection.child(TAG_FAILURE) {
        if let Some(message) = raw_child_text(failure, TAG_MESSAGE) {
            sink.log(test, Status::Fail, message);
        }
        if let Some(stack_trace) = raw_child_text(failure, TAG_STACK_TRACE) {
            sink.log(test, Status::Fail, CodeBlock::new(stack_trace).markup());
        }
    }

    if let Some(output) = raw_child_text(collection, TAG_OUTPUT) {
        sink.log(test, Status::Info, output);
    }

    for case in collection.descendants(TAG_TEST) {
        map_case(case, test, sink, timestamp_parser);
    }
}

fn map_case<S: ReportSink + ?Sized>(
    case: Element<'_>,
    test: EntryId,
    sink: &mut S,
    timestamp_parser: &mut TimestampParser,
) {
    let name = case.attribute(attrs::NAME).unwrap_or_default();
    let node = sink.create_node(test, name, description(case).unwrap_or_default());

    let status = Status::from_result(case.attribute(attrs::RESULT).unwrap_or_default());
    sink.log(node, status, status_message(case, status));

    for tag in case_tags(case) {
        sink.assign_category(node, &tag);
    }

    if let Some(start_time) = case
        .attribute(attrs::START_TIME)
        .and_then(|value| timestamp_parser.parse(value))
    {
        sink.set_start_time(node, start_time);
    }
    if let Some(end_time) = case
        .attribute(attrs::END_TIME)
        .and_then(|value| timestamp_parser.parse(value))
    {
        sink.set_end_time(node, end_time);
    }
}

fn collection_name<'a>(collection: Element<'a>) -> &'a str {
    let name = collection.attribute(attrs::NAME).unwrap_or_default();
    name.strip_prefix(COLLECTION_NAME_PREFIX).unwrap_or(name)
}

fn description<'a>(case: Element<'a>) -> Option<&'a str> {
    case.descendants(TAG_PROPERTY)
        .find(|property| {
            property
                .attribute(attrs::NAME)
                .is_some_and(|name| eq_ignore_case(name, DESCRIPTION_PROPERTY))
        })
        .and_then(|property| property.attribute(attrs::VALUE))
}

fn status_message(case: Element<'_>, status: Status) -> String {
    let failure = case.child(TAG_FAILURE);
    let reason = case.child(TAG_REASON);
    let message = [
        failure.and_then(|failure| child_text(failure, TAG_MESSAGE)),
        failure.and_then(|failure| child_text(failure, TAG_STACK_TRACE)),
        reason.and_then(|reason| child_text(reason, TAG_MESSAGE)),
        non_blank(&case.child(TAG_OUTPUT).map(|output| output.value()).unwrap_or_default())
            .map(String::from),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .concat();

    if message.is_empty() {
        status.to_string()
    } else if status.is_failure() {
        CodeBlock::new(message).markup()
    } else {
        message
    }
}

fn case_tags(case: Element<'_>) -> BTreeSet<String> {
    let mut tags = collect_tags(case, TagScope::Recursive);
    if let Some(suite) = case.ancestors(TAG_TEST_SUITE).find(|suite| {
        suite
            .attribute(attrs::TYPE)
            .is_some_and(|suite_type| eq_ignore_case(suite_type, PARAMETERIZED_SUITE_TYPE))
    }) {
        tags.extend(collect_tags(suite, TagScope::Direct));
    }
    tags
}

/// Trimmed text of the first `name` child, if it has any.
fn child_text(element: Element<'_>, name: &str) -> Option<String> {
    element
        .child(name)
        .and_then(|child| non_blank(&child.value()).map(String::from))
}

/// Text of the first `name` child as written, unless it is blank.
fn raw_child_text(element: Element<'_>, name: &str) -> Option<String> {
    element
        .child(name)
        .map(|child| child.value())
        .filter(|value| non_blank(value).is_some())
}
