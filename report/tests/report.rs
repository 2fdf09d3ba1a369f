use chrono::DateTime;
use report::{CodeBlock, ExtentReport, ReportSink, Status};

#[test]
fn resolves_result_strings() {
    let cases = [
        ("Pass", Status::Pass),
        (" passed ", Status::Pass),
        ("Success", Status::Pass),
        ("FAIL", Status::Fail),
        ("Failed", Status::Fail),
        ("Error", Status::Error),
        ("Skip", Status::Skip),
        ("Ignored", Status::Skip),
        ("NotRun", Status::Skip),
        ("Inconclusive", Status::Warning),
        ("info", Status::Info),
        ("", Status::Warning),
        ("something-else", Status::Warning),
    ];
    for (raw, expected) in cases {
        assert_eq!(Status::from_result(raw), expected, "resolving `{}`", raw);
    }
}

#[test]
fn status_display_is_variant_name() {
    let rendered: Vec<String> = Status::ALL.iter().map(ToString::to_string).collect();
    pretty_assertions::assert_eq!(
        rendered,
        vec!["Pass", "Fail", "Error", "Warning", "Skip", "Info"]
    );
}

#[test]
fn code_block_escapes_markup() {
    let code_block = CodeBlock::new("expected <1> & got \"2\"");
    assert_eq!(code_block.code(), "expected <1> & got \"2\"");
    assert_eq!(
        code_block.markup(),
        r#"<textarea readonly class="code-block">expected &lt;1&gt; &amp; got &quot;2&quot;</textarea>"#
    );
}

#[test]
fn nodes_hang_off_their_test() {
    let mut report = ExtentReport::new();
    let test = report.create_test("Suite");
    let first = report.create_node(test, "first", "does a thing");
    let second = report.create_node(test, "second", "");

    assert_eq!(report.tests().count(), 1);
    let children: Vec<&str> = report
        .children(test)
        .map(|child| child.name.as_str())
        .collect();
    pretty_assertions::assert_eq!(children, vec!["first", "second"]);

    let first = report.entry(first).unwrap();
    assert_eq!(first.parent, Some(test));
    assert_eq!(first.description, "does a thing");
    assert!(first.is_node());
    assert!(!report.entry(test).unwrap().is_node());
    assert!(report.entry(second).unwrap().description.is_empty());
}

#[test]
fn entry_status_is_most_severe() {
    let mut report = ExtentReport::new();
    let test = report.create_test("Suite");
    let passed = report.create_node(test, "passed", "");
    let skipped = report.create_node(test, "skipped", "");
    report.log(passed, Status::Pass, String::from("Pass"));
    report.log(skipped, Status::Skip, String::from("Skip"));
    report.log(test, Status::Info, String::from("some output"));

    assert_eq!(report.status_of(passed), Status::Pass);
    assert_eq!(report.status_of(skipped), Status::Skip);
    assert_eq!(report.status_of(test), Status::Skip);

    let failed = report.create_node(test, "failed", "");
    report.log(failed, Status::Error, String::from("boom"));
    report.log(failed, Status::Fail, String::from("boom again"));
    assert_eq!(report.status_of(failed), Status::Fail);
    assert_eq!(report.status_of(test), Status::Fail);
}

#[test]
fn empty_entry_passes() {
    let mut report = ExtentReport::new();
    let test = report.create_test("Empty");
    assert_eq!(report.status_of(test), Status::Pass);
}

#[test]
fn categories_are_a_set() {
    let mut report = ExtentReport::new();
    let test = report.create_test("Suite");
    let node = report.create_node(test, "case", "");
    report.assign_category(node, "slow");
    report.assign_category(node, "slow");
    report.assign_category(node, "db");
    report.assign_category(test, "db");

    let node = report.entry(node).unwrap();
    assert_eq!(node.categories.len(), 2);
    pretty_assertions::assert_eq!(
        report.categories().into_iter().collect::<Vec<_>>(),
        vec!["db", "slow"]
    );
}

#[test]
fn system_info_replaces_existing_key() {
    let mut report = ExtentReport::new();
    report.add_system_info("OS", "Linux");
    report.add_system_info("Runtime", "8.0");
    report.add_system_info("OS", "Windows");

    let pairs: Vec<(&str, &str)> = report
        .system_info()
        .iter()
        .map(|info| (info.key.as_str(), info.value.as_str()))
        .collect();
    pretty_assertions::assert_eq!(pairs, vec![("OS", "Windows"), ("Runtime", "8.0")]);
}

#[test]
fn timestamps_are_recorded() {
    let mut report = ExtentReport::new();
    let test = report.create_test("Suite");
    let node = report.create_node(test, "case", "");
    let start = DateTime::parse_from_rfc3339("2024-03-01T10:00:00+02:00").unwrap();
    let end = DateTime::parse_from_rfc3339("2024-03-01T10:00:05+02:00").unwrap();
    report.set_start_time(node, start);
    report.set_end_time(node, end);

    let node = report.entry(node).unwrap();
    assert_eq!(node.start_time, Some(start));
    assert_eq!(node.end_time, Some(end));
    assert_eq!(report.entry(test).unwrap().start_time, None);
}

#[test]
fn summary_counts_node_statuses() {
    let mut report = ExtentReport::new();
    let first = report.create_test("First");
    let second = report.create_test("Second");
    for (parent, status) in [
        (first, Status::Pass),
        (first, Status::Fail),
        (second, Status::Pass),
        (second, Status::Skip),
    ] {
        let node = report.create_node(parent, "case", "");
        report.log(node, status, status.to_string());
    }

    let summary = report.summary();
    assert_eq!(summary.tests, 2);
    assert_eq!(summary.nodes, 4);
    assert_eq!(summary.node_statuses.get(&Status::Pass), Some(&2));
    assert_eq!(summary.node_statuses.get(&Status::Fail), Some(&1));
    assert_eq!(summary.node_statuses.get(&Status::Skip), Some(&1));
    assert_eq!(summary.node_statuses.get(&Status::Error), None);
}

#[test]
fn serializes_to_json() {
    let mut report = ExtentReport::new();
    let test = report.create_test("Suite");
    let node = report.create_node(test, "case", "");
    report.log(node, Status::Pass, String::from("Pass"));
    report.assign_category(node, "fast");
    report.add_system_info("NUnit Version", "10.0");

    let mut json = Vec::new();
    report.write_json(&mut json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();

    assert_eq!(value["tests"], serde_json::json!([0]));
    assert_eq!(value["entries"][1]["name"], "case");
    assert_eq!(value["entries"][1]["parent"], 0);
    assert_eq!(value["entries"][1]["logs"][0]["status"], "Pass");
    assert_eq!(value["entries"][1]["categories"], serde_json::json!(["fast"]));
    assert_eq!(value["system_info"][0]["key"], "NUnit Version");

    let round_tripped: ExtentReport = serde_json::from_slice(&json).unwrap();
    assert_eq!(round_tripped, report);
}

#[test]
fn node_with_unknown_parent_becomes_a_test() {
    let mut other = ExtentReport::new();
    other.create_test("first");
    let unknown = other.create_test("second");

    let mut report = ExtentReport::new();
    let orphan = report.create_node(unknown, "orphan", "kept anyway");
    report.log(unknown, Status::Fail, String::from("dropped"));

    let orphan = report.entry(orphan).unwrap();
    assert!(!orphan.is_node());
    assert_eq!(orphan.description, "");
    assert!(orphan.logs.is_empty());
    assert_eq!(report.tests().count(), 1);
    assert_eq!(report.entries().len(), 1);
}
