use std::{
    collections::{BTreeMap, HashSet},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use clap::Args;
use glob::glob;
use report::{ExtentReport, ReportSummary, Status};
use xunit::ResultMapper;

use crate::print::print_summary;

#[derive(Args, Clone, Debug)]
pub struct ConvertArgs {
    #[arg(
        required = true,
        value_parser = clap::builder::NonEmptyStringValueParser::new(),
        help = "xUnit result files, directories, or glob patterns."
    )]
    pub results_paths: Vec<String>,
    #[arg(
        long,
        env = "XUNIT_TO_EXTENT_OUTPUT_FILE_PATH",
        conflicts_with = "output_dir",
        help = "Write one merged JSON report to this file instead of stdout."
    )]
    pub output_file_path: Option<PathBuf>,
    #[arg(long, help = "Write one JSON report per results file into this directory.")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConversionSummary {
    pub converted_files: Vec<PathBuf>,
    pub failed_files: Vec<(PathBuf, String)>,
    pub tests: usize,
    pub nodes: usize,
    pub node_statuses: BTreeMap<Status, usize>,
}

impl ConversionSummary {
    fn record(&mut self, report_summary: ReportSummary) {
        self.tests += report_summary.tests;
        self.nodes += report_summary.nodes;
        for (status, count) in report_summary.node_statuses {
            *self.node_statuses.entry(status).or_default() += count;
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.failed_files.is_empty() {
            exitcode::OK
        } else {
            exitcode::DATAERR
        }
    }
}

pub fn run_convert(convert_args: ConvertArgs) -> anyhow::Result<i32> {
    let ConvertArgs {
        results_paths,
        output_file_path,
        output_dir,
    } = convert_args;

    let files = find_result_files(&results_paths)?;
    if files.is_empty() {
        tracing::error!("No xUnit result files found in {:?}", results_paths);
        return Ok(exitcode::NOINPUT);
    }

    let summary = match output_dir {
        Some(output_dir) => convert_each(&files, &output_dir)?,
        None => convert_merged(&files, output_file_path.as_deref())?,
    };

    print_summary(&summary);
    Ok(summary.exit_code())
}

/// Maps every file into a single report.
pub fn convert_merged(
    files: &[PathBuf],
    output_file_path: Option<&Path>,
) -> anyhow::Result<ConversionSummary> {
    let mapper = ResultMapper::new();
    let mut summary = ConversionSummary::default();
    let mut report = ExtentReport::new();

    for file in files {
        tracing::info!("Converting {}", file.display());
        match mapper.map_file(file, &mut report) {
            Ok(()) => summary.converted_files.push(file.clone()),
            Err(e) => {
                tracing::error!("Failed to convert {}: {}", file.display(), e);
                summary.failed_files.push((file.clone(), e.to_string()));
            }
        }
    }

    write_report(&report, output_file_path)?;
    summary.record(report.summary());
    Ok(summary)
}

/// Maps each file into its own report, written as `<file-stem>.json`.
pub fn convert_each(files: &[PathBuf], output_dir: &Path) -> anyhow::Result<ConversionSummary> {
    fs::create_dir_all(output_dir).map_err(|e| {
        anyhow::anyhow!(
            "failed to create output directory {}: {}",
            output_dir.display(),
            e
        )
    })?;

    let mapper = ResultMapper::new();
    let mut summary = ConversionSummary::default();
    let mut used_names = HashSet::new();

    for file in files {
        tracing::info!("Converting {}", file.display());
        let mut report = ExtentReport::new();
        if let Err(e) = mapper.map_file(file, &mut report) {
            tracing::error!("Failed to convert {}: {}", file.display(), e);
            summary.failed_files.push((file.clone(), e.to_string()));
            continue;
        }

        let output_path = output_dir.join(unique_report_name(file, &mut used_names));
        write_report(&report, Some(&output_path))?;
        tracing::info!("Wrote {}", output_path.display());

        summary.converted_files.push(file.clone());
        summary.record(report.summary());
    }

    Ok(summary)
}

/// Expands paths and glob patterns into result files, in order and without
/// duplicates. A pattern that matches no file is retried as a directory.
pub fn find_result_files<T: AsRef<str>>(results_paths: &[T]) -> anyhow::Result<Vec<PathBuf>> {
    results_paths
        .iter()
        .try_fold(Vec::new(), |mut files, results_path| -> anyhow::Result<_> {
            let results_path = results_path.as_ref();
            let mut matched = scan_from_glob(results_path)?;
            if matched.is_empty() {
                let directory_glob = PathBuf::from(results_path)
                    .join("**/*.xml")
                    .to_string_lossy()
                    .to_string();
                matched = scan_from_glob(&directory_glob)?;
            }
            for file in matched {
                if !files.contains(&file) {
                    files.push(file);
                }
            }
            Ok(files)
        })
}

fn scan_from_glob(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let paths = glob(pattern)
        .map_err(|e| anyhow::anyhow!("invalid results path pattern {}: {}", pattern, e))?;
    Ok(paths
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect())
}

fn unique_report_name(file: &Path, used_names: &mut HashSet<String>) -> String {
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| String::from("report"));
    let mut name = format!("{}.json", stem);
    let mut suffix = 1;
    while !used_names.insert(name.clone()) {
        name = format!("{}-{}.json", stem, suffix);
        suffix += 1;
    }
    name
}

fn write_report(report: &ExtentReport, output_file_path: Option<&Path>) -> anyhow::Result<()> {
    let mut writer: Box<dyn Write> = if let Some(path) = output_file_path {
        Box::new(fs::File::create(path).map_err(|e| {
            anyhow::anyhow!("failed to create report file {}: {}", path.display(), e)
        })?)
    } else {
        Box::new(io::stdout())
    };
    report.write_json(&mut writer)?;
    writeln!(writer)?;
    Ok(())
}
