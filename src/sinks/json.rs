use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::Metrics;

use super::format::{all_summary_rows, file_stem, summary_rows, trial_rows_json, write_line};
use super::{ReportContext, ReportSink, RunIndex};

/// Cross-run summary inside the report directory, one JSON object per line.
pub const SUMMARY_FILE_NAME: &str = "summary.jsonl";

/// Writes `<label>.json` per run and appends to [`SUMMARY_FILE_NAME`].
#[derive(Debug, Clone)]
pub struct JsonReportSink {
    dir: PathBuf,
}

impl JsonReportSink {
    #[must_use]
    pub fn new(dir: &str) -> Self {
        Self {
            dir: PathBuf::from(dir),
        }
    }

    #[must_use]
    pub fn detail_path(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(label)))
    }

    #[must_use]
    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE_NAME)
    }
}

#[async_trait]
impl ReportSink for JsonReportSink {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn next_run_index(&self, first: u64) -> AppResult<RunIndex> {
        let summary_path = self.summary_path();
        let content = match tokio::fs::read_to_string(&summary_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RunIndex::starting_at(first));
            }
            Err(err) => return Err(write_error(&summary_path, err)),
        };
        let mut last = None;
        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            let row: serde_json::Value = serde_json::from_str(line)
                .map_err(|err| AppError::sink(SinkError::SerializeJson { source: err }))?;
            if let Some(run) = row.get("run_index").and_then(serde_json::Value::as_u64) {
                last = last.max(Some(run));
            }
        }
        Ok(last.map_or(RunIndex::starting_at(first), |run| {
            RunIndex::starting_at(run).next()
        }))
    }

    async fn write_report(
        &self,
        context: &ReportContext,
        run: RunIndex,
        metrics: &Metrics,
    ) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| write_error(&self.dir, err))?;

        let mut sources = Vec::new();
        for source in metrics.sources() {
            sources.push(serde_json::json!({
                "name": source.name,
                "summary": summary_rows(source),
                "trials": trial_rows_json(&source.raw)?,
            }));
        }
        let detail = serde_json::json!({
            "label": context.label,
            "package": context.package,
            "device_model": context.device_model,
            "recorded_at": context.recorded_at.to_rfc3339(),
            "run_index": run.value(),
            "sources": sources,
        });
        let detail_path = self.detail_path(&context.label);
        let json = serde_json::to_vec_pretty(&detail)
            .map_err(|err| AppError::sink(SinkError::SerializeJson { source: err }))?;
        tokio::fs::write(&detail_path, json)
            .await
            .map_err(|err| write_error(&detail_path, err))?;

        let summary = serde_json::json!({
            "run_index": run.value(),
            "label": context.label,
            "package": context.package,
            "device_model": context.device_model,
            "recorded_at": context.recorded_at.to_rfc3339(),
            "metrics": all_summary_rows(metrics),
        });
        let line = serde_json::to_string(&summary)
            .map_err(|err| AppError::sink(SinkError::SerializeJson { source: err }))?;
        let mut output = String::new();
        write_line(&mut output, &line)?;

        let summary_path = self.summary_path();
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&summary_path)
            .await
            .map_err(|err| write_error(&summary_path, err))?;
        file.write_all(output.as_bytes())
            .await
            .map_err(|err| write_error(&summary_path, err))?;
        file.flush()
            .await
            .map_err(|err| write_error(&summary_path, err))?;
        Ok(())
    }
}

fn write_error(path: &Path, err: std::io::Error) -> AppError {
    AppError::sink(SinkError::WriteJson {
        path: path.to_path_buf(),
        source: err,
    })
}
