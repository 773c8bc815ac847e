use std::io::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::error::SinkError;
use crate::metrics::RunSummary;

use super::SummarySink;
use super::format::{format_percent, write_line};
use super::record::SummaryRecord;

/// Writes `test_<unix-seconds>_metrics.json` into a directory.
#[derive(Clone, Debug)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn file_name(unix_seconds: i64) -> String {
        format!("test_{}_metrics.json", unix_seconds)
    }

    /// Writes the record and returns the file it landed in.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, or the record
    /// cannot be serialized or written.
    pub async fn write_record(&self, record: &SummaryRecord) -> Result<PathBuf, SinkError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| SinkError::CreateDir {
                path: self.dir.clone(),
                source: err,
            })?;

        let path = self
            .dir
            .join(Self::file_name(chrono::Utc::now().timestamp()));
        let json = serde_json::to_string_pretty(record)
            .map_err(|err| SinkError::Serialize { source: err })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|err| SinkError::WriteFile {
                path: path.clone(),
                source: err,
            })?;
        Ok(path)
    }
}

#[async_trait]
impl SummarySink for JsonFileSink {
    async fn write(&self, summary: &RunSummary) -> Result<(), SinkError> {
        let path = self.write_record(&SummaryRecord::from(summary)).await?;
        info!("Summary written to {}", path.display());
        Ok(())
    }
}

/// Prints a human-readable report to stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// # Errors
    ///
    /// Returns an error if formatting into the output buffer fails.
    pub fn render(summary: &RunSummary) -> Result<String, SinkError> {
        let record = SummaryRecord::from(summary);
        let mut output = String::new();

        write_line(&mut output, "Run summary")?;
        write_line(
            &mut output,
            &format!(
                "  Requests:      {} total, {} ok, {} failed",
                record.total_requests, record.success_requests, record.failure_requests
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "  Error rate:    {} (availability {})",
                format_percent(record.error_rate),
                format_percent(record.availability)
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "  Latency (ms):  avg {} | min {} | max {}",
                record.avg_response_time, record.min_response_time, record.max_response_time
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "  Percentiles:   p50 {} | p90 {} | p99 {}",
                record.p50_response_time, record.p90_response_time, record.p99_response_time
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "  Throughput:    {} req/s, {} B/s",
                record.tps, record.download_speed
            ),
        )?;
        write_line(
            &mut output,
            &format!(
                "  Transferred:   {} bytes in {}s",
                record.total_download_size, record.total_duration
            ),
        )?;
        if record.dropped_events > 0 {
            write_line(
                &mut output,
                &format!(
                    "  Dropped:       {} events (counts are a lower bound)",
                    record.dropped_events
                ),
            )?;
        }
        if record.forced_shutdown {
            write_line(
                &mut output,
                "  Shutdown:      forced (some users were aborted after the grace timeout)",
            )?;
        }
        Ok(output)
    }
}

#[async_trait]
impl SummarySink for ConsoleSink {
    async fn write(&self, summary: &RunSummary) -> Result<(), SinkError> {
        let output = Self::render(summary)?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(output.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|err| SinkError::WriteStdout { source: err })
    }
}
