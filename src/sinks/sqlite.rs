use async_trait::async_trait;
use tokio_rusqlite::Connection;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::{Metrics, RawRecords};

use super::format::{GfxTrialRow, ResponseTrialRow, SummaryRow, gfx_rows, response_rows, summary_rows};
use super::{ReportContext, ReportSink, RunIndex};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS summary (
        run_index INTEGER NOT NULL,
        label TEXT NOT NULL,
        package TEXT NOT NULL,
        device_model TEXT NOT NULL,
        recorded_at TEXT NOT NULL,
        source TEXT NOT NULL,
        metric TEXT NOT NULL,
        position INTEGER NOT NULL,
        mean REAL NOT NULL,
        spread REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_summary_run_index ON summary(run_index);
    CREATE TABLE IF NOT EXISTS gfx_trials (
        run_index INTEGER NOT NULL,
        label TEXT NOT NULL,
        trial INTEGER NOT NULL,
        kind TEXT NOT NULL,
        total_frames INTEGER NOT NULL,
        janky_frames INTEGER NOT NULL,
        janky_rate REAL NOT NULL,
        p90_avg REAL NOT NULL,
        p90_sd REAL NOT NULL,
        p90_max INTEGER NOT NULL,
        p95_avg REAL NOT NULL,
        p95_sd REAL NOT NULL,
        p95_max INTEGER NOT NULL,
        p99_avg REAL NOT NULL,
        p99_sd REAL NOT NULL,
        p99_max INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS response_trials (
        run_index INTEGER NOT NULL,
        label TEXT NOT NULL,
        trial INTEGER NOT NULL,
        response_ms REAL NOT NULL,
        compositor_ms REAL NOT NULL,
        total_ms REAL NOT NULL
    );";

/// Stores runs in a SQLite database: one `summary` row per aggregated value
/// plus per-trial detail tables.
#[derive(Clone)]
pub struct SqliteReportSink {
    conn: Connection,
}

/// Everything one run inserts, owned so it can move to the database thread.
struct RunRows {
    run_index: i64,
    context: ReportContext,
    summary: Vec<SummaryRow>,
    gfx: Vec<GfxTrialRow>,
    response: Vec<ResponseTrialRow>,
}

impl SqliteReportSink {
    /// Opens or creates the database at `path` and ensures the schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be opened or initialized.
    pub async fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|err| sqlite_error("open sqlite db", err))?;
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(|err| sqlite_error("initialize sqlite db", err))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl ReportSink for SqliteReportSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn next_run_index(&self, first: u64) -> AppResult<RunIndex> {
        let last: Option<i64> = self
            .conn
            .call(|conn| {
                let last = conn.query_row("SELECT MAX(run_index) FROM summary", [], |row| {
                    row.get::<_, Option<i64>>(0)
                })?;
                Ok(last)
            })
            .await
            .map_err(|err| sqlite_error("query last run index", err))?;
        Ok(match last.and_then(|value| u64::try_from(value).ok()) {
            Some(value) => RunIndex::starting_at(value).next(),
            None => RunIndex::starting_at(first),
        })
    }

    async fn write_report(
        &self,
        context: &ReportContext,
        run: RunIndex,
        metrics: &Metrics,
    ) -> AppResult<()> {
        let mut rows = RunRows {
            run_index: clamp_i64(run.value()),
            context: context.clone(),
            summary: Vec::new(),
            gfx: Vec::new(),
            response: Vec::new(),
        };
        for source in metrics.sources() {
            rows.summary.extend(summary_rows(source));
            match &source.raw {
                RawRecords::Gfx(samples) => rows.gfx.extend(gfx_rows(samples)),
                RawRecords::Response(samples) => rows.response.extend(response_rows(samples)),
            }
        }

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                insert_run(&tx, &rows)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|err| sqlite_error("write sqlite report", err))?;
        Ok(())
    }
}

fn insert_run(tx: &rusqlite::Transaction<'_>, rows: &RunRows) -> rusqlite::Result<()> {
    let context = &rows.context;
    let recorded_at = context.recorded_at.to_rfc3339();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO summary (run_index, label, package, device_model, recorded_at, source, metric, position, mean, spread)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        for row in &rows.summary {
            stmt.execute(rusqlite::params![
                rows.run_index,
                context.label,
                context.package,
                context.device_model,
                recorded_at,
                row.source,
                row.metric,
                clamp_i64(row.position),
                row.mean,
                row.spread
            ])?;
        }
    }
    {
        let mut stmt = tx.prepare(
            "INSERT INTO gfx_trials (run_index, label, trial, kind, total_frames, janky_frames, janky_rate,
                p90_avg, p90_sd, p90_max, p95_avg, p95_sd, p95_max, p99_avg, p99_sd, p99_max)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )?;
        for row in &rows.gfx {
            stmt.execute(rusqlite::params![
                rows.run_index,
                context.label,
                clamp_i64(row.trial),
                row.kind,
                clamp_i64(row.total_frames),
                clamp_i64(row.janky_frames),
                row.janky_rate,
                row.p90_avg,
                row.p90_sd,
                clamp_i64(row.p90_max),
                row.p95_avg,
                row.p95_sd,
                clamp_i64(row.p95_max),
                row.p99_avg,
                row.p99_sd,
                clamp_i64(row.p99_max)
            ])?;
        }
    }
    {
        let mut stmt = tx.prepare(
            "INSERT INTO response_trials (run_index, label, trial, response_ms, compositor_ms, total_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for row in &rows.response {
            stmt.execute(rusqlite::params![
                rows.run_index,
                context.label,
                clamp_i64(row.trial),
                row.response_ms,
                row.compositor_ms,
                row.total_ms
            ])?;
        }
    }
    Ok(())
}

fn sqlite_error(context: &'static str, err: tokio_rusqlite::Error) -> AppError {
    AppError::sink(SinkError::Sqlite {
        context,
        source: err,
    })
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
