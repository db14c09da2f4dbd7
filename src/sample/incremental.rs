use crate::error::AppResult;
use crate::extract::{extract_between, parse_f64};

use super::frames::{FrameBudget, FrameStats};

const PROFILE_DATA_START: &str = "Profile data in ms:";
const PROFILE_DATA_END: &str = "View hierarchy";
/// Window title line and column header line.
const PROFILE_HEADER_LINES: usize = 2;
/// Leading empty field plus draw, prepare, process and execute.
const PROFILE_ROW_FIELDS: usize = 5;
const PROFILE_COLUMN_HEADER: &str = "Draw";

/// One complete profile row: draw, prepare, process, execute.
#[derive(Debug, Clone, Copy)]
struct FrameRow([f64; 4]);

impl FrameRow {
    fn total_ms(self) -> f64 {
        self.0.iter().sum()
    }
}

/// Accumulates raw per-frame profile rows across poll iterations.
///
/// Derived statistics only exist on the [`IncrementalSample`] returned by
/// [`FrameAccumulator::finalize`].
#[derive(Debug)]
pub struct FrameAccumulator {
    budget: FrameBudget,
    dedup_polls: bool,
    draw_ms: Vec<f64>,
    prepare_ms: Vec<f64>,
    process_ms: Vec<f64>,
    execute_ms: Vec<f64>,
    frame_ms: Vec<f64>,
    previous_rows: Vec<String>,
    polls: usize,
    skipped_rows: usize,
}

impl FrameAccumulator {
    #[must_use]
    pub const fn new(budget: FrameBudget, dedup_polls: bool) -> Self {
        Self {
            budget,
            dedup_polls,
            draw_ms: Vec::new(),
            prepare_ms: Vec::new(),
            process_ms: Vec::new(),
            execute_ms: Vec::new(),
            frame_ms: Vec::new(),
            previous_rows: Vec::new(),
            polls: 0,
            skipped_rows: 0,
        }
    }

    /// Appends the complete frame rows of one `dumpsys gfxinfo` poll.
    ///
    /// Rows without exactly five tab-separated fields are dropped. With
    /// de-duplication enabled, rows that repeat the tail of the previous poll
    /// are not counted again. Returns the number of frames appended.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the profile block is missing or a complete
    /// row holds a non-numeric duration.
    pub fn add_chunk(&mut self, text: &str) -> AppResult<usize> {
        let block = extract_between(text, PROFILE_DATA_START, PROFILE_DATA_END)?;
        let mut rows = Vec::new();
        let mut keys = Vec::new();
        for line in block.lines().skip(PROFILE_HEADER_LINES) {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != PROFILE_ROW_FIELDS {
                self.skipped_rows = self.skipped_rows.saturating_add(1);
                continue;
            }
            let [_, draw, prepare, process, execute] = fields.as_slice() else {
                continue;
            };
            if draw.trim() == PROFILE_COLUMN_HEADER {
                continue;
            }
            rows.push(FrameRow([
                parse_f64("draw", draw)?,
                parse_f64("prepare", prepare)?,
                parse_f64("process", process)?,
                parse_f64("execute", execute)?,
            ]));
            keys.push(line.trim().to_owned());
        }

        let repeated = if self.dedup_polls {
            overlap(&self.previous_rows, &keys)
        } else {
            0
        };
        if repeated > 0 {
            tracing::debug!(repeated, "Skipping frame rows already seen in previous poll");
        }

        let fresh = rows.get(repeated..).unwrap_or_default();
        for row in fresh {
            let [draw, prepare, process, execute] = row.0;
            self.draw_ms.push(draw);
            self.prepare_ms.push(prepare);
            self.process_ms.push(process);
            self.execute_ms.push(execute);
            self.frame_ms.push(row.total_ms());
        }
        self.previous_rows = keys;
        self.polls = self.polls.saturating_add(1);
        Ok(fresh.len())
    }

    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frame_ms.len()
    }

    /// Computes the derived statistics once and freezes the sample.
    #[must_use]
    pub fn finalize(self) -> IncrementalSample {
        let stats = FrameStats::measured(&self.frame_ms, self.budget);
        tracing::debug!(
            polls = self.polls,
            total_frames = stats.total_frames,
            janky_frames = stats.janky_frames,
            skipped_rows = self.skipped_rows,
            "Finalized incremental gfx sample"
        );
        IncrementalSample {
            draw_ms: self.draw_ms,
            prepare_ms: self.prepare_ms,
            process_ms: self.process_ms,
            execute_ms: self.execute_ms,
            frame_ms: self.frame_ms,
            polls: self.polls,
            stats,
        }
    }
}

/// Length of the longest suffix of `previous` that is a prefix of `current`.
fn overlap(previous: &[String], current: &[String]) -> usize {
    let max = previous.len().min(current.len());
    (1..=max)
        .rev()
        .find(|len| {
            let tail = previous
                .get(previous.len().saturating_sub(*len)..)
                .unwrap_or_default();
            let head = current.get(..*len).unwrap_or_default();
            tail == head
        })
        .unwrap_or(0)
}

/// A trial assembled from repeated polls of raw per-frame profile data.
#[derive(Debug, Clone)]
pub struct IncrementalSample {
    pub draw_ms: Vec<f64>,
    pub prepare_ms: Vec<f64>,
    pub process_ms: Vec<f64>,
    pub execute_ms: Vec<f64>,
    /// Elementwise sum of the four phase sequences.
    pub frame_ms: Vec<f64>,
    pub polls: usize,
    pub stats: FrameStats,
}
