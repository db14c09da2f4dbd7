use crate::error::{AppError, AppResult, ParseError};
use crate::extract::parse_f64;

const INPUT_MARKER: &str = "InputDispatcher";
const COMPOSITOR_MARKER: &str = "surfaceflinger";
const TRACE_MARK: &str = ": tracing_mark_write";
/// Width of the seconds timestamp column preceding the trace mark.
const TIMESTAMP_WIDTH: usize = 13;
const MS_PER_SECOND: f64 = 1000.0;

/// Recorded when a trial's trace holds no input or no compositor events.
pub const NO_MATCH_MS: f64 = -1.0;

/// Input-to-compositor latency for one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSample {
    /// Input dispatch event timestamps in milliseconds, in trace order.
    pub input_ms: Vec<f64>,
    /// Compositor event timestamps for the target package, in trace order.
    pub compositor_ms: Vec<f64>,
    /// First compositor event minus last input event.
    pub response_ms: f64,
    /// Span between the first and last compositor event.
    pub compositor_phase_ms: f64,
}

impl ResponseSample {
    /// Scans an `atrace` dump for input and compositor trace marks.
    ///
    /// A trace without matching lines yields [`NO_MATCH_MS`] for both derived
    /// fields rather than an error.
    ///
    /// # Errors
    ///
    /// Returns a parse error when a matching trace mark carries an unreadable
    /// timestamp.
    pub fn parse(text: &str, package: &str) -> AppResult<Self> {
        let mut input_ms = Vec::new();
        let mut compositor_ms = Vec::new();
        for line in text.lines() {
            let is_input = line.contains(INPUT_MARKER);
            let is_compositor = line.contains(COMPOSITOR_MARKER) && line.contains(package);
            if !is_input && !is_compositor {
                continue;
            }
            let Some(timestamp) = trace_timestamp_ms(line)? else {
                tracing::trace!(line, "Matched trace line without tracing mark");
                continue;
            };
            if is_input {
                input_ms.push(timestamp);
            }
            if is_compositor {
                compositor_ms.push(timestamp);
            }
        }
        Ok(Self::from_events(input_ms, compositor_ms))
    }

    #[must_use]
    pub fn from_events(input_ms: Vec<f64>, compositor_ms: Vec<f64>) -> Self {
        let (response_ms, compositor_phase_ms) =
            match (input_ms.last(), compositor_ms.first(), compositor_ms.last()) {
                (Some(last_input), Some(first_frame), Some(last_frame)) => {
                    (first_frame - last_input, last_frame - first_frame)
                }
                _ => (NO_MATCH_MS, NO_MATCH_MS),
            };
        Self {
            input_ms,
            compositor_ms,
            response_ms,
            compositor_phase_ms,
        }
    }

    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.input_ms.is_empty() && !self.compositor_ms.is_empty()
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.response_ms + self.compositor_phase_ms
    }
}

/// Reads the seconds column right before the trace mark, in milliseconds.
fn trace_timestamp_ms(line: &str) -> AppResult<Option<f64>> {
    let Some(mark) = line.find(TRACE_MARK) else {
        return Ok(None);
    };
    let invalid = || {
        AppError::parse(ParseError::TraceTimestamp {
            line: line.to_owned(),
        })
    };
    let column = line
        .get(mark.saturating_sub(TIMESTAMP_WIDTH)..mark)
        .ok_or_else(invalid)?;
    let seconds = column.split_whitespace().last().ok_or_else(invalid)?;
    let seconds = parse_f64("trace_timestamp", seconds).map_err(|_err| invalid())?;
    Ok(Some(seconds * MS_PER_SECOND))
}
