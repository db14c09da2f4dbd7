use std::time::Duration;

use super::types::{PositiveU64, PositiveUsize};
use crate::config::parse_duration_value;
use crate::error::{AppError, AppResult, ValidationError};
use crate::sample::FrameBudget;

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::from)
}

pub(crate) fn parse_frame_budget(s: &str) -> AppResult<FrameBudget> {
    let ms: f64 = s.trim().parse().map_err(|_err| {
        AppError::validation(ValidationError::InvalidFrameBudget {
            value: s.to_owned(),
        })
    })?;
    FrameBudget::new(ms).map_err(AppError::from)
}
