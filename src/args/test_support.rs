use clap::Parser;

use crate::error::{AppError, AppResult};

use super::ProfileArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<ProfileArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    ProfileArgs::try_parse_from(args).map_err(AppError::from)
}
