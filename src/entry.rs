use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::ProfileArgs;
use crate::collector::ProfilingKind;
use crate::config::{CONFIG_JSON_NAME, CONFIG_TOML_NAME};
use crate::error::AppResult;
use crate::metrics::Metrics;
use crate::session::ProfilingSession;
use crate::shell::{AdbRunner, CommandRunner, query_product_model};
use crate::sinks::{ReportContext, open_sinks, resume_run_index, write_reports};

/// Reported when the device does not answer the model query.
const UNKNOWN_DEVICE_MODEL: &str = "unknown";
/// Decimal places of the printed summary.
const SUMMARY_PRECISION: usize = 3;

pub(crate) fn run() -> AppResult<()> {
    let Some((mut args, matches)) = parse_args()? else {
        return Ok(());
    };

    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, &matches, &config)?;
    }

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<Option<(ProfileArgs, ArgMatches)>> {
    let mut cmd = ProfileArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = ProfileArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    ![CONFIG_TOML_NAME, CONFIG_JSON_NAME]
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: ProfileArgs) -> AppResult<()> {
    let kinds = args.kinds()?;
    let label = args.label()?.to_owned();
    let package = args.package()?.to_owned();
    let settings = args.collector_settings()?;
    let target = args.target();

    let runner: Arc<dyn CommandRunner> = Arc::new(AdbRunner::new(
        Some(args.adb_path.clone()),
        args.command_timeout,
    ));
    let device_model = match query_product_model(runner.as_ref(), target).await {
        Ok(model) if !model.is_empty() => model,
        Ok(_) => UNKNOWN_DEVICE_MODEL.to_owned(),
        Err(err) => {
            tracing::warn!("Failed to read device model: {}", err);
            UNKNOWN_DEVICE_MODEL.to_owned()
        }
    };

    let mut session =
        ProfilingSession::open(Arc::clone(&runner), target, args.api_level, settings).await?;
    let metrics = run_trials(&mut session, &kinds, args.trials.get(), args.hold).await?;

    println!("{}", label);
    print!("{:.precision$}", metrics, precision = SUMMARY_PRECISION);

    let report = args.report_config();
    if report.is_empty() {
        return Ok(());
    }
    let sinks = open_sinks(&report).await?;
    let run = resume_run_index(&sinks, report.first_row()).await?;
    let context = ReportContext::new(&label, &package, &device_model);
    write_reports(&sinks, &context, run, &metrics).await
}

/// Runs `trials` trials of `hold` each, then drains the session.
///
/// Ctrl-C ends the running trial and reports the trials completed so far.
async fn run_trials(
    session: &mut ProfilingSession,
    kinds: &[ProfilingKind],
    trials: usize,
    hold: Duration,
) -> AppResult<Metrics> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    for trial in 1..=trials {
        session.start(kinds).await?;
        tracing::info!(trial, trials, "Trial running");
        let interrupted = tokio::select! {
            () = tokio::time::sleep(hold) => false,
            _ = &mut shutdown => true,
        };
        session.pause().await?;
        if interrupted {
            tracing::warn!(completed = trial, "Interrupted; reporting completed trials");
            break;
        }
    }
    session.finish().await
}
