use super::test_support::parse_test_args;
use crate::collector::ProfilingKind;
use crate::error::AppResult;
use crate::sample::DEFAULT_FRAME_BUDGET_MS;
use std::time::Duration;

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn defaults_cover_a_plain_gfx_run() -> AppResult<()> {
    let args = parse_test_args(["framescope", "--package", "com.example.app"])?;
    if args.trials.get() != 10 || args.hold != Duration::from_secs(5) {
        return Err("Unexpected trial defaults".into());
    }
    if args.kinds()? != [ProfilingKind::Gfx] {
        return Err("Expected gfx by default".into());
    }
    if !close(args.frame_budget.as_ms(), DEFAULT_FRAME_BUDGET_MS) {
        return Err("Unexpected frame budget".into());
    }
    let settings = args.collector_settings()?;
    if !settings.dedup_polls || settings.poll_interval != Duration::from_secs(1) {
        return Err("Unexpected collector settings".into());
    }
    if args.label()? != "com.example.app" || !args.report_config().is_empty() {
        return Err("Unexpected label or report defaults".into());
    }
    Ok(())
}

#[test]
fn kinds_are_sorted_and_deduplicated() -> AppResult<()> {
    let args = parse_test_args([
        "framescope",
        "-p",
        "com.example.app",
        "--kind",
        "response,gfx,response",
    ])?;
    if args.kinds()? != [ProfilingKind::Gfx, ProfilingKind::Response] {
        return Err(format!("Unexpected kinds: {:?}", args.kinds).into());
    }
    Ok(())
}

#[test]
fn rejects_invalid_values() -> AppResult<()> {
    let cases: [&[&str]; 5] = [
        &["framescope", "--trials", "0"],
        &["framescope", "--hold", "5 parsecs"],
        &["framescope", "--hold", "0s"],
        &["framescope", "--frame-budget-ms", "-4"],
        &["framescope", "--kind", "memory"],
    ];
    for case in cases {
        if parse_test_args(case.iter().copied()).is_ok() {
            return Err(format!("Expected rejection for {:?}", case).into());
        }
    }
    Ok(())
}

#[test]
fn package_is_required_for_settings() -> AppResult<()> {
    let args = parse_test_args(["framescope", "--package", "  "])?;
    if args.package().is_ok() || args.collector_settings().is_ok() {
        return Err("Blank package should be rejected".into());
    }
    Ok(())
}

#[test]
fn maps_report_and_collector_flags() -> AppResult<()> {
    let args = parse_test_args([
        "framescope",
        "-p",
        "com.example.app",
        "--label",
        "cold start",
        "--serial",
        "R58M123",
        "--no-dedup",
        "--poll-interval",
        "250ms",
        "--frame-budget-ms",
        "8.333",
        "--json-dir",
        "reports",
        "--first-row",
        "11",
    ])?;
    if args.target() != "R58M123" || args.label()? != "cold start" {
        return Err("Unexpected target or label".into());
    }
    let settings = args.collector_settings()?;
    if settings.dedup_polls || settings.poll_interval != Duration::from_millis(250) {
        return Err("Unexpected polling settings".into());
    }
    if !close(settings.frame_budget.as_ms(), 8.333) {
        return Err("Unexpected frame budget".into());
    }
    let report = args.report_config();
    if report.json_dir.as_deref() != Some("reports") || report.first_row() != 11 {
        return Err(format!("Unexpected report config: {:?}", report).into());
    }
    Ok(())
}
