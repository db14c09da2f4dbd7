use super::gfx::drain_gfx;
use super::*;
use crate::error::{AppError, AppResult};
use crate::metrics::{MetricValue, RawRecords};
use crate::sample::{AggregateSample, GfxSample};
use crate::shell::test_support::ScriptedRunner;
use crate::shell::{ATRACE_START, ATRACE_STOP, gfxinfo_dump, gfxinfo_reset};
use std::future::Future;

const PACKAGE: &str = "com.example.launcher";
const TARGET: &str = "emulator-5554";

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::from(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn aggregate_dump(total: u64, janky: u64) -> String {
    format!(
        "** Graphics info for pid 4321 [{PACKAGE}] **\n\
         Stats since: 1000ns\n\
         Total frames rendered: {total}\n\
         Janky frames: {janky} (0.00%)\n\
         50th percentile: 8ms\n\
         90th percentile: 20ms\n\
         95th percentile: 35ms\n\
         99th percentile: 60ms\n\
         Number Missed Vsync: 0\n\
         Number High input latency: 0\n\
         Number Slow UI thread: 0\n\
         Number Slow bitmap uploads: 0\n\
         Number Slow issue draw commands: 0\n\
         HISTOGRAM: 8ms=6 16ms=3 35ms=1\n"
    )
}

fn profile_dump(rows: &[&str]) -> String {
    let mut dump = format!(
        "Profile data in ms:\n\n\t{PACKAGE}/{PACKAGE}.Home/android.view.ViewRootImpl@1 (visibility=0)\n\tDraw\tPrepare\tProcess\tExecute\n"
    );
    for row in rows {
        dump.push_str(row);
        dump.push('\n');
    }
    dump.push_str("\nView hierarchy:\n");
    dump
}

fn trace_line(process: &str, seconds: &str, message: &str) -> String {
    format!(
        "  {:<20} ( 1200) [001] ...1 {:>12}: tracing_mark_write: {}",
        process, seconds, message
    )
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

fn settings() -> CollectorSettings {
    let mut settings = CollectorSettings::new(PACKAGE);
    settings.poll_interval = Duration::from_millis(5);
    settings
}

fn gfx_value(metrics: &Metrics, name: &str) -> AppResult<MetricValue> {
    metrics
        .get(GFX_SOURCE)
        .and_then(|source| source.series.get(name))
        .ok_or_else(|| AppError::from(format!("Missing gfx metric '{}'", name)))
}

#[test]
fn strategy_follows_api_level() -> AppResult<()> {
    if GfxStrategy::for_api_level(22) != GfxStrategy::Continuous {
        return Err("API 22 should poll continuously".into());
    }
    if GfxStrategy::for_api_level(SNAPSHOT_MIN_API_LEVEL) != GfxStrategy::Snapshot {
        return Err("API 23 should snapshot".into());
    }
    if GfxStrategy::for_api_level(34) != GfxStrategy::Snapshot {
        return Err("API 34 should snapshot".into());
    }
    let runner = Arc::new(ScriptedRunner::new());
    let collector = create_collector(ProfilingKind::Response, 22, settings(), runner);
    if collector.kind() != ProfilingKind::Response || collector.state() != TraceState::Idle {
        return Err("Unexpected response collector".into());
    }
    Ok(())
}

#[test]
fn snapshot_records_one_sample_per_trial() -> AppResult<()> {
    run_async_test(async {
        let runner = Arc::new(
            ScriptedRunner::new()
                .reply(&gfxinfo_dump(PACKAGE), &aggregate_dump(10, 1))
                .reply(&gfxinfo_dump(PACKAGE), &aggregate_dump(10, 3)),
        );
        let mut collector = SnapshotGfxCollector::new(settings(), runner.clone());
        for _ in 0..2 {
            collector.begin(TARGET).await?;
            collector.end(TARGET).await?;
        }
        if collector.trials() != 2 || runner.count(&gfxinfo_reset(PACKAGE)) != 2 {
            return Err(format!("Unexpected calls: {:?}", runner.calls()).into());
        }
        let rates: Vec<f64> = collector
            .samples()
            .iter()
            .map(|sample| sample.stats().janky_rate)
            .collect();
        if !close(rates.iter().sum(), 0.4) {
            return Err(format!("Unexpected janky rates: {:?}", rates).into());
        }
        Ok(())
    })
}

#[test]
fn begin_and_end_are_idempotent() -> AppResult<()> {
    run_async_test(async {
        let runner = Arc::new(
            ScriptedRunner::new().reply(&gfxinfo_dump(PACKAGE), &aggregate_dump(10, 1)),
        );
        let mut collector = SnapshotGfxCollector::new(settings(), runner.clone());
        collector.end(TARGET).await?;
        collector.begin(TARGET).await?;
        collector.begin(TARGET).await?;
        if collector.state() != TraceState::Tracing {
            return Err("Collector should be tracing".into());
        }
        collector.end(TARGET).await?;
        collector.end(TARGET).await?;
        if runner.count(&gfxinfo_reset(PACKAGE)) != 1 || runner.count(&gfxinfo_dump(PACKAGE)) != 1
        {
            return Err(format!("Unexpected calls: {:?}", runner.calls()).into());
        }
        if collector.trials() != 1 {
            return Err("Expected exactly one trial".into());
        }
        Ok(())
    })
}

#[test]
fn failed_snapshot_trial_leaves_no_sample() -> AppResult<()> {
    run_async_test(async {
        let runner =
            Arc::new(ScriptedRunner::new().reply(&gfxinfo_dump(PACKAGE), "Total frames rendered: 3"));
        let mut collector = SnapshotGfxCollector::new(settings(), runner);
        collector.begin(TARGET).await?;
        let result = collector.end(TARGET).await;
        if !matches!(result, Err(ref err) if err.is_parse()) {
            return Err(format!("Expected parse failure, got {:?}", result).into());
        }
        if collector.trials() != 0 || collector.state() != TraceState::Idle {
            return Err("Failed trial should not be recorded".into());
        }
        Ok(())
    })
}

#[test]
fn continuous_stop_before_first_poll_yields_empty_trial() -> AppResult<()> {
    run_async_test(async {
        let runner = Arc::new(ScriptedRunner::new());
        let mut slow = settings();
        slow.poll_interval = Duration::from_secs(60);
        let mut collector = ContinuousGfxCollector::new(slow, runner.clone());
        collector.begin(TARGET).await?;
        collector.end(TARGET).await?;
        let Some(sample) = collector.samples().first() else {
            return Err("Expected one sample".into());
        };
        if sample.stats().total_frames != 0 || !close(sample.stats().janky_rate, 0.0) {
            return Err(format!("Unexpected stats: {:?}", sample.stats()).into());
        }
        if runner.count(&gfxinfo_dump(PACKAGE)) != 0 {
            return Err("No dump expected before the first interval".into());
        }
        Ok(())
    })
}

#[test]
fn continuous_polling_counts_repeated_rows_once() -> AppResult<()> {
    run_async_test(async {
        let dump = profile_dump(&["\t5.0\t1.0\t4.0\t2.0", "\t12.0\t1.0\t6.0\t1.0"]);
        let runner = Arc::new(ScriptedRunner::new().reply(&gfxinfo_dump(PACKAGE), &dump));
        let mut collector = ContinuousGfxCollector::new(settings(), runner.clone());
        collector.begin(TARGET).await?;
        tokio::time::sleep(Duration::from_millis(100)).await;
        if collector.state() != TraceState::Tracing {
            return Err("Collector should be tracing".into());
        }
        collector.end(TARGET).await?;
        if runner.count(&gfxinfo_dump(PACKAGE)) < 2 {
            return Err(format!("Expected repeated polls: {:?}", runner.calls()).into());
        }
        let Some(GfxSample::Incremental(sample)) = collector.samples().first() else {
            return Err("Expected an incremental sample".into());
        };
        let total: f64 = sample.frame_ms.iter().sum();
        if sample.frame_ms.len() != 2 || !close(total, 32.0) || sample.stats.janky_frames != 1 {
            return Err(format!("Unexpected frames: {:?}", sample.frame_ms).into());
        }
        Ok(())
    })
}

#[test]
fn poll_failure_surfaces_at_end() -> AppResult<()> {
    run_async_test(async {
        let runner = Arc::new(ScriptedRunner::new().fail(&gfxinfo_dump(PACKAGE)));
        let mut collector = ContinuousGfxCollector::new(settings(), runner);
        collector.begin(TARGET).await?;
        tokio::time::sleep(Duration::from_millis(50)).await;
        if collector.end(TARGET).await.is_ok() {
            return Err("Expected the poll failure to surface".into());
        }
        if collector.trials() != 0 || collector.state() != TraceState::Idle {
            return Err("Failed trial should not be recorded".into());
        }
        Ok(())
    })
}

#[test]
fn response_trials_drain_into_metrics() -> AppResult<()> {
    run_async_test(async {
        let trace = [
            trace_line("InputDispatcher-812", "1.000000", "deliverInputEvent"),
            trace_line("surfaceflinger-400", "1.020000", PACKAGE),
            trace_line("surfaceflinger-400", "1.050000", PACKAGE),
        ]
        .join("\n");
        let runner = Arc::new(ScriptedRunner::new().reply(ATRACE_STOP, &trace));
        let mut collector: Box<dyn TraceCollector> =
            Box::new(ResponseCollector::new(PACKAGE, runner.clone()));
        collector.begin(TARGET).await?;
        collector.end(TARGET).await?;
        if runner.count(ATRACE_START) != 1 {
            return Err("Trace was not started".into());
        }
        let mut metrics = Metrics::new();
        collector.drain_into(&mut metrics);
        let Some(source) = metrics.get(RESPONSE_SOURCE) else {
            return Err("Missing response source".into());
        };
        let names: Vec<&str> = source.series.iter().map(|(name, _)| name).collect();
        if names != ["Response", "Surface Flinger", "Total"] {
            return Err(format!("Unexpected names: {:?}", names).into());
        }
        let total = source.series.get("Total").map(|value| value.mean);
        if !total.is_some_and(|total| close(total, 50.0)) {
            return Err(format!("Unexpected total: {:?}", total).into());
        }
        if !matches!(&source.raw, RawRecords::Response(samples) if samples.len() == 1) {
            return Err("Raw samples not attached".into());
        }
        Ok(())
    })
}

#[test]
fn gfx_drain_reduces_trials() -> AppResult<()> {
    let samples: Vec<GfxSample> = [(10, 1), (10, 3)]
        .into_iter()
        .map(|(total, janky)| AggregateSample::parse(aggregate_dump(total, janky)))
        .map(|sample| sample.map(GfxSample::Aggregate))
        .collect::<AppResult<_>>()?;
    let p90 = samples
        .first()
        .map(|sample| (sample.stats().mean.p90, sample.stats().sd.p90))
        .ok_or_else(|| AppError::from("Missing sample"))?;

    let mut metrics = Metrics::new();
    drain_gfx(samples, &mut metrics);

    let janky = gfx_value(&metrics, "Janky Rate")?;
    if !close(janky.mean, 0.2) || !close(janky.spread, 0.1) {
        return Err(format!("Unexpected janky rate: {}", janky).into());
    }
    let band = gfx_value(&metrics, "90th Percentile")?;
    if !close(band.mean, p90.0) || !close(band.spread, p90.1) {
        return Err(format!("Unexpected 90th band: {}", band).into());
    }
    for name in ["95th Percentile", "99th Percentile"] {
        gfx_value(&metrics, name)?;
    }
    Ok(())
}

#[test]
fn profiling_kind_names_match_sources() -> AppResult<()> {
    if ProfilingKind::Gfx.as_str() != GFX_SOURCE || ProfilingKind::Response.as_str() != RESPONSE_SOURCE
    {
        return Err("Kind names diverge from metric sources".into());
    }
    Ok(())
}

#[test]
fn profiling_kind_parses_names() -> AppResult<()> {
    let parsed: ProfilingKind = " Response ".parse()?;
    if parsed != ProfilingKind::Response {
        return Err(AppError::from(format!("Unexpected kind: {}", parsed.as_str())));
    }
    match "frames".parse::<ProfilingKind>() {
        Err(ValidationError::InvalidProfilingKind { value }) if value == "frames" => Ok(()),
        other => Err(AppError::from(format!("Unexpected parse result: {other:?}"))),
    }
}
