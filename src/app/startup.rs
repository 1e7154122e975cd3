//! Application startup and simulation orchestration

use crate::analyzer::{FileSink, QueueAnalyzer, ReportFormat, ReportSink};
use crate::app::cli::Args;
use crate::app::config::SimulationConfig;
use crate::core::logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::queue::ExpiringQueue;
use crate::workers::{run_drainer, run_mixed_worker, RandomSource, WorkerTally};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// End-of-run statistics for the whole simulation
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub analyzer_launches: usize,
    pub total_pushed: usize,
    pub total_popped: usize,
    pub rejected_pushes: usize,
    pub empty_pops: usize,
    pub elapsed: Duration,
}

/// Parse arguments, initialise logging and run the simulation to completion
pub fn startup() {
    let args = Args::parse();

    if let Err(err) = logging::init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        args.log_file.as_deref(),
    ) {
        eprintln!("Failed to initialise logging: {err}");
        std::process::exit(1);
    }

    let config = match SimulationConfig::load(&args) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(2);
        }
    };

    log::info!(
        "notiq starting: capacity {}, {} mixed workers, {} drainers, analyzer every {}s, running for {}s",
        config.capacity,
        config.mixed_workers,
        config.drainers,
        config.analyzer_interval_secs,
        config.run_for_secs
    );

    let format = if config.report_json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };
    let sink: Box<dyn ReportSink> = match &config.report_file {
        Some(path) => Box::new(FileSink::create(path, format)),
        None => Box::new(FileSink::with_generated_name(Path::new("."), format)),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("Failed to build tokio runtime: {err}");
            std::process::exit(1);
        }
    };

    let summary = runtime.block_on(async {
        let (coordinator, _shutdown_rx) = ShutdownCoordinator::new();
        let shutdown = Arc::new(coordinator);
        shutdown.install_signal_handlers();
        run_simulation(&config, sink, shutdown).await
    });

    log::info!(
        "Analyzer completed {} analysis passes",
        summary.analyzer_launches
    );
    log::info!(
        "Workers: {} pushed, {} popped, {} pushes rejected, {} empty pops",
        summary.total_pushed,
        summary.total_popped,
        summary.rejected_pushes,
        summary.empty_pops
    );
    log::info!(
        "Simulation ran for {} minutes ({} ms)",
        summary.elapsed.as_secs() / 60,
        summary.elapsed.as_millis()
    );
}

/// Run workers and the analyzer against one shared queue until the
/// configured duration elapses or shutdown is requested
pub async fn run_simulation(
    config: &SimulationConfig,
    sink: Box<dyn ReportSink>,
    shutdown: Arc<ShutdownCoordinator>,
) -> SimulationSummary {
    let started = Instant::now();
    let deadline = started + Duration::from_secs(config.run_for_secs);

    let queue: Arc<ExpiringQueue<u64>> = Arc::new(ExpiringQueue::new(config.capacity));
    let analyzer = Arc::new(QueueAnalyzer::new(
        queue.clone(),
        Duration::from_secs(config.analyzer_interval_secs),
        sink,
    ));

    let analyzer_task = {
        let analyzer = analyzer.clone();
        let shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move { analyzer.run_until(deadline, shutdown_rx).await })
    };

    let mut workers: JoinSet<WorkerTally<u64>> = JoinSet::new();
    for _ in 0..config.mixed_workers {
        workers.spawn(run_mixed_worker(
            queue.clone(),
            deadline,
            shutdown.clone(),
            RandomSource::new(),
        ));
    }
    for _ in 0..config.drainers {
        workers.spawn(run_drainer(
            queue.clone(),
            deadline,
            shutdown.clone(),
            Duration::from_secs(1),
        ));
    }

    let mut summary = SimulationSummary {
        analyzer_launches: 0,
        total_pushed: 0,
        total_popped: 0,
        rejected_pushes: 0,
        empty_pops: 0,
        elapsed: Duration::ZERO,
    };

    while let Some(result) = workers.join_next().await {
        match result {
            Ok(tally) => {
                summary.total_pushed += tally.pushed.len();
                summary.total_popped += tally.popped.len();
                summary.rejected_pushes += tally.rejected;
                summary.empty_pops += tally.empty_pops;
            }
            Err(err) => log::error!("Worker task failed: {err}"),
        }
    }

    match analyzer_task.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => log::error!("Analyzer stopped with error: {err}"),
        Err(err) => log::error!("Analyzer task failed: {err}"),
    }

    summary.analyzer_launches = analyzer.launch_count();
    summary.elapsed = started.elapsed();
    summary
}
