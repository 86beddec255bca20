//! Harness startup: configuration, logging, pipeline wiring and reporting

use super::args::Args;
use super::display::{render_stats_json, render_stats_table, summary_line};
use clap::Parser;
use flowqueue::core::config::PoolConfig;
use flowqueue::core::logging::init_logging;
use flowqueue::queue::{Queue, QueuePool, SystemQueue, FAILED, SUCCESS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;
use tokio::task::JoinSet;

/// Name of the user queue the producers feed
const INBOX: &str = "inbox";

/// Consumer back-off when the inbox is momentarily empty
const CONSUMER_IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Every n-th item is routed to `_failed`
const FAILURE_MODULUS: u64 = 10;

/// Parse arguments, run the harness and exit with a status code
pub async fn startup() {
    let args = Args::parse();
    let use_color = !args.no_color;

    let log_file = args.log_file.as_ref().map(|p| p.to_string_lossy().to_string());
    if let Err(e) = init_logging(
        Some(args.effective_log_level()),
        args.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error initialising logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args, use_color).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Resolve the pool configuration from file and command line
pub fn resolve_config(args: &Args) -> Result<PoolConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config_file {
        Some(path) => PoolConfig::load(path)?,
        None => match PoolConfig::default_path() {
            Some(path) if path.exists() => PoolConfig::load(&path)?,
            _ => PoolConfig::default(),
        },
    };

    if let Some(size) = args.size {
        config.size = size;
    }
    config.validate()?;
    Ok(config)
}

async fn run(args: Args, use_color: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;
    log::info!(
        "flowqueue starting: {} producer(s) x {} items, queue size {}",
        args.producers,
        args.items,
        config.size
    );

    let pool: Arc<QueuePool<u64>> = Arc::new(QueuePool::with_config(config)?);
    let inbox = pool.create_queue(INBOX)?;
    if args.fall_through {
        log::warn!("Inbox left in fall-through mode; all items will be dropped");
    } else {
        inbox.disable_fall_through();
    }

    let producers_done = Arc::new(AtomicBool::new(false));
    let mut producers = JoinSet::new();
    for producer_id in 0..args.producers as u64 {
        let inbox = Arc::clone(&inbox);
        let items = args.items;
        producers.spawn_blocking(move || {
            for i in 0..items {
                inbox.put(producer_id * items + i);
            }
            log::debug!("Producer {} finished", producer_id);
        });
    }

    let consumer_done = Arc::new(AtomicBool::new(false));
    let consumer = {
        let inbox = Arc::clone(&inbox);
        let success = pool.get_queue(SUCCESS)?;
        let failed = pool.get_queue(FAILED)?;
        let producers_done = Arc::clone(&producers_done);
        let consumer_done = Arc::clone(&consumer_done);
        let delay = Duration::from_micros(args.consumer_delay_us);
        tokio::task::spawn_blocking(move || {
            let producers_finished = || producers_done.load(Ordering::Acquire);
            let processed = consume(&inbox, &success, &failed, producers_finished, delay);
            consumer_done.store(true, Ordering::Release);
            processed
        })
    };

    let sink = {
        let success = pool.get_queue(SUCCESS)?;
        let failed = pool.get_queue(FAILED)?;
        let done = Arc::clone(&consumer_done);
        tokio::task::spawn_blocking(move || drain_outcomes(&success, &failed, &done))
    };

    let report_interval = Duration::from_millis(args.report_interval_ms.max(1));
    let mut ticker = tokio::time::interval(report_interval);
    ticker.tick().await;

    let mut interrupted = false;
    loop {
        tokio::select! {
            joined = producers.join_next() => match joined {
                Some(result) => result?,
                None => break,
            },
            _ = ticker.tick() => report(&pool),
            _ = tokio::signal::ctrl_c() => {
                log::warn!("Interrupted; stopping producers");
                interrupted = true;
                break;
            }
        }
    }

    if interrupted {
        // Let blocked producers finish by discarding what they still hold
        inbox.enable_fall_through();
        while let Some(result) = producers.join_next().await {
            result?;
        }
    }
    producers_done.store(true, Ordering::Release);
    let processed = consumer.await?;
    let (succeeded, failed) = sink.await?;
    log::info!(
        "Consumer processed {} items ({} succeeded, {} failed)",
        processed,
        succeeded,
        failed
    );

    let stats = pool.stats(true);
    match args.output.as_str() {
        "json" => println!("{}", render_stats_json(&stats)?),
        _ => println!("{}", render_stats_table(&stats, use_color)),
    }

    // Nothing reads _metrics or _logs in this harness
    for system_queue in SystemQueue::iter() {
        let drained = pool.get_queue(system_queue.name())?.dump().count();
        log::debug!("Drained {} items from {}", drained, system_queue.name());
    }
    if !pool.join_async().await {
        log::warn!("Pool did not drain before shutdown");
    }

    Ok(())
}

/// Route inbox items to `_success` or `_failed` until producers are done
fn consume(
    inbox: &Queue<u64>,
    success: &Queue<u64>,
    failed: &Queue<u64>,
    producers_finished: impl Fn() -> bool,
    delay: Duration,
) -> u64 {
    let mut processed = 0;
    loop {
        // Check before reading so an item put just ahead of the flag is not stranded
        let finished = producers_finished();
        match inbox.try_get() {
            Ok(item) => {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                if item % FAILURE_MODULUS == FAILURE_MODULUS - 1 {
                    failed.put(item);
                } else {
                    success.put(item);
                }
                processed += 1;
            }
            Err(_) if finished => return processed,
            Err(_) => std::thread::sleep(CONSUMER_IDLE_SLEEP),
        }
    }
}

/// Downstream of the consumer: empty the outcome queues until it stops
fn drain_outcomes(
    success: &Queue<u64>,
    failed: &Queue<u64>,
    consumer_done: &AtomicBool,
) -> (u64, u64) {
    let drain = |queue: &Queue<u64>| std::iter::from_fn(|| queue.try_get().ok()).count() as u64;

    let mut succeeded = 0;
    let mut failures = 0;
    loop {
        // Read the flag first so items put before it was set are still drained
        let finished = consumer_done.load(Ordering::Acquire);
        let drained = (drain(success), drain(failed));
        succeeded += drained.0;
        failures += drained.1;

        if finished {
            return (succeeded, failures);
        }
        if drained == (0, 0) {
            std::thread::sleep(CONSUMER_IDLE_SLEEP);
        }
    }
}

fn report(pool: &QueuePool<u64>) {
    for (name, stats) in pool.stats(false) {
        log::info!("{}", summary_line(&name, &stats));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_config_from_file_with_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pool]\nsize = 50\njoin_timeout_ms = 300").unwrap();

        let args = Args::try_parse_from([
            "flowqueue",
            "--config-file",
            file.path().to_str().unwrap(),
            "--size",
            "5",
        ])
        .unwrap();

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.size, 5);
        assert_eq!(config.join_timeout_ms, 300);
    }

    #[test]
    fn test_resolve_config_rejects_zero_size_override() {
        let args = Args::try_parse_from(["flowqueue", "--size", "0"]).unwrap();
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_consume_routes_items() {
        let inbox = Queue::new(100).unwrap();
        let success = Queue::new(100).unwrap();
        let failed = Queue::new(100).unwrap();
        inbox.disable_fall_through();
        success.disable_fall_through();
        failed.disable_fall_through();
        for i in 0..20 {
            inbox.put(i);
        }

        let processed = consume(&inbox, &success, &failed, || true, Duration::ZERO);

        assert_eq!(processed, 20);
        assert_eq!(failed.dump().collect::<Vec<_>>(), vec![9, 19]);
        assert_eq!(success.size(), 18);
    }

    #[test]
    fn test_consume_routes_item_put_as_producers_finish() {
        let inbox = Queue::new(4).unwrap();
        let success = Queue::new(4).unwrap();
        let failed = Queue::new(4).unwrap();
        inbox.disable_fall_through();
        success.disable_fall_through();

        // The last producer puts its item and finishes while the consumer is idle
        let last_put = std::cell::Cell::new(false);
        let producers_finished = || {
            if !last_put.replace(true) {
                inbox.put(42);
            }
            true
        };

        let processed = consume(&inbox, &success, &failed, producers_finished, Duration::ZERO);

        assert_eq!(processed, 1);
        assert!(inbox.is_empty());
        assert_eq!(success.try_get(), Ok(42));
    }

    #[test]
    fn test_drain_outcomes_counts_both_queues() {
        let success = Queue::new(10).unwrap();
        let failed = Queue::new(10).unwrap();
        success.disable_fall_through();
        failed.disable_fall_through();
        (0..4).for_each(|i| success.put(i));
        failed.put(9);

        let done = AtomicBool::new(true);
        assert_eq!(drain_outcomes(&success, &failed, &done), (4, 1));
        assert!(success.is_empty());
        assert_eq!(failed.stats().out_total, 1);
    }
}
