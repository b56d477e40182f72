// Logging for jobq
//
// Queues and pools are instrumented with `tracing`; this module only installs a
// subscriber. Nothing here is required: without a subscriber the events are
// simply discarded.
//
// # Usage Examples
//
// ```rust
// use jobq::logging;
//
// // INFO level, human-readable console output
// logging::init_default();
//
// // Or pick every knob yourself
// let config = logging::LogConfig {
//     level: tracing::Level::DEBUG,
//     target_filters: Some("jobq::pool=trace".to_string()),
//     ..Default::default()
// };
// logging::init(config);
// ```
//
// Only the first initialisation in a process takes effect; later calls are
// no-ops, which keeps test binaries that call `init_test` from every test safe.
//
// ## What gets logged
//
// - pool lifecycle (started, terminating, terminated) at INFO
// - worker start/exit at DEBUG
// - refused enqueues and queue deactivation at TRACE
// - handler errors at WARN, handler panics and worker join failures at ERROR

use std::fs::{File, OpenOptions};
use std::io;
use std::sync::{Mutex, Once};

use tracing::{Level, Subscriber};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Configuration for the jobq logging setup
///
/// # Examples
///
/// ```rust
/// use jobq::logging::LogConfig;
/// use tracing::Level;
///
/// let config = LogConfig {
///     level: Level::DEBUG,
///     json_format: true,
///     show_file_line: false,
///     show_thread_info: true,
///     show_time: true,
///     target_filters: Some("jobq=debug,jobq::queue=trace".to_string()),
/// };
/// assert!(config.json_format);
/// ```
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: Level,
    /// Whether to use JSON format for logs (JSON output always carries timestamps)
    pub json_format: bool,
    /// Whether to include file and line information
    pub show_file_line: bool,
    /// Whether to include thread name/id; worker threads are named after their pool
    pub show_thread_info: bool,
    /// Whether to include timestamps
    pub show_time: bool,
    /// Target filter expressions (format: "target=level,target2=level2,...")
    pub target_filters: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            show_file_line: true,
            show_thread_info: true,
            show_time: true,
            target_filters: None,
        }
    }
}

static INIT: Once = Once::new();

fn build_filter(config: &LogConfig) -> EnvFilter {
    let mut env_filter = EnvFilter::from_default_env().add_directive(config.level.into());

    if let Some(filters) = &config.target_filters {
        for filter in filters.split(',') {
            if let Ok(directive) = filter.trim().parse() {
                env_filter = env_filter.add_directive(directive);
            }
        }
    }

    env_filter
}

/// Install the global subscriber described by `config`.
///
/// Safe to call repeatedly; only the first call in the process has an effect.
pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(build_filter(&config));

        if config.json_format {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_file(config.show_file_line)
                .with_line_number(config.show_file_line)
                .with_thread_names(config.show_thread_info)
                .with_thread_ids(config.show_thread_info);
            set_global_subscriber(registry.with(json_layer));
            return;
        }

        let console_layer = fmt::layer()
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .with_thread_names(config.show_thread_info)
            .with_thread_ids(config.show_thread_info);

        if config.show_time {
            set_global_subscriber(registry.with(console_layer));
        } else {
            set_global_subscriber(registry.with(console_layer.without_time()));
        }
    });
}

fn set_global_subscriber<S>(subscriber: S)
where
    S: Subscriber + Send + Sync + 'static,
{
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error setting global tracing subscriber: {}", err);
    }
}

/// Open `path` for appending log lines, creating it if needed.
pub fn file_writer(path: &str) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Log to the console as `config` describes and, in plain text, to `log_file`.
///
/// The file is opened before anything is installed so a bad path is reported
/// to the caller. If logging was already initialised this returns `Ok(())`
/// without touching the file.
pub fn init_with_file(config: LogConfig, log_file: &str) -> io::Result<()> {
    if INIT.is_completed() {
        return Ok(());
    }
    let file = file_writer(log_file)?;

    INIT.call_once(|| {
        let console_layer = fmt::layer()
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .with_thread_names(config.show_thread_info)
            .with_thread_ids(config.show_thread_info);

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_thread_ids(true);

        let subscriber = tracing_subscriber::registry()
            .with(build_filter(&config))
            .with(console_layer)
            .with(file_layer);

        set_global_subscriber(subscriber);
    });

    Ok(())
}

/// INFO level, human-readable console output.
pub fn init_default() {
    init(LogConfig::default());
}

/// DEBUG everywhere, TRACE for the pool, with file/line information.
pub fn init_development() {
    init(LogConfig {
        level: Level::DEBUG,
        target_filters: Some("jobq=debug,jobq::pool=trace".to_string()),
        ..Default::default()
    });
}

/// INFO level JSON without file/line information, for log aggregators.
pub fn init_production() {
    init(LogConfig {
        level: Level::INFO,
        json_format: true,
        show_file_line: false,
        show_thread_info: true,
        show_time: true,
        target_filters: None,
    });
}

/// Warnings and errors only, compact output.
///
/// ```rust
/// jobq::logging::init_test();
/// jobq::logging::init_test(); // no-op
/// ```
pub fn init_test() {
    init(LogConfig {
        level: Level::WARN,
        json_format: false,
        show_file_line: true,
        show_thread_info: false,
        show_time: false,
        target_filters: None,
    });
}

/// Span covering everything a pool does
///
/// ```rust
/// let id = uuid::Uuid::new_v4();
/// let span = jobq::pool_span!(id, workers = 4);
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! pool_span {
    ($pool_id:expr) => {
        tracing::info_span!("pool", id = %$pool_id)
    };
    ($pool_id:expr, $($fields:tt)*) => {
        tracing::info_span!("pool", id = %$pool_id, $($fields)*)
    };
}

/// Span covering one worker thread's loop
#[macro_export]
macro_rules! worker_span {
    ($pool_id:expr, $index:expr) => {
        tracing::debug_span!("worker", pool = %$pool_id, index = $index)
    };
}

/// Log pool lifecycle events
///
/// ```rust
/// let id = uuid::Uuid::new_v4();
/// jobq::log_lifecycle!(id, "terminated", discarded = 0);
/// ```
#[macro_export]
macro_rules! log_lifecycle {
    ($pool_id:expr, $event:expr) => {
        tracing::info!(pool = %$pool_id, event = $event)
    };
    ($pool_id:expr, $event:expr, $($fields:tt)*) => {
        tracing::info!(pool = %$pool_id, event = $event, $($fields)*)
    };
}

/// Log a handler error with its full context chain
#[macro_export]
macro_rules! log_job_failure {
    ($worker:expr, $error:expr) => {{
        let rendered = format!("{:#}", $error);
        tracing::warn!(worker = $worker, error = %rendered, "job failed");
    }};
}

/// The dispatcher active on the calling thread.
///
/// Worker threads are entered under the dispatcher captured when their pool was
/// built, so a scoped subscriber (for example one installed with
/// `tracing::subscriber::set_default` in a test) also sees worker events.
#[inline]
pub fn current_subscriber() -> tracing::Dispatch {
    tracing::dispatcher::get_default(|d| d.clone())
}

pub use tracing::{debug, error, info, trace, warn};
