use std::env::var;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{Layer, Registry, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Where log lines end up.
///
/// The continuous dashboard owns the terminal, so it either logs to a file or
/// not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
    Discard,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber for `sink` at INFO unless `RUST_LOG` says otherwise.
pub fn init(sink: LogSink) -> io::Result<()> {
    let layer = build_layer(sink, LevelFilter::INFO)?;
    tracing_subscriber::registry().with(layer).init();
    Ok(())
}

fn build_layer(sink: LogSink, level: LevelFilter) -> io::Result<BoxedLayer> {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    let log_format = var("RUST_LOG_FORMAT").unwrap_or_default();

    let layer = match sink {
        LogSink::Stderr => format_layer(&log_format, io::stderr, true, env_filter),
        LogSink::File(path) => {
            let file = open_log_file(&path)?;
            format_layer(&log_format, Mutex::new(file), false, env_filter)
        }
        LogSink::Discard => format_layer(&log_format, io::sink, false, env_filter),
    };
    Ok(layer)
}

fn format_layer<W>(format: &str, writer: W, ansi: bool, filter: EnvFilter) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_ansi(ansi)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
