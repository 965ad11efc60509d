use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Initialise logging. With `debug` the default level is `debug` and can be
/// overridden via `RUST_LOG`; otherwise `info` is forced so a stray
/// `RUST_LOG` in the environment does not produce verbose output.
///
/// When `file` is given, output is also appended to that file through a
/// non-blocking writer. Calling this more than once keeps the first
/// subscriber.
pub fn init(debug: bool, file: Option<PathBuf>) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let Some(path) = file else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        return;
    };

    if FILE_GUARD.get().is_some() {
        return;
    }

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let Some(file_name) = path.file_name() else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        return;
    };

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr.and(writer))
        .try_init()
        .is_ok();

    if installed {
        let _ = FILE_GUARD.set(guard);
    }
}
