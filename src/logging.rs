//! src/logging.rs
//! ============================================================================
//! # Logger: Tracing Initialisation
//!
//! Daily rolling file logs plus an optional stderr layer, with a compact
//! `[SEQ] LEVEL [file:line mod::path] message` formatter. Log files land in
//! the platform data directory when it can be resolved, falling back to a
//! local `logs/` directory.

use std::{
    fs,
    path::PathBuf,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use directories::ProjectDirs;
use tracing::Metadata;
use tracing_appender::rolling::{RollingFileAppender, daily};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    prelude::*,
};

pub struct Logger;

impl Logger {
    /// Call **once** near the start of the host process.
    pub fn init_tracing() {
        let log_dir: PathBuf = Self::log_dir();
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("cannot create log dir {}: {e}", log_dir.display());
            return;
        }

        SEQ.get_or_init(|| AtomicUsize::new(1));

        // daily rolling file appender → <log_dir>/projnav-YYYY-MM-DD.log
        let file: RollingFileAppender = daily(&log_dir, "projnav");

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(file)
            .with_ansi(false)
            .with_filter(env_filter());

        // optional stderr layer for live debugging
        let stderr_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_filter(env_filter());

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .init();
    }

    /// Platform data dir (e.g. `~/.local/share/projnav/logs`), or `logs/`.
    fn log_dir() -> PathBuf {
        ProjectDirs::from("org", "projnav", "projnav")
            .map(|dirs: ProjectDirs| dirs.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::level_filters::LevelFilter::INFO.into())
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically increasing sequence number
        let seq: usize = SEQ
            .get()
            .map(|s: &AtomicUsize| s.fetch_add(1, Ordering::Relaxed))
            .unwrap_or(0);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        // write all key-value pairs for this event (usually just the message)
        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
