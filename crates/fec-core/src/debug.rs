use core::fmt;
use std::fs::OpenOptions;
use std::io;
use std::sync::Once;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, fmt as tracingfmt};

/// Formats events as "LEVEL [crate/module] file:line: message", with the message column aligned.
struct AlignedFormatter {
    ansi: bool,
}

impl<S, N> FormatEvent<S, N> for AlignedFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let (color_level, color_reset) = if self.ansi {
            match *metadata.level() {
                tracing::Level::ERROR => ("\x1b[31m", "\x1b[0m"),
                tracing::Level::WARN => ("\x1b[33m", "\x1b[0m"),
                tracing::Level::INFO => ("\x1b[32m", "\x1b[0m"),
                tracing::Level::DEBUG => ("\x1b[34m", "\x1b[0m"),
                tracing::Level::TRACE => ("\x1b[35m", "\x1b[0m"),
            }
        } else {
            ("", "")
        };

        // "crates/fec-codec/src/components/viterbi.rs" becomes "[codec/components] viterbi.rs"
        let file_path = metadata.file().unwrap_or("unknown");
        let formatted_path = if let Some(src_idx) = file_path.find("/src/") {
            let before_src = &file_path[..src_idx];
            let after_src = &file_path[src_idx + 5..];

            let crate_name = if let Some(fec_idx) = before_src.rfind("fec-") {
                &before_src[fec_idx + 4..]
            } else {
                before_src.rsplit('/').next().unwrap_or("unknown")
            };

            if let Some(last_slash) = after_src.rfind('/') {
                let module_path = &after_src[..last_slash];
                let filename = &after_src[last_slash + 1..];
                let first_module = module_path.split('/').next().unwrap_or("");
                format!("[{}/{}] {}", crate_name, first_module, filename)
            } else {
                format!("[{}] {}", crate_name, after_src)
            }
        } else {
            file_path.to_string()
        };

        let location = format!(
            "{}{:<5}{} {}:{}:",
            color_level,
            metadata.level(),
            color_reset,
            formatted_path,
            metadata.line().unwrap_or(0)
        );

        let mut message_buf = String::new();
        let message_writer = format::Writer::new(&mut message_buf);
        ctx.field_format().format_fields(message_writer, event)?;

        write!(writer, "{:<width$} {}", location, message_buf, width = 56)?;
        writeln!(writer)
    }
}

static INIT_LOG: Once = Once::new();

/// Sets up logging with maximum verbosity (trace level)
/// Mainly for unit tests
pub fn setup_logging_verbose() {
    setup_stderr_logging(EnvFilter::new("trace"));
}

/// Sets up default logging to stderr and optionally, a verbose log file
/// Returns a guard, that needs to be kept alive for logging to file to work
pub fn setup_logging_default(verbose_logfile: Option<String>) -> io::Result<Option<WorkerGuard>> {
    let stderr_filter = get_default_stderr_filter();
    match verbose_logfile {
        Some(file) => setup_logging_with_file(stderr_filter, file, get_default_logfile_filter()).map(Some),
        None => {
            setup_stderr_logging(stderr_filter);
            Ok(None)
        }
    }
}

/// Stderr filter; RUST_LOG takes precedence when set
pub fn get_default_stderr_filter() -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new("warn")
        // Per-block decoder progress is noisy
        .add_directive("fec_codec::components=warn".parse().unwrap())
        .add_directive("fec_codec::fec=info".parse().unwrap())
        .add_directive("fec_codec::packet=info".parse().unwrap())
        .add_directive("cc1101_fec=info".parse().unwrap())
}

fn get_default_logfile_filter() -> EnvFilter {
    EnvFilter::new("trace")
}

/// Sets up logging to stderr only. Stdout is left alone since the tool prints its result there.
fn setup_stderr_logging(stderr_filter: EnvFilter) {
    INIT_LOG.call_once(|| {
        let stderr_layer = tracingfmt::layer()
            .event_format(AlignedFormatter { ansi: true })
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(stderr_layer.with_filter(stderr_filter))
            .init();
    });
}

/// Sets up logging to stderr and to `outfile`. Opening the file is the only fallible step.
/// Keep the returned guard alive or logging to file may cease working.
fn setup_logging_with_file(stderr_filter: EnvFilter, outfile: String, outfile_filter: EnvFilter) -> io::Result<WorkerGuard> {
    let file = OpenOptions::new().create(true).append(true).open(outfile)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    INIT_LOG.call_once(|| {
        let file_layer = tracingfmt::layer()
            .event_format(AlignedFormatter { ansi: false })
            .with_writer(file_writer)
            .with_ansi(false);

        let stderr_layer = tracingfmt::layer()
            .event_format(AlignedFormatter { ansi: true })
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(file_layer.with_filter(outfile_filter))
            .with(stderr_layer.with_filter(stderr_filter))
            .init();
    });

    Ok(guard)
}
