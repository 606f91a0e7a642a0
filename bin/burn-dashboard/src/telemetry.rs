//! Helpers for emitting errors as tracing fields.

use std::path::Path;

use eyre::Context;
use tracing_subscriber::EnvFilter;

/// Emit an error as a tracing field with its full source chain intact.
///
/// `%error` only prints the outermost message and `?error` leaks the debug
/// representation. Both typed errors and [`eyre::Report`] go through the
/// `dyn std::error::Error` value so subscribers can walk the sources.
///
/// ```
/// use burn_dashboard::telemetry::error_field;
/// use eyre::WrapErr;
///
/// if let Err(error) = Err::<(), _>(std::io::Error::from(std::io::ErrorKind::NotFound))
///     .wrap_err("failed reading config")
/// {
///     tracing::error!(error = error_field(&error), "startup failed");
/// }
/// ```
pub fn error_field<E, TMarker>(error: &E) -> Box<dyn tracing::Value + '_>
where
    E: AsTracingValue<TMarker>,
{
    error.as_tracing_value(private::Token)
}

#[doc(hidden)]
// NOTE: the marker keeps the blanket impl for `E: std::error::Error` apart from
// the `eyre::Report` impl.
pub trait AsTracingValue<TMarker> {
    fn as_tracing_value(&self, _: private::Token) -> Box<dyn tracing::Value + '_>;
}

mod private {
    pub struct Token;
    pub struct Generic;
    pub struct Eyre;
}

impl<E: std::error::Error + 'static> AsTracingValue<private::Generic> for E {
    fn as_tracing_value(&self, _: private::Token) -> Box<dyn tracing::Value + '_> {
        Box::new(self as &(dyn std::error::Error + 'static))
    }
}

impl AsTracingValue<private::Eyre> for eyre::Report {
    fn as_tracing_value(&self, _: private::Token) -> Box<dyn tracing::Value + '_> {
        Box::new(AsRef::<dyn std::error::Error>::as_ref(self))
    }
}

/// Install the stdout subscriber used by the one-shot commands.
pub fn init_stdout() {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Install a subscriber that appends to `path`.
///
/// The interactive dashboard owns the terminal, so its logs go to a file.
pub fn init_file(path: &Path) -> eyre::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}
