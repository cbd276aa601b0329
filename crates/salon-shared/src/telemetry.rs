//! Telemetry setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogSettings;
use crate::error::AppError;

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `log.level`. When `log.directory` is set, a JSON copy of
/// every event goes to a daily rolling file; the returned guard flushes it and
/// must live as long as the process.
pub fn init_telemetry(settings: &LogSettings) -> Result<Option<WorkerGuard>, AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let (file_writer, guard) = match &settings.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &settings.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let json_layer = settings.json.then(|| fmt::layer().json());
    let text_layer = (!settings.json).then(|| fmt::layer());
    let file_layer = file_writer.map(|writer| fmt::layer().json().with_ansi(false).with_writer(writer));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::TelemetryError(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_returns_guard_and_second_init_fails() {
        let dir = std::env::temp_dir().join("salon-telemetry-test");
        let settings = LogSettings {
            level: "debug".to_string(),
            json: false,
            directory: Some(dir.to_string_lossy().into_owned()),
            file_prefix: "salon-test".to_string(),
        };

        let guard = init_telemetry(&settings).unwrap();
        assert!(guard.is_some());
        tracing::info!("telemetry initialised");

        let again = init_telemetry(&settings);
        assert!(matches!(again, Err(AppError::TelemetryError(_))));
    }
}
