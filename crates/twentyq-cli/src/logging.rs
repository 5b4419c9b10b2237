use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{Level, event, warn};
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};
use twentyq_core::question::Question;
use twentyq_core::session::{RoundRecord, SessionOutcome};

use crate::config::{LoggingConfig, ResolvedOutputs};

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Installs a JSON subscriber writing next to the round log when structured logging is on.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_dir = outputs
        .jsonl
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&telemetry_dir).with_context(|| {
        format!(
            "creating telemetry directory at {}",
            telemetry_dir.display()
        )
    })?;

    let telemetry_path = telemetry_dir.join("telemetry.jsonl");
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        warn!(
            target: "twentyq::logging",
            path = %telemetry_path.display(),
            "subscriber already installed; telemetry file will stay empty"
        );
    }

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

pub fn log_question(run_id: &str, question: &Question, live: usize) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    event!(
        target: "twentyq::session",
        Level::DEBUG,
        run_id,
        attribute = %question.attribute,
        kind = %question.kind,
        gain = question.gain,
        options = question.options.len(),
        live,
    );
}

pub fn log_round(run_id: &str, record: &RoundRecord) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let leader = record
        .leader
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    event!(
        target: "twentyq::session",
        Level::INFO,
        run_id,
        round = record.number,
        attribute = %record.attribute,
        answer = %record.answer,
        gain = record.gain,
        live_before = record.live_before,
        live_after = record.live_after,
        leader = %leader,
        confidence = record.confidence,
    );
}

pub fn log_outcome(run_id: &str, outcome: &SessionOutcome) {
    let guess = outcome
        .guess
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    event!(
        target: "twentyq::session",
        Level::INFO,
        run_id,
        state = %outcome.state,
        guess = %guess,
        confidence = outcome.confidence,
        questions = outcome.questions_asked,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn disabled_logging_installs_nothing() {
        let outputs = ResolvedOutputs {
            jsonl: PathBuf::from("unused/rounds.jsonl"),
        };
        let guard = init_logging(&LoggingConfig::default(), &outputs).expect("init");
        assert!(guard.is_none());
        assert!(!Path::new("unused").exists());
    }

    #[test]
    fn telemetry_file_sits_beside_round_log_even_when_reinitialized() {
        let dir = tempdir().expect("temp dir");
        let outputs = ResolvedOutputs {
            jsonl: dir.path().join("run/rounds.jsonl"),
        };
        let logging = LoggingConfig {
            enable_structured: true,
            tracing_level: "debug".to_string(),
        };

        let first = init_logging(&logging, &outputs).expect("init").expect("guard");
        assert_eq!(first.telemetry_path, dir.path().join("run/telemetry.jsonl"));
        assert!(first.telemetry_path.exists());

        // A second install in the same process keeps working instead of failing.
        let second = init_logging(&logging, &outputs).expect("re-init").expect("guard");
        assert_eq!(second.telemetry_path, first.telemetry_path);
    }
}
