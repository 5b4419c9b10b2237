//! Self-play harness: every round hides one catalogue entity and answers truthfully.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use twentyq_core::belief::{Answer, BeliefState};
use twentyq_core::model::{AttributeKind, Catalogue, Entity, EntityId, Schema};
use twentyq_core::question::Question;
use twentyq_core::session::{
    AnswerOutcome, Answerer, RoundRecord, Session, SessionConfig, SessionOutcome, SessionState,
};

use crate::config::{GameConfig, ResolvedOutputs};
use crate::logging::{log_outcome, log_round};

/// Answers from the attributes of a known target entity.
pub struct OracleAnswerer<'a> {
    target: &'a Entity,
    run_id: &'a str,
}

impl<'a> OracleAnswerer<'a> {
    pub fn new(target: &'a Entity, run_id: &'a str) -> Self {
        Self { target, run_id }
    }
}

impl Answerer for OracleAnswerer<'_> {
    fn answer(&mut self, question: &Question, _belief: &BeliefState) -> AnswerOutcome {
        let Some(value) = self.target.value(&question.attribute) else {
            return AnswerOutcome::Abort;
        };
        let answer = match question.kind {
            AttributeKind::Boolean => Answer::Bool(value.truthy()),
            AttributeKind::Text => Answer::Text(value.canonical()),
        };
        AnswerOutcome::Answer(answer)
    }

    fn observe(&mut self, round: &RoundRecord, _belief: &BeliefState) {
        log_round(self.run_id, round);
    }
}

/// One JSONL row per simulated round.
#[derive(Debug, Serialize)]
struct RoundRow<'a> {
    run_id: &'a str,
    round: usize,
    target: &'a EntityId,
    state: SessionState,
    guess: Option<&'a EntityId>,
    correct: bool,
    questions_asked: u32,
    confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SimulationSummary {
    pub rounds: usize,
    pub won: usize,
    pub correct: usize,
    pub exhausted: usize,
    pub stuck: usize,
    pub no_match: usize,
    pub aborted: usize,
    pub mean_questions: f64,
    #[serde(skip)]
    pub jsonl_path: PathBuf,
}

impl SimulationSummary {
    fn record(&mut self, target: &EntityId, outcome: &SessionOutcome) {
        self.rounds += 1;
        match outcome.state {
            SessionState::Won => self.won += 1,
            SessionState::Exhausted => self.exhausted += 1,
            SessionState::Stuck => self.stuck += 1,
            SessionState::NoMatch => self.no_match += 1,
            SessionState::Aborted => self.aborted += 1,
            SessionState::Asking => {}
        }
        if outcome.guess.as_ref() == Some(target) {
            self.correct += 1;
        }
        // Running mean keeps the summary valid after every round.
        let n = self.rounds as f64;
        self.mean_questions += (outcome.questions_asked as f64 - self.mean_questions) / n;
    }

    pub fn accuracy(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.correct as f64 / self.rounds as f64
        }
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("catalogue is empty; nothing to simulate")]
    EmptyCatalogue,
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize round row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

/// Plays rounds against an oracle and streams results to JSONL.
pub struct SimulationRunner<'a> {
    config: &'a GameConfig,
    catalogue: &'a Catalogue,
    schema: &'a Schema,
    outputs: ResolvedOutputs,
}

impl<'a> SimulationRunner<'a> {
    pub fn new(
        config: &'a GameConfig,
        catalogue: &'a Catalogue,
        schema: &'a Schema,
        outputs: ResolvedOutputs,
    ) -> Self {
        Self {
            config,
            catalogue,
            schema,
            outputs,
        }
    }

    /// Targets in play order: the whole catalogue, or a seeded sample with replacement.
    pub fn targets(&self) -> Vec<&'a Entity> {
        let entities = self.catalogue.entities();
        let rounds = self.config.simulate.rounds;
        if rounds == 0 || entities.is_empty() {
            return entities.iter().collect();
        }
        let mut rng = StdRng::seed_from_u64(self.config.simulate.seed.unwrap_or(0));
        (0..rounds)
            .map(|_| &entities[rng.gen_range(0..entities.len())])
            .collect()
    }

    pub fn run(&self) -> Result<SimulationSummary, SimulationError> {
        if self.catalogue.is_empty() {
            return Err(SimulationError::EmptyCatalogue);
        }
        ensure_parent(self.outputs.jsonl.parent())?;
        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);

        let session_config: SessionConfig = self.config.session;
        let run_id = self.config.run_id.as_str();
        let mut summary = SimulationSummary {
            jsonl_path: self.outputs.jsonl.clone(),
            ..SimulationSummary::default()
        };

        for (round, target) in self.targets().into_iter().enumerate() {
            let mut session = Session::new(self.catalogue, self.schema, session_config);
            let mut oracle = OracleAnswerer::new(target, run_id);
            let outcome = session.run(&mut oracle);
            log_outcome(run_id, &outcome);

            let correct = outcome.guess.as_ref() == Some(target.id());
            let row = RoundRow {
                run_id,
                round,
                target: target.id(),
                state: outcome.state,
                guess: outcome.guess.as_ref(),
                correct,
                questions_asked: outcome.questions_asked,
                confidence: outcome.confidence,
            };
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;

            summary.record(target.id(), &outcome);
        }
        writer.flush()?;

        event!(
            target: "twentyq::simulate",
            Level::INFO,
            run_id,
            rounds = summary.rounds,
            won = summary.won,
            correct = summary.correct,
            mean_questions = summary.mean_questions,
        );
        Ok(summary)
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), SimulationError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
