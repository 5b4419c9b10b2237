//! Interactive answerer reading from a line-oriented input stream.

use std::io::{self, BufRead, Write};

use tracing::warn;
use twentyq_core::belief::{Answer, BeliefState};
use twentyq_core::model::{Catalogue, Schema};
use twentyq_core::question::Question;
use twentyq_core::session::{AnswerOutcome, Answerer, RoundRecord};

use crate::config::GameConfig;
use crate::logging::{log_question, log_round};
use crate::render::{render_candidates, render_question};

const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

pub struct TerminalAnswerer<'a, R, W> {
    input: R,
    output: W,
    config: &'a GameConfig,
    catalogue: &'a Catalogue,
    schema: &'a Schema,
    asked: u32,
}

impl<'a, R: BufRead, W: Write> TerminalAnswerer<'a, R, W> {
    pub fn new(
        input: R,
        output: W,
        config: &'a GameConfig,
        catalogue: &'a Catalogue,
        schema: &'a Schema,
    ) -> Self {
        Self {
            input,
            output,
            config,
            catalogue,
            schema,
            asked: 0,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, question: &Question, belief: &BeliefState) -> io::Result<AnswerOutcome> {
        let prompt = self.config.prompt_for(&question.attribute);
        render_question(
            &mut self.output,
            self.asked + 1,
            belief.live_count(),
            question,
            &prompt,
            self.config.display.max_options,
        )?;

        loop {
            if question.is_boolean() {
                write!(self.output, "Answer (yes/no): ")?;
            } else {
                write!(self.output, "Answer: ")?;
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(AnswerOutcome::Abort);
            }
            let reply = line.trim();
            if reply.is_empty() {
                writeln!(self.output, "Please enter a value!")?;
                continue;
            }
            if QUIT_WORDS.iter().any(|word| reply.eq_ignore_ascii_case(word)) {
                return Ok(AnswerOutcome::Abort);
            }

            if question.is_boolean() {
                match Answer::parse(reply).as_bool() {
                    Some(flag) => return Ok(AnswerOutcome::Answer(Answer::Bool(flag))),
                    None => {
                        writeln!(self.output, "Please answer yes or no.")?;
                        continue;
                    }
                }
            }

            let answer = question
                .options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(reply))
                .cloned()
                .unwrap_or_else(|| reply.to_string());
            return Ok(AnswerOutcome::Answer(Answer::Text(answer)));
        }
    }
}

impl<R: BufRead, W: Write> Answerer for TerminalAnswerer<'_, R, W> {
    fn answer(&mut self, question: &Question, belief: &BeliefState) -> AnswerOutcome {
        log_question(&self.config.run_id, question, belief.live_count());
        match self.ask(question, belief) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(target: "twentyq::terminal", error = %err, "terminal I/O failed; aborting round");
                AnswerOutcome::Abort
            }
        }
    }

    fn observe(&mut self, round: &RoundRecord, belief: &BeliefState) {
        self.asked = round.number;
        log_round(&self.config.run_id, round);
        if let Err(err) = render_candidates(
            &mut self.output,
            self.catalogue,
            self.schema,
            belief,
            self.config.display.top,
        ) {
            warn!(target: "twentyq::terminal", error = %err, "failed to render candidates");
        }
    }
}
