//! Plain-text rendering of questions, candidates and round results.

use std::io::{self, Write};
use twentyq_core::belief::BeliefState;
use twentyq_core::model::{AttributeKind, Catalogue, Entity, Schema};
use twentyq_core::question::Question;
use twentyq_core::session::{SessionOutcome, SessionState};

const RULE_WIDTH: usize = 50;

fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

fn percent(weight: f64) -> String {
    format!("{:.1}%", weight * 100.0)
}

/// Text attributes of an entity, in schema order, e.g. `Barcelona, Forward, Argentina`.
fn describe(entity: &Entity, schema: &Schema) -> String {
    schema
        .iter()
        .filter(|attr| attr.kind == AttributeKind::Text)
        .map(|attr| {
            entity
                .value(&attr.name)
                .map(|value| value.to_string())
                .unwrap_or_else(|| "Unknown".to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_question(
    out: &mut impl Write,
    number: u32,
    live: usize,
    question: &Question,
    prompt: &str,
    max_options: usize,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(30))?;
    writeln!(out, "Question {number} ({live} candidates remaining)")?;
    writeln!(out, "{prompt}")?;
    if question.is_boolean() {
        return Ok(());
    }

    let shown: Vec<&str> = question
        .options
        .iter()
        .take(max_options)
        .map(String::as_str)
        .collect();
    if !shown.is_empty() {
        writeln!(out, "Available options: {}", shown.join(", "))?;
    }
    if question.options.len() > max_options {
        writeln!(
            out,
            "... and {} more options",
            question.options.len() - max_options
        )?;
    }
    Ok(())
}

/// Lists the most likely live candidates with their probabilities.
pub fn render_candidates(
    out: &mut impl Write,
    catalogue: &Catalogue,
    schema: &Schema,
    belief: &BeliefState,
    limit: usize,
) -> io::Result<()> {
    let live = belief.live_count();
    if live == 0 {
        return writeln!(out, "No matching candidates found!");
    }

    writeln!(out)?;
    rule(out)?;
    writeln!(out, "Possible candidates:")?;
    rule(out)?;
    for (rank, entry) in belief.ranked(limit).into_iter().enumerate() {
        match catalogue.get(&entry.id) {
            Some(entity) => writeln!(out, "{}. {} ({})", rank + 1, entry.id, describe(entity, schema))?,
            None => writeln!(out, "{}. {}", rank + 1, entry.id)?,
        }
        writeln!(out, "   Probability: {}", percent(entry.weight))?;
    }
    if live > limit {
        writeln!(out, "... and {} more candidate(s)", live - limit)?;
    }
    Ok(())
}

pub fn render_outcome(
    out: &mut impl Write,
    catalogue: &Catalogue,
    schema: &Schema,
    outcome: &SessionOutcome,
) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    match (outcome.state, outcome.guess.as_ref()) {
        (SessionState::Won, Some(guess)) => {
            writeln!(out, "I'm {} confident!", percent(outcome.confidence))?;
            writeln!(out, "You are thinking of: {guess}")?;
            if let Some(entity) = catalogue.get(guess) {
                for attr in schema.iter() {
                    if let Some(value) = entity.value(&attr.name) {
                        writeln!(out, "  {}: {value}", attr.name)?;
                    }
                }
            }
        }
        (SessionState::Exhausted, guess) => {
            writeln!(out, "Reached the maximum number of questions!")?;
            if let Some(guess) = guess {
                writeln!(
                    out,
                    "Best guess: {guess} (confidence: {})",
                    percent(outcome.confidence)
                )?;
            }
        }
        (SessionState::Stuck, guess) => {
            writeln!(out, "Cannot find a question that separates the remaining candidates.")?;
            if let Some(guess) = guess {
                writeln!(
                    out,
                    "Best guess: {guess} (confidence: {})",
                    percent(outcome.confidence)
                )?;
            }
        }
        (SessionState::Aborted, _) => writeln!(out, "Game cancelled.")?,
        (SessionState::NoMatch, _) | (_, None) => {
            writeln!(out, "No candidate matches those answers!")?
        }
        (SessionState::Asking, Some(_)) => writeln!(out, "Round still in progress.")?,
    }
    rule(out)?;
    writeln!(
        out,
        "Questions asked: {} | Result: {}",
        outcome.questions_asked, outcome.state
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use twentyq_core::belief::{Answer, update};
    use twentyq_core::model::{Attribute, EntityId};

    fn fixture() -> (Catalogue, Schema) {
        let catalogue = Catalogue::new(vec![
            Entity::new("Xavi").with("club", "Barcelona").with("retired", true),
            Entity::new("Iniesta").with("club", "Barcelona").with("retired", true),
            Entity::new("Pedri").with("club", "Barcelona").with("retired", false),
        ])
        .unwrap();
        let schema = Schema::new(vec![Attribute::text("club"), Attribute::boolean("retired")])
            .unwrap();
        (catalogue, schema)
    }

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn candidates_are_ranked_and_truncated() {
        let (catalogue, schema) = fixture();
        let belief = BeliefState::uniform(&catalogue);
        let text = rendered(|out| render_candidates(out, &catalogue, &schema, &belief, 2));
        assert!(text.contains("1. Xavi (Barcelona)"));
        assert!(text.contains("Probability: 33.3%"));
        assert!(text.contains("... and 1 more candidate(s)"));
        assert!(!text.contains("Pedri"));
    }

    #[test]
    fn empty_belief_reports_no_match() {
        let (catalogue, schema) = fixture();
        let prior = BeliefState::uniform(&catalogue);
        let dead = update(&catalogue, &schema, &prior, "club", &Answer::parse("Real"));
        let text = rendered(|out| render_candidates(out, &catalogue, &schema, &dead, 5));
        assert_eq!(text.trim(), "No matching candidates found!");
    }

    #[test]
    fn won_outcome_lists_attributes() {
        let (catalogue, schema) = fixture();
        let outcome = SessionOutcome {
            state: SessionState::Won,
            guess: Some(EntityId::new("Pedri")),
            confidence: 1.0,
            questions_asked: 1,
            history: Vec::new(),
        };
        let text = rendered(|out| render_outcome(out, &catalogue, &schema, &outcome));
        assert!(text.contains("I'm 100.0% confident!"));
        assert!(text.contains("You are thinking of: Pedri"));
        assert!(text.contains("  retired: no"));
        assert!(text.contains("Result: WON"));
    }

    #[test]
    fn long_option_lists_are_elided() {
        let question = Question {
            attribute: "club".to_string(),
            kind: AttributeKind::Text,
            options: (0..12).map(|i| format!("Club {i:02}")).collect(),
            gain: 1.0,
        };
        let text = rendered(|out| render_question(out, 1, 12, &question, "Which club?", 10));
        assert!(text.contains("Club 09"));
        assert!(!text.contains("Club 10"));
        assert!(text.contains("... and 2 more options"));
    }
}
