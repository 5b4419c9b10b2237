use twentyq_core::belief::{Answer, BeliefState, update};
use twentyq_core::model::{Attribute, Catalogue, Entity, EntityId, Schema};
use twentyq_core::question::{Question, information_gain, select_question};
use twentyq_core::session::{
    AnswerOutcome, Answerer, RoundRecord, Session, SessionConfig, SessionState,
};

/// Answers every question the same way.
struct Always(Answer);

impl Answerer for Always {
    fn answer(&mut self, _question: &Question, _belief: &BeliefState) -> AnswerOutcome {
        AnswerOutcome::Answer(self.0.clone())
    }
}

/// Records the belief totals it is shown after each update.
struct Recording {
    inner: Always,
    totals: Vec<f64>,
}

impl Answerer for Recording {
    fn answer(&mut self, question: &Question, belief: &BeliefState) -> AnswerOutcome {
        self.inner.answer(question, belief)
    }

    fn observe(&mut self, _round: &RoundRecord, belief: &BeliefState) {
        self.totals.push(belief.total());
    }
}

fn four_with_one_split() -> (Catalogue, Schema) {
    let catalogue = Catalogue::new(vec![
        Entity::new("Henry").with("retired", true),
        Entity::new("Zidane").with("retired", true),
        Entity::new("Mbappe").with("retired", false),
        Entity::new("Haaland").with("retired", false),
    ])
    .expect("unique ids");
    let schema = Schema::new(vec![Attribute::boolean("retired")]).expect("schema");
    (catalogue, schema)
}

#[test]
fn even_boolean_split_gains_one_bit_and_halves_candidates() {
    let (catalogue, schema) = four_with_one_split();
    let prior = BeliefState::uniform(&catalogue);

    let gain = information_gain(&catalogue, &schema, &prior, "retired");
    assert!((gain - 1.0).abs() < 1e-12, "gain was {gain}");

    let question = select_question(&catalogue, &schema, &prior).expect("question available");
    assert_eq!(question.attribute, "retired");
    assert_eq!(question.options, ["yes", "no"]);

    let next = update(
        &catalogue,
        &schema,
        &prior,
        &question.attribute,
        &Answer::parse("yes"),
    );
    assert_eq!(next.weight(&EntityId::new("Henry")), 0.5);
    assert_eq!(next.weight(&EntityId::new("Zidane")), 0.5);
    assert_eq!(next.weight(&EntityId::new("Mbappe")), 0.0);
    assert_eq!(next.weight(&EntityId::new("Haaland")), 0.0);
}

#[test]
fn single_entity_catalogue_wins_without_questions() {
    let catalogue =
        Catalogue::new(vec![Entity::new("Pele").with("retired", true)]).expect("catalogue");
    let schema = Schema::football();
    let prior = BeliefState::uniform(&catalogue);
    assert!(select_question(&catalogue, &schema, &prior).is_none());

    let mut session = Session::new(&catalogue, &schema, SessionConfig::default());
    let outcome = session.run(&mut Always(Answer::Bool(true)));
    assert_eq!(outcome.state, SessionState::Won);
    assert_eq!(outcome.guess, Some(EntityId::new("Pele")));
    assert_eq!(outcome.confidence, 1.0);
    assert_eq!(outcome.questions_asked, 0);
}

#[test]
fn contradicting_answer_ends_in_no_match() {
    let (catalogue, schema) = four_with_one_split();
    let prior = BeliefState::uniform(&catalogue);
    let dead = update(
        &catalogue,
        &schema,
        &prior,
        "retired",
        &Answer::parse("sometimes"),
    );
    assert_eq!(dead.len(), 4);
    assert!(dead.iter().all(|entry| entry.weight == 0.0));

    let mut session = Session::new(&catalogue, &schema, SessionConfig::default());
    let mut answerer = Recording {
        inner: Always(Answer::parse("sometimes")),
        totals: Vec::new(),
    };
    let outcome = session.run(&mut answerer);
    assert_eq!(outcome.state, SessionState::NoMatch);
    assert_eq!(outcome.guess, None);
    assert_eq!(outcome.confidence, 0.0);
    assert_eq!(outcome.questions_asked, 1);
    assert_eq!(answerer.totals, [0.0]);
}

#[test]
fn budget_exhaustion_reports_best_guess() {
    let catalogue = Catalogue::new(vec![
        Entity::new("Buffon").with("retired", true).with("position", "Goalkeeper"),
        Entity::new("Casillas").with("retired", true).with("position", "Goalkeeper"),
        Entity::new("Neuer").with("retired", false).with("position", "Goalkeeper"),
        Entity::new("Alisson").with("retired", false).with("position", "Goalkeeper"),
    ])
    .expect("catalogue");
    let schema = Schema::football();
    let config = SessionConfig::new(1, 0.95).expect("config");

    let mut session = Session::new(&catalogue, &schema, config);
    let outcome = session.run(&mut Always(Answer::Bool(false)));

    assert_eq!(outcome.state, SessionState::Exhausted);
    assert_eq!(outcome.questions_asked, 1);
    assert_eq!(outcome.guess, Some(EntityId::new("Neuer")));
    assert_eq!(outcome.confidence, 0.5);
    assert_eq!(session.belief().live_count(), 2);
}

#[test]
fn confident_leader_preempts_remaining_questions() {
    let catalogue = Catalogue::new(vec![
        Entity::new("a").with("tall", true),
        Entity::new("b").with("tall", false),
    ])
    .expect("catalogue");
    let schema = Schema::new(vec![Attribute::boolean("tall")]).expect("schema");
    let config = SessionConfig::new(20, 0.4).expect("config");

    // A threshold below the uniform weight still needs one answer first.
    let mut session = Session::new(&catalogue, &schema, config);
    let outcome = session.run(&mut Always(Answer::Bool(true)));
    assert_eq!(outcome.state, SessionState::Won);
    assert_eq!(outcome.questions_asked, 1);
    assert_eq!(outcome.guess, Some(EntityId::new("a")));
}

#[test]
fn indistinguishable_candidates_get_stuck() {
    let catalogue = Catalogue::new(vec![
        Entity::new("twin-1").with("club", "Ajax"),
        Entity::new("twin-2").with("club", "Ajax"),
    ])
    .expect("catalogue");
    let schema = Schema::new(vec![Attribute::text("club")]).expect("schema");

    let mut session = Session::new(&catalogue, &schema, SessionConfig::default());
    let outcome = session.run(&mut Always(Answer::Bool(true)));
    assert_eq!(outcome.state, SessionState::Stuck);
    assert_eq!(outcome.questions_asked, 0);
    assert_eq!(outcome.guess, Some(EntityId::new("twin-1")));
    assert_eq!(outcome.confidence, 0.5);
}

#[test]
fn empty_catalogue_is_no_match() {
    let catalogue = Catalogue::empty();
    let schema = Schema::football();
    let mut session = Session::new(&catalogue, &schema, SessionConfig::default());
    let outcome = session.run(&mut Always(Answer::Bool(true)));
    assert_eq!(outcome.state, SessionState::NoMatch);
    assert!(outcome.guess.is_none());
}
