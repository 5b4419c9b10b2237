use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use twentyq_core::belief::{Answer, BeliefState, entropy, update};
use twentyq_core::model::{Attribute, Catalogue, Entity, Schema};
use twentyq_core::question::{information_gain, select_question};

const CLUBS: [&str; 4] = ["Barcelona", "Juventus", "Bayern", "Liverpool"];
const POSITIONS: [&str; 3] = ["Forward", "Midfielder", "Defender"];

fn schema() -> Schema {
    Schema::new(vec![
        Attribute::text("club"),
        Attribute::text("position"),
        Attribute::boolean("retired"),
        Attribute::boolean("ballon_dor"),
    ])
    .expect("schema")
}

fn random_catalogue(rng: &mut SmallRng, size: usize) -> Catalogue {
    let entities = (0..size)
        .map(|idx| {
            Entity::new(format!("player-{idx}"))
                .with("club", *CLUBS.choose(rng).expect("clubs"))
                .with("position", *POSITIONS.choose(rng).expect("positions"))
                .with("retired", rng.gen_bool(0.5))
                .with("ballon_dor", rng.gen_bool(0.2))
        })
        .collect();
    Catalogue::new(entities).expect("unique ids")
}

fn random_answer(rng: &mut SmallRng, attribute: &str) -> Answer {
    match attribute {
        "club" => Answer::parse(CLUBS.choose(rng).expect("clubs")),
        "position" => Answer::parse(POSITIONS.choose(rng).expect("positions")),
        _ => Answer::Bool(rng.gen_bool(0.5)),
    }
}

#[test]
fn entropy_is_bounded_for_random_weights() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let len = rng.gen_range(0..12);
        let weights: Vec<f64> = (0..len).map(|_| rng.gen_range(0.0..1.0)).collect();
        let total: f64 = weights.iter().sum();
        let h = entropy(weights.iter().map(|w| w / total.max(f64::MIN_POSITIVE)));
        assert!(h >= 0.0);
        assert!(h <= (len.max(1) as f64).log2() + 1e-9);
    }
}

#[test]
fn gains_are_non_negative_and_elimination_is_monotonic() {
    let mut rng = SmallRng::seed_from_u64(20251019);
    let schema = schema();

    for _ in 0..50 {
        let size = rng.gen_range(1..24);
        let catalogue = random_catalogue(&mut rng, size);
        let mut state = BeliefState::uniform(&catalogue);

        for _ in 0..6 {
            for attr in schema.names() {
                assert!(information_gain(&catalogue, &schema, &state, attr) >= 0.0);
            }

            let attribute = match select_question(&catalogue, &schema, &state) {
                Some(question) => question.attribute,
                None => break,
            };
            let answer = random_answer(&mut rng, &attribute);
            let next = update(&catalogue, &schema, &state, &attribute, &answer);

            for entry in state.iter() {
                if entry.weight == 0.0 {
                    assert_eq!(next.weight(&entry.id), 0.0, "{} resurrected", entry.id);
                }
            }
            if next.live_count() > 0 {
                assert!((next.total() - 1.0).abs() < 1e-9);
            } else {
                assert_eq!(next.total(), 0.0);
            }
            assert_eq!(next.len(), catalogue.len());
            state = next;
        }
    }
}

#[test]
fn shared_live_value_never_scores() {
    let mut rng = SmallRng::seed_from_u64(7);
    let schema = schema();
    for _ in 0..30 {
        let catalogue = random_catalogue(&mut rng, 16);
        let prior = BeliefState::uniform(&catalogue);
        let club = *CLUBS.choose(&mut rng).expect("clubs");
        let narrowed = update(&catalogue, &schema, &prior, "club", &Answer::parse(club));
        assert_eq!(information_gain(&catalogue, &schema, &narrowed, "club"), 0.0);
    }
}
