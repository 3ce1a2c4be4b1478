use eyetrainer::config::{ResolverSettings, TrainerConfig};
use eyetrainer::resolver::DirectionResolver;
use eyetrainer::session::{SessionPhase, SubmitOutcome};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

mod common;
use common::mock_transport::MockTransport;
use common::TestContext;

#[test]
fn test_transcript_flood_fuzz() {
    let resolver =
        DirectionResolver::new(&ResolverSettings::default()).expect("Failed to create resolver");

    // Garbage that normalizes to nothing
    for text in ["", " ", "!!! ???", "。，！？", "...", "\t\n"] {
        assert_eq!(resolver.resolve(text), None, "resolved {:?}", text);
    }

    // Anything else must not panic, whatever it resolves to
    let garbage = [
        "asdfghjkl",
        "!!! @@@ ###",
        "1234567890",
        "extremely long string that doesn't mean anything to the system at all but keeps going and going",
        "🙂🙃🙂",
        "上下左右",
        "ＬＥＦＴ",
        "\u{0}\u{1}\u{7f}",
        "嗯嗯嗯嗯",
    ];
    for text in garbage {
        let _ = resolver.resolve(text);
    }

    let mut rng = StdRng::seed_from_u64(1234);
    let alphabet: Vec<char> = "abcxyz上下左右向往嗯啊 ,.!?。，3 6".chars().collect();
    for _ in 0..2000 {
        let len = rng.gen_range(0..12);
        let text: String = (0..len)
            .map(|_| *alphabet.choose(&mut rng).unwrap())
            .collect();
        let _ = resolver.resolve(text.as_str());
    }
}

#[test]
fn test_session_survives_random_input() {
    let mut config = TrainerConfig::default();
    config.session.grid_rows = 3;
    config.session.grid_cols = 3;
    config.session.duration_secs = 30;
    let mut ctx = TestContext::with_config(config, MockTransport::new());
    ctx.controller.start().unwrap();

    let inputs = [
        Some("上"),
        Some("下"),
        Some("左边"),
        Some("right"),
        Some("sha"),
        Some("hello"),
        Some(""),
        None,
        Some("嗯，往右"),
    ];
    let mut rng = StdRng::seed_from_u64(77);

    while ctx.controller.phase() != SessionPhase::Ended {
        let input = *inputs.choose(&mut rng).unwrap();
        let outcome = ctx.controller.submit_utterance(input).unwrap();

        if ctx.controller.phase() == SessionPhase::Ended {
            break;
        }
        assert_ne!(ctx.controller.phase(), SessionPhase::Evaluating);
        assert!(!ctx.controller.is_evaluating());
        if matches!(outcome, SubmitOutcome::Correct { .. }) {
            assert_eq!(ctx.controller.phase(), SessionPhase::Advancing);
        }

        let stats = ctx.controller.stats();
        assert!(stats.correct_answers <= stats.total_attempts);
        assert_eq!(stats.completed_cells, stats.correct_answers);

        ctx.step(rng.gen_range(0..700));
    }

    let result = ctx.controller.result().unwrap();
    assert_eq!(result.duration_seconds, 30);
    assert!(result.accuracy <= 100);
    assert_eq!(ctx.saved(), 1);
}
