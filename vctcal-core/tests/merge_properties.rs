//! Property tests for the merge engine.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use vctcal_core::model::{Match, MatchStatus, Region, Round, Score, Sequence, Team};
use vctcal_core::ics::{decode_document, encode_document};
use vctcal_core::{CalendarDocument, MergeEngine, MergeMode, Season};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
}

fn arb_round() -> impl Strategy<Value = Round> {
    prop_oneof![
        (1u8..4).prop_map(Round::Upper),
        (1u8..4).prop_map(Round::Lower),
        Just(Round::UpperFinal),
        Just(Round::GrandFinal),
        Just(Round::Unlabelled),
    ]
}

fn arb_team() -> impl Strategy<Value = Team> {
    prop::sample::select(vec!["TBD", "Sentinels", "G2 Esports", "Paper Rex", "FNATIC"])
        .prop_map(Team::from_source)
}

fn arb_status() -> impl Strategy<Value = MatchStatus> {
    prop::sample::select(vec![
        MatchStatus::Scheduled,
        MatchStatus::Live,
        MatchStatus::Completed,
    ])
}

prop_compose! {
    fn arb_match()(
        stage in prop::sample::select(vec!["kickoff", "masters"]),
        region in prop::sample::select(vec!["americas", "emea", "pacific", ""]),
        round in arb_round(),
        slot in 1u32..5,
        team_a in arb_team(),
        team_b in arb_team(),
        hours in prop::option::weighted(0.9, 0i64..500),
        status in arb_status(),
        score in prop::option::of((0u8..3, 0u8..3)),
    ) -> Match {
        Match {
            stage: Season::default().registry.resolve(stage).unwrap(),
            region: Region::new(region),
            sequence: Sequence::new(round, slot),
            team_a,
            team_b,
            scheduled_time: hours.map(|h| base_time() + Duration::hours(h)),
            status,
            score: score.map(|(a, b)| Score { a, b }),
            source_reference: format!("https://www.vlr.gg/{slot}"),
        }
    }
}

/// Free text with the characters .ics has to escape, non-ASCII letters, and
/// lengths past the 75-octet line limit.
fn arb_text() -> impl Strategy<Value = String> {
    r"[a-zA-Z0-9 \\;,:\n'.éüÁ日本語\-]{0,100}"
}

prop_compose! {
    fn arb_text_match()(
        m in arb_match(),
        team_a in arb_text(),
        team_b in arb_text(),
        reference in arb_text(),
    ) -> Match {
        Match {
            team_a: Team::from_source(&team_a),
            team_b: Team::from_source(&team_b),
            source_reference: reference.trim().to_string(),
            ..m
        }
    }
}

fn generate(batch: &[Match]) -> CalendarDocument {
    MergeEngine::new(Season::default())
        .merge(&CalendarDocument::new(), batch, MergeMode::Generate, base_time())
        .unwrap()
        .0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ids_ignore_mutable_fields(m in arb_match(), other in arb_match()) {
        let scheme = Season::default().identity();
        let mut moved = other;
        moved.stage = m.stage.clone();
        moved.region = m.region.clone();
        moved.sequence = m.sequence;

        prop_assert_eq!(scheme.identify(&m.key()), scheme.identify(&moved.key()));
    }

    #[test]
    fn update_never_adds_or_removes_events(
        existing in prop::collection::vec(arb_match(), 0..8),
        batch in prop::collection::vec(arb_match(), 0..8),
    ) {
        let doc = generate(&existing);
        let (next, _) = MergeEngine::new(Season::default())
            .merge(&doc, &batch, MergeMode::Update, base_time() + Duration::days(1))
            .unwrap();

        let before: Vec<_> = doc.iter().map(|e| e.id.clone()).collect();
        let after: Vec<_> = next.iter().map(|e| e.id.clone()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn append_preserves_existing_events(
        existing in prop::collection::vec(arb_match(), 0..8),
        batch in prop::collection::vec(arb_match(), 0..8),
    ) {
        let doc = generate(&existing);
        let (next, _) = MergeEngine::new(Season::default())
            .merge(&doc, &batch, MergeMode::GenerateAppend, base_time() + Duration::days(1))
            .unwrap();

        for event in doc.iter() {
            prop_assert_eq!(next.get(&event.id), Some(event));
        }
        let unchanged_prefix: Vec<_> = next.iter().take(doc.len()).cloned().collect();
        let original: Vec<_> = doc.iter().cloned().collect();
        prop_assert_eq!(unchanged_prefix, original);
    }

    #[test]
    fn append_is_idempotent(
        existing in prop::collection::vec(arb_match(), 0..8),
        batch in prop::collection::vec(arb_match(), 0..8),
    ) {
        let engine = MergeEngine::new(Season::default());
        let doc = generate(&existing);
        let (once, _) = engine
            .merge(&doc, &batch, MergeMode::GenerateAppend, base_time() + Duration::days(1))
            .unwrap();
        let (twice, report) = engine
            .merge(&once, &batch, MergeMode::GenerateAppend, base_time() + Duration::days(2))
            .unwrap();

        prop_assert_eq!(report.added, 0);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn status_never_moves_backward(
        first in arb_match(),
        statuses in prop::collection::vec(arb_status(), 1..10),
    ) {
        let engine = MergeEngine::new(Season::default());
        let mut first = first;
        first.scheduled_time = Some(base_time());
        let mut doc = generate(std::slice::from_ref(&first));
        let mut highest = first.status;

        for (i, status) in statuses.into_iter().enumerate() {
            let mut fetched = first.clone();
            fetched.status = status;
            let now = base_time() + Duration::hours(i as i64 + 1);
            doc = engine.merge(&doc, &[fetched], MergeMode::Update, now).unwrap().0;

            highest = highest.max(status);
            let stored = doc.iter().next().map(|e| e.status);
            prop_assert_eq!(stored, Some(highest));
        }
    }

    #[test]
    fn documents_survive_encode_and_decode(
        batch in prop::collection::vec(arb_text_match(), 0..8),
    ) {
        let season = Season::default();
        let doc = generate(&batch);

        let ics = encode_document(&doc, &season).unwrap();
        let decoded = decode_document(&ics, &season).unwrap();
        prop_assert_eq!(&decoded, &doc);
        prop_assert_eq!(encode_document(&decoded, &season).unwrap(), ics);
    }
}
