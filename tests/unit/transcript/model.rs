use super::*;

fn transcript(words: &[(&str, f64, f64)]) -> Transcript {
    Transcript::new(
        words
            .iter()
            .map(|&(t, s, e)| Word::new(t, s, e))
            .collect(),
        "en",
        TextDirection::Ltr,
    )
    .unwrap()
}

#[test]
fn active_word_bounds_are_inclusive() {
    let t = transcript(&[("potato", 100.0, 200.0)]);
    assert_eq!(t.active_word_index(100.0), Some(0));
    assert_eq!(t.active_word_index(150.0), Some(0));
    assert_eq!(t.active_word_index(200.0), Some(0));
    assert_eq!(t.active_word_index(99.0), None);
    assert_eq!(t.active_word_index(201.0), None);
}

#[test]
fn gaps_between_words_have_no_active_word() {
    let t = transcript(&[("a", 0.0, 100.0), ("b", 300.0, 400.0)]);
    assert_eq!(t.active_word_index(200.0), None);
    assert_eq!(t.active_word_index(300.0), Some(1));
}

#[test]
fn overlapping_words_resolve_to_first() {
    let t = transcript(&[("a", 0.0, 200.0), ("b", 100.0, 300.0)]);
    assert_eq!(t.active_word_index(150.0), Some(0));
    assert_eq!(t.active_word_index(250.0), Some(1));
}

#[test]
fn time_range_uses_full_containment() {
    let t = transcript(&[
        ("a", 0.0, 400.0),
        ("b", 500.0, 900.0),
        ("c", 950.0, 1100.0),
        ("d", 1200.0, 1500.0),
    ]);
    let words = t.words_for_time_range(0.0, 1000.0);
    let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, ["a", "b"]);

    let words = t.words_for_time_range(1000.0, 2000.0);
    let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, ["d"]);
}

#[test]
fn slice_preserves_metadata_and_may_be_empty() {
    let t = Transcript::new(
        vec![Word::new("שלום", 0.0, 100.0)],
        "he",
        TextDirection::Rtl,
    )
    .unwrap();
    let s = t.slice(0.0, 100.0);
    assert_eq!(s.len(), 1);
    assert_eq!(s.language(), "he");
    assert_eq!(s.text_direction(), TextDirection::Rtl);

    let empty = t.slice(500.0, 600.0);
    assert!(empty.is_empty());
    assert_eq!(empty.start_time(), None);
    assert_eq!(empty.duration(), 0.0);
    assert_eq!(empty.active_word_index(550.0), None);
}

#[test]
fn derived_times_follow_first_and_last_word() {
    let t = transcript(&[("a", 250.0, 400.0), ("b", 500.0, 3000.0)]);
    assert_eq!(t.start_time(), Some(250.0));
    assert_eq!(t.end_time(), Some(3000.0));
    assert_eq!(t.duration(), 2750.0);
    assert_eq!(t.last_word().map(|w| w.text.as_str()), Some("b"));
}

#[test]
fn construction_rejects_bad_input() {
    assert!(Transcript::new(vec![], "en", TextDirection::Ltr).is_err());
    assert!(
        Transcript::new(vec![Word::new("x", 10.0, 5.0)], "en", TextDirection::Ltr).is_err()
    );
    assert!(
        Transcript::new(
            vec![Word::new("a", 100.0, 200.0), Word::new("b", 50.0, 60.0)],
            "en",
            TextDirection::Ltr
        )
        .is_err()
    );
    assert!(
        Transcript::new(
            vec![Word::new("a", f64::NAN, 200.0)],
            "en",
            TextDirection::Ltr
        )
        .is_err()
    );
}

#[test]
fn word_progress_is_clamped() {
    let w = Word::new("a", 100.0, 200.0);
    assert_eq!(w.progress(50.0), 0.0);
    assert_eq!(w.progress(150.0), 0.5);
    assert_eq!(w.progress(400.0), 1.0);

    let instant = Word::new("b", 100.0, 100.0);
    assert_eq!(instant.progress(99.0), 0.0);
    assert_eq!(instant.progress(100.0), 1.0);
}
