use super::*;
use crate::{
    caption::mock_backend::{Call, MockBackend, drawn},
    foundation::core::Point,
    highlight::style::Interpolation,
    transcript::model::{TextDirection, Word},
};

fn transcript() -> Transcript {
    Transcript::new(
        vec![
            Word::new("one", 0.0, 100.0),
            Word::new("two", 200.0, 300.0),
            Word::new("three", 400.0, 500.0),
            Word::new("four", 600.0, 700.0),
        ],
        "en",
        TextDirection::Ltr,
    )
    .unwrap()
}

fn build(backend: &mut MockBackend, mode: HighlightMode) -> Caption<crate::caption::mock_backend::MockShaped> {
    Caption::build(transcript(), backend, mode, 100.0, Edges::CAPTION).unwrap()
}

const WORDS_STEPPED: HighlightMode = HighlightMode::SpokenWords {
    interpolation: Interpolation::Stepped,
};

#[test]
fn build_measures_both_roles_for_opacity_styles() {
    let mut backend = MockBackend::new();
    let caption = build(&mut backend, WORDS_STEPPED);
    assert_eq!(caption.handle_count(), 8);
    assert_eq!(backend.ledger.borrow().measured, 8);
    assert_eq!(
        caption.layout().positions(),
        &[
            Point::new(3.0, -4.0),
            Point::new(43.0, -4.0),
            Point::new(3.0, 16.0),
            Point::new(3.0, 36.0),
        ]
    );
    assert_eq!(
        caption.layout().line_ends().iter().copied().collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn box_style_measures_normal_words_only() {
    let mut backend = MockBackend::new();
    let caption = build(
        &mut backend,
        HighlightMode::WordBox {
            interpolation: Interpolation::Stepped,
        },
    );
    assert_eq!(caption.handle_count(), 4);
    assert!(caption.highlight_words().is_empty());
}

#[test]
fn draws_normal_words_then_spoken_words() {
    let mut backend = MockBackend::new();
    let caption = build(&mut backend, WORDS_STEPPED);
    let mut calls = Vec::new();
    caption
        .draw(&mut backend, &mut calls, 250.0, Rgba8::HIGHLIGHT_BOX)
        .unwrap();
    assert_eq!(calls[0], Call::Clear);
    assert_eq!(
        drawn(&calls, TextRole::Normal),
        vec!["one", "two", "three", "four"]
    );
    assert_eq!(drawn(&calls, TextRole::Highlight), vec!["one", "two"]);
}

#[test]
fn linear_fill_clips_the_active_word() {
    let mut backend = MockBackend::new();
    let caption = build(
        &mut backend,
        HighlightMode::SpokenWords {
            interpolation: Interpolation::Linear,
        },
    );
    let mut calls = Vec::new();
    caption
        .draw(&mut backend, &mut calls, 450.0, Rgba8::HIGHLIGHT_BOX)
        .unwrap();
    assert_eq!(drawn(&calls, TextRole::Highlight), vec!["one", "two", "three"]);
    assert_eq!(
        calls.last(),
        Some(&Call::ClippedText {
            text: "three".to_string(),
            role: TextRole::Highlight,
            origin: Point::new(3.0, 16.0),
            clip: Rect::new(3.0, 16.0, 28.0, 36.0),
        })
    );
}

#[test]
fn box_style_fills_behind_active_word() {
    let mut backend = MockBackend::new();
    let caption = build(
        &mut backend,
        HighlightMode::WordBox {
            interpolation: Interpolation::Stepped,
        },
    );
    let mut calls = Vec::new();
    let color = Rgba8::opaque(1, 2, 3);
    let frame = caption.draw(&mut backend, &mut calls, 250.0, color).unwrap();
    let expected = Rect::new(40.0, 0.0, 76.0, 12.0);
    assert_eq!(frame.backdrop, Some(expected));
    assert_eq!(calls.len(), 6);
    assert_eq!(
        calls[5],
        Call::Fill {
            rect: expected,
            color,
            blend: BlendMode::DestOver,
        }
    );
}

#[test]
fn past_last_word_highlights_everything() {
    let mut backend = MockBackend::new();
    let caption = build(&mut backend, WORDS_STEPPED);
    let mut calls = Vec::new();
    caption
        .draw(&mut backend, &mut calls, 800.0, Rgba8::HIGHLIGHT_BOX)
        .unwrap();
    assert_eq!(drawn(&calls, TextRole::Highlight).len(), 4);
}

#[test]
fn empty_chunk_draws_nothing_but_clear() {
    let mut backend = MockBackend::new();
    let empty = transcript().slice(5000.0, 6000.0);
    let caption = Caption::build(empty, &mut backend, WORDS_STEPPED, 100.0, Edges::CAPTION).unwrap();
    assert!(caption.is_empty());
    let mut calls = Vec::new();
    let frame = caption
        .draw(&mut backend, &mut calls, 5500.0, Rgba8::HIGHLIGHT_BOX)
        .unwrap();
    assert!(frame.is_empty());
    assert_eq!(calls, vec![Call::Clear]);
    assert_eq!(caption.destroy(&mut backend), 0);
}

#[test]
fn destroy_releases_every_handle_once() {
    let mut backend = MockBackend::new();
    let caption = build(&mut backend, WORDS_STEPPED);
    assert_eq!(caption.destroy(&mut backend), 8);
    let ledger = backend.ledger.borrow();
    assert!(ledger.live.is_empty());
    assert_eq!(ledger.released.len(), 8);
}

#[test]
fn failed_measure_releases_partial_work() {
    let mut backend = MockBackend::new();
    backend.fail_on = Some("three".to_string());
    let err = Caption::build(transcript(), &mut backend, WORDS_STEPPED, 100.0, Edges::CAPTION)
        .unwrap_err();
    assert!(err.to_string().contains("three"));
    let ledger = backend.ledger.borrow();
    assert!(ledger.live.is_empty());
    assert_eq!(ledger.released.len(), 2);
}
