use super::*;

fn style(style: StyleKind, level: HighlightLevel, interpolation: Interpolation) -> FancyStyle {
    FancyStyle {
        style,
        level,
        interpolation,
    }
}

#[test]
fn every_opacity_level_maps_to_a_mode() {
    assert_eq!(
        HighlightMode::try_from(style(
            StyleKind::Opacity,
            HighlightLevel::Word,
            Interpolation::Linear
        ))
        .unwrap(),
        HighlightMode::SpokenWords {
            interpolation: Interpolation::Linear
        }
    );
    assert_eq!(
        HighlightMode::try_from(style(
            StyleKind::Opacity,
            HighlightLevel::Line,
            Interpolation::Stepped
        ))
        .unwrap(),
        HighlightMode::SpokenLines
    );
    assert_eq!(
        HighlightMode::try_from(style(
            StyleKind::Opacity,
            HighlightLevel::Object,
            Interpolation::Stepped
        ))
        .unwrap(),
        HighlightMode::WholeChunk
    );
}

#[test]
fn box_style_accepts_every_level() {
    for level in [HighlightLevel::Word, HighlightLevel::Line, HighlightLevel::Object] {
        let mode =
            HighlightMode::try_from(style(StyleKind::Highlight, level, Interpolation::Linear))
                .unwrap();
        assert_eq!(
            mode,
            HighlightMode::WordBox {
                interpolation: Interpolation::Linear
            },
            "{level:?}"
        );
        assert!(!mode.needs_highlight_text());
    }
}

#[test]
fn json_uses_lowercase_names_and_defaults() {
    let s: FancyStyle =
        serde_json::from_str(r#"{"style":"highlight","level":"word","interpolation":"linear"}"#)
            .unwrap();
    assert_eq!(s.style, StyleKind::Highlight);
    assert_eq!(s.interpolation, Interpolation::Linear);

    let s: FancyStyle = serde_json::from_str("{}").unwrap();
    assert_eq!(s, FancyStyle::default());
    assert_eq!(s.style, StyleKind::Opacity);
    assert_eq!(s.level, HighlightLevel::Word);
    assert_eq!(s.interpolation, Interpolation::Stepped);

    assert!(serde_json::from_str::<FancyStyle>(r#"{"style":"glow"}"#).is_err());
}

#[test]
fn from_str_reports_unknown_values() {
    assert_eq!("line".parse::<HighlightLevel>().unwrap(), HighlightLevel::Line);
    assert_eq!("highlight".parse::<StyleKind>().unwrap(), StyleKind::Highlight);
    assert_eq!("linear".parse::<Interpolation>().unwrap(), Interpolation::Linear);

    let err = "sparkle".parse::<StyleKind>().unwrap_err();
    assert!(err.to_string().contains("unknown fancy style 'sparkle'"));
    assert!("paragraph".parse::<HighlightLevel>().is_err());
    assert!("cubic".parse::<Interpolation>().is_err());
}
