//! Adapters from external transcript JSON shapes into [`Transcript`].
//!
//! Two shapes are accepted:
//!
//! - **Scene groups**: the editor export, a map of scene-group id to
//!   `{language, editorState: {root: {direction, children: [{children: [word, ...]}]}}}` where each
//!   word node is `{text, startTime, endTime}`.
//! - **Plain**: `{language, textDirection, words: [{text, startTime, endTime}, ...]}`.

use std::collections::BTreeMap;

use crate::{
    foundation::error::{CaptionError, CaptionResult},
    transcript::model::{TextDirection, Transcript, Word},
};

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneGroup {
    #[serde(default)]
    language: Option<String>,
    editor_state: EditorState,
}

#[derive(Debug, serde::Deserialize)]
struct EditorState {
    root: EditorRoot,
}

#[derive(Debug, serde::Deserialize)]
struct EditorRoot {
    #[serde(default)]
    direction: Option<TextDirection>,
    #[serde(default)]
    children: Vec<EditorBlock>,
}

#[derive(Debug, serde::Deserialize)]
struct EditorBlock {
    #[serde(default)]
    children: Vec<EditorWord>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditorWord {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    start_time: Option<f64>,
    #[serde(default)]
    end_time: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlainTranscript {
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    text_direction: TextDirection,
    words: Vec<Word>,
}

fn default_language() -> String {
    "en".to_string()
}

/// Parse either supported JSON shape, picking the plain shape when a top-level `words` key is
/// present.
pub fn parse_transcript_json(json: &str) -> CaptionResult<Transcript> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("words").is_some() {
        let plain: PlainTranscript = serde_json::from_value(value)?;
        return Transcript::new(plain.words, plain.language, plain.text_direction);
    }
    let groups: BTreeMap<String, SceneGroup> = serde_json::from_value(value)?;
    transcript_from_groups(groups)
}

/// Parse the scene-group editor export.
///
/// Word nodes whose text is missing or whitespace-only, or that lack timestamps, are dropped.
/// Groups are concatenated in key order and the result is sorted by start time. Language and
/// direction come from the first group that provides them.
pub fn parse_scene_groups(json: &str) -> CaptionResult<Transcript> {
    let groups: BTreeMap<String, SceneGroup> = serde_json::from_str(json)?;
    transcript_from_groups(groups)
}

fn transcript_from_groups(groups: BTreeMap<String, SceneGroup>) -> CaptionResult<Transcript> {
    if groups.is_empty() {
        return Err(CaptionError::validation("transcript JSON has no scene groups"));
    }

    let mut language = None;
    let mut direction = None;
    let mut words = Vec::new();
    let mut dropped = 0usize;

    for (id, group) in groups {
        if language.is_none() {
            language = group.language.clone();
        }
        if direction.is_none() {
            direction = group.editor_state.root.direction;
        }
        for node in group
            .editor_state
            .root
            .children
            .into_iter()
            .flat_map(|block| block.children)
        {
            match word_from_node(node) {
                Some(w) => words.push(w),
                None => dropped += 1,
            }
        }
        tracing::trace!(group = %id, words = words.len(), "collected scene group");
    }

    if dropped > 0 {
        tracing::debug!(dropped, "skipped editor nodes without text or timing");
    }

    words.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    Transcript::new(
        words,
        language.unwrap_or_else(default_language),
        direction.unwrap_or_default(),
    )
}

fn word_from_node(node: EditorWord) -> Option<Word> {
    let text = node.text?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(Word::new(text, node.start_time?, node.end_time?))
}

#[cfg(test)]
#[path = "../../tests/unit/transcript/input.rs"]
mod tests;
