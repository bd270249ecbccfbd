//! Rename proposal normalizer.
//!
//! Turns the text returned by the generation service into a validated
//! [`RenamePlan`]. Decoding and validation are split in two steps:
//! [`decode_proposal`] classifies the raw text as well-formed or malformed,
//! then [`normalize`] checks it against the source list and applies the
//! subtitle locale rewrites.

use crate::error::NormalizeError;
use crate::models::plan::RenamePlan;
use serde_json::Value;
use std::path::PathBuf;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Subtitle locale tags rewritten to a fixed code, applied in order.
const SUBTITLE_TAG_REWRITES: &[(&str, &str)] = &[
    ("tc", "cht"),
    ("sc", "chs"),
    ("jptc", "cht"),
    ("jpsc", "chs"),
];

/// Why a proposal could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    Empty,
    InvalidJson(String),
    MissingResultField,
    ResultNotStringList,
}

/// A decoded generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// The `result` list of proposed names, in source order.
    WellFormed(Vec<String>),
    Malformed(MalformedReason),
}

/// Remove a surrounding ```` ```json ... ``` ```` fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if text.len() >= FENCE_OPEN.len() + FENCE_CLOSE.len()
        && text.starts_with(FENCE_OPEN)
        && text.ends_with(FENCE_CLOSE)
    {
        text[FENCE_OPEN.len()..text.len() - FENCE_CLOSE.len()].trim()
    } else {
        text
    }
}

/// Decode raw proposal text into a [`Proposal`].
pub fn decode_proposal(text: &str) -> Proposal {
    if text.trim().is_empty() {
        return Proposal::Malformed(MalformedReason::Empty);
    }

    let value: Value = match serde_json::from_str(strip_code_fence(text)) {
        Ok(value) => value,
        Err(e) => return Proposal::Malformed(MalformedReason::InvalidJson(e.to_string())),
    };

    let result = match value.get("result") {
        Some(result) => result,
        None => return Proposal::Malformed(MalformedReason::MissingResultField),
    };

    let names: Option<Vec<String>> = result.as_array().and_then(|items| {
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    });

    match names {
        Some(names) => Proposal::WellFormed(names),
        None => Proposal::Malformed(MalformedReason::ResultNotStringList),
    }
}

/// Rewrite `.tc`/`.sc`/`.jptc`/`.jpsc` tags that directly precede an
/// `.ass` or `.srt` extension. Matching is case-insensitive; the extension
/// keeps its original case.
pub fn rewrite_subtitle_tags(name: &str) -> String {
    let mut processed = name.to_string();

    for (tag, code) in SUBTITLE_TAG_REWRITES {
        let pattern = format!(r"(?i)\.{}\.(ass|srt)$", tag);
        if let Ok(re) = regex::Regex::new(&pattern) {
            processed = re
                .replace(&processed, format!(".{}.$1", code).as_str())
                .into_owned();
        }
    }

    processed
}

/// Build a rename plan from `sources` and the generation service's text.
///
/// Fails without a partial plan when the text is empty or not JSON, lacks a
/// `result` list of strings, or proposes a different number of names than
/// there are sources.
pub fn normalize(sources: &[PathBuf], proposal_text: &str) -> Result<RenamePlan, NormalizeError> {
    let raw = || proposal_text.to_string();

    let names = match decode_proposal(proposal_text) {
        Proposal::WellFormed(names) => names,
        Proposal::Malformed(MalformedReason::Empty) => return Err(NormalizeError::EmptyResponse),
        Proposal::Malformed(MalformedReason::InvalidJson(reason)) => {
            return Err(NormalizeError::InvalidJson { reason, raw: raw() })
        }
        Proposal::Malformed(MalformedReason::MissingResultField) => {
            return Err(NormalizeError::MissingResultField { raw: raw() })
        }
        Proposal::Malformed(MalformedReason::ResultNotStringList) => {
            return Err(NormalizeError::ResultNotStringList { raw: raw() })
        }
    };

    if names.len() != sources.len() {
        return Err(NormalizeError::LengthMismatch {
            paths: sources.iter().map(|p| p.display().to_string()).collect(),
            result: names,
        });
    }

    let mut plan = RenamePlan::new();
    for (source, name) in sources.iter().zip(names) {
        let target = rewrite_subtitle_tags(&name);
        if target != name {
            tracing::debug!("Rewrote subtitle tag: {} -> {}", name, target);
        }
        // Sources are deduplicated upstream.
        if plan.insert(source.clone(), target).is_err() {
            tracing::warn!("Ignoring repeated source {:?}", source);
        }
    }

    Ok(plan)
}
