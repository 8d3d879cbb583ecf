// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dataset factory patterns.
//!
//! A catalog key such as `{layer}_companies` or `{name}#csv` declares a family
//! of datasets. Any artifact name matching the pattern gets a dataset built from
//! the entry, with the captured values substituted into `filepath`.

use std::collections::HashMap;

use crate::config::ArtifactConfig;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// One catalog entry whose key contains `{placeholder}`s.
#[derive(Debug, Clone)]
pub struct DatasetPattern {
    key: String,
    segments: Vec<Segment>,
    config: ArtifactConfig,
}

impl DatasetPattern {
    /// Keys containing a `{...}` pair are patterns
    pub fn is_pattern(key: &str) -> bool {
        key.find('{')
            .is_some_and(|open| key[open..].contains('}'))
    }

    pub fn new(key: &str, config: ArtifactConfig) -> Self {
        Self {
            key: key.to_string(),
            segments: parse(key),
            config,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn config(&self) -> &ArtifactConfig {
        &self.config
    }

    /// Number of literal characters; more means more specific
    pub fn literal_len(&self) -> usize {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.chars().count(),
                Segment::Placeholder(_) => 0,
            })
            .sum()
    }

    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder(_)))
            .count()
    }

    /// Captured placeholder values when `name` matches. Every placeholder
    /// captures at least one character.
    pub fn captures(&self, name: &str) -> Option<HashMap<String, String>> {
        let mut captures = HashMap::new();
        if match_from(&self.segments, name, &mut captures) {
            Some(captures)
        } else {
            None
        }
    }

    /// Concrete configuration for `name`, or `None` when it does not match
    pub fn materialize(&self, name: &str) -> Option<ArtifactConfig> {
        let captures = self.captures(name)?;
        let mut config = self.config.clone();
        config.filepath = config
            .filepath
            .as_deref()
            .map(|path| substitute(path, &captures));
        Some(config)
    }
}

/// Order patterns most specific first: more literal characters, then fewer
/// placeholders. The sort is stable so declaration order breaks ties.
pub fn sort_by_specificity(patterns: &mut [DatasetPattern]) {
    patterns.sort_by(|a, b| {
        b.literal_len()
            .cmp(&a.literal_len())
            .then(a.placeholder_count().cmp(&b.placeholder_count()))
    });
}

fn parse(key: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = key;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        if open > 0 {
            segments.push(Segment::Literal(rest[..open].to_string()));
        }
        segments.push(Segment::Placeholder(rest[open + 1..close].to_string()));
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    segments
}

fn match_from(segments: &[Segment], input: &str, captures: &mut HashMap<String, String>) -> bool {
    let Some((first, remaining)) = segments.split_first() else {
        return input.is_empty();
    };

    match first {
        Segment::Literal(text) => input
            .strip_prefix(text.as_str())
            .is_some_and(|rest| match_from(remaining, rest, captures)),
        Segment::Placeholder(name) => {
            // Shortest capture first, so a later literal anchors as early as possible
            let boundaries = input
                .char_indices()
                .map(|(i, _)| i)
                .skip(1)
                .chain([input.len()])
                .filter(|&end| end > 0);
            for end in boundaries {
                let value = &input[..end];
                if let Some(previous) = captures.get(name) {
                    if previous != value {
                        continue;
                    }
                }
                let inserted = !captures.contains_key(name);
                if inserted {
                    captures.insert(name.clone(), value.to_string());
                }
                if match_from(remaining, &input[end..], captures) {
                    return true;
                }
                if inserted {
                    captures.remove(name);
                }
            }
            false
        }
    }
}

fn substitute(template: &str, captures: &HashMap<String, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in captures {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}
