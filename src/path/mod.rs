// Author: Dustin Pilgrim
// License: MIT

use once_cell::sync::Lazy;
use regex::Regex;

/// `3`, `3:`, `:3` address by position; `:3:` addresses the 4th nested sequence.
static INDEX_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(:*)([0-9]+)(:*)$").expect("index segment pattern is valid")
});

/// One dot-separated step of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Key(&'a str),
    Index { raw: &'a str, index: usize },
    /// Counts only the sequence-typed children of a sequence.
    Inception { raw: &'a str, index: usize },
}

impl<'a> Segment<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let Some(caps) = INDEX_SEGMENT.captures(raw) else {
            return Segment::Key(raw);
        };
        let Ok(index) = caps[2].parse::<usize>() else {
            return Segment::Key(raw);
        };
        if !caps[1].is_empty() && !caps[3].is_empty() {
            Segment::Inception { raw, index }
        } else {
            Segment::Index { raw, index }
        }
    }

    /// The text as written, which is what mapping keys are compared against.
    pub fn raw(&self) -> &'a str {
        match *self {
            Segment::Key(raw) | Segment::Index { raw, .. } | Segment::Inception { raw, .. } => raw,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match *self {
            Segment::Key(_) => None,
            Segment::Index { index, .. } | Segment::Inception { index, .. } => Some(index),
        }
    }

    pub fn is_inception(&self) -> bool {
        matches!(self, Segment::Inception { .. })
    }
}

/// Split a dotted path into segments. Empty parts are kept as empty keys.
pub fn parse_path(path: &str) -> Vec<Segment<'_>> {
    let segments: Vec<Segment<'_>> = path.split('.').map(Segment::parse).collect();
    log::trace!("parsed path '{}' into {:?}", path, segments);
    segments
}

/// Path form used by `set`: trailing colons name a terminal index and are dropped.
pub fn trim_set_path(path: &str) -> &str {
    path.trim_end_matches(':')
}

#[cfg(test)]
mod tests;
