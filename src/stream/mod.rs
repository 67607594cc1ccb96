use std::iter::FusedIterator;
use std::slice;

use crate::ast::{CollectionStyle, Mapping, Node, Scalar, ScalarStyle, Sequence};

mod de;

pub use de::{from_events, from_node, Deserializer};

/// Structural events produced from a node tree, borrowing from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    StreamStart,
    DocumentStart,
    Scalar {
        anchor: Option<usize>,
        tag: Option<&'a str>,
        value: &'a str,
        style: ScalarStyle,
    },
    SequenceStart {
        anchor: Option<usize>,
        tag: Option<&'a str>,
        style: CollectionStyle,
    },
    SequenceEnd,
    MappingStart {
        anchor: Option<usize>,
        tag: Option<&'a str>,
        style: CollectionStyle,
    },
    MappingEnd,
    DocumentEnd,
    StreamEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    StreamStart,
    DocumentStart,
    Root,
    Body,
    DocumentEnd,
    StreamEnd,
    Done,
}

enum Frame<'a> {
    Sequence(slice::Iter<'a, Node>),
    Mapping {
        entries: slice::Iter<'a, (Node, Node)>,
        value: Option<&'a Node>,
    },
}

enum Step<'a> {
    Enter(&'a Node),
    Emit(Event<'a>),
    Finish,
}

/// Lazy, single-pass event sequence for a node and its descendants.
pub struct EventStream<'a> {
    root: Option<&'a Node>,
    stack: Vec<Frame<'a>>,
    phase: Phase,
    wrapped: bool,
}

impl<'a> EventStream<'a> {
    /// Events for `node` wrapped as a single-document stream.
    pub fn document(node: &'a Node) -> Self {
        Self {
            root: Some(node),
            stack: Vec::new(),
            phase: Phase::StreamStart,
            wrapped: true,
        }
    }

    /// Events for `node` alone, without stream or document markers.
    pub fn fragment(node: &'a Node) -> Self {
        Self {
            root: Some(node),
            stack: Vec::new(),
            phase: Phase::Root,
            wrapped: false,
        }
    }

    fn enter(&mut self, node: &'a Node) -> Event<'a> {
        match node {
            Node::Scalar(Scalar { value, style, tag, anchor }) => Event::Scalar {
                anchor: *anchor,
                tag: tag.as_deref(),
                value,
                style: *style,
            },
            Node::Sequence(Sequence { items, style, tag, anchor }) => {
                self.stack.push(Frame::Sequence(items.iter()));
                Event::SequenceStart {
                    anchor: *anchor,
                    tag: tag.as_deref(),
                    style: *style,
                }
            }
            Node::Mapping(Mapping { entries, style, tag, anchor }) => {
                self.stack.push(Frame::Mapping {
                    entries: entries.iter(),
                    value: None,
                });
                Event::MappingStart {
                    anchor: *anchor,
                    tag: tag.as_deref(),
                    style: *style,
                }
            }
        }
    }

    fn step(&mut self) -> Step<'a> {
        match self.stack.last_mut() {
            None => Step::Finish,
            Some(Frame::Sequence(items)) => match items.next() {
                Some(item) => Step::Enter(item),
                None => {
                    self.stack.pop();
                    Step::Emit(Event::SequenceEnd)
                }
            },
            Some(Frame::Mapping { entries, value }) => {
                if let Some(pending) = value.take() {
                    return Step::Enter(pending);
                }
                match entries.next() {
                    Some((key, next_value)) => {
                        *value = Some(next_value);
                        Step::Enter(key)
                    }
                    None => {
                        self.stack.pop();
                        Step::Emit(Event::MappingEnd)
                    }
                }
            }
        }
    }
}

impl<'a> Iterator for EventStream<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        loop {
            match self.phase {
                Phase::StreamStart => {
                    self.phase = Phase::DocumentStart;
                    return Some(Event::StreamStart);
                }
                Phase::DocumentStart => {
                    self.phase = Phase::Root;
                    return Some(Event::DocumentStart);
                }
                Phase::Root => {
                    self.phase = Phase::Body;
                    if let Some(root) = self.root.take() {
                        return Some(self.enter(root));
                    }
                }
                Phase::Body => match self.step() {
                    Step::Enter(node) => return Some(self.enter(node)),
                    Step::Emit(event) => return Some(event),
                    Step::Finish => {
                        self.phase = if self.wrapped { Phase::DocumentEnd } else { Phase::Done };
                    }
                },
                Phase::DocumentEnd => {
                    self.phase = Phase::StreamEnd;
                    return Some(Event::DocumentEnd);
                }
                Phase::StreamEnd => {
                    self.phase = Phase::Done;
                    return Some(Event::StreamEnd);
                }
                Phase::Done => return None,
            }
        }
    }
}

impl FusedIterator for EventStream<'_> {}

/// Shorthand for [`EventStream::document`].
pub fn to_event_stream(node: &Node) -> EventStream<'_> {
    EventStream::document(node)
}
