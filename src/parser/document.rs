// Author: Dustin Pilgrim
// License: MIT

use std::borrow::Cow;

use saphyr_parser::{Event, ScalarStyle as EventStyle, Tag};

use super::*;
use crate::ast::{Mapping, Scalar, ScalarStyle, Sequence};

pub(super) fn parse_documents(parser: &mut Parser<'_>, limit: usize) -> Result<Vec<Document>, YamlError> {
    let mut documents = Vec::new();

    while documents.len() < limit {
        match parser.bump()? {
            Event::StreamStart | Event::DocumentEnd | Event::Nothing => continue,
            Event::DocumentStart(_) => {
                let first = parser.bump()?;
                let root = parse_node(parser, first)?;
                documents.push(Document::new(root));
            }
            Event::StreamEnd => break,
            other => return Err(unexpected(&other)),
        }
    }

    Ok(documents)
}

fn parse_node<'a>(parser: &mut Parser<'a>, event: Event<'a>) -> Result<Node, YamlError> {
    match event {
        Event::Scalar(value, style, anchor, tag) => {
            let node = Node::Scalar(Scalar {
                value: value.into_owned(),
                style: scalar_style(style),
                tag: tag_text(tag),
                anchor: anchor_id(anchor),
            });
            parser.remember(anchor, &node);
            Ok(node)
        }
        Event::SequenceStart(anchor, tag) => {
            let mut items = Vec::new();
            loop {
                match parser.bump()? {
                    Event::SequenceEnd => break,
                    next => items.push(parse_node(parser, next)?),
                }
            }
            let node = Node::Sequence(Sequence {
                items,
                tag: tag_text(tag),
                anchor: anchor_id(anchor),
                ..Sequence::default()
            });
            parser.remember(anchor, &node);
            Ok(node)
        }
        Event::MappingStart(anchor, tag) => {
            let mut entries = Vec::new();
            loop {
                match parser.bump()? {
                    Event::MappingEnd => break,
                    next => {
                        let key = parse_node(parser, next)?;
                        let value_event = parser.bump()?;
                        let value = parse_node(parser, value_event)?;
                        entries.push((key, value));
                    }
                }
            }
            let node = Node::Mapping(Mapping {
                entries,
                tag: tag_text(tag),
                anchor: anchor_id(anchor),
                ..Mapping::default()
            });
            parser.remember(anchor, &node);
            Ok(node)
        }
        Event::Alias(id) => parser.recall(id).ok_or_else(|| YamlError::SyntaxError {
            message: format!("Alias refers to unknown anchor #{}", id),
            line: 0,
            column: 0,
            hint: Some("Define the anchor before using it".into()),
            code: Some(203),
        }),
        Event::Nothing => {
            let next = parser.bump()?;
            parse_node(parser, next)
        }
        other => Err(unexpected(&other)),
    }
}

fn scalar_style(style: EventStyle) -> ScalarStyle {
    match style {
        EventStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        EventStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        EventStyle::Literal => ScalarStyle::Literal,
        EventStyle::Folded => ScalarStyle::Folded,
        _ => ScalarStyle::Plain,
    }
}

fn tag_text(tag: Option<Cow<'_, Tag>>) -> Option<String> {
    tag.map(|t| format!("{}{}", t.handle, t.suffix))
}

fn anchor_id(anchor: usize) -> Option<usize> {
    (anchor != 0).then_some(anchor)
}

fn unexpected(event: &Event<'_>) -> YamlError {
    YamlError::SyntaxError {
        message: format!("Unexpected event {:?}", event),
        line: 0,
        column: 0,
        hint: None,
        code: Some(202),
    }
}
