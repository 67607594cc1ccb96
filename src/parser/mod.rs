use std::collections::HashMap;

use saphyr_parser::{Event, Parser as EventParser, ScanError, StrInput};

use crate::ast::{Document, Node};
use crate::YamlError;

mod document;

/// Builds `Node` trees from the `saphyr-parser` event stream.
pub struct Parser<'a> {
    events: EventParser<'a, StrInput<'a>>,
    /// Anchored nodes by id, so aliases can be expanded.
    anchors: HashMap<usize, Node>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            events: EventParser::new_from_str(input),
            anchors: HashMap::new(),
        }
    }

    pub(crate) fn bump(&mut self) -> Result<Event<'a>, YamlError> {
        match self.events.next_event() {
            Some(Ok((event, _span))) => Ok(event),
            Some(Err(e)) => Err(scan_error(&e)),
            None => Err(YamlError::SyntaxError {
                message: "Unexpected end of input".into(),
                line: 0,
                column: 0,
                hint: None,
                code: Some(201),
            }),
        }
    }

    pub(crate) fn remember(&mut self, anchor: usize, node: &Node) {
        if anchor != 0 {
            self.anchors.insert(anchor, node.clone());
        }
    }

    pub(crate) fn recall(&self, anchor: usize) -> Option<Node> {
        self.anchors.get(&anchor).cloned()
    }

    /// Parse every document in the stream.
    pub fn parse_documents(&mut self) -> Result<Vec<Document>, YamlError> {
        document::parse_documents(self, usize::MAX)
    }

    /// Parse only the first document; `None` for an empty stream.
    pub fn parse_first(&mut self) -> Result<Option<Document>, YamlError> {
        Ok(document::parse_documents(self, 1)?.into_iter().next())
    }
}

/// Parse the first document of `input`.
pub fn parse_str(input: &str) -> Result<Option<Document>, YamlError> {
    Parser::new(input).parse_first()
}

fn scan_error(e: &ScanError) -> YamlError {
    YamlError::SyntaxError {
        message: e.info().to_string(),
        line: e.marker().line(),
        column: e.marker().col(),
        hint: Some("Check indentation and quoting near this position".into()),
        code: Some(200),
    }
}
