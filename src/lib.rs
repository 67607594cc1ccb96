pub mod ast;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod parser;
pub mod path;
pub mod resolver;
pub mod stream;

pub use ast::{CollectionStyle, Document, Mapping, Node, NodeKind, Scalar, ScalarStyle, Sequence, Value};
pub use config::YamlConfig;
pub use error::YamlError;
pub use path::{parse_path, Segment};
pub use stream::{from_node, to_event_stream, Event, EventStream};
