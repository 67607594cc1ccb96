use std::fmt;

/// Presentation style of a scalar, kept so edits do not rewrite untouched values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionStyle {
    #[default]
    Any,
    Block,
    Flow,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scalar {
    pub value: String,
    pub style: ScalarStyle,
    pub tag: Option<String>,
    pub anchor: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    pub items: Vec<Node>,
    pub style: CollectionStyle,
    pub tag: Option<String>,
    pub anchor: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    pub entries: Vec<(Node, Node)>, // insertion order, keys matched by text
    pub style: CollectionStyle,
    pub tag: Option<String>,
    pub anchor: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Sequence),
    Mapping(Mapping),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

/// A parsed YAML document. Owns its root node.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}

/// A typed value handed to `set`/`put`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Sequence(Vec<Value>),
}

impl Scalar {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// A scalar that reads back as the string `value`, quoted only when plain text would not.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        let style = if plain_is_string(&value) { ScalarStyle::Plain } else { ScalarStyle::SingleQuoted };
        Self {
            value,
            style,
            ..Self::default()
        }
    }

    /// Replace the text with the string form of `value`, keeping tag and anchor.
    pub fn overwrite(&mut self, value: &Value) {
        self.value = value.to_string();
        self.style = match value {
            Value::Text(text) => match self.style {
                ScalarStyle::Plain if !plain_is_string(text) => ScalarStyle::SingleQuoted,
                style => style,
            },
            _ => ScalarStyle::Plain,
        };
    }

    pub(crate) fn resolve(&self) -> Resolved<'_> {
        resolve_scalar(&self.value, self.style, self.tag.as_deref())
    }
}

impl Sequence {
    pub fn new(items: Vec<Node>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }
}

impl Mapping {
    pub fn new(entries: Vec<(Node, Node)>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// Index of the entry addressed by `key`. The last match wins when keys repeat.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().rposition(|(k, _)| k.key_matches(key))
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|(k, _)| k.to_string())
    }
}

impl Node {
    pub fn scalar(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::new(value))
    }

    pub fn sequence(items: Vec<Node>) -> Self {
        Node::Sequence(Sequence::new(items))
    }

    pub fn mapping(entries: Vec<(Node, Node)>) -> Self {
        Node::Mapping(Mapping::new(entries))
    }

    /// An empty container of the given kind; `Scalar` yields an empty plain scalar.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Scalar => Node::Scalar(Scalar::default()),
            NodeKind::Sequence => Node::Sequence(Sequence::default()),
            NodeKind::Mapping => Node::Mapping(Mapping::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Mapping(_) => NodeKind::Mapping,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(scalar) => Some(&scalar.value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        if let Node::Sequence(seq) = self { Some(seq) } else { None }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        if let Node::Mapping(map) = self { Some(map) } else { None }
    }

    /// Whether this node, used as a mapping key, reads as `key`.
    pub fn key_matches(&self, key: &str) -> bool {
        match self {
            Node::Scalar(scalar) => scalar.value == key,
            other => other.to_string() == key,
        }
    }
}

/// Flow-style rendering; for a scalar this is its raw text.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(scalar) => f.write_str(&scalar.value),
            Node::Sequence(seq) => {
                f.write_str("[")?;
                for (i, item) in seq.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Node::Mapping(map) => {
                f.write_str("{ ")?;
                for (i, (key, value)) in map.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str(" }")
            }
        }
    }
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// A document whose root is an empty mapping.
    pub fn empty() -> Self {
        Self::new(Node::empty(NodeKind::Mapping))
    }
}

impl Value {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Sequence(_))
    }
}

/// String form written into scalars on the in-place overwrite path.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_nan() => f.write_str(".nan"),
            Value::Float(x) if x.is_infinite() => {
                f.write_str(if x.is_sign_negative() { "-.inf" } else { ".inf" })
            }
            Value::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{:.1}", x),
            // Bare digits would read back as an integer.
            Value::Float(x) if x.fract() == 0.0 => write!(f, "{:e}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => f.write_str(s),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A scalar read through the YAML 1.2 core schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Resolved<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'a str),
}

/// Only plain scalars are typed; quoted and block scalars are always strings.
/// Core-schema tags (`!!str`, `!!int`, ...) override the guess.
pub(crate) fn resolve_scalar<'a>(value: &'a str, style: ScalarStyle, tag: Option<&str>) -> Resolved<'a> {
    let core = tag.and_then(|t| t.strip_prefix("!!").or_else(|| t.strip_prefix("tag:yaml.org,2002:")));
    match core {
        Some("str") => return Resolved::Str(value),
        Some("null") => return Resolved::Null,
        Some("bool") => return parse_bool(value).map_or(Resolved::Str(value), Resolved::Bool),
        Some("int") => return parse_int(value).map_or(Resolved::Str(value), int_to_resolved),
        Some("float") => return parse_float(value).map_or(Resolved::Str(value), Resolved::Float),
        _ => {}
    }
    if style != ScalarStyle::Plain || (tag.is_some() && core.is_none()) {
        return Resolved::Str(value);
    }
    if is_null(value) {
        Resolved::Null
    } else if let Some(b) = parse_bool(value) {
        Resolved::Bool(b)
    } else if let Some(n) = parse_int(value) {
        int_to_resolved(n)
    } else if let Some(x) = parse_float(value) {
        Resolved::Float(x)
    } else {
        Resolved::Str(value)
    }
}

fn int_to_resolved<'a>(n: i128) -> Resolved<'a> {
    if let Ok(i) = i64::try_from(n) {
        Resolved::Int(i)
    } else if let Ok(u) = u64::try_from(n) {
        Resolved::UInt(u)
    } else {
        Resolved::Float(n as f64)
    }
}

fn plain_is_string(text: &str) -> bool {
    matches!(resolve_scalar(text, ScalarStyle::Plain, None), Resolved::Str(_))
}

pub(crate) fn is_null(value: &str) -> bool {
    matches!(value, "" | "~" | "null" | "Null" | "NULL")
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Decimal with optional sign, `0x` hex or `0o` octal.
pub(crate) fn parse_int(value: &str) -> Option<i128> {
    let (negative, digits) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x") {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        i128::from_str_radix(hex, 16).ok()?
    } else if let Some(oct) = digits.strip_prefix("0o") {
        if oct.is_empty() || !oct.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return None;
        }
        i128::from_str_radix(oct, 8).ok()?
    } else {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<i128>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

pub(crate) fn parse_float(value: &str) -> Option<f64> {
    match value {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }
    // Rust also accepts "inf" and "NaN"; YAML does not.
    let well_formed = value.bytes().any(|b| b.is_ascii_digit())
        && value.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
    if well_formed { value.parse::<f64>().ok() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_plain_scalars() {
        assert_eq!(resolve_scalar("~", ScalarStyle::Plain, None), Resolved::Null);
        assert_eq!(resolve_scalar("True", ScalarStyle::Plain, None), Resolved::Bool(true));
        assert_eq!(resolve_scalar("-42", ScalarStyle::Plain, None), Resolved::Int(-42));
        assert_eq!(resolve_scalar("0x1F", ScalarStyle::Plain, None), Resolved::Int(31));
        assert_eq!(resolve_scalar("0o17", ScalarStyle::Plain, None), Resolved::Int(15));
        assert_eq!(resolve_scalar("1.5e3", ScalarStyle::Plain, None), Resolved::Float(1500.0));
        assert_eq!(resolve_scalar("inf", ScalarStyle::Plain, None), Resolved::Str("inf"));
        assert_eq!(resolve_scalar("hello", ScalarStyle::Plain, None), Resolved::Str("hello"));
        assert_eq!(
            resolve_scalar("18446744073709551615", ScalarStyle::Plain, None),
            Resolved::UInt(u64::MAX)
        );
    }

    #[test]
    fn test_resolve_quoted_and_tagged() {
        assert_eq!(resolve_scalar("42", ScalarStyle::DoubleQuoted, None), Resolved::Str("42"));
        assert_eq!(resolve_scalar("42", ScalarStyle::Plain, Some("!!str")), Resolved::Str("42"));
        assert_eq!(resolve_scalar("7", ScalarStyle::SingleQuoted, Some("tag:yaml.org,2002:int")), Resolved::Int(7));
        assert_eq!(resolve_scalar("7", ScalarStyle::Plain, Some("!custom")), Resolved::Str("7"));
    }

    #[test]
    fn test_scalar_overwrite_keeps_tag_and_fixes_style() {
        let mut scalar = Scalar {
            value: "8080".into(),
            style: ScalarStyle::DoubleQuoted,
            tag: Some("!port".into()),
            anchor: Some(1),
        };
        scalar.overwrite(&Value::Int(9090));
        assert_eq!(scalar.value, "9090");
        assert_eq!(scalar.style, ScalarStyle::Plain);
        assert_eq!(scalar.tag.as_deref(), Some("!port"));
        assert_eq!(scalar.anchor, Some(1));

        let mut plain = Scalar::new("x");
        plain.overwrite(&Value::Text("true".into()));
        assert_eq!(plain.style, ScalarStyle::SingleQuoted);
        plain.overwrite(&Value::Text("yes please".into()));
        assert_eq!(plain.style, ScalarStyle::SingleQuoted);
    }

    #[test]
    fn test_text_scalar_quotes_only_when_needed() {
        assert_eq!(Scalar::text("name").style, ScalarStyle::Plain);
        for raw in ["", "~", "null", "0x1F", "true", "12", "1.5"] {
            let scalar = Scalar::text(raw);
            assert_eq!(scalar.style, ScalarStyle::SingleQuoted, "raw {:?}", raw);
            assert_eq!(scalar.resolve(), Resolved::Str(raw));
        }
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-.inf");
        assert_eq!(Value::Float(1e17).to_string(), "1e17");
        assert_eq!(Value::Float(-2.5e20).to_string(), "-2.5e20");
        assert_eq!(resolve_scalar("1e17", ScalarStyle::Plain, None), Resolved::Float(1e17));
        assert_eq!(
            Value::Sequence(vec![Value::Int(1), Value::Bool(false)]).to_string(),
            "[1, false]"
        );
    }

    #[test]
    fn test_node_display_and_key_matching() {
        let node = Node::mapping(vec![(
            Node::scalar("a"),
            Node::sequence(vec![Node::scalar("1"), Node::scalar("2")]),
        )]);
        assert_eq!(node.to_string(), "{ a: [1, 2] }");
        assert!(Node::scalar("port").key_matches("port"));
        assert!(Node::sequence(vec![Node::scalar("x")]).key_matches("[x]"));
    }

    #[test]
    fn test_mapping_last_duplicate_wins() {
        let map = Mapping::new(vec![
            (Node::scalar("k"), Node::scalar("first")),
            (Node::scalar("k"), Node::scalar("second")),
        ]);
        assert_eq!(map.get("k").and_then(Node::as_str), Some("second"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["k", "k"]);
    }
}
