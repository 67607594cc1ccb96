// Author: Dustin Pilgrim
// License: MIT

use log::debug;

use crate::ast::{Mapping, Node, NodeKind, Scalar, Value};
use crate::convert::to_node;
use crate::path::{parse_path, trim_set_path, Segment};
use crate::YamlError;

/// Where a segment landed inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Entry of a mapping.
    Entry(usize),
    /// Element of a sequence.
    Item(usize),
    /// Value of the first entry of the mapping at this sequence position.
    ItemEntry(usize),
}

fn locate(node: &Node, segment: &Segment<'_>) -> Result<Option<Slot>, YamlError> {
    match node {
        Node::Scalar(_) => Err(YamlError::scalar_has_no_children(segment.raw())),
        Node::Mapping(mapping) => Ok(mapping.position(segment.raw()).map(Slot::Entry)),
        Node::Sequence(seq) => Ok(match *segment {
            Segment::Inception { index, .. } => seq
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.is_sequence())
                .nth(index)
                .map(|(i, _)| Slot::Item(i)),
            Segment::Index { index, .. } => (index < seq.items.len()).then_some(Slot::Item(index)),
            Segment::Key(key) => seq.items.iter().enumerate().find_map(|(i, item)| match item {
                Node::Scalar(scalar) if scalar.value == key => Some(Slot::Item(i)),
                Node::Mapping(mapping) => mapping
                    .entries
                    .first()
                    .filter(|(first, _)| first.key_matches(key))
                    .map(|_| Slot::ItemEntry(i)),
                _ => None,
            }),
        }),
    }
}

fn child(node: &Node, slot: Slot) -> Option<&Node> {
    match (node, slot) {
        (Node::Mapping(mapping), Slot::Entry(i)) => mapping.entries.get(i).map(|(_, v)| v),
        (Node::Sequence(seq), Slot::Item(i)) => seq.items.get(i),
        (Node::Sequence(seq), Slot::ItemEntry(i)) => match seq.items.get(i) {
            Some(Node::Mapping(mapping)) => mapping.entries.first().map(|(_, v)| v),
            _ => None,
        },
        _ => None,
    }
}

fn child_mut(node: &mut Node, slot: Slot) -> Result<&mut Node, YamlError> {
    let found = match (node, slot) {
        (Node::Mapping(mapping), Slot::Entry(i)) => mapping.entries.get_mut(i).map(|(_, v)| v),
        (Node::Sequence(seq), Slot::Item(i)) => seq.items.get_mut(i),
        (Node::Sequence(seq), Slot::ItemEntry(i)) => match seq.items.get_mut(i) {
            Some(Node::Mapping(mapping)) => mapping.entries.first_mut().map(|(_, v)| v),
            _ => None,
        },
        _ => None,
    };
    found.ok_or_else(|| YamlError::RuntimeError {
        message: format!("Resolved slot {:?} no longer exists", slot),
        hint: None,
        code: Some(311),
    })
}

/// Kind of a node created for `segment`, given the segment that follows it.
fn default_kind(segment: &Segment<'_>, next: Option<&Segment<'_>>) -> NodeKind {
    if segment.is_inception() || next.is_some_and(Segment::is_inception) {
        NodeKind::Sequence
    } else {
        NodeKind::Mapping
    }
}

/// Look up one segment below `node`. Absent children are `Ok(None)`; a scalar parent is an error.
pub fn lookup<'n>(node: &'n Node, segment: &Segment<'_>) -> Result<Option<&'n Node>, YamlError> {
    Ok(locate(node, segment)?.and_then(|slot| child(node, slot)))
}

pub fn lookup_mut<'n>(node: &'n mut Node, segment: &Segment<'_>) -> Result<Option<&'n mut Node>, YamlError> {
    match locate(node, segment)? {
        Some(slot) => child_mut(node, slot).map(Some),
        None => Ok(None),
    }
}

/// Follow a dotted path from `root`. Never creates nodes.
///
/// # Examples
/// ```
/// use yamledit::{parser, resolver};
///
/// let doc = parser::parse_str("server:\n  ports: [80, [443, 8443], [22]]\n").unwrap().unwrap();
/// let ssh = resolver::resolve(Some(&doc.root), "server.ports.:1:.0").unwrap();
/// assert_eq!(ssh.and_then(|n| n.as_str()), Some("22"));
/// ```
pub fn resolve<'n>(root: Option<&'n Node>, path: &str) -> Result<Option<&'n Node>, YamlError> {
    let mut current = root;
    for segment in parse_path(path) {
        let Some(node) = current else {
            return Ok(None);
        };
        current = lookup(node, &segment)?;
    }
    Ok(current)
}

pub fn resolve_mut<'n>(root: Option<&'n mut Node>, path: &str) -> Result<Option<&'n mut Node>, YamlError> {
    let mut current = root;
    for segment in parse_path(path) {
        let Some(node) = current else {
            return Ok(None);
        };
        current = lookup_mut(node, &segment)?;
    }
    Ok(current)
}

/// Mapping key for a path segment; keeps its text when saved and read back.
fn key_node(segment: &Segment<'_>) -> Node {
    Node::Scalar(Scalar::text(segment.raw()))
}

fn append<'n>(node: &'n mut Node, segment: &Segment<'_>, new_child: Node) -> Result<&'n mut Node, YamlError> {
    match node {
        Node::Scalar(_) => Err(YamlError::scalar_has_no_children(segment.raw())),
        Node::Mapping(mapping) => {
            let index = mapping.entries.len();
            mapping.entries.push((key_node(segment), new_child));
            Ok(&mut mapping.entries[index].1)
        }
        // Wrapped as `{key: child}` so the key-style lookup finds it again.
        Node::Sequence(seq) if matches!(segment, Segment::Key(_)) => {
            let index = seq.items.len();
            seq.items.push(Node::mapping(vec![(key_node(segment), new_child)]));
            child_mut(node, Slot::ItemEntry(index))
        }
        Node::Sequence(seq) => {
            let index = seq.items.len();
            seq.items.push(new_child);
            Ok(&mut seq.items[index])
        }
    }
}

/// Append an empty child for `segment`: a sequence for inception syntax, else a mapping.
pub fn create_key<'n>(node: &'n mut Node, segment: &Segment<'_>) -> Result<&'n mut Node, YamlError> {
    create_child(node, segment, default_kind(segment, None))
}

fn create_child<'n>(node: &'n mut Node, segment: &Segment<'_>, kind: NodeKind) -> Result<&'n mut Node, YamlError> {
    debug!("creating {:?} for segment '{}'", kind, segment.raw());
    append(node, segment, Node::empty(kind))
}

/// Remove what `segment` addresses. Missing children are a no-op.
pub fn remove(node: &mut Node, segment: &Segment<'_>) -> Result<(), YamlError> {
    let slot = locate(node, segment)?;
    match (node, slot) {
        (Node::Mapping(mapping), Some(_)) => {
            debug!("removing key '{}'", segment.raw());
            mapping.entries.retain(|(key, _)| !key.key_matches(segment.raw()));
        }
        (Node::Sequence(seq), Some(Slot::Item(i))) => {
            debug!("removing sequence element {}", i);
            seq.items.remove(i);
        }
        (Node::Sequence(seq), Some(Slot::ItemEntry(i))) => {
            debug!("removing '{}' from sequence element {}", segment.raw(), i);
            if let Some(Node::Mapping(Mapping { entries, .. })) = seq.items.get_mut(i) {
                entries.remove(0);
                if entries.is_empty() {
                    seq.items.remove(i);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Write `new_child` at `segment`: overwrite in place when present, append otherwise.
pub fn put_node(node: &mut Node, segment: &Segment<'_>, new_child: Node) -> Result<(), YamlError> {
    match locate(node, segment)? {
        Some(slot) => *child_mut(node, slot)? = new_child,
        None => {
            append(node, segment, new_child)?;
        }
    }
    Ok(())
}

/// Encode `value` and write it at `segment` (see [`put_node`]).
pub fn put(node: &mut Node, segment: &Segment<'_>, value: &Value) -> Result<(), YamlError> {
    put_node(node, segment, to_node(value)?)
}

/// Walk every segment but the last, creating or widening as needed, and return
/// the parent of the final segment.
fn walk_to_parent<'n, 'p>(
    root: &'n mut Node,
    segments: &[Segment<'p>],
) -> Result<&'n mut Node, YamlError> {
    let mut current = root;
    for (i, segment) in segments.iter().enumerate() {
        let kind = default_kind(segment, segments.get(i + 1));
        current = match locate(current, segment)? {
            None => create_child(current, segment, kind)?,
            // A scalar element matched by key keeps that key as `{key: child}`.
            Some(Slot::Item(pos))
                if matches!(segment, Segment::Key(_))
                    && child(current, Slot::Item(pos)).is_some_and(Node::is_scalar) =>
            {
                debug!("wrapping sequence element '{}' around an empty {:?}", segment.raw(), kind);
                *child_mut(current, Slot::Item(pos))? = Node::mapping(vec![(key_node(segment), Node::empty(kind))]);
                child_mut(current, Slot::ItemEntry(pos))?
            }
            Some(slot) => {
                let next = child_mut(current, slot)?;
                if next.is_scalar() {
                    debug!("replacing scalar at '{}' with an empty {:?}", segment.raw(), kind);
                    *next = Node::empty(kind);
                }
                next
            }
        };
    }
    Ok(current)
}

/// Follow `segments` without creating anything. A missing step or a scalar in the
/// way means there is nothing to delete.
fn existing_parent<'n>(root: &'n mut Node, segments: &[Segment<'_>]) -> Result<Option<&'n mut Node>, YamlError> {
    let mut current = root;
    for segment in segments {
        if current.is_scalar() {
            return Ok(None);
        }
        current = match lookup_mut(current, segment)? {
            Some(next) => next,
            None => return Ok(None),
        };
    }
    Ok((!current.is_scalar()).then_some(current))
}

/// Set `path` below `root` to `value`, or delete it when `value` is `None`.
///
/// Missing parents are created; scalars in the way are replaced by containers.
/// Deleting never creates or replaces anything.
///
/// # Examples
/// ```
/// use yamledit::{Node, Value, resolver};
///
/// let mut root = Node::mapping(Vec::new());
/// resolver::set(&mut root, "server.port", Some(&Value::Int(8080))).unwrap();
/// let port = resolver::resolve(Some(&root), "server.port").unwrap();
/// assert_eq!(port.and_then(|n| n.as_str()), Some("8080"));
/// ```
pub fn set(root: &mut Node, path: &str, value: Option<&Value>) -> Result<(), YamlError> {
    let segments = parse_path(trim_set_path(path));
    let Some((last, parents)) = segments.split_last() else {
        return Ok(());
    };
    let Some(value) = value else {
        return match existing_parent(root, parents)? {
            Some(parent) => remove(parent, last),
            None => Ok(()),
        };
    };
    let parent = walk_to_parent(root, parents)?;

    let Some(slot) = locate(parent, last)? else {
        let new_child = to_node(value)?;
        *create_key(parent, last)? = new_child;
        return Ok(());
    };

    let parent_is_sequence = parent.is_sequence();
    let target = child_mut(parent, slot)?;
    match target {
        Node::Scalar(scalar) if !parent_is_sequence && value.is_scalar() => scalar.overwrite(value),
        _ => *target = to_node(value)?,
    }
    Ok(())
}

/// Like [`set`], but writes an already-built node at the final segment.
pub fn set_node(root: &mut Node, path: &str, node: Node) -> Result<(), YamlError> {
    let segments = parse_path(trim_set_path(path));
    let Some((last, parents)) = segments.split_last() else {
        return Ok(());
    };
    let parent = walk_to_parent(root, parents)?;
    put_node(parent, last, node)
}
