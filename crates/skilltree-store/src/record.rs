//! Flat record shape of a stored skill tree.
//!
//! A tree is stored as an array of records, one per node. Layout output is
//! never written: positions are recomputed on every load.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use skilltree_graph::{Graph, Icon, IconLibrary, SkillNode};
use thiserror::Error;
use tracing::warn;

/// One stored node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillRecord {
    pub id: String,
    pub name: String,
    pub unlocked: bool,
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

impl From<&SkillNode> for SkillRecord {
    fn from(node: &SkillNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            unlocked: node.unlocked,
            children: node.children.clone(),
            icon: node.icon.clone(),
        }
    }
}

impl From<SkillRecord> for SkillNode {
    fn from(record: SkillRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            unlocked: record.unlocked,
            children: record.children,
            icon: record.icon,
            position: None,
        }
    }
}

/// Why a stored record could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecordError {
    #[error("record is not an object")]
    NotAnObject,

    #[error("record has no id")]
    MissingId,
}

/// Records for every node, in input order.
pub fn to_records(graph: &Graph) -> Vec<SkillRecord> {
    graph.nodes().iter().map(SkillRecord::from).collect()
}

/// Read stored records, skipping any that are malformed.
pub fn from_records(records: &[Value]) -> Vec<SkillNode> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, value)| match decode_record(value) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!("Skipping stored record {}: {}", i, e);
                None
            }
        })
        .collect()
}

/// Read one record leniently.
///
/// Only `id` is required. `label` is accepted in place of `name`, and the id
/// doubles as the name when neither is present. Non-string children are
/// ignored, and an icon from an unknown library is dropped.
pub fn decode_record(value: &Value) -> Result<SkillNode, MalformedRecordError> {
    let obj = value.as_object().ok_or(MalformedRecordError::NotAnObject)?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(MalformedRecordError::MissingId)?;

    let name = obj
        .get("name")
        .or_else(|| obj.get("label"))
        .and_then(Value::as_str)
        .unwrap_or(id);

    let children = obj
        .get("children")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(SkillNode {
        id: id.to_string(),
        name: name.to_string(),
        unlocked: obj.get("unlocked").and_then(Value::as_bool).unwrap_or(false),
        children,
        icon: obj.get("icon").and_then(|v| decode_icon(id, v)),
        position: None,
    })
}

fn decode_icon(id: &str, value: &Value) -> Option<Icon> {
    let obj: &Map<String, Value> = value.as_object()?;
    let lib = obj.get("lib").and_then(Value::as_str)?;
    let name = obj.get("name").and_then(Value::as_str)?;

    match lib.parse::<IconLibrary>() {
        Ok(library) => Some(Icon::new(library, name)),
        Err(e) => {
            warn!("Dropping icon of {}: {}", id, e);
            None
        }
    }
}

/// Serialize records to stored JSON values.
pub fn to_values(records: &[SkillRecord]) -> serde_json::Result<Vec<Value>> {
    records.iter().map(serde_json::to_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skilltree_graph::build_graph;

    fn sample() -> Graph {
        build_graph(vec![
            SkillNode::new("a", "Alpha")
                .with_children(["c", "b"])
                .with_unlocked(true)
                .with_icon(Icon::new(IconLibrary::MaterialCommunity, "flag-checkered")),
            SkillNode::new("b", "Beta"),
            SkillNode::new("c", "Gamma").with_children(["b"]),
        ])
        .unwrap()
    }

    #[test]
    fn records_strip_positions() {
        let mut nodes = sample().into_nodes();
        nodes[0].position = Some(skilltree_graph::Position::new(5.0, 6.0));
        let graph = build_graph(nodes).unwrap();

        let values = to_values(&to_records(&graph)).unwrap();
        assert!(values.iter().all(|v| v.get("position").is_none()));
    }

    #[test]
    fn roundtrip_preserves_order_and_flags() {
        let graph = sample();
        let values = to_values(&to_records(&graph)).unwrap();
        let rebuilt = build_graph(from_records(&values)).unwrap();

        assert_eq!(rebuilt.nodes(), graph.nodes());
        assert_eq!(rebuilt.get("a").unwrap().children, vec!["c", "b"]);
    }

    #[test]
    fn record_shape_on_the_wire() {
        let values = to_values(&to_records(&sample())).unwrap();
        assert_eq!(
            values[0],
            json!({
                "id": "a",
                "name": "Alpha",
                "unlocked": true,
                "children": ["c", "b"],
                "icon": { "lib": "MCI", "name": "flag-checkered" }
            })
        );
        assert!(values[1].get("icon").is_none());
    }

    #[test]
    fn malformed_records_skipped() {
        let records = vec![
            json!({ "id": "a", "name": "A", "unlocked": true, "children": ["b"] }),
            json!({ "name": "no id" }),
            json!("not an object"),
            json!({ "id": "", "name": "empty id" }),
            json!({ "id": "b", "name": "B" }),
        ];
        let nodes = from_records(&records);
        let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn decode_errors() {
        assert_eq!(decode_record(&json!(3)), Err(MalformedRecordError::NotAnObject));
        assert_eq!(
            decode_record(&json!({ "id": 7 })),
            Err(MalformedRecordError::MissingId)
        );
    }

    #[test]
    fn lenient_fields() {
        let node = decode_record(&json!({
            "id": "x",
            "label": "From label",
            "children": ["y", 4, null, "z"],
            "icon": { "lib": "Feather", "name": "star" }
        }))
        .unwrap();

        assert_eq!(node.name, "From label");
        assert!(!node.unlocked);
        assert_eq!(node.children, vec!["y", "z"]);
        assert!(node.icon.is_none());

        let bare = decode_record(&json!({ "id": "solo" })).unwrap();
        assert_eq!(bare.name, "solo");
        assert!(bare.children.is_empty());
    }

    #[test]
    fn typed_record_converts_to_node() {
        let record = SkillRecord {
            id: "a".into(),
            name: "A".into(),
            unlocked: true,
            children: vec!["b".into()],
            icon: None,
        };
        let node = SkillNode::from(record);
        assert!(node.position.is_none());
        assert_eq!(node.children, vec!["b"]);
    }
}
