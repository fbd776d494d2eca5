//! Skill nodes and the values they carry.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A 2D position assigned by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Icon font families a node icon may come from.
///
/// The set is closed: anything else is rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IconLibrary {
    #[cfg_attr(feature = "serde", serde(rename = "MCI"))]
    MaterialCommunity,
    #[cfg_attr(feature = "serde", serde(rename = "FA5"))]
    FontAwesome5,
    #[cfg_attr(feature = "serde", serde(rename = "IO"))]
    Ionicons,
}

impl IconLibrary {
    /// All recognized libraries.
    pub const ALL: [Self; 3] = [Self::MaterialCommunity, Self::FontAwesome5, Self::Ionicons];

    /// Short wire tag used in stored records.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::MaterialCommunity => "MCI",
            Self::FontAwesome5 => "FA5",
            Self::Ionicons => "IO",
        }
    }
}

/// An icon library tag outside the recognized set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown icon library: {0}")]
pub struct UnknownIconLibrary(pub String);

impl FromStr for IconLibrary {
    type Err = UnknownIconLibrary;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lib| lib.tag() == s)
            .ok_or_else(|| UnknownIconLibrary(s.to_string()))
    }
}

impl fmt::Display for IconLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Icon descriptor. Opaque to the graph: carried through, never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Icon {
    #[cfg_attr(feature = "serde", serde(rename = "lib"))]
    pub library: IconLibrary,
    pub name: String,
}

impl Icon {
    pub fn new(library: IconLibrary, name: impl Into<String>) -> Self {
        Self {
            library,
            name: name.into(),
        }
    }
}

/// A single learning node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillNode {
    /// Unique id within the tree
    pub id: String,

    /// Display label
    pub name: String,

    /// Whether the user has completed this node
    #[cfg_attr(feature = "serde", serde(default))]
    pub unlocked: bool,

    /// Child ids, in display order
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<String>,

    /// Optional icon, passed through unmodified
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub icon: Option<Icon>,

    /// Layout output; `None` until the layout engine runs
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub position: Option<Position>,
}

impl SkillNode {
    /// Create a locked node with no children.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unlocked: false,
            children: Vec::new(),
            icon: None,
            position: None,
        }
    }

    /// Builder: set the child ids.
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set the unlock flag.
    pub fn with_unlocked(mut self, unlocked: bool) -> Self {
        self.unlocked = unlocked;
        self
    }

    /// Builder: set the icon.
    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_library_tags_roundtrip() {
        for lib in IconLibrary::ALL {
            assert_eq!(lib.tag().parse::<IconLibrary>(), Ok(lib));
        }
    }

    #[test]
    fn unknown_icon_library_rejected() {
        let err = "Feather".parse::<IconLibrary>().unwrap_err();
        assert_eq!(err, UnknownIconLibrary("Feather".to_string()));
    }

    #[test]
    fn builder_sets_fields() {
        let node = SkillNode::new("a", "Alpha")
            .with_children(["b", "c"])
            .with_unlocked(true)
            .with_icon(Icon::new(IconLibrary::Ionicons, "search-circle"));

        assert_eq!(node.children, vec!["b".to_string(), "c".to_string()]);
        assert!(node.unlocked);
        assert!(!node.is_leaf());
        assert_eq!(node.icon.unwrap().library, IconLibrary::Ionicons);
        assert!(node.position.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn icon_uses_wire_tags() {
        let icon = Icon::new(IconLibrary::FontAwesome5, "search");
        let json = serde_json::to_value(&icon).unwrap();
        assert_eq!(json, serde_json::json!({ "lib": "FA5", "name": "search" }));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn node_without_position_omits_field() {
        let node = SkillNode::new("a", "Alpha");
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("position").is_none());
        assert!(json.get("icon").is_none());
    }
}
