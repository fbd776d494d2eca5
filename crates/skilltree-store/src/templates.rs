//! Built-in skill trees used when nothing better is available.

use skilltree_graph::{Icon, IconLibrary, SkillNode};

use IconLibrary::{FontAwesome5 as FA5, Ionicons as IO, MaterialCommunity as MCI};

/// Names accepted by [`template`].
pub const TEMPLATE_NAMES: [&str; 2] = ["default", "starter"];

fn node(id: &str, name: &str, children: &[&str], icon: (IconLibrary, &str)) -> SkillNode {
    SkillNode::new(id, name)
        .with_children(children.iter().copied())
        .with_icon(Icon::new(icon.0, icon.1))
}

/// The full introductory programming curriculum, 18 nodes.
///
/// Two branches leave the root: algorithms (flowcharts, data structures)
/// and language basics, which run as a chain down to the final project.
pub fn default_tree() -> Vec<SkillNode> {
    vec![
        node(
            "orientation",
            "Orientation",
            &["algorithm_basics", "programming_basics"],
            (MCI, "flag-checkered"),
        )
        .with_unlocked(true),
        node(
            "algorithm_basics",
            "Algorithms & Logic",
            &["flowcharts", "sequential_steps"],
            (MCI, "brain"),
        ),
        node("flowcharts", "Flowcharts", &[], (MCI, "file-tree")),
        node(
            "sequential_steps",
            "Sequential Steps",
            &["data_structures"],
            (MCI, "format-list-numbered"),
        ),
        node(
            "data_structures",
            "Data Structures",
            &["lists", "dictionaries", "complexity"],
            (MCI, "database"),
        ),
        node("lists", "Lists / Arrays", &[], (MCI, "code-brackets")),
        node("dictionaries", "Dictionaries", &[], (MCI, "book-open-page-variant")),
        node("complexity", "Complexity", &[], (MCI, "chart-line")),
        node(
            "programming_basics",
            "Python Syntax",
            &["variables"],
            (MCI, "language-python"),
        ),
        node("variables", "Variables", &["operators"], (MCI, "variable")),
        node("operators", "Operators", &["branching"], (MCI, "calculator")),
        node("branching", "Branching", &["loops"], (MCI, "call-split")),
        node("loops", "Loops", &["functions"], (MCI, "refresh")),
        node("functions", "Functions", &["case_studies"], (MCI, "function")),
        node(
            "case_studies",
            "Case Studies",
            &["searching", "sorting"],
            (FA5, "search"),
        ),
        node("searching", "Searching", &[], (IO, "search-circle")),
        node("sorting", "Sorting", &["final_project"], (MCI, "sort-variant")),
        node("final_project", "Final Project", &[], (MCI, "trophy-award")),
    ]
}

/// A short six-node tree without icons.
pub fn starter_tree() -> Vec<SkillNode> {
    vec![
        SkillNode::new("orientation", "Orientation")
            .with_children(["algorithm_basics", "programming_basics"])
            .with_unlocked(true),
        SkillNode::new("algorithm_basics", "Algorithms & Logic").with_children(["flowcharts"]),
        SkillNode::new("flowcharts", "Flowcharts"),
        SkillNode::new("programming_basics", "Python Syntax").with_children(["variables"]),
        SkillNode::new("variables", "Variables").with_children(["operators"]),
        SkillNode::new("operators", "Operators"),
    ]
}

/// Look a template up by name.
pub fn template(name: &str) -> Option<Vec<SkillNode>> {
    match name {
        "default" => Some(default_tree()),
        "starter" => Some(starter_tree()),
        _ => None,
    }
}
