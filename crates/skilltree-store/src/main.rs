//! skilltree CLI tool
//!
//! Works on skill trees stored as JSON arrays of node records.
//!
//! Usage:
//!   skilltree layout <file> [root]
//!   skilltree unlock <file> <id>...
//!   skilltree progress <file>
//!   skilltree template [default|starter]

use std::path::Path;

use serde::Serialize;
use skilltree_graph::{build_graph, Graph};
use skilltree_layout::{layout, Layout, Viewport};
use skilltree_store::templates::{template, TEMPLATE_NAMES};
use skilltree_store::{from_records, record::to_values, to_records, Error, Result, SkillTreeConfig};
use skilltree_unlock::{unlockable, Progress, UnlockOutcome, Unlocker};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage() {
    eprintln!("skilltree - Lay out and unlock skill trees");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  skilltree layout <file> [root]          Print node positions and canvas size");
    eprintln!("  skilltree unlock <file> <id>...         Unlock nodes and write the file back");
    eprintln!("  skilltree progress <file>               Show unlocked count and next steps");
    eprintln!("  skilltree template [default|starter]    Print a built-in tree");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SKILLTREE_NODE_RADIUS, SKILLTREE_SIBLING_GAP, SKILLTREE_LEVEL_GAP,");
    eprintln!("  SKILLTREE_VIEWPORT_PADDING   Layout spacing");
    eprintln!("  SKILLTREE_UNLOCK_POLICY      first | all | any (default: first)");
    eprintln!("  RUST_LOG                     Log filter (default: skilltree=info)");
}

#[derive(Serialize)]
struct LayoutOutput<'a> {
    #[serde(flatten)]
    layout: &'a Layout,
    viewport: Viewport,
}

fn load(path: &Path) -> Result<Graph> {
    let data = std::fs::read(path)?;
    let records: Vec<serde_json::Value> = serde_json::from_slice(&data)?;
    Ok(build_graph(from_records(&records))?)
}

fn store(path: &Path, graph: &Graph) -> Result<()> {
    let values = to_values(&to_records(graph))?;
    std::fs::write(path, serde_json::to_vec_pretty(&values)?)?;
    Ok(())
}

fn run(args: &[String], config: &SkillTreeConfig) -> Result<()> {
    match args {
        [cmd, file] if cmd == "layout" => print_layout(Path::new(file), None, config),
        [cmd, file, root] if cmd == "layout" => print_layout(Path::new(file), Some(root.as_str()), config),
        [cmd, file, ids @ ..] if cmd == "unlock" && !ids.is_empty() => {
            let path = Path::new(file);
            let mut graph = load(path)?;
            let unlocker = Unlocker::new(config.unlock_policy);

            let mut changed = false;
            for id in ids {
                match unlocker.attempt(&mut graph, id)? {
                    UnlockOutcome::Unlocked => {
                        println!("unlocked {}", id);
                        changed = true;
                    }
                    UnlockOutcome::AlreadyUnlocked => println!("{} already unlocked", id),
                }
            }

            if changed {
                store(path, &graph)?;
            }
            Ok(())
        }
        [cmd, file] if cmd == "progress" => {
            let graph = load(Path::new(file))?;
            let progress = Progress::of(&graph);
            println!(
                "{} unlocked ({:.0}%)",
                progress,
                progress.fraction() * 100.0
            );
            for id in unlockable(&graph, config.unlock_policy) {
                println!("  next: {}", id);
            }
            Ok(())
        }
        [cmd] if cmd == "template" => print_template("default"),
        [cmd, name] if cmd == "template" => print_template(name),
        _ => {
            print_usage();
            Err(Error::InvalidInput("unrecognized command".to_string()))
        }
    }
}

fn print_layout(path: &Path, root: Option<&str>, config: &SkillTreeConfig) -> Result<()> {
    let graph = load(path)?;
    let layout = layout(&graph, root, &config.layout)?;
    let output = LayoutOutput {
        viewport: Viewport::fit(&layout.bounds, config.viewport_padding),
        layout: &layout,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_template(name: &str) -> Result<()> {
    let nodes = template(name).ok_or_else(|| {
        Error::InvalidInput(format!(
            "unknown template {} (expected one of {})",
            name,
            TEMPLATE_NAMES.join(", ")
        ))
    })?;
    let graph = build_graph(nodes)?;
    println!("{}", serde_json::to_string_pretty(&to_values(&to_records(&graph))?)?);
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skilltree=info,skilltree_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "help" || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        return;
    }

    let result = SkillTreeConfig::from_env().and_then(|config| run(&args, &config));
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
