//! Walk a directory tree and render it.

use std::io::Write;
use std::path::PathBuf;

use tracing::instrument;

use crate::config::{Dependencies, OutputFormat, Settings};
use crate::AppError;
use tree_shared::{print_ascii_tree, sort_recursively, Node};

/// Collect the tree below the configured root and render it.
#[instrument(skip(deps), fields(root = %deps.settings.root))]
pub async fn run(deps: &Dependencies) -> Result<String, AppError> {
    let mut tree = deps
        .collector
        .collect_with_default_timeout(PathBuf::from(&deps.settings.root))
        .await?;

    if deps.settings.sort {
        sort_recursively(&mut tree);
    }

    render(&tree, &deps.settings)
}

/// Render a collected tree in the configured output format.
pub fn render(tree: &Node<String>, settings: &Settings) -> Result<String, AppError> {
    match settings.output {
        OutputFormat::Ascii => {
            let mut out = String::new();
            print_ascii_tree(tree, settings.indent, settings.pad, |prefix, name| {
                out.push_str(prefix);
                out.push_str(name);
                out.push('\n');
            });
            Ok(out)
        }
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(tree)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Write rendered output and flush it.
pub fn write_output(out: &mut impl Write, rendered: &str) -> Result<(), AppError> {
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}
