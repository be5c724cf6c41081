use anyhow::{Context, Result};
use clap::Parser;
use graphwork::example;
use graphwork::graph::{build_graph, Direction, GraphSpec};
use graphwork::render::{render_with, RenderConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(
    name = "graphwork",
    bin_name = "graphwork",
    about = "graphwork command line tool"
)]
struct Cli {
    #[clap(subcommand)]
    cmd: SubCommand,
}

#[derive(Parser, Debug)]
enum SubCommand {
    #[clap(name = "demo")]
    Demo(DemoCommand),
    #[clap(name = "render")]
    Render(RenderCommand),
    #[clap(name = "dot")]
    Dot(DotCommand),
}

/// Render one of the built-in example graphs.
#[derive(Parser, Debug)]
struct DemoCommand {
    /// Use the large random example instead of the fixed one.
    #[clap(long)]
    random: bool,

    #[clap(long, value_enum, default_value = "left-to-right")]
    direction: Direction,

    #[clap(long, default_value = "render.png")]
    output: PathBuf,

    /// Open the rendered image in the OS default viewer.
    #[clap(long)]
    open: bool,
}

/// Render a graph described by a JSON file.
#[derive(Parser, Debug)]
struct RenderCommand {
    /// Path to a JSON graph description, eg.
    /// {"vertices": ["A"], "edges": [["AB", 4]]}.
    #[clap(long)]
    input: PathBuf,

    #[clap(long, default_value = "render.png")]
    output: PathBuf,

    #[clap(long)]
    open: bool,
}

/// Print the DOT text of a JSON-described graph to stdout.
#[derive(Parser, Debug)]
struct DotCommand {
    #[clap(long)]
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli: Cli = Cli::parse();

    match cli.cmd {
        SubCommand::Demo(cmd) => handle_demo(cmd),
        SubCommand::Render(cmd) => handle_render(cmd),
        SubCommand::Dot(cmd) => handle_dot(cmd),
    }
}

fn handle_demo(cmd: DemoCommand) -> Result<()> {
    let graph = if cmd.random {
        let (edges, vertices) = example::large_random();
        let vertex_refs: Vec<&str> = vertices.iter().map(String::as_str).collect();
        build_graph(&vertex_refs, edges, cmd.direction)?
    } else {
        build_graph(&[], example::small_fixed(), cmd.direction)?
    };

    render_with(&graph, &RenderConfig::for_output(cmd.output), cmd.open)
}

fn handle_render(cmd: RenderCommand) -> Result<()> {
    let spec = read_spec(&cmd.input)?;
    let graph = spec.build()?;
    render_with(&graph, &RenderConfig::for_output(cmd.output), cmd.open)
}

fn handle_dot(cmd: DotCommand) -> Result<()> {
    let spec = read_spec(&cmd.input)?;
    print!("{}", spec.build()?.to_dot());
    Ok(())
}

fn read_spec(path: &Path) -> Result<GraphSpec> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    let spec: GraphSpec =
        serde_json::from_str(&data).with_context(|| format!("failed to parse {:?}", path))?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use crate::read_spec;
    use std::io::Write;

    #[test]
    fn read_spec_reports_the_failing_path() {
        let err = read_spec(std::path::Path::new("no-such-file.json")).unwrap_err();
        assert!(format!("{}", err).contains("no-such-file.json"));
    }

    #[test]
    fn read_spec_parses_a_graph_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"vertices": ["A", "B"], "edges": [["AB", 4]], "direction": "left-to-right"}}"#
        )
        .unwrap();

        let spec = read_spec(file.path()).unwrap();
        assert_eq!(spec.vertices, vec!["A", "B"]);
        assert_eq!(spec.edges.len(), 1);
    }
}
