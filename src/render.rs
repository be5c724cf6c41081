use crate::graph::{build_graph, Direction, EdgeSpec, Graph};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn as_arg(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

pub struct RenderConfig {
    pub output: PathBuf,
    pub format: ImageFormat,
    /// Keep the intermediate DOT file next to the image instead of removing
    /// it after a successful render.
    pub keep_dot: bool,
}

impl RenderConfig {
    pub fn default() -> RenderConfig {
        RenderConfig::for_output(PathBuf::from("render.png"))
    }

    /// Build a config for the given output path, picking the image format
    /// from its extension (`.svg` renders SVG, anything else PNG).
    pub fn for_output(output: PathBuf) -> RenderConfig {
        let format = match output.extension().and_then(|ext| ext.to_str()) {
            Some("svg") => ImageFormat::Svg,
            _ => ImageFormat::Png,
        };
        return RenderConfig {
            output,
            format,
            keep_dot: false,
        };
    }
}

/// Render the graph to `render.png` in the working directory. If `open` is
/// true, also launch the OS default image viewer on the result.
pub fn render(graph: &Graph, open: bool) -> Result<()> {
    render_with(graph, &RenderConfig::default(), open)
}

/// Render the graph through the external `dot` binary: write the DOT text
/// next to the target image, run the layout engine, then clean the DOT file
/// up (unless the config says to keep it).
pub fn render_with(graph: &Graph, config: &RenderConfig, open: bool) -> Result<()> {
    let dot_path = config.output.with_extension("dot");
    fs::write(&dot_path, graph.to_dot())
        .with_context(|| format!("failed to write {:?}", dot_path))?;
    debug!("wrote dot file {:?}", dot_path);

    let output = Command::new("dot")
        .arg(format!("-T{}", config.format.as_arg()))
        .arg(&dot_path)
        .arg("-o")
        .arg(&config.output)
        .output()
        .context("failed to run graphviz 'dot', is it installed?")?;
    if !output.status.success() {
        bail!(
            "dot exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    if !config.keep_dot {
        let _ = fs::remove_file(&dot_path);
    }
    info!("rendered graph to {:?}", config.output);

    if open {
        open_file(&config.output)?;
    }
    Ok(())
}

/// Short-hand for `render(graph, true)`.
pub fn show(graph: &Graph) -> Result<()> {
    render(graph, true)
}

/// Build and render in one call, for one-line interactive use.
pub fn quick<I>(vertices: &[&str], edges: I, direction: Direction, open: bool) -> Result<()>
where
    I: IntoIterator,
    I::Item: Into<EdgeSpec>,
{
    let graph = build_graph(vertices, edges, direction)?;
    render(&graph, open)
}

// Spawned without waiting: viewers tend to stay open, and most of them
// reload the file when a later render overwrites it.
fn open_file(path: &Path) -> Result<()> {
    let program = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "linux") {
        "xdg-open"
    } else {
        bail!("opening a viewer is not supported on this OS");
    };

    debug!("launching {} {:?}", program, path);
    Command::new(program)
        .arg(path)
        .spawn()
        .with_context(|| format!("failed to launch {}", program))?;
    Ok(())
}
