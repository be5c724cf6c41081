use anyhow::{bail, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::debug;

/// Layout orientation, forwarded to the layout engine as `rankdir`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    LeftToRight,
    TopToBottom,
    RightToLeft,
    BottomToTop,
}

impl Direction {
    pub fn as_rankdir(&self) -> &'static str {
        match self {
            Direction::LeftToRight => "LR",
            Direction::TopToBottom => "TB",
            Direction::RightToLeft => "RL",
            Direction::BottomToTop => "BT",
        }
    }
}

/// A weighted edge as callers write it: either an explicit endpoint pair
/// (`(("A", "B"), 4)`) or a two-character token (`("AB", 4)`) standing for
/// the pair of its characters. The token form is case-sensitive, exactly two
/// characters, no separator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeSpec {
    Pair((String, String), f64),
    Token(String, f64),
}

impl EdgeSpec {
    pub fn resolve(&self) -> Result<Edge> {
        match self {
            EdgeSpec::Pair((tail, head), weight) => Ok(Edge::new(tail, head, *weight)),
            EdgeSpec::Token(token, weight) => {
                let mut chars = token.chars();
                match (chars.next(), chars.next(), chars.next()) {
                    (Some(tail), Some(head), None) => Ok(Edge {
                        tail: tail.to_string(),
                        head: head.to_string(),
                        weight: *weight,
                    }),
                    _ => bail!("edge token {:?} must be exactly two characters", token),
                }
            }
        }
    }
}

impl<W: Into<f64>> From<(&str, W)> for EdgeSpec {
    fn from((token, weight): (&str, W)) -> EdgeSpec {
        EdgeSpec::Token(token.to_string(), weight.into())
    }
}

impl<W: Into<f64>> From<((&str, &str), W)> for EdgeSpec {
    fn from(((tail, head), weight): ((&str, &str), W)) -> EdgeSpec {
        EdgeSpec::Pair((tail.to_string(), head.to_string()), weight.into())
    }
}

/// A resolved edge: two endpoint names and a weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub tail: String,
    pub head: String,
    pub weight: f64,
}

impl Edge {
    pub fn new(tail: &str, head: &str, weight: f64) -> Edge {
        return Edge {
            tail: tail.to_string(),
            head: head.to_string(),
            weight,
        };
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphConfig {
    pub direction: Direction,
    /// Extra graph-level attributes, passed straight through to the layout
    /// engine (eg. `("nodesep", "0.3")`).
    pub attrs: Vec<(String, String)>,
}

impl GraphConfig {
    pub fn default() -> GraphConfig {
        return GraphConfig {
            direction: Direction::default(),
            attrs: Vec::new(),
        };
    }
}

struct VertexData {
    name: String,
}

struct EdgeData {
    weight: f64,
}

/// An in-memory weighted graph plus its layout configuration. Produced by
/// [`build_graph`], consumed by the renderer.
pub struct Graph {
    pub config: GraphConfig,
    vertex_mapping: HashMap<String, NodeIndex>,
    g: UnGraph<VertexData, EdgeData>,
}

impl Graph {
    pub fn new(config: GraphConfig) -> Graph {
        return Graph {
            config,
            vertex_mapping: HashMap::new(),
            g: UnGraph::<VertexData, EdgeData>::new_undirected(),
        };
    }

    pub fn empty() -> Graph {
        Graph::new(GraphConfig::default())
    }

    /// Add a vertex by name. Duplicate names collapse to a single node, the
    /// same way repeated identifiers do in a DOT file.
    pub fn add_vertex(&mut self, name: &str) -> Result<()> {
        self.ensure_vertex(name)?;
        Ok(())
    }

    /// Add an undirected weighted connection. Endpoints that were never added
    /// as vertices are created on the fly.
    pub fn add_edge(&mut self, edge: &Edge) -> Result<()> {
        let tail = self.ensure_vertex(&edge.tail)?;
        let head = self.ensure_vertex(&edge.head)?;
        self.g.add_edge(tail, head, EdgeData { weight: edge.weight });
        Ok(())
    }

    fn ensure_vertex(&mut self, name: &str) -> Result<NodeIndex> {
        if name.is_empty() {
            bail!("vertex name must not be empty");
        }
        if let Some(index) = self.vertex_mapping.get(name) {
            return Ok(*index);
        }

        let index = self.g.add_node(VertexData {
            name: name.to_string(),
        });
        self.vertex_mapping.insert(name.to_string(), index);
        Ok(index)
    }
}

// Read API
impl Graph {
    pub fn vertex_count(&self) -> usize {
        self.g.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.g.edge_count()
    }

    pub fn contains_vertex(&self, name: &str) -> bool {
        self.vertex_mapping.contains_key(name)
    }

    /// Vertex names in insertion order.
    pub fn vertices(&self) -> Vec<String> {
        self.g
            .node_indices()
            .map(|index| self.g[index].name.clone())
            .collect()
    }

    /// Resolved edges in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.g
            .edge_references()
            .map(|edge| Edge {
                tail: self.g[edge.source()].name.clone(),
                head: self.g[edge.target()].name.clone(),
                weight: edge.weight().weight,
            })
            .collect()
    }

    /// Serialize to DOT text. Edges carry both a visible `label` and the
    /// `weight` layout attribute.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("graph {\n");
        let _ = writeln!(out, "  rankdir={};", self.config.direction.as_rankdir());
        for (key, value) in &self.config.attrs {
            let _ = writeln!(out, "  {}={};", key, quote(value));
        }
        for index in self.g.node_indices() {
            let _ = writeln!(out, "  {};", quote(&self.g[index].name));
        }
        for edge in self.g.edge_references() {
            let weight = edge.weight().weight.to_string();
            let _ = writeln!(
                out,
                "  {} -- {} [label={}, weight={}];",
                quote(&self.g[edge.source()].name),
                quote(&self.g[edge.target()].name),
                quote(&weight),
                quote(&weight),
            );
        }
        out.push_str("}\n");
        out
    }
}

/// Build a graph from vertex names and edge specs. Vertices mentioned only as
/// edge endpoints are included as well.
pub fn build_graph<I>(vertices: &[&str], edges: I, direction: Direction) -> Result<Graph>
where
    I: IntoIterator,
    I::Item: Into<EdgeSpec>,
{
    let mut config = GraphConfig::default();
    config.direction = direction;
    build_graph_with(vertices, edges, config)
}

pub fn build_graph_with<I>(vertices: &[&str], edges: I, config: GraphConfig) -> Result<Graph>
where
    I: IntoIterator,
    I::Item: Into<EdgeSpec>,
{
    let mut graph = Graph::new(config);
    for name in vertices {
        graph.add_vertex(name)?;
    }
    for spec in edges {
        let edge = spec.into().resolve()?;
        graph.add_edge(&edge)?;
    }
    debug!(
        "built graph: {} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// A whole graph description, eg. kept in a JSON file for scripted use.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphSpec {
    #[serde(default)]
    pub vertices: Vec<String>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub direction: Direction,
}

impl GraphSpec {
    pub fn build(&self) -> Result<Graph> {
        let vertex_refs: Vec<&str> = self.vertices.iter().map(String::as_str).collect();
        build_graph(&vertex_refs, self.edges.iter().cloned(), self.direction)
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use crate::graph::{build_graph, Direction, Edge, EdgeSpec, GraphSpec};

    #[test]
    fn build_collects_vertices_and_edges() {
        let g = build_graph(
            &["A", "B", "C"],
            [(("A", "B"), 4), (("B", "C"), 2)],
            Direction::LeftToRight,
        )
        .unwrap();

        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.vertices(), vec!["A", "B", "C"]);
        assert_eq!(
            g.edges(),
            vec![Edge::new("A", "B", 4.0), Edge::new("B", "C", 2.0)]
        );
    }

    #[test]
    fn token_matches_explicit_pair() {
        let token = build_graph(&["A", "B"], [("AB", 4)], Direction::LeftToRight).unwrap();
        let pair = build_graph(&["A", "B"], [(("A", "B"), 4)], Direction::LeftToRight).unwrap();
        assert_eq!(token.to_dot(), pair.to_dot());
    }

    #[test]
    fn edge_endpoints_are_created_on_the_fly() {
        let g = build_graph(&[], [("AB", 1)], Direction::LeftToRight).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert!(g.contains_vertex("A"));
        assert!(g.contains_vertex("B"));
    }

    #[test]
    fn duplicate_vertices_collapse() {
        let g = build_graph(&["A", "A", "B"], [("AB", 1)], Direction::LeftToRight).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.vertices(), vec!["A", "B"]);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(build_graph(&[], [("A", 1)], Direction::LeftToRight).is_err());
        assert!(build_graph(&[], [("ABC", 1)], Direction::LeftToRight).is_err());
        assert!(build_graph(&[], [("", 1)], Direction::LeftToRight).is_err());
    }

    #[test]
    fn empty_vertex_names_are_rejected() {
        assert!(build_graph(&[""], Vec::<EdgeSpec>::new(), Direction::LeftToRight).is_err());
    }

    #[test]
    fn dot_output_shape() {
        let g = build_graph(
            &["A", "B", "C"],
            [("AB", 4), ("BC", 2)],
            Direction::LeftToRight,
        )
        .unwrap();

        let expected = concat!(
            "graph {\n",
            "  rankdir=LR;\n",
            "  \"A\";\n",
            "  \"B\";\n",
            "  \"C\";\n",
            "  \"A\" -- \"B\" [label=\"4\", weight=\"4\"];\n",
            "  \"B\" -- \"C\" [label=\"2\", weight=\"2\"];\n",
            "}\n",
        );
        assert_eq!(g.to_dot(), expected);
    }

    #[test]
    fn dot_quotes_awkward_names() {
        let g = build_graph(&[r#"a"b"#], Vec::<EdgeSpec>::new(), Direction::LeftToRight).unwrap();
        assert!(g.to_dot().contains(r#""a\"b";"#));
    }

    #[test]
    fn direction_reaches_the_layout_engine() {
        let g = build_graph(&["A"], Vec::<EdgeSpec>::new(), Direction::TopToBottom).unwrap();
        assert!(g.to_dot().contains("rankdir=TB;"));
    }

    #[test]
    fn extra_attrs_are_forwarded() {
        let mut config = crate::graph::GraphConfig::default();
        config.attrs.push(("nodesep".to_string(), "0.3".to_string()));
        let g = crate::graph::build_graph_with(&["A"], Vec::<EdgeSpec>::new(), config).unwrap();
        assert!(g.to_dot().contains(r#"nodesep="0.3";"#));
    }

    #[test]
    fn fractional_weights_keep_their_digits() {
        let g = build_graph(&[], [(("A", "B"), 2.5)], Direction::LeftToRight).unwrap();
        assert!(g.to_dot().contains(r#"label="2.5""#));
    }

    #[test]
    fn graph_spec_accepts_both_edge_forms() {
        let raw = r#"{
            "vertices": ["A"],
            "edges": [["AB", 4], [["B", "C"], 2]],
            "direction": "top-to-bottom"
        }"#;
        let spec: GraphSpec = serde_json::from_str(raw).unwrap();
        assert_eq!(spec.direction, Direction::TopToBottom);

        let g = spec.build().unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn graph_spec_defaults_are_permissive() {
        let spec: GraphSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(spec.direction, Direction::LeftToRight);
        let g = spec.build().unwrap();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }
}
