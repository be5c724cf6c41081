use crate::graph::EdgeSpec;
use rand::Rng;

const SMALL_FIXED_EDGES: [(&str, f64); 12] = [
    ("TS", 22.0),
    ("TU", 20.0),
    ("TV", 23.0),
    ("SU", 18.0),
    ("UV", 19.0),
    ("UW", 17.0),
    ("UX", 18.0),
    ("VW", 16.0),
    ("WX", 18.0),
    ("WZ", 18.0),
    ("XY", 17.0),
    ("ZY", 15.0),
];

/// A small fixed edge set showing the inputs this crate expects. Render it
/// with `quick(&[], example::small_fixed(), Direction::LeftToRight, true)`.
pub fn small_fixed() -> Vec<EdgeSpec> {
    SMALL_FIXED_EDGES
        .iter()
        .map(|&(token, weight)| EdgeSpec::from((token, weight)))
        .collect()
}

const VERTEX_NAME_RANGE: u32 = 1000;
const NUM_VERTICES: usize = 100;
const NUM_EDGES: usize = 100;

/// A larger random example, returned as `(edges, vertices)`. The vertex list
/// usually contains names no edge touches, which exercises disconnected
/// vertices. Much larger inputs make the layout engine crawl.
pub fn large_random() -> (Vec<EdgeSpec>, Vec<String>) {
    let mut rng = rand::thread_rng();

    let vertices: Vec<String> = (0..NUM_VERTICES)
        .map(|_| rng.gen_range(0..VERTEX_NAME_RANGE).to_string())
        .collect();

    let edges = (0..NUM_EDGES)
        .map(|_| {
            let tail = vertices[rng.gen_range(0..vertices.len())].clone();
            let head = vertices[rng.gen_range(0..vertices.len())].clone();
            EdgeSpec::Pair((tail, head), 1.0)
        })
        .collect();

    (edges, vertices)
}
