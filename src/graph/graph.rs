use crate::error::{ProtocolError, Result};
use crate::graph::Color;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_EDGE_PROBABILITY: f64 = 0.5;

/// Undirected edge, always stored with `from < to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: u32,
    pub to: u32,
}

impl Edge {
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Edge { from: a, to: b }
        } else {
            Edge { from: b, to: a }
        }
    }
}

/// Undirected graph together with the colouring its generator planted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "GraphParts", try_from = "GraphParts")]
pub struct ColoredGraph {
    size: u32,
    coloring: Vec<Color>,
    adjacency: Vec<Vec<bool>>,
    edges: Vec<Edge>,
}

impl ColoredGraph {
    pub fn generate(size: u32, rng: &mut impl Rng) -> Result<Self> {
        Self::generate_with_probability(size, DEFAULT_EDGE_PROBABILITY, rng)
    }

    pub fn generate_with_probability(
        size: u32,
        edge_probability: f64,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if size == 0 {
            return Err(ProtocolError::EmptyGraph);
        }
        if !(0.0..=1.0).contains(&edge_probability) {
            return Err(ProtocolError::InvalidConfig(format!(
                "edge probability {edge_probability} outside [0, 1]"
            )));
        }

        let coloring: Vec<Color> = (0..size)
            .map(|_| Color::ALL[rng.random_range(0..Color::ALL.len())])
            .collect();

        let n = size as usize;
        let mut adjacency = vec![vec![false; n]; n];
        for i in 0..n {
            for j in 0..i {
                if coloring[i] != coloring[j] && rng.random_bool(edge_probability) {
                    adjacency[i][j] = true;
                    adjacency[j][i] = true;
                }
            }
        }

        let mut graph = ColoredGraph {
            size,
            coloring,
            adjacency,
            edges: Vec::new(),
        };
        graph.rebuild_edge_cache();
        Ok(graph)
    }

    /// Builds a graph from an explicit colouring and edge list, rejecting any
    /// edge whose endpoints share a colour.
    pub fn from_parts(coloring: Vec<Color>, edges: &[(u32, u32)]) -> Result<Self> {
        let graph = Self::from_parts_unchecked(coloring, edges)?;
        if let Some(edge) = graph.conflicting_edges().next() {
            return Err(ProtocolError::MonochromaticEdge {
                from: edge.from,
                to: edge.to,
                color: graph.coloring[edge.from as usize],
            });
        }
        Ok(graph)
    }

    /// Like [`ColoredGraph::from_parts`] but accepts monochromatic edges, so the
    /// claimed colouring may be improper.
    pub fn from_parts_unchecked(coloring: Vec<Color>, edges: &[(u32, u32)]) -> Result<Self> {
        if coloring.is_empty() {
            return Err(ProtocolError::EmptyGraph);
        }
        let size = u32::try_from(coloring.len())
            .map_err(|_| ProtocolError::InvalidConfig("graph too large".into()))?;
        let n = coloring.len();
        let mut adjacency = vec![vec![false; n]; n];
        for &(a, b) in edges {
            for index in [a, b] {
                if index >= size {
                    return Err(ProtocolError::NodeOutOfRange { index, size });
                }
            }
            if a == b {
                return Err(ProtocolError::SelfLoop(a));
            }
            adjacency[a as usize][b as usize] = true;
            adjacency[b as usize][a as usize] = true;
        }

        let mut graph = ColoredGraph {
            size,
            coloring,
            adjacency,
            edges: Vec::new(),
        };
        graph.rebuild_edge_cache();
        Ok(graph)
    }

    fn rebuild_edge_cache(&mut self) {
        self.edges.clear();
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.adjacency[i as usize][j as usize] {
                    self.edges.push(Edge { from: i, to: j });
                }
            }
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn color(&self, node: u32) -> Option<Color> {
        self.coloring.get(node as usize).copied()
    }

    pub fn coloring(&self) -> &[Color] {
        &self.coloring
    }

    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        a < self.size && b < self.size && self.adjacency[a as usize][b as usize]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn conflicting_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .iter()
            .copied()
            .filter(|edge| self.coloring[edge.from as usize] == self.coloring[edge.to as usize])
    }

    pub fn is_properly_colored(&self) -> bool {
        self.conflicting_edges().next().is_none()
    }
}

/// Wire form: colouring plus edge list. Decoding rebuilds the adjacency so a
/// loaded graph goes through the same index checks as a constructed one.
#[derive(Serialize, Deserialize)]
struct GraphParts {
    coloring: Vec<Color>,
    edges: Vec<(u32, u32)>,
}

impl From<ColoredGraph> for GraphParts {
    fn from(graph: ColoredGraph) -> Self {
        GraphParts {
            edges: graph.edges.iter().map(|edge| (edge.from, edge.to)).collect(),
            coloring: graph.coloring,
        }
    }
}

impl TryFrom<GraphParts> for ColoredGraph {
    type Error = ProtocolError;

    fn try_from(parts: GraphParts) -> Result<Self> {
        ColoredGraph::from_parts_unchecked(parts.coloring, &parts.edges)
    }
}

impl fmt::Display for ColoredGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self
            .coloring
            .iter()
            .map(|color| color.letter().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(f, "  {header}")?;
        for (color, row) in self.coloring.iter().zip(&self.adjacency) {
            write!(f, "{} ", color.letter())?;
            for &connected in row {
                f.write_str(if connected { "x " } else { "  " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
