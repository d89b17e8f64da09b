use crate::crypto::HashAlgorithm;
use crate::error::{ProtocolError, Result};
use crate::graph::ColoredGraph;
use crate::protocol::RoundRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceParameters {
    pub nodes: u32,
    pub edge_probability: f64,
    pub edges: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphInstance {
    pub graph: ColoredGraph,
    pub metadata: Option<InstanceParameters>,
}

impl GraphInstance {
    pub fn new(graph: ColoredGraph) -> Self {
        GraphInstance {
            graph,
            metadata: None,
        }
    }

    pub fn with_metadata(graph: ColoredGraph, edge_probability: f64) -> Self {
        let metadata = InstanceParameters {
            nodes: graph.size(),
            edge_probability,
            edges: graph.edge_count(),
        };
        GraphInstance {
            graph,
            metadata: Some(metadata),
        }
    }
}

pub fn save_graph_instance<P: AsRef<Path>>(path: P, instance: &GraphInstance) -> Result<()> {
    let bytes = bincode::serialize(instance)
        .map_err(|err| ProtocolError::Encoding(format!("serialize graph: {err}")))?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn load_graph_instance<P: AsRef<Path>>(path: P) -> Result<GraphInstance> {
    let bytes = fs::read(path)?;
    bincode::deserialize(&bytes)
        .map_err(|err| ProtocolError::Encoding(format!("deserialize graph: {err}")))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofTranscript {
    pub hash: HashAlgorithm,
    pub rounds: Vec<RoundRecord>,
}

pub fn save_proof<P: AsRef<Path>>(path: P, transcript: &ProofTranscript) -> Result<()> {
    let bytes = bincode::serialize(transcript)
        .map_err(|err| ProtocolError::Encoding(format!("serialize proof: {err}")))?;
    let mut file = fs::File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

pub fn load_proof<P: AsRef<Path>>(path: P) -> Result<ProofTranscript> {
    let bytes = fs::read(path)?;
    bincode::deserialize(&bytes)
        .map_err(|err| ProtocolError::Encoding(format!("deserialize proof: {err}")))
}
