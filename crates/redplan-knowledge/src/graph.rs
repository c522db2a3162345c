//! Technique knowledge graph
//!
//! Holds typed technique nodes and directed relations, loaded once from a
//! static JSON dataset. Retrieval scores every node as a weighted blend of
//! query similarity and structural centrality; edges are only ever used for
//! that structural signal, never for ownership or traversal semantics.

use crate::encoder::{cosine_similarity, HashingEncoder};
use crate::error::{KnowledgeError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A technique/tool node in the knowledge graph
///
/// Immutable after load; owned exclusively by the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Node kind (technique, tool, ...)
    pub kind: String,
    /// Tactic label used by role agents for technique selection
    pub tactic: String,
    /// Free-text description
    pub description: String,
    /// Prior relevance in [0, 1]
    pub relevance: f64,
    /// Fixed-width embedding of the node's text
    pub embedding: Vec<f64>,
}

/// A directed relation between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Relation label
    pub relation: String,
}

/// Retrieval tuning knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalParams {
    /// Maximum number of results
    pub top_k: usize,
    /// Weight of the cosine similarity term
    pub semantic_weight: f64,
    /// Weight of the structural centrality term
    pub structural_weight: f64,
    /// Nodes below this similarity are discarded before scoring
    pub similarity_threshold: f64,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            top_k: 8,
            semantic_weight: 0.7,
            structural_weight: 0.3,
            similarity_threshold: 0.32,
        }
    }
}

/// A retrieval hit with its blended score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredNode<'a> {
    /// The matched node
    pub node: &'a GraphNode,
    /// `semantic_weight * similarity + structural_weight * structural_signal`
    pub score: f64,
}

/// Raw node record of the JSON load format
///
/// `id` and `name` are required; everything else has a documented default.
#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    tactic: Option<String>,
    description: Option<String>,
    relevance: Option<f64>,
    embedding_text: Option<String>,
}

/// Raw edge record of the JSON load format
#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: String,
    target: String,
    relation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

/// Typed technique graph with hybrid semantic/structural retrieval
///
/// Node iteration order is insertion order, which keeps score ties and
/// therefore full retrieval rankings deterministic between runs.
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    nodes: IndexMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
    outgoing: HashMap<String, usize>,
    incoming: HashMap<String, usize>,
}

impl KnowledgeGraph {
    /// Build a graph from already-constructed nodes and edges
    #[must_use]
    pub fn new(
        nodes: impl IntoIterator<Item = GraphNode>,
        edges: impl IntoIterator<Item = GraphEdge>,
    ) -> Self {
        let nodes: IndexMap<String, GraphNode> = nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();
        let edges: Vec<GraphEdge> = edges.into_iter().collect();

        let mut outgoing: HashMap<String, usize> = HashMap::new();
        let mut incoming: HashMap<String, usize> = HashMap::new();
        for edge in &edges {
            *outgoing.entry(edge.source.clone()).or_default() += 1;
            *incoming.entry(edge.target.clone()).or_default() += 1;
        }

        Self {
            nodes,
            edges,
            outgoing,
            incoming,
        }
    }

    /// Load a graph from its JSON source text, embedding each node
    ///
    /// Embedding text per node: `embedding_text`, else `description`, else
    /// the node name. Defaults: kind `technique`, tactic `unknown`,
    /// relevance 0.5.
    ///
    /// # Errors
    /// A record missing `id` or `name` is a fatal
    /// [`KnowledgeError::Malformed`] load error.
    pub fn from_json_str(text: &str, encoder: &HashingEncoder) -> Result<Self> {
        let document: GraphDocument = serde_json::from_str(text)?;

        let nodes = document.nodes.into_iter().map(|record| {
            let embedding_text = record
                .embedding_text
                .as_deref()
                .or(record.description.as_deref())
                .unwrap_or(&record.name);
            GraphNode {
                embedding: encoder.encode(embedding_text),
                id: record.id,
                name: record.name,
                kind: record.kind.unwrap_or_else(|| "technique".to_string()),
                tactic: record.tactic.unwrap_or_else(|| "unknown".to_string()),
                description: record.description.unwrap_or_default(),
                relevance: record.relevance.unwrap_or(0.5),
            }
        });
        let edges = document.edges.into_iter().map(|record| GraphEdge {
            source: record.source,
            target: record.target,
            relation: record.relation.unwrap_or_else(|| "related".to_string()),
        });

        Ok(Self::new(nodes.collect::<Vec<_>>(), edges))
    }

    /// Load a graph from a JSON file on disk
    ///
    /// # Errors
    /// Fails on unreadable or malformed sources.
    pub fn from_json_file(path: impl AsRef<Path>, encoder: &HashingEncoder) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text, encoder)
    }

    /// Look up a node by id
    ///
    /// # Errors
    /// Returns [`KnowledgeError::NodeNotFound`] for unknown ids.
    pub fn node(&self, id: &str) -> Result<&GraphNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| KnowledgeError::NodeNotFound(id.to_string()))
    }

    /// Iterate nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of a node
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |edge| edge.source == id)
    }

    /// Incoming edges of a node
    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |edge| edge.target == id)
    }

    /// Retrieve the nodes most relevant to a query
    ///
    /// Nodes whose cosine similarity to the encoded query falls below
    /// `similarity_threshold` are discarded; survivors are scored as
    /// `semantic_weight * similarity + structural_weight * structural_signal`
    /// and the first `top_k` in descending score order are returned. Fewer
    /// than `top_k` hits are returned when fewer clear the threshold.
    ///
    /// # Errors
    /// Fails when the encoder width differs from the stored embeddings.
    pub fn retrieve(
        &self,
        query: &str,
        encoder: &HashingEncoder,
        params: &RetrievalParams,
    ) -> Result<Vec<ScoredNode<'_>>> {
        let query_embedding = encoder.encode(query);

        let mut scored = Vec::new();
        for node in self.nodes.values() {
            let similarity = cosine_similarity(&query_embedding, &node.embedding)?;
            if similarity < params.similarity_threshold {
                continue;
            }
            let structural = self.structural_signal(node);
            let score =
                params.semantic_weight * similarity + params.structural_weight * structural;
            scored.push(ScoredNode { node, score });
        }

        // Stable sort keeps ties in insertion order, so rankings reproduce.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(params.top_k);
        Ok(scored)
    }

    /// Connectivity-derived relevance boost in [0, 1]
    ///
    /// `min(1, relevance + 0.05 * (in_degree + out_degree))`: well-connected
    /// nodes with a high prior outrank purely-textual matches.
    fn structural_signal(&self, node: &GraphNode) -> f64 {
        let degree = self.incoming.get(&node.id).copied().unwrap_or(0)
            + self.outgoing.get(&node.id).copied().unwrap_or(0);
        (node.relevance + 0.05 * degree as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, tactic: &str, relevance: f64, text: &str) -> GraphNode {
        let encoder = HashingEncoder::default();
        GraphNode {
            id: id.to_string(),
            name: id.to_string(),
            kind: "technique".to_string(),
            tactic: tactic.to_string(),
            description: text.to_string(),
            relevance,
            embedding: encoder.encode(text),
        }
    }

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            relation: "related".to_string(),
        }
    }

    fn sample_graph() -> KnowledgeGraph {
        KnowledgeGraph::new(
            vec![
                node("t1", "reconnaissance", 0.6, "network scanning reconnaissance"),
                node("t2", "initial access", 0.5, "spearphishing initial access"),
                node("t3", "execution", 0.4, "remote code execution exploit"),
            ],
            vec![edge("t1", "t2"), edge("t2", "t3")],
        )
    }

    #[test]
    fn node_lookup() {
        let graph = sample_graph();
        assert_eq!(graph.node("t1").unwrap().tactic, "reconnaissance");
        assert!(matches!(
            graph.node("missing"),
            Err(KnowledgeError::NodeNotFound(_))
        ));
    }

    #[test]
    fn degree_counts() {
        let graph = sample_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.outgoing("t1").count(), 1);
        assert_eq!(graph.incoming("t2").count(), 1);
    }

    #[test]
    fn adjacency_accessors_yield_matching_edges() {
        let graph = sample_graph();
        let id = String::from("t2");
        let out: Vec<&GraphEdge> = graph.outgoing(&id).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].target, "t3");
        let inc: Vec<&GraphEdge> = graph.incoming(&id).collect();
        assert_eq!(inc.len(), 1);
        assert_eq!(inc[0].source, "t1");
    }

    #[test]
    fn structural_signal_saturates_at_one() {
        let graph = KnowledgeGraph::new(
            vec![node("hub", "execution", 0.95, "hub")],
            (0..10)
                .map(|i| GraphEdge {
                    source: "hub".to_string(),
                    target: format!("leaf-{i}"),
                    relation: "related".to_string(),
                })
                .collect::<Vec<_>>(),
        );
        let hub = graph.node("hub").unwrap();
        assert_eq!(graph.structural_signal(hub), 1.0);
    }

    #[test]
    fn retrieve_respects_threshold() {
        let graph = sample_graph();
        let encoder = HashingEncoder::default();
        let params = RetrievalParams {
            similarity_threshold: 0.0,
            ..RetrievalParams::default()
        };
        let hits = graph
            .retrieve("network scanning reconnaissance", &encoder, &params)
            .unwrap();
        assert!(!hits.is_empty());

        // An impossible threshold returns no hits instead of padding.
        let strict = RetrievalParams {
            similarity_threshold: 1.1,
            ..params
        };
        let none = graph
            .retrieve("network scanning reconnaissance", &encoder, &strict)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn retrieve_is_sorted_and_bounded() {
        let graph = sample_graph();
        let encoder = HashingEncoder::default();
        let params = RetrievalParams {
            top_k: 2,
            similarity_threshold: -1.0,
            ..RetrievalParams::default()
        };
        let hits = graph.retrieve("exploit execution", &encoder, &params).unwrap();
        assert!(hits.len() <= 2);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn retrieve_is_deterministic() {
        let graph = sample_graph();
        let encoder = HashingEncoder::default();
        let params = RetrievalParams {
            similarity_threshold: -1.0,
            ..RetrievalParams::default()
        };
        let first: Vec<(String, f64)> = graph
            .retrieve("initial access phishing", &encoder, &params)
            .unwrap()
            .into_iter()
            .map(|hit| (hit.node.id.clone(), hit.score))
            .collect();
        let second: Vec<(String, f64)> = graph
            .retrieve("initial access phishing", &encoder, &params)
            .unwrap()
            .into_iter()
            .map(|hit| (hit.node.id.clone(), hit.score))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn from_json_defaults_optional_fields() {
        let encoder = HashingEncoder::default();
        let graph = KnowledgeGraph::from_json_str(
            r#"{
                "nodes": [{"id": "n1", "name": "Port Scan"}],
                "edges": []
            }"#,
            &encoder,
        )
        .unwrap();
        let node = graph.node("n1").unwrap();
        assert_eq!(node.kind, "technique");
        assert_eq!(node.tactic, "unknown");
        assert_eq!(node.relevance, 0.5);
        assert_eq!(node.embedding, encoder.encode("Port Scan"));
    }

    #[test]
    fn from_json_rejects_missing_name() {
        let encoder = HashingEncoder::default();
        let result =
            KnowledgeGraph::from_json_str(r#"{"nodes": [{"id": "n1"}], "edges": []}"#, &encoder);
        assert!(matches!(result, Err(KnowledgeError::Malformed(_))));
    }

    #[test]
    fn from_json_file_round_trip() {
        let encoder = HashingEncoder::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(
            &path,
            r#"{
                "nodes": [{"id": "n1", "name": "Port Scan"}],
                "edges": []
            }"#,
        )
        .unwrap();

        let graph = KnowledgeGraph::from_json_file(&path, &encoder).unwrap();
        assert_eq!(graph.node_count(), 1);

        let missing = KnowledgeGraph::from_json_file(dir.path().join("absent.json"), &encoder);
        assert!(matches!(missing, Err(KnowledgeError::Io(_))));
    }

    #[test]
    fn from_json_prefers_embedding_text() {
        let encoder = HashingEncoder::default();
        let graph = KnowledgeGraph::from_json_str(
            r#"{
                "nodes": [{
                    "id": "n1",
                    "name": "Kerberoasting",
                    "description": "ticket abuse",
                    "embedding_text": "kerberos service ticket cracking"
                }]
            }"#,
            &encoder,
        )
        .unwrap();
        let node = graph.node("n1").unwrap();
        assert_eq!(
            node.embedding,
            encoder.encode("kerberos service ticket cracking")
        );
    }
}
