//! Model graphs and whole-model translation.
//!
//! A traced model arrives as a directed graph of named nodes. Nodes bound to
//! a [`Translatable`] layer have a hardware equivalent; the rest (inputs,
//! reshapes, outputs) only contribute ordering.

use crate::design::Design;
use crate::error::TranslateError;
use crate::layers::{Layer, Translatable};
use nnhdl_config::{check_layer_names, resolve_layer, TranslationConfig};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// A named node, optionally bound to a translatable layer.
#[derive(Clone)]
pub struct Node {
    /// The unique node name, used as the design name.
    pub name: String,
    /// The layer this node calls, if it has a hardware equivalent.
    pub layer: Option<Arc<dyn Translatable>>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("has_layer", &self.layer.is_some())
            .finish()
    }
}

/// A serialized model: nodes in definition order and `[from, to]` edges.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDescription {
    /// The nodes.
    pub nodes: Vec<NodeDescription>,
    /// Data dependencies between node names.
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

/// One serialized node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    /// The node name.
    pub name: String,
    /// The bound layer, if any.
    #[serde(default)]
    pub layer: Option<Layer>,
}

/// A directed graph of named nodes.
#[derive(Debug, Default)]
pub struct ModelGraph {
    graph: DiGraph<Node, ()>,
    index: HashMap<String, NodeIndex>,
}

impl ModelGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a parsed description.
    pub fn from_description(description: ModelDescription) -> Result<Self, TranslateError> {
        let mut graph = Self::new();
        for node in description.nodes {
            let layer = node
                .layer
                .map(|layer| Arc::new(layer) as Arc<dyn Translatable>);
            graph.add_node(node.name, layer)?;
        }
        for (from, to) in &description.edges {
            graph.add_edge(from, to)?;
        }
        Ok(graph)
    }

    /// Parses a JSON model description.
    pub fn from_json(json: &str) -> Result<Self, TranslateError> {
        let description: ModelDescription =
            serde_json::from_str(json).map_err(|e| TranslateError::Description(e.to_string()))?;
        Self::from_description(description)
    }

    /// Adds a node; names must be unique.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        layer: Option<Arc<dyn Translatable>>,
    ) -> Result<NodeIndex, TranslateError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(TranslateError::DuplicateNode(name));
        }
        let ix = self.graph.add_node(Node {
            name: name.clone(),
            layer,
        });
        self.index.insert(name, ix);
        Ok(ix)
    }

    /// Adds a dependency edge between two existing nodes.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<(), TranslateError> {
        let from = self.lookup(from)?;
        let to = self.lookup(to)?;
        self.graph.add_edge(from, to, ());
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<NodeIndex, TranslateError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| TranslateError::UnknownNode(name.to_string()))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_weights()
    }

    /// Whether `name` exists and is bound to a layer.
    pub fn node_has_layer(&self, name: &str) -> bool {
        self.layer_for_node(name).is_some()
    }

    /// The layer bound to `name`, if any.
    pub fn layer_for_node(&self, name: &str) -> Option<&Arc<dyn Translatable>> {
        let ix = self.index.get(name)?;
        self.graph[*ix].layer.as_ref()
    }

    /// Nodes bound to a layer, in insertion order.
    pub fn hw_equivalent_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes().filter(|node| node.layer.is_some())
    }

    /// Node indices in dependency order.
    fn topological_order(&self) -> Result<Vec<NodeIndex>, TranslateError> {
        toposort(&self.graph, None).map_err(|cycle| TranslateError::CyclicGraph {
            node: self.graph[cycle.node_id()].name.clone(),
        })
    }
}

/// Translates every layer-bound node of `graph`.
///
/// Per-layer overrides in `config` must name nodes of the graph. Layers are
/// translated in parallel; the designs are returned in topological order of
/// their nodes, and the first failure is returned.
pub fn translate_graph(
    graph: &ModelGraph,
    config: &TranslationConfig,
) -> Result<Vec<Design>, TranslateError> {
    check_layer_names(config, graph.nodes().map(|node| node.name.as_str()))?;
    let order = graph.topological_order()?;

    let jobs: Vec<(&str, &dyn Translatable)> = order
        .into_iter()
        .filter_map(|ix| {
            let node = &graph.graph[ix];
            node.layer.as_deref().map(|layer| (node.name.as_str(), layer))
        })
        .collect();
    info!(
        nodes = graph.graph.node_count(),
        layers = jobs.len(),
        "translating model graph"
    );

    let designs = jobs
        .par_iter()
        .map(|&(name, layer)| {
            let settings = resolve_layer(config, name)?;
            debug!(
                layer = name,
                total_bits = settings.fixed_point.total_bits(),
                frac_bits = settings.fixed_point.frac_bits(),
                "translating layer"
            );
            layer.translate(name, &settings)
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(designs = designs.len(), "model graph translated");
    Ok(designs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{FpLinear, FpLookupTable};
    use nnhdl_config::{load_config_from_str, ConfigError};

    fn linear() -> Arc<dyn Translatable> {
        Arc::new(FpLinear {
            in_features: 1,
            out_features: 1,
            weight: vec![vec![1.0]],
            bias: None,
        })
    }

    fn chain(names: &[&str]) -> ModelGraph {
        let mut graph = ModelGraph::new();
        for name in names {
            graph.add_node(*name, Some(linear())).unwrap();
        }
        for pair in names.windows(2) {
            graph.add_edge(pair[0], pair[1]).unwrap();
        }
        graph
    }

    #[test]
    fn layer_queries() {
        let mut graph = ModelGraph::new();
        graph.add_node("x", None).unwrap();
        graph.add_node("fc1", Some(linear())).unwrap();
        graph.add_node("out", None).unwrap();
        graph.add_edge("x", "fc1").unwrap();
        graph.add_edge("fc1", "out").unwrap();

        assert!(graph.node_has_layer("fc1"));
        assert!(!graph.node_has_layer("x"));
        assert!(!graph.node_has_layer("missing"));
        assert!(graph.layer_for_node("fc1").is_some());
        assert!(graph.layer_for_node("out").is_none());
        let hw: Vec<&str> = graph.hw_equivalent_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(hw, vec!["fc1"]);
    }

    #[test]
    fn duplicate_and_unknown_nodes() {
        let mut graph = ModelGraph::new();
        graph.add_node("a", None).unwrap();
        assert!(matches!(
            graph.add_node("a", None),
            Err(TranslateError::DuplicateNode(name)) if name == "a"
        ));
        assert!(matches!(
            graph.add_edge("a", "b"),
            Err(TranslateError::UnknownNode(name)) if name == "b"
        ));
    }

    #[test]
    fn designs_follow_topological_order() {
        let mut graph = ModelGraph::new();
        graph.add_node("fc3", Some(linear())).unwrap();
        graph.add_node("fc1", Some(linear())).unwrap();
        graph.add_node("fc2", Some(linear())).unwrap();
        graph.add_edge("fc1", "fc2").unwrap();
        graph.add_edge("fc2", "fc3").unwrap();

        let designs = translate_graph(&graph, &TranslationConfig::default()).unwrap();
        let names: Vec<&str> = designs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["fc1", "fc2", "fc3"]);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut graph = chain(&["a", "b", "c"]);
        graph.add_edge("c", "a").unwrap();
        let err = translate_graph(&graph, &TranslationConfig::default()).unwrap_err();
        assert!(matches!(err, TranslateError::CyclicGraph { .. }));
    }

    #[test]
    fn overrides_apply_per_layer() {
        let graph = chain(&["fc1", "fc2"]);
        let config = load_config_from_str(
            "[fixed_point]\ntotal_bits = 16\nfrac_bits = 8\n\n[layers.fc2]\ntotal_bits = 8\nfrac_bits = 4\n",
        )
        .unwrap();
        let designs = translate_graph(&graph, &config).unwrap();
        let fc1 = designs[0].file("fc1.vhd").unwrap().text();
        let fc2 = designs[1].file("fc2.vhd").unwrap().text();
        assert!(fc1.contains("DATA_WIDTH : integer := 16;"));
        assert!(fc2.contains("DATA_WIDTH : integer := 8;"));
    }

    #[test]
    fn overrides_for_missing_nodes_are_rejected() {
        let graph = chain(&["fc1"]);
        let config = load_config_from_str("[layers.fc9]\ntotal_bits = 8\nfrac_bits = 4\n").unwrap();
        let err = translate_graph(&graph, &config).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Config(ConfigError::UnknownLayer(name)) if name == "fc9"
        ));
    }

    #[test]
    fn first_failure_is_reported() {
        let mut graph = chain(&["fc1"]);
        graph
            .add_node(
                "bad",
                Some(Arc::new(FpLookupTable {
                    breakpoints: vec![0.0, 1.0],
                    outputs: vec![0.0],
                })),
            )
            .unwrap();
        graph.add_edge("fc1", "bad").unwrap();
        let err = translate_graph(&graph, &TranslationConfig::default()).unwrap_err();
        assert!(matches!(err, TranslateError::LookupTable(_)));
    }

    #[test]
    fn graph_from_json() {
        let graph = ModelGraph::from_json(
            r#"{
                "nodes": [
                    {"name": "x"},
                    {"name": "fc1", "layer": {"kind": "linear", "in_features": 1, "out_features": 1, "weight": [[0.5]]}}
                ],
                "edges": [["x", "fc1"]]
            }"#,
        )
        .unwrap();
        assert!(graph.node_has_layer("fc1"));
        assert_eq!(graph.nodes().count(), 2);
    }

    #[test]
    fn malformed_json_is_a_description_error() {
        assert!(matches!(
            ModelGraph::from_json("{\"nodes\": 3}"),
            Err(TranslateError::Description(_))
        ));
    }
}
