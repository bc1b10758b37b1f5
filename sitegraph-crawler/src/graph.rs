use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Directed graph of page-to-page links, keyed by exact URL string.
///
/// Nodes enter the graph only through edge insertion, so a crawled page
/// whose links were all filtered out contributes no node. Node order is
/// insertion order; the centrality rankings use it as their tie-break, so
/// it is part of the output contract.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, url: &str) -> NodeIndex {
        if let Some(&index) = self.indices.get(url) {
            return index;
        }
        let index = self.graph.add_node(url.to_string());
        self.indices.insert(url.to_string(), index);
        index
    }

    /// Insert the edge `from -> to`, adding missing endpoints. Idempotent:
    /// repeated insertions collapse into a single edge.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let a = self.intern(from);
        let b = self.intern(to);
        self.graph.update_edge(a, b, ());
    }

    pub fn contains(&self, url: &str) -> bool {
        self.indices.contains_key(url)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// URLs in insertion order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|ix| self.graph[ix].as_str())
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.indices.get(from), self.indices.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Edges as (source, target) URL pairs, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_indices().filter_map(|edge| {
            self.graph
                .edge_endpoints(edge)
                .map(|(a, b)| (self.graph[a].as_str(), self.graph[b].as_str()))
        })
    }

    /// Induced subgraph restricted to `keep`, preserving relative
    /// insertion order. URLs not present in the graph are ignored; kept
    /// nodes with no surviving edges stay as isolated nodes.
    pub fn subgraph(&self, keep: &[String]) -> LinkGraph {
        let wanted: HashSet<&str> = keep.iter().map(String::as_str).collect();
        let mut sub = LinkGraph::new();
        for ix in self.graph.node_indices() {
            let url = self.graph[ix].as_str();
            if wanted.contains(url) {
                sub.intern(url);
            }
        }
        for (from, to) in self.edges() {
            if wanted.contains(from) && wanted.contains(to) {
                sub.add_edge(from, to);
            }
        }
        sub
    }

    /// The underlying petgraph structure, for the analytics layer.
    pub fn inner(&self) -> &DiGraph<String, ()> {
        &self.graph
    }
}
