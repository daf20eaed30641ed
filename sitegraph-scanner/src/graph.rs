use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A page in the link graph, identified by its canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteNode {
    pub url: String,
    /// Hop distance from the seed at the time the URL was claimed.
    pub depth: usize,
}

/// Directed "links to" graph built by a traversal.
///
/// Nodes and edges are unique: inserting a URL or a (parent, child) pair a
/// second time is a no-op.
#[derive(Debug, Clone, Default)]
pub struct SiteGraph {
    graph: DiGraph<SiteNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl SiteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `url` unless it is already present and return its index.
    pub fn add_node(&mut self, url: &str, depth: usize) -> NodeIndex {
        if let Some(&idx) = self.index.get(url) {
            return idx;
        }
        let idx = self.graph.add_node(SiteNode {
            url: url.to_string(),
            depth,
        });
        self.index.insert(url.to_string(), idx);
        idx
    }

    /// Record that `parent` links to `child`, adding the child node at
    /// `child_depth` if it is new.
    pub fn add_edge(&mut self, parent: &str, child: &str, child_depth: usize) {
        let parent_idx = self.add_node(parent, child_depth.saturating_sub(1));
        let child_idx = self.add_node(child, child_depth);
        self.graph.update_edge(parent_idx, child_idx, ());
    }

    pub fn node(&self, url: &str) -> Option<&SiteNode> {
        self.index.get(url).map(|&idx| &self.graph[idx])
    }

    pub fn contains_node(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn contains_edge(&self, parent: &str, child: &str) -> bool {
        match (self.index.get(parent), self.index.get(child)) {
            (Some(&p), Some(&c)) => self.graph.find_edge(p, c).is_some(),
            _ => false,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SiteNode> {
        self.graph.node_weights()
    }

    /// `(parent, child)` URL pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].url.as_str(),
                self.graph[edge.target()].url.as_str(),
            )
        })
    }

    /// URLs that `url` links to.
    pub fn children(&self, url: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(url) else {
            return Vec::new();
        };
        let mut children: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|child| self.graph[child].url.as_str())
            .collect();
        // petgraph walks neighbors newest-first
        children.reverse();
        children
    }

    pub fn out_degree(&self, url: &str) -> usize {
        self.index
            .get(url)
            .map(|&idx| self.graph.edges_directed(idx, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Graphviz rendering, one node per URL labelled with the URL.
    pub fn to_dot(&self) -> String {
        let labelled = self.graph.map(|_, node| node.url.as_str(), |_, _| "");
        format!("{}", Dot::with_config(&labelled, &[Config::EdgeNoLabel]))
    }
}
