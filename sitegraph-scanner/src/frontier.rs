use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use url::Url;

/// Order in which claimed URLs are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TraversalOrder {
    /// FIFO: level-by-level expansion.
    #[default]
    BreadthFirst,
    /// LIFO: follow one branch to the bottom before backtracking.
    DepthFirst,
}

impl TraversalOrder {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bfs" | "breadth" | "breadth-first" => Some(TraversalOrder::BreadthFirst),
            "dfs" | "depth" | "depth-first" => Some(TraversalOrder::DepthFirst),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TraversalOrder::BreadthFirst => "breadth-first",
            TraversalOrder::DepthFirst => "depth-first",
        }
    }
}

/// A claimed URL waiting to be fetched, `depth` hops from the seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: usize,
}

impl FrontierEntry {
    pub fn new(url: Url, depth: usize) -> Self {
        Self { url, depth }
    }
}

/// Work container owned by the engine loop. Not synchronized.
#[derive(Debug)]
pub struct Frontier {
    order: TraversalOrder,
    entries: VecDeque<FrontierEntry>,
}

impl Frontier {
    pub fn new(order: TraversalOrder) -> Self {
        Self {
            order,
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.entries.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        match self.order {
            TraversalOrder::BreadthFirst => self.entries.pop_front(),
            TraversalOrder::DepthFirst => self.entries.pop_back(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn order(&self) -> TraversalOrder {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, depth: usize) -> FrontierEntry {
        FrontierEntry::new(Url::parse(&format!("http://example.com{}", path)).unwrap(), depth)
    }

    fn drain(frontier: &mut Frontier) -> Vec<String> {
        std::iter::from_fn(|| frontier.pop())
            .map(|e| e.url.path().to_string())
            .collect()
    }

    #[test]
    fn test_breadth_first_is_fifo() {
        let mut frontier = Frontier::new(TraversalOrder::BreadthFirst);
        frontier.push(entry("/a", 1));
        frontier.push(entry("/b", 1));
        frontier.push(entry("/c", 2));
        assert_eq!(frontier.len(), 3);
        assert_eq!(drain(&mut frontier), vec!["/a", "/b", "/c"]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_depth_first_is_lifo() {
        let mut frontier = Frontier::new(TraversalOrder::DepthFirst);
        frontier.push(entry("/a", 1));
        frontier.push(entry("/b", 1));
        frontier.push(entry("/c", 2));
        assert_eq!(drain(&mut frontier), vec!["/c", "/b", "/a"]);
    }

    #[test]
    fn test_pop_empty() {
        let mut frontier = Frontier::new(TraversalOrder::DepthFirst);
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_order_from_str() {
        assert_eq!(TraversalOrder::from_str("BFS"), Some(TraversalOrder::BreadthFirst));
        assert_eq!(TraversalOrder::from_str("depth-first"), Some(TraversalOrder::DepthFirst));
        assert_eq!(TraversalOrder::from_str("random"), None);
    }
}
