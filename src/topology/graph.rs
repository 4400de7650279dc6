//! Directed graph with cycle detection

use crate::core::models::{GraphNodeView, GraphView, TopologyEdge, TopologyNode};
use crate::utils::error::{DiagnosticsError, Result};
use std::collections::{BTreeSet, HashMap};

/// Directed graph of topology nodes. Node ids are unique; at most one edge exists
/// per (source, target) pair.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<TopologyNode>,
    index: HashMap<String, usize>,
    edges: Vec<TopologyEdge>,
    edge_index: HashMap<(usize, usize), usize>,
    adjacency: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: TopologyNode) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(DiagnosticsError::validation(format!(
                "duplicate topology node: {}",
                node.id
            )));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        Ok(())
    }

    /// Add an edge between existing nodes; an existing edge is replaced
    pub fn add_edge(&mut self, edge: TopologyEdge) -> Result<()> {
        let source = self.position(&edge.source)?;
        let target = self.position(&edge.target)?;

        match self.edge_index.get(&(source, target)) {
            Some(&existing) => self.edges[existing] = edge,
            None => {
                self.edge_index.insert((source, target), self.edges.len());
                self.edges.push(edge);
                self.adjacency[source].push(target);
            }
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| DiagnosticsError::not_found(format!("topology node: {}", id)))
    }

    pub fn node(&self, id: &str) -> Option<&TopologyNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn nodes(&self) -> &[TopologyNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[TopologyEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Ids of the direct successors of `id`
    pub fn successors(&self, id: &str) -> Vec<&str> {
        match self.index.get(id) {
            Some(&i) => self.adjacency[i]
                .iter()
                .map(|&t| self.nodes[t].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Ids of every node that lies on at least one directed cycle
    pub fn find_cyclic_nodes(&self) -> BTreeSet<String> {
        let mut cyclic = BTreeSet::new();
        for component in self.strongly_connected_components() {
            let on_cycle = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&v| self.adjacency[v].contains(&v));
            if on_cycle {
                cyclic.extend(component.iter().map(|&v| self.nodes[v].id.clone()));
            }
        }
        cyclic
    }

    /// Tarjan's algorithm with an explicit call stack
    fn strongly_connected_components(&self) -> Vec<Vec<usize>> {
        let n = self.nodes.len();
        let mut order: Vec<Option<usize>> = vec![None; n];
        let mut lowlink = vec![0usize; n];
        let mut on_stack = vec![false; n];
        let mut stack: Vec<usize> = Vec::new();
        let mut next_order = 0usize;
        let mut components = Vec::new();

        for root in 0..n {
            if order[root].is_some() {
                continue;
            }

            order[root] = Some(next_order);
            lowlink[root] = next_order;
            next_order += 1;
            stack.push(root);
            on_stack[root] = true;
            let mut call_stack: Vec<(usize, usize)> = vec![(root, 0)];

            while let Some(frame) = call_stack.last_mut() {
                let v = frame.0;
                if let Some(&w) = self.adjacency[v].get(frame.1) {
                    frame.1 += 1;
                    match order[w] {
                        None => {
                            order[w] = Some(next_order);
                            lowlink[w] = next_order;
                            next_order += 1;
                            stack.push(w);
                            on_stack[w] = true;
                            call_stack.push((w, 0));
                        }
                        Some(w_order) if on_stack[w] => {
                            lowlink[v] = lowlink[v].min(w_order);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                call_stack.pop();
                if let Some(&(parent, _)) = call_stack.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[v]);
                }

                if order[v] == Some(lowlink[v]) {
                    let mut component = Vec::new();
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    components.push(component);
                }
            }
        }

        components
    }

    /// Node/edge projection with cyclic flags
    pub fn to_view(&self, cyclic_nodes: &BTreeSet<String>) -> GraphView {
        GraphView {
            nodes: self
                .nodes
                .iter()
                .map(|node| GraphNodeView {
                    id: node.id.clone(),
                    node_type: node.node_type,
                    properties: node.properties.clone(),
                    cyclic: cyclic_nodes.contains(&node.id),
                })
                .collect(),
            edges: self.edges.clone(),
            cyclic_node_count: cyclic_nodes.len(),
        }
    }
}
