//! Reference-graph analysis.
//!
//! Models reference each other by name, and the resulting graph may contain
//! cycles. Generators need three facts about it, all computed here in one
//! depth-first walk over the models in declaration order:
//!
//! - which models take part in a cycle (Tarjan strongly connected components),
//! - which edges close a cycle (edges whose target is still being visited),
//! - a dependencies-first order over the remaining, acyclic edges.
//!
//! The walk is deterministic, so the same model set always produces the same
//! classification.

use crate::models::ModelSet;
use std::collections::BTreeSet;

/// Cycle classification of a model set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleAnalysis {
    participants: BTreeSet<String>,
    closing_edges: BTreeSet<(String, String)>,
    dependency_order: Vec<String>,
}

impl CycleAnalysis {
    /// Analyzes the reference graph of `set`.
    ///
    /// References to models outside the set are ignored; validation reports
    /// them separately.
    #[must_use]
    pub fn analyze(set: &ModelSet) -> Self {
        let edges: Vec<Vec<usize>> = set
            .iter()
            .map(|model| {
                let mut targets: Vec<usize> = Vec::new();
                for (_, target) in model.references() {
                    if let Some(idx) = set.position(target) {
                        if !targets.contains(&idx) {
                            targets.push(idx);
                        }
                    }
                }
                targets
            })
            .collect();

        let mut walker = Walker::new(edges);
        for v in 0..set.len() {
            if walker.index[v].is_none() {
                walker.visit(v);
            }
        }

        let name = |idx: usize| set.models()[idx].name.clone();

        Self {
            participants: walker.participants.into_iter().map(name).collect(),
            closing_edges: walker
                .closing
                .into_iter()
                .map(|(from, to)| (name(from), name(to)))
                .collect(),
            dependency_order: walker.finished.into_iter().map(name).collect(),
        }
    }

    /// Returns true if `model` is reachable from itself.
    #[must_use]
    pub fn is_cycle_participant(&self, model: &str) -> bool {
        self.participants.contains(model)
    }

    /// Returns true if the edge `from -> to` closes a cycle.
    ///
    /// Removing every closing edge leaves an acyclic graph, so a generator
    /// that breaks exactly these edges with an indirection never produces an
    /// infinitely sized type.
    #[must_use]
    pub fn is_closing_edge(&self, from: &str, to: &str) -> bool {
        self.closing_edges
            .contains(&(from.to_string(), to.to_string()))
    }

    /// Returns true if any cycle exists.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.closing_edges.is_empty()
    }

    /// Cycle participants, sorted by name.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.participants.iter().map(String::as_str)
    }

    /// Closing edges as `(from, to)` pairs, sorted.
    pub fn closing_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.closing_edges
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    /// Model names ordered so that every model follows the models it
    /// references through non-closing edges.
    #[must_use]
    pub fn dependency_order(&self) -> &[String] {
        &self.dependency_order
    }
}

/// Depth-first walker state (Tarjan's algorithm plus back-edge tracking).
struct Walker {
    edges: Vec<Vec<usize>>,
    next_index: usize,
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    stack: Vec<usize>,
    on_stack: Vec<bool>,
    in_progress: Vec<bool>,
    participants: Vec<usize>,
    closing: Vec<(usize, usize)>,
    finished: Vec<usize>,
}

impl Walker {
    fn new(edges: Vec<Vec<usize>>) -> Self {
        let n = edges.len();
        Self {
            edges,
            next_index: 0,
            index: vec![None; n],
            lowlink: vec![0; n],
            stack: Vec::new(),
            on_stack: vec![false; n],
            in_progress: vec![false; n],
            participants: Vec::new(),
            closing: Vec::new(),
            finished: Vec::new(),
        }
    }

    fn visit(&mut self, v: usize) {
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        self.in_progress[v] = true;

        for i in 0..self.edges[v].len() {
            let w = self.edges[v][i];
            match self.index[w] {
                None => {
                    self.visit(w);
                    self.lowlink[v] = self.lowlink[v].min(self.lowlink[w]);
                }
                Some(w_index) => {
                    if self.in_progress[w] {
                        self.closing.push((v, w));
                    }
                    if self.on_stack[w] {
                        self.lowlink[v] = self.lowlink[v].min(w_index);
                    }
                }
            }
        }

        self.in_progress[v] = false;
        self.finished.push(v);

        if Some(self.lowlink[v]) == self.index[v] {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            let self_edge = self.edges[v].contains(&v);
            if component.len() > 1 || self_edge {
                self.participants.extend(component);
            }
        }
    }
}
