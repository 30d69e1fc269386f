use crate::error::ResolveError;
use crate::task::Task;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Dependency graph over task positions. Edge `a -> b` means `b` depends on `a`.
pub struct ScheduleDag {
    pub graph: DiGraph<usize, ()>,
    pub id_to_index: HashMap<String, NodeIndex>,
    ids: Vec<String>,
    /// Dependencies of each task in declaration order.
    dependencies: Vec<Vec<usize>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

impl ScheduleDag {
    pub fn build(tasks: &[Task]) -> Result<Self, ResolveError> {
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::with_capacity(tasks.len());

        // Add nodes first
        for (idx, task) in tasks.iter().enumerate() {
            let node_ix = graph.add_node(idx);
            if id_to_index.insert(task.id.clone(), node_ix).is_some() {
                return Err(ResolveError::DuplicateTaskId {
                    task_id: task.id.clone(),
                    line: task.line,
                });
            }
        }

        // Add edges: dependency -> task
        let mut dependencies = Vec::with_capacity(tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            let mut deps = Vec::with_capacity(task.dependencies.len());
            for dep_id in &task.dependencies {
                let &dep_ix = id_to_index.get(dep_id).ok_or_else(|| {
                    ResolveError::UnknownDependency {
                        task_id: task.id.clone(),
                        referenced_id: dep_id.clone(),
                    }
                })?;
                if dep_ix.index() == idx {
                    return Err(ResolveError::SelfDependency {
                        task_id: task.id.clone(),
                    });
                }
                graph.add_edge(dep_ix, NodeIndex::new(idx), ());
                deps.push(dep_ix.index());
            }
            dependencies.push(deps);
        }

        Ok(Self {
            graph,
            id_to_index,
            ids: tasks.iter().map(|t| t.id.clone()).collect(),
            dependencies,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).map(|ix| ix.index())
    }

    pub fn dependencies(&self, idx: usize) -> &[usize] {
        &self.dependencies[idx]
    }

    /// Tasks that depend on `idx`, in ascending input order.
    pub fn dependents(&self, idx: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(idx), Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// First cycle found walking each task's dependencies in input order.
    ///
    /// The cycle lists the tasks on the walk from the revisited task onward,
    /// so `a after b, b after c, c after a` yields `[a, b, c]`.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks = vec![Mark::White; self.len()];

        for root in 0..self.len() {
            if marks[root] != Mark::White {
                continue;
            }
            // (task, next dependency to visit)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            marks[root] = Mark::Gray;

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                match self.dependencies[node].get(cursor) {
                    Some(&next) => {
                        frame.1 += 1;
                        match marks[next] {
                            Mark::White => {
                                marks[next] = Mark::Gray;
                                stack.push((next, 0));
                            }
                            Mark::Gray => {
                                let start = stack.iter().position(|&(n, _)| n == next)?;
                                return Some(
                                    stack[start..]
                                        .iter()
                                        .map(|&(n, _)| self.ids[n].clone())
                                        .collect(),
                                );
                            }
                            Mark::Black => {}
                        }
                    }
                    None => {
                        marks[node] = Mark::Black;
                        stack.pop();
                    }
                }
            }
        }
        None
    }

    /// Kahn's algorithm; among ready tasks the earliest declared goes first.
    pub fn stable_topological_order(&self) -> Result<Vec<usize>, ResolveError> {
        let mut in_degree: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, deg)| **deg == 0)
            .map(|(idx, _)| Reverse(idx))
            .collect();

        let mut order = Vec::with_capacity(self.len());
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(idx);
            for succ_ix in self
                .graph
                .neighbors_directed(NodeIndex::new(idx), Direction::Outgoing)
            {
                let succ = self.graph[succ_ix];
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }

        if order.len() < self.len() {
            let cycle = self.find_cycle().unwrap_or_default();
            return Err(ResolveError::CyclicDependency { cycle });
        }
        Ok(order)
    }
}
