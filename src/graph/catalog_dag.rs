use crate::error::CatalogViolation;
use crate::task::{Task, TaskId};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use std::collections::HashMap;

/// Dependency graph of a catalog; edges point from a dependency to its dependent.
#[derive(Debug, Clone)]
pub struct CatalogDag {
    pub graph: DiGraph<TaskId, ()>,
    pub id_to_index: HashMap<TaskId, NodeIndex>,
    order: Vec<TaskId>,
}

impl CatalogDag {
    /// `TaskCatalog::new` already rejects forward and unknown references, so `Cycle`
    /// and `UnresolvedDependency` only surface here for hand-built task lists.
    pub fn build(tasks: &[Task]) -> Result<Self, CatalogViolation> {
        let mut graph: DiGraph<TaskId, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut id_to_index: HashMap<TaskId, NodeIndex> = HashMap::with_capacity(tasks.len());

        // Add nodes first
        for task in tasks {
            let node_ix = graph.add_node(task.id);
            id_to_index.insert(task.id, node_ix);
        }

        // Add edges: dependency -> task
        for task in tasks {
            let v = id_to_index[&task.id];
            for dep_id in &task.dependencies {
                let u = id_to_index.get(dep_id).copied().ok_or(
                    CatalogViolation::UnresolvedDependency {
                        task_id: task.id,
                        dependency_id: *dep_id,
                    },
                )?;
                graph.add_edge(u, v, ());
            }
        }

        let order = toposort(&graph, None)
            .map_err(|cycle| CatalogViolation::Cycle {
                task_id: graph[cycle.node_id()],
            })?
            .into_iter()
            .map(|node_ix| graph[node_ix])
            .collect();

        Ok(Self {
            graph,
            id_to_index,
            order,
        })
    }

    /// A topological order of all task ids.
    pub fn topological_order(&self) -> &[TaskId] {
        &self.order
    }

    /// Tasks that list `id` as a direct dependency, ascending.
    pub fn successors(&self, id: TaskId) -> Vec<TaskId> {
        let Some(&node_ix) = self.id_to_index.get(&id) else {
            return Vec::new();
        };
        let mut ids: Vec<TaskId> = self
            .graph
            .neighbors_directed(node_ix, Direction::Outgoing)
            .map(|succ_ix| self.graph[succ_ix])
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every task transitively blocked by `id`, ascending, excluding `id` itself.
    pub fn downstream(&self, id: TaskId) -> Vec<TaskId> {
        let Some(&start) = self.id_to_index.get(&id) else {
            return Vec::new();
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut ids = Vec::new();
        while let Some(node_ix) = bfs.next(&self.graph) {
            if node_ix != start {
                ids.push(self.graph[node_ix]);
            }
        }
        ids.sort_unstable();
        ids
    }
}
