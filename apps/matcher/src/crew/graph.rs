//! Task graph: tasks plus their declared prerequisite edges.
//!
//! The graph, not the caller, decides execution order: `execution_order` is a
//! Kahn topological sort that breaks ties by declaration order, so a list that
//! is already correctly ordered runs exactly as declared.

use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;

use crate::crew::task::{ContextEntry, Task, TaskContext, TaskOutput};
use crate::crew::CrewError;

#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from tasks in declaration order.
    pub fn from_tasks<I>(tasks: I) -> Result<Self, CrewError>
    where
        I: IntoIterator<Item = Task>,
    {
        let mut graph = Self::new();
        for task in tasks {
            graph.add(task)?;
        }
        Ok(graph)
    }

    pub fn add(&mut self, task: Task) -> Result<(), CrewError> {
        if self.index.contains_key(task.id()) {
            return Err(CrewError::DuplicateTask(task.id().to_string()));
        }
        self.index.insert(task.id().to_string(), self.tasks.len());
        self.tasks.push(task);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in declaration order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    pub fn output(&self, id: &str) -> Option<&TaskOutput> {
        self.get(id).and_then(Task::output)
    }

    pub(crate) fn task_at(&self, position: usize) -> &Task {
        &self.tasks[position]
    }

    pub(crate) fn record(&mut self, position: usize, output: TaskOutput) {
        self.tasks[position].set_output(output);
    }

    /// Collects the current outputs of a task's prerequisites.
    /// A prerequisite that has not run yet contributes `None`, not an error.
    pub fn gather_context(&self, id: &str) -> Result<TaskContext, CrewError> {
        let task = self
            .get(id)
            .ok_or_else(|| CrewError::UnknownTask(id.to_string()))?;

        let entries = task
            .context()
            .iter()
            .map(|dep| ContextEntry {
                task_id: dep.clone(),
                output: self.output(dep).map(|o| o.raw.clone()),
            })
            .collect();

        Ok(TaskContext::new(entries))
    }

    /// Topological order over task positions.
    /// Fails on unknown prerequisites or cycles before anything runs.
    pub fn execution_order(&self) -> Result<Vec<usize>, CrewError> {
        let n = self.tasks.len();
        let mut in_degree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (position, task) in self.tasks.iter().enumerate() {
            for dep in task.context() {
                let dep_position = self.index.get(dep).copied().ok_or_else(|| {
                    CrewError::UnknownDependency {
                        task: task.id().to_string(),
                        dependency: dep.clone(),
                    }
                })?;
                in_degree[position] += 1;
                dependents[dep_position].push(position);
            }
        }

        let mut ready: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(position) = ready.pop_front() {
            order.push(position);
            for &next in &dependents[position] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    // Keep the ready queue sorted by declaration order.
                    let at = ready.partition_point(|&p| p < next);
                    ready.insert(at, next);
                }
            }
        }

        if order.len() < n {
            let stuck = (0..n)
                .filter(|i| in_degree[*i] > 0)
                .map(|i| self.tasks[i].id().to_string())
                .collect();
            return Err(CrewError::Cycle(stuck));
        }

        Ok(order)
    }

    /// Renders the graph as Graphviz DOT, edges pointing from prerequisite to dependent.
    pub fn to_dot(&self, name: &str) -> String {
        let mut dot = String::new();
        let _ = writeln!(dot, "digraph {} {{", quote(name));
        let _ = writeln!(dot, "  rankdir=LR;");
        for task in self.tasks() {
            let shape = if task.context().is_empty() {
                "component"
            } else {
                "box"
            };
            let _ = writeln!(
                dot,
                "  {} [label={}, shape={}, tooltip={}];",
                quote(task.id()),
                quote(task.agent().role()),
                shape,
                quote(task.expected_output())
            );
        }
        for task in self.tasks() {
            for dep in task.context() {
                let _ = writeln!(dot, "  {} -> {};", quote(dep), quote(task.id()));
            }
        }
        dot.push_str("}\n");
        dot
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
