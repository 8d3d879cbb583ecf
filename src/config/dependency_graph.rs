// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::errors::ValidationError;

/// Anything shaped like a step: a name plus ordered input and output artifacts.
///
/// Implemented by both configuration (`StepConfig`) and assembled
/// (`pipeline::Step`) steps so validation and graph construction are shared.
pub trait StepShape {
    fn step_name(&self) -> &str;
    fn step_inputs(&self) -> &[String];
    fn step_outputs(&self) -> &[String];
}

/// Step-level dependency graph derived from shared artifact names.
///
/// Maps each step name to the steps that consume one of its outputs
/// (`producer -> [dependents]`). Keys and dependents keep declaration order,
/// which makes every traversal below deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph(pub IndexMap<String, Vec<String>>);

impl DependencyGraph {
    /// Build the graph from steps. An artifact produced by several steps links
    /// every producer to its consumers; uniqueness is checked by validation.
    pub fn from_steps<S: StepShape>(steps: &[S]) -> Self {
        let mut producers: HashMap<&str, Vec<&str>> = HashMap::new();
        for step in steps {
            for output in step.step_outputs() {
                producers
                    .entry(output.as_str())
                    .or_default()
                    .push(step.step_name());
            }
        }

        let mut graph: IndexMap<String, IndexSet<String>> = steps
            .iter()
            .map(|s| (s.step_name().to_string(), IndexSet::new()))
            .collect();

        for step in steps {
            for input in step.step_inputs() {
                if let Some(sources) = producers.get(input.as_str()) {
                    for source in sources {
                        if let Some(dependents) = graph.get_mut(*source) {
                            dependents.insert(step.step_name().to_string());
                        }
                    }
                }
            }
        }

        Self(
            graph
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().collect()))
                .collect(),
        )
    }

    pub fn get_dependents(&self, step: &str) -> Option<&Vec<String>> {
        self.0.get(step)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Invert the graph into `step -> [dependencies]`, covering every step
    pub fn build_reverse_dependencies(&self) -> IndexMap<String, Vec<String>> {
        let mut reverse: IndexMap<String, Vec<String>> =
            self.0.keys().map(|k| (k.clone(), Vec::new())).collect();

        for (step, dependents) in &self.0 {
            for dependent in dependents {
                reverse
                    .entry(dependent.clone())
                    .or_default()
                    .push(step.clone());
            }
        }

        reverse
    }

    /// Compute topological levels with Kahn's algorithm.
    ///
    /// Level 0 holds steps without dependencies; level N holds steps whose
    /// dependencies all sit in levels `0..N`. Within a level, steps keep
    /// declaration order.
    pub fn topological_levels(&self) -> Result<Vec<Vec<String>>, ValidationError> {
        let index: HashMap<&str, usize> = self
            .0
            .keys()
            .enumerate()
            .map(|(i, k)| (k.as_str(), i))
            .collect();

        let mut in_degree = vec![0usize; self.0.len()];
        for dependents in self.0.values() {
            for dependent in dependents {
                if let Some(&j) = index.get(dependent.as_str()) {
                    in_degree[j] += 1;
                }
            }
        }

        let mut current: Vec<usize> = (0..self.0.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut levels = Vec::new();
        let mut processed = 0usize;

        while !current.is_empty() {
            processed += current.len();
            let mut next = Vec::new();

            for &i in &current {
                let dependents = self.0.get_index(i).map(|(_, v)| v.as_slice()).unwrap_or(&[]);
                for dependent in dependents {
                    if let Some(&j) = index.get(dependent.as_str()) {
                        in_degree[j] -= 1;
                        if in_degree[j] == 0 {
                            next.push(j);
                        }
                    }
                }
            }

            next.sort_unstable();
            levels.push(current.iter().map(|&i| self.name_at(i)).collect());
            current = next;
        }

        if processed != self.0.len() {
            let remaining = (0..self.0.len())
                .filter(|&i| in_degree[i] > 0)
                .map(|i| self.name_at(i))
                .collect();
            return Err(ValidationError::CyclicDependency { cycle: remaining });
        }

        Ok(levels)
    }

    fn name_at(&self, index: usize) -> String {
        self.0
            .get_index(index)
            .map(|(k, _)| k.clone())
            .unwrap_or_default()
    }

    /// The given steps plus everything reachable downstream of them
    pub fn descendants<'a, I>(&self, roots: I) -> IndexSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        walk(roots, |step| self.0.get(step).cloned().unwrap_or_default())
    }

    /// The given steps plus everything they transitively depend on
    pub fn ancestors<'a, I>(&self, roots: I) -> IndexSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let reverse = self.build_reverse_dependencies();
        walk(roots, |step| reverse.get(step).cloned().unwrap_or_default())
    }
}

fn walk<'a, I, F>(roots: I, next: F) -> IndexSet<String>
where
    I: IntoIterator<Item = &'a String>,
    F: Fn(&str) -> Vec<String>,
{
    let mut seen = IndexSet::new();
    let mut queue: VecDeque<String> = roots.into_iter().cloned().collect();
    let mut queued: HashSet<String> = queue.iter().cloned().collect();

    while let Some(step) = queue.pop_front() {
        for neighbour in next(&step) {
            if queued.insert(neighbour.clone()) {
                queue.push_back(neighbour);
            }
        }
        seen.insert(step);
    }

    seen
}
