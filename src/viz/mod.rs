// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline rendering for `conduit viz`.
//!
//! Both renderings describe the same bipartite graph: artifact -> step ->
//! artifact. Node order is the pipeline's execution order for steps followed
//! by artifacts sorted by name, so output is stable across runs.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::consts::{PARAMETERS_ARTIFACT, PARAMS_PREFIX};
use crate::pipeline::Pipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Task,
    Data,
    Parameters,
}

impl NodeType {
    fn for_artifact(name: &str) -> Self {
        if name == PARAMETERS_ARTIFACT || name.starts_with(PARAMS_PREFIX) {
            NodeType::Parameters
        } else {
            NodeType::Data
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            NodeType::Task => "task",
            NodeType::Data => "data",
            NodeType::Parameters => "parameters",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

fn node_id(node_type: NodeType, name: &str) -> String {
    format!("{}::{}", node_type.as_str(), name)
}

impl PipelineGraph {
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        let mut graph = PipelineGraph::default();
        // artifact -> tags of every step touching it
        let mut artifacts: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

        for step in pipeline.steps() {
            let task = node_id(NodeType::Task, &step.name);
            graph.nodes.push(Node {
                id: task.clone(),
                name: step.name.clone(),
                node_type: NodeType::Task,
                tags: step.tags.iter().cloned().collect(),
            });

            for input in &step.inputs {
                artifacts
                    .entry(input.as_str())
                    .or_default()
                    .extend(step.tags.iter().map(String::as_str));
                graph.edges.push(Edge {
                    source: node_id(NodeType::for_artifact(input), input),
                    target: task.clone(),
                });
            }
            for output in &step.outputs {
                artifacts
                    .entry(output.as_str())
                    .or_default()
                    .extend(step.tags.iter().map(String::as_str));
                graph.edges.push(Edge {
                    source: task.clone(),
                    target: node_id(NodeType::for_artifact(output), output),
                });
            }
        }

        for (name, tags) in artifacts {
            let node_type = NodeType::for_artifact(name);
            graph.nodes.push(Node {
                id: node_id(node_type, name),
                name: name.to_string(),
                node_type,
                tags: tags.into_iter().map(str::to_string).collect(),
            });
        }

        graph
    }
}

/// JSON rendering: `{"nodes": [...], "edges": [...]}`
pub fn render_json(pipeline: &Pipeline) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&PipelineGraph::from_pipeline(pipeline))
}

/// Graphviz DOT rendering
pub fn render_dot(pipeline: &Pipeline, title: &str) -> String {
    let graph = PipelineGraph::from_pipeline(pipeline);
    let mut dot = format!("digraph \"{}\" {{\n", escape(title));
    dot.push_str("  rankdir=TB;\n");

    for node in &graph.nodes {
        let shape = match node.node_type {
            NodeType::Task => "box",
            NodeType::Data => "ellipse",
            NodeType::Parameters => "note",
        };
        dot.push_str(&format!(
            "  \"{}\" [label=\"{}\", shape={}];\n",
            escape(&node.id),
            escape(&node.name),
            shape
        ));
    }
    for edge in &graph.edges {
        dot.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            escape(&edge.source),
            escape(&edge.target)
        ));
    }

    dot.push_str("}\n");
    dot
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
