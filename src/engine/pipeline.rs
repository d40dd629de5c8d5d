use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::assemblers::{Assembler, AssemblerConfig};
use crate::core::{ControlEvent, FrameListener, Receiver, ReceiverId, Stage, StageNode};
use crate::observability::{MetricsCollector, StageMetrics};
use crate::registry;

/// Id that names the assembler as the source end of a connection
pub const ASSEMBLER_ID: &str = "assembler";

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub assembler: AssemblerConfig,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

impl PipelineConfig {
    /// Where terminal consumers go by default: the last declared node
    /// without downstream connections, or the assembler when there are none
    pub fn terminal_id(&self) -> &str {
        self.nodes
            .iter()
            .rev()
            .map(|node| node.id.as_str())
            .find(|id| !self.connections.iter().any(|c| c.from == *id))
            .unwrap_or(ASSEMBLER_ID)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    pub from: String,
    pub to: String,
}

/// An assembler and the tree of stages hanging off it
pub struct Pipeline {
    assembler: Assembler,
    metrics: MetricsCollector,
}

impl Pipeline {
    pub fn new(assembler: Assembler) -> Self {
        Self {
            assembler,
            metrics: MetricsCollector::new(),
        }
    }

    /// Build a pipeline with no terminal consumers besides those in the graph
    pub fn from_json(config: Value) -> Result<Self> {
        PipelineBuilder::from_json(config)?.build()
    }

    /// Attach a receiver directly to the assembler
    pub fn attach(&mut self, receiver: impl Receiver + 'static) -> ReceiverId {
        self.assembler.attach(receiver)
    }

    pub fn detach(&mut self, id: ReceiverId) -> Option<Box<dyn Receiver>> {
        self.assembler.detach(id)
    }

    pub fn axes(&self) -> usize {
        self.assembler.axes()
    }

    /// Per-stage counters; clones share the live values
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Push out everything the stages are still holding back
    pub fn flush(&mut self) {
        self.assembler.finish();
    }
}

impl FrameListener for Pipeline {
    fn on_frame(&mut self, frame: &[f64]) {
        self.assembler.on_frame(frame);
    }

    fn on_event(&mut self, event: ControlEvent) {
        self.assembler.on_event(event);
    }

    fn finish(&mut self) {
        self.flush();
    }
}

/// Validates a [`PipelineConfig`] and wires it into a [`Pipeline`].
///
/// Stages form a tree rooted at the assembler: every node has exactly one
/// upstream and children run in connection order, followed by any sinks
/// registered with [`PipelineBuilder::with_sink`].
pub struct PipelineBuilder {
    config: PipelineConfig,
    sinks: Vec<(String, Box<dyn Receiver>)>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            sinks: Vec::new(),
        }
    }

    pub fn from_json(config: Value) -> Result<Self> {
        let config: PipelineConfig =
            serde_json::from_value(config).context("Invalid pipeline config")?;
        Ok(Self::new(config))
    }

    /// Attach a terminal consumer below `node_id` (or below the assembler)
    pub fn with_sink(mut self, node_id: impl Into<String>, receiver: impl Receiver + 'static) -> Self {
        self.sinks.push((node_id.into(), Box::new(receiver)));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Attach a terminal consumer below [`PipelineConfig::terminal_id`]
    pub fn with_terminal_sink(self, receiver: impl Receiver + 'static) -> Self {
        let node_id = self.config.terminal_id().to_string();
        self.with_sink(node_id, receiver)
    }

    pub fn build(self) -> Result<Pipeline> {
        let PipelineConfig {
            assembler,
            nodes,
            connections,
        } = self.config;

        let mut stages: HashMap<String, Box<dyn Stage>> = HashMap::new();
        for node in nodes {
            if node.id == ASSEMBLER_ID {
                bail!("Node id '{}' is reserved", ASSEMBLER_ID);
            }
            if stages.contains_key(&node.id) {
                bail!("Duplicate node id: {}", node.id);
            }
            let stage = registry::create_stage(&node.node_type, node.config)
                .with_context(|| format!("Failed to create node '{}'", node.id))?;
            stages.insert(node.id, stage);
        }

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut has_parent = HashSet::new();
        for ConnectionConfig { from, to } in connections {
            if from != ASSEMBLER_ID && !stages.contains_key(&from) {
                bail!("Connection from unknown node: {}", from);
            }
            if !stages.contains_key(&to) {
                bail!("Connection to unknown node: {}", to);
            }
            if !has_parent.insert(to.clone()) {
                bail!("Node '{}' has more than one upstream", to);
            }
            children.entry(from).or_default().push(to);
        }

        let mut sinks: HashMap<String, Vec<Box<dyn Receiver>>> = HashMap::new();
        for (node_id, sink) in self.sinks {
            if node_id != ASSEMBLER_ID && !stages.contains_key(&node_id) {
                bail!("Sink attached to unknown node: {}", node_id);
            }
            sinks.entry(node_id).or_default().push(sink);
        }

        // With one upstream per node, reaching every node from the assembler
        // also rules out cycles.
        let mut reachable = HashSet::new();
        let mut queue = VecDeque::from([ASSEMBLER_ID.to_string()]);
        while let Some(id) = queue.pop_front() {
            for child in children.get(&id).into_iter().flatten() {
                if reachable.insert(child.clone()) {
                    queue.push_back(child.clone());
                }
            }
        }
        if let Some(orphan) = stages.keys().find(|id| !reachable.contains(*id)) {
            bail!("Node '{}' is not reachable from the assembler", orphan);
        }

        let mut wiring = Wiring {
            stages,
            children,
            sinks,
            metrics: MetricsCollector::new(),
        };

        let mut root = Assembler::from_config(&assembler)?;
        for child in wiring.children_of(ASSEMBLER_ID) {
            let node = wiring.build_node(&child)?;
            root.attach(node);
        }
        for sink in wiring.sinks_of(ASSEMBLER_ID) {
            root.attach_boxed(sink);
        }

        debug!("pipeline built with {} stage(s)", wiring.metrics.len());
        Ok(Pipeline {
            assembler: root,
            metrics: wiring.metrics,
        })
    }
}

struct Wiring {
    stages: HashMap<String, Box<dyn Stage>>,
    children: HashMap<String, Vec<String>>,
    sinks: HashMap<String, Vec<Box<dyn Receiver>>>,
    metrics: MetricsCollector,
}

impl Wiring {
    fn children_of(&mut self, id: &str) -> Vec<String> {
        self.children.remove(id).unwrap_or_default()
    }

    fn sinks_of(&mut self, id: &str) -> Vec<Box<dyn Receiver>> {
        self.sinks.remove(id).unwrap_or_default()
    }

    fn build_node(&mut self, id: &str) -> Result<StageNode> {
        let stage = self
            .stages
            .remove(id)
            .ok_or_else(|| anyhow!("Node '{}' wired twice", id))?;

        let metrics = Arc::new(StageMetrics::new(id));
        self.metrics.register(id, metrics.clone());
        let mut node = StageNode::from_boxed(stage).with_metrics(metrics);

        for child in self.children_of(id) {
            let child_node = self.build_node(&child)?;
            node.attach(child_node);
        }
        for sink in self.sinks_of(id) {
            node.attach_boxed(sink);
        }
        Ok(node)
    }
}
