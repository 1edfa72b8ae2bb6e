//! Force-directed layout with a bounded cooldown.
//!
//! Wraps the `force_graph` simulation: nodes are seeded on a circle around
//! the viewport center, node mass follows roadmap weight, and the main node
//! is anchored at the center so the roadmap stays framed. The simulation
//! runs until total per-tick displacement falls under the settle epsilon or
//! the cooldown tick budget runs out, then fires a stabilization callback
//! exactly once.

use std::collections::HashMap;
use std::f32::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::config::LayoutConfig;
use crate::graph::{Graph, NodeKind};

/// Fixed simulation step, roughly one display frame.
const TICK_DT: f32 = 1.0 / 60.0;

/// Initial ring radius the non-anchored nodes are seeded on.
const SEED_RADIUS: f32 = 100.0;

pub struct LayoutEngine {
    sim: ForceGraph<String, ()>,
    index_of: HashMap<String, DefaultNodeIdx>,
    ticks: u32,
    settled: bool,
    cooldown_ticks: u32,
    settle_epsilon: f32,
}

impl LayoutEngine {
    /// Seed a simulation for `graph` inside the configured viewport.
    pub fn new(graph: &Graph, config: &LayoutConfig) -> Self {
        let mut sim = ForceGraph::new(SimulationParameters {
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
        });

        let (cx, cy) = (
            config.viewport_width as f32 / 2.0,
            config.viewport_height as f32 / 2.0,
        );

        let mut index_of = HashMap::with_capacity(graph.nodes.len());
        for (i, node) in graph.nodes.iter().enumerate() {
            let is_main = node.kind == NodeKind::Main;
            let angle = (i as f32) * 2.0 * PI / graph.nodes.len().max(1) as f32;
            let (x, y) = if is_main {
                (cx, cy)
            } else {
                (cx + SEED_RADIUS * angle.cos(), cy + SEED_RADIUS * angle.sin())
            };

            let idx = sim.add_node(NodeData {
                x,
                y,
                mass: node.weight,
                is_anchor: is_main,
                user_data: node.id.clone(),
            });
            index_of.insert(node.id.clone(), idx);
        }

        for link in &graph.links {
            if let (Some(&src), Some(&tgt)) =
                (index_of.get(&link.source_id), index_of.get(&link.target_id))
            {
                sim.add_edge(src, tgt, EdgeData::default());
            }
        }

        Self {
            sim,
            index_of,
            ticks: 0,
            settled: false,
            cooldown_ticks: config.cooldown_ticks,
            settle_epsilon: config.settle_epsilon,
        }
    }

    /// Advance one simulation step. Returns true once the layout has settled
    /// (displacement under epsilon, or cooldown budget exhausted).
    pub fn tick(&mut self) -> bool {
        if self.settled {
            return true;
        }

        let before = self.snapshot();
        self.sim.update(TICK_DT);
        self.ticks += 1;

        let moved: f32 = self
            .snapshot()
            .iter()
            .zip(before.iter())
            .map(|(a, b)| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
            .sum();

        if moved < self.settle_epsilon || self.ticks >= self.cooldown_ticks {
            self.settled = true;
        }
        self.settled
    }

    /// Run the simulation to stability and invoke `on_stable` once.
    pub fn run_to_stability(&mut self, on_stable: impl FnOnce()) {
        let start = std::time::Instant::now();
        while !self.tick() {}
        log::debug!(
            "Layout settled after {} ticks in {:?}",
            self.ticks,
            start.elapsed()
        );
        on_stable();
    }

    /// Whether the layout has stopped moving nodes.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Ticks simulated so far.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Current position of a node, if it exists in the layout.
    pub fn position_of(&self, id: &str) -> Option<(f32, f32)> {
        let &idx = self.index_of.get(id)?;
        let mut found = None;
        self.sim.visit_nodes(|node| {
            if node.index() == idx {
                found = Some((node.x(), node.y()));
            }
        });
        found
    }

    fn snapshot(&self) -> Vec<(f32, f32)> {
        let mut positions = Vec::with_capacity(self.index_of.len());
        self.sim.visit_nodes(|node| positions.push((node.x(), node.y())));
        positions
    }
}
