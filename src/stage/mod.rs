//! Stage — the scene the dialogue is drawn on.
//!
//! Nodes are stored in a slot map and carry node-local draw ops. A node is
//! either attached (drawn) or detached (kept alive but invisible), so long-lived
//! visuals can leave and rejoin the scene without being rebuilt.

pub mod animation;

pub use animation::{Easing, TweenGroup, TweenId};

use slotmap::{SlotMap, new_key_type};

use crate::types::{DrawOp, ResolvedScene, Viewport};

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub opacity: f32,
    pub z_order: i32,
    pub attached: bool,
    pub ops: Vec<DrawOp>,
}

impl Node {
    pub fn new(ops: Vec<DrawOp>, z_order: i32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            opacity: 1.0,
            z_order,
            attached: true,
            ops,
        }
    }
}

/// Node z-orders used by the dialogue scene, back to front.
pub mod layer {
    pub const BACKGROUND: i32 = -10;
    pub const CHARACTER: i32 = 5;
    pub const BUBBLE: i32 = 10;
    pub const EPILOGUE: i32 = 20;
}

/// Op z-orders are folded into their node's layer with this stride.
const LAYER_STRIDE: i32 = 1 << 10;

pub struct Stage {
    viewport: Viewport,
    nodes: SlotMap<NodeId, Node>,
}

impl Stage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            nodes: SlotMap::with_key(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    /// Add a node and attach it to the scene.
    pub fn add(&mut self, mut node: Node) -> NodeId {
        node.attached = true;
        self.nodes.insert(node)
    }

    /// Keep a node alive without drawing it.
    pub fn insert_detached(&mut self, mut node: Node) -> NodeId {
        node.attached = false;
        self.nodes.insert(node)
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub fn attach(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attached = true;
        }
    }

    pub fn detach(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attached = false;
        }
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.attached)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.x = x;
            node.y = y;
        }
    }

    pub fn position(&self, id: NodeId) -> Option<(f64, f64)> {
        self.nodes.get(id).map(|n| (n.x, n.y))
    }

    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    pub fn opacity(&self, id: NodeId) -> Option<f32> {
        self.nodes.get(id).map(|n| n.opacity)
    }

    pub fn set_ops(&mut self, id: NodeId, ops: Vec<DrawOp>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.ops = ops;
        }
    }

    pub fn attached_count(&self) -> usize {
        self.nodes.values().filter(|n| n.attached).count()
    }

    /// Flatten attached nodes into absolute draw ops for the current viewport.
    ///
    /// Node positions are floored to whole cells; nodes at zero opacity are
    /// omitted and partially transparent ones have their colours faded.
    pub fn resolve(&self) -> ResolvedScene {
        let mut ops = Vec::new();

        for node in self.nodes.values() {
            if !node.attached || node.opacity <= 0.0 {
                continue;
            }
            let ox = node.x.floor() as i32;
            let oy = node.y.floor() as i32;
            let layer = node.z_order.saturating_mul(LAYER_STRIDE);
            for op in &node.ops {
                ops.push(DrawOp {
                    x: ox + op.x,
                    y: oy + op.y,
                    ch: op.ch,
                    style: op.style.faded(node.opacity),
                    z_order: layer + op.z_order,
                });
            }
        }

        ResolvedScene {
            width: clamp_dimension(self.viewport.width),
            height: clamp_dimension(self.viewport.height),
            ops,
        }
    }
}

fn clamp_dimension(v: f64) -> u16 {
    v.max(0.0).min(u16::MAX as f64).floor() as u16
}
