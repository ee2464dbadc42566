use std::time::Duration;

use super::{NodeId, Stage};

/// Easing applied to a tween's linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Quadratic ease-out: fast start, slow end.
    QuadOut,
    /// Quadratic ease-in-out: slow start and end.
    QuadInOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

/// Opacity interpolation on one node.
struct Tween {
    id: TweenId,
    node: NodeId,
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

/// Ticker context owning every running tween of a session.
///
/// Tweens advance by wall-clock deltas handed to `update`, never by frame
/// counts. Dropping the group drops whatever is still running.
#[derive(Default)]
pub struct TweenGroup {
    tweens: Vec<Tween>,
    next_id: u64,
}

impl TweenGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fading `node` from `from` to `to`. The node is set to `from`
    /// immediately.
    pub fn fade(
        &mut self,
        stage: &mut Stage,
        node: NodeId,
        from: f32,
        to: f32,
        duration: Duration,
        easing: Easing,
    ) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        stage.set_opacity(node, from);
        self.tweens.push(Tween {
            id,
            node,
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
            easing,
        });
        id
    }

    /// Advance every tween by `dt`, write the new opacities to `stage` and
    /// return the ids of tweens that completed during this update.
    pub fn update(&mut self, dt: Duration, stage: &mut Stage) -> Vec<TweenId> {
        let mut completed = Vec::new();

        for tween in &mut self.tweens {
            tween.elapsed += dt;
            let done = tween.duration.is_zero() || tween.elapsed >= tween.duration;
            let value = if done {
                tween.to
            } else {
                let t = tween.elapsed.as_secs_f32() / tween.duration.as_secs_f32();
                tween.from + (tween.to - tween.from) * ease(t, tween.easing)
            };
            stage.set_opacity(tween.node, value);
            if done {
                completed.push(tween.id);
            }
        }

        self.tweens.retain(|t| !completed.contains(&t.id));
        completed
    }

    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

/// Apply an easing function to a linear progress value `t` in [0, 1].
fn ease(t: f32, easing: Easing) -> f32 {
    match easing {
        Easing::Linear => t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Node;
    use crate::types::Viewport;

    fn stage_with_node() -> (Stage, NodeId) {
        let mut stage = Stage::new(Viewport::new(10.0, 10.0));
        let id = stage.add(Node::new(Vec::new(), 0));
        (stage, id)
    }

    #[test]
    fn ease_endpoints() {
        for e in [Easing::Linear, Easing::QuadOut, Easing::QuadInOut] {
            assert!(ease(0.0, e).abs() < 1e-6);
            assert!((ease(1.0, e) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn quad_out_fast_start() {
        assert!(ease(0.25, Easing::QuadOut) > 0.25);
    }

    #[test]
    fn quad_in_out_is_symmetric() {
        assert!((ease(0.5, Easing::QuadInOut) - 0.5).abs() < 1e-6);
        assert!(ease(0.25, Easing::QuadInOut) < 0.25);
    }

    #[test]
    fn fade_runs_to_completion_once() {
        let (mut stage, node) = stage_with_node();
        let mut tweens = TweenGroup::new();
        let id = tweens.fade(
            &mut stage,
            node,
            1.0,
            0.0,
            Duration::from_millis(100),
            Easing::Linear,
        );
        assert_eq!(stage.opacity(node), Some(1.0));

        assert!(tweens.update(Duration::from_millis(50), &mut stage).is_empty());
        let mid = stage.opacity(node).unwrap();
        assert!((mid - 0.5).abs() < 1e-3);
        assert!(tweens.is_active(id));

        assert_eq!(tweens.update(Duration::from_millis(60), &mut stage), vec![id]);
        assert_eq!(stage.opacity(node), Some(0.0));
        assert!(!tweens.is_active(id));
        assert!(tweens.update(Duration::from_millis(60), &mut stage).is_empty());
    }

    #[test]
    fn zero_duration_completes_on_first_update() {
        let (mut stage, node) = stage_with_node();
        let mut tweens = TweenGroup::new();
        let id = tweens.fade(&mut stage, node, 0.0, 1.0, Duration::ZERO, Easing::QuadInOut);
        assert_eq!(tweens.update(Duration::ZERO, &mut stage), vec![id]);
        assert_eq!(stage.opacity(node), Some(1.0));
        assert!(tweens.is_empty());
    }

    #[test]
    fn tween_on_removed_node_still_completes() {
        let (mut stage, node) = stage_with_node();
        let mut tweens = TweenGroup::new();
        let id = tweens.fade(&mut stage, node, 1.0, 0.0, Duration::from_millis(10), Easing::Linear);
        stage.remove(node);
        assert_eq!(tweens.update(Duration::from_millis(20), &mut stage), vec![id]);
    }
}
