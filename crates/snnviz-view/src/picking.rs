//! Screen-space neuron picking

use crate::projector::Projector;
use snnviz_runtime::{Network, NeuronId};

/// Default pick radius in pixels
pub const DEFAULT_PICK_RADIUS: f32 = 30.0;

/// Neuron whose projection is closest to `(x, y)` within `radius` pixels
///
/// Neurons behind the camera are never picked. Ties go to the lower id.
pub fn pick_neuron(
    projector: &Projector,
    network: &Network,
    x: f32,
    y: f32,
    radius: f32,
) -> Option<NeuronId> {
    if !x.is_finite() || !y.is_finite() || !(radius >= 0.0) {
        return None;
    }
    let max_sq = radius * radius;

    network
        .neurons()
        .iter()
        .filter_map(|neuron| {
            let p = projector.project(neuron.position());
            if !p.is_in_front() {
                return None;
            }
            let (dx, dy) = (p.x - x, p.y - y);
            let d_sq = dx * dx + dy * dy;
            (d_sq <= max_sq).then_some((neuron.id(), d_sq))
        })
        .fold(None, |best: Option<(NeuronId, f32)>, (id, d_sq)| match best {
            Some((_, best_sq)) if best_sq <= d_sq => best,
            _ => Some((id, d_sq)),
        })
        .map(|(id, _)| id)
}
