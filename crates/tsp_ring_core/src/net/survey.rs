use crate::constants::INITIAL_LIFE;
use crate::node::Point;

use super::ring::Ring;

/// One survey cycle: refresh ring indices, relax the ring toward every
/// point in caller-supplied order, then prune and duplicate in the finish
/// phase. A no-op on an empty ring.
pub(crate) fn run_cycle(ring: &mut Ring, points: &[Point], gain: f64) {
    if ring.is_empty() {
        return;
    }
    ring.reindex();
    for &point in points {
        ring.relax_toward(point, gain);
    }
    finish_cycle(ring);
}

/// Finish phase over the neurons that existed when the pass started:
/// starved neurons lose a life (and are removed at zero), single winners
/// are re-armed, multi-winners are re-armed and duplicated. Neurons
/// inserted by duplication during the pass are not visited.
///
/// Only the neuron under the cursor is ever deleted, so its freed slot can
/// only be recycled by a duplication behind the cursor; every handle still
/// ahead in the snapshot names the live neuron it was taken from.
fn finish_cycle(ring: &mut Ring) {
    let snapshot = ring.ids();
    for id in snapshot {
        let node = ring.node_mut(id);
        node.inhibited = false;
        let wins = node.winner_count;
        node.winner_count = 0;

        match wins {
            0 => {
                node.life -= 1;
                if node.life == 0 {
                    ring.delete(id);
                    if ring.is_empty() {
                        log::debug!("survey: ring collapsed, run is stalled");
                    }
                }
            }
            1 => node.life = INITIAL_LIFE,
            _ => {
                node.life = INITIAL_LIFE;
                ring.duplicate(id);
            }
        }
    }
}
