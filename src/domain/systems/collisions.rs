use crate::domain::entity::{Entity, TickContext};
use tracing::trace;

/// Index pairs `(i, j)` with `i < j` whose rectangles overlap.
///
/// Rectangles are read once at scan start, so pushes applied while resolving
/// earlier pairs never add or drop pairs within the same pass. Naive O(n²);
/// the arena never holds more than a handful of entities.
pub fn find_collisions(entities: &[Entity]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in entities.iter().enumerate() {
        if a.removed {
            continue;
        }
        for (j, b) in entities.iter().enumerate().skip(i + 1) {
            if b.removed {
                continue;
            }
            if a.rect.intersects(&b.rect) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Runs the collision pass: both entities of every overlapping pair react.
pub fn resolve_collisions(entities: &mut [Entity], ctx: &mut TickContext<'_>) {
    let pairs = find_collisions(entities);
    for (i, j) in pairs {
        let (a, b) = pair_mut(entities, i, j);
        trace!(a = a.id.0, b = b.id.0, "collision");
        a.on_collision(b, ctx);
        b.on_collision(a, ctx);
    }
}

// Disjoint mutable borrows of two entries, `i < j`.
fn pair_mut(entities: &mut [Entity], i: usize, j: usize) -> (&mut Entity, &mut Entity) {
    let (head, tail) = entities.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}
