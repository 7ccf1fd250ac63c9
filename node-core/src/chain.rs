use crate::store::BlockStore;
use shared::Hash256;

/// Picks the best tip known to `store`, starting from `incumbent`.
///
/// Strictly-greater height wins; a tie keeps the incumbent. Without the
/// tie-breaking rule, two nodes that both just learned of an
/// equal-height competing fork could flip-flop between them forever as
/// each re-announces its own "new" tip.
#[must_use]
pub fn select_tip(store: &BlockStore, incumbent: Hash256, incumbent_height: u64) -> (Hash256, u64) {
    let mut best_id = incumbent;
    let mut best_height = incumbent_height;
    for (id, height) in store.heights() {
        if height > best_height {
            best_height = height;
            best_id = *id;
        }
    }
    (best_id, best_height)
}
