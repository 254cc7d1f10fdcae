//! Context-overlap scoring used to pick one gloss among several candidates.

use std::collections::BTreeSet;

use gloss_protocol::Gloss;

/// Number of non-empty subsets of `gloss_contexts` that are also subsets of
/// `pool`, i.e. `2^|G ∩ P| - 1`. Saturates at `u64::MAX`.
pub fn overlap_score(gloss_contexts: &[String], pool: &BTreeSet<String>) -> u64 {
    let shared = gloss_contexts
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|context| pool.contains(*context))
        .count();

    u32::try_from(shared)
        .ok()
        .and_then(|n| 1u64.checked_shl(n))
        .map_or(u64::MAX, |subsets| subsets - 1)
}

/// Target-language glosses sharing the highest score against `pool`, in
/// dictionary order.
pub fn highest_scoring<'g>(glosses: &'g [Gloss], pool: &BTreeSet<String>, language: &str) -> Vec<&'g Gloss> {
    let mut best = Vec::new();
    let mut max = 0;

    for gloss in glosses.iter().filter(|g| g.language == language) {
        let score = overlap_score(&gloss.contexts, pool);
        if score > max {
            max = score;
            best.clear();
            best.push(gloss);
        } else if score == max {
            best.push(gloss);
        }
    }

    best
}

/// Highest priority wins among the candidates that carry one; otherwise the
/// first candidate.
pub fn break_tie<'g>(candidates: &[&'g Gloss]) -> Option<&'g Gloss> {
    let mut chosen: Option<(&'g Gloss, f32)> = None;
    for &gloss in candidates {
        let Some(priority) = gloss.priority else {
            continue;
        };
        if chosen.map_or(true, |(_, best)| priority > best) {
            chosen = Some((gloss, priority));
        }
    }

    chosen.map(|(gloss, _)| gloss).or_else(|| candidates.first().copied())
}
