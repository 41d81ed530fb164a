use glam::Vec3;

use super::profile::AttackDef;

/// Attacks usable against a target at `local` (creature frame), in table order.
pub fn eligible<'a>(
    table: &'a [AttackDef],
    local: Vec3,
    target_human: bool,
    far_only: bool,
) -> impl Iterator<Item = &'a AttackDef> + 'a {
    table.iter().filter(move |a| {
        if a.human_only && !target_human {
            return false;
        }
        if far_only && !a.far_only {
            return false;
        }
        a.in_range(local)
    })
}

/// Weighted pick from `candidates` for a draw in [0, 1).
///
/// Buckets are laid out in candidate order; a draw that slips past every
/// bucket through float error lands on the first candidate.
pub fn pick_weighted<'a>(candidates: &[&'a AttackDef], draw: f32) -> Option<&'a AttackDef> {
    let total: f32 = candidates.iter().map(|a| a.weight).sum();
    if total <= 0.0 {
        return None;
    }
    let r = draw * total;
    let mut start = 0.0;
    for attack in candidates {
        if r >= start && r < start + attack.weight {
            return Some(attack);
        }
        start += attack.weight;
    }
    candidates.first().copied()
}

/// Filter then draw. `None` when nothing is eligible or the weights sum to zero.
pub fn select<'a>(
    table: &'a [AttackDef],
    local: Vec3,
    target_human: bool,
    far_only: bool,
    rng: &mut fastrand::Rng,
) -> Option<&'a AttackDef> {
    let candidates: Vec<&AttackDef> = eligible(table, local, target_human, far_only).collect();
    if candidates.is_empty() {
        return None;
    }
    pick_weighted(&candidates, rng.f32())
}
