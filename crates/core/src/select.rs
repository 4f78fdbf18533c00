use crate::{GameKind, Project, RngState};

/// Pick the module that must carry the ticket's win, or `None` when nothing
/// should win. Rule precedence, first match wins:
///
/// 1. loser tier: no module wins;
/// 2. online tier: the online bonus module (absence is the caller's
///    configuration error);
/// 3. tier linked by text code to a symbol-prize module's winning symbol:
///    that specific module;
/// 4. otherwise: uniform over the generic modules (`None` when there are
///    none, again the caller's configuration error).
pub fn select_winning_module(
    project: &Project,
    win_tier_index: usize,
    rng: &mut RngState,
) -> Option<usize> {
    let tier = &project.prize_tiers[win_tier_index];
    if !tier.is_winner() {
        return None;
    }
    if tier.is_online {
        return project.online_module_index();
    }
    for (idx, module) in project.modules.iter().enumerate() {
        if let GameKind::SymbolPrize {
            winning_symbol_id, ..
        } = &module.kind
        {
            let linked = project
                .symbol(*winning_symbol_id)
                .map(|symbol| symbol.name == tier.text_code)
                .unwrap_or(false);
            if linked {
                return Some(idx);
            }
        }
    }
    let generic = project.generic_module_indices();
    rng.pick(&generic).copied()
}
