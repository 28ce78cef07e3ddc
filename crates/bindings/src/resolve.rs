//! Filling template tokens from live targeting.

use crate::template::{CommandTemplate, TokenSet};
use glam::IVec3;

/// Lazily evaluated targeting for one action.
///
/// Each method is called at most once per resolution, and only when the
/// template needs it.
pub trait TargetingContext {
    /// Name of the actor being looked at.
    fn target_actor(&mut self) -> Option<String>;
    /// The solid block being looked at.
    fn target_block(&mut self) -> Option<IVec3>;
    /// First open cell at or above `cell`.
    fn first_open_above(&mut self, cell: IVec3) -> Option<IVec3>;
}

/// Turn `template` into a concrete command, or `None` if a target is missing.
pub fn resolve_template(
    template: &CommandTemplate,
    tokens: &TokenSet,
    ctx: &mut impl TargetingContext,
) -> Option<String> {
    if template.wants_actor_token() {
        let name = ctx.target_actor()?;
        return Some(substitute(template.text(), &[(tokens.actor.as_str(), name)]));
    }

    if template.wants_location_token() {
        let cell = ctx.target_block()?;
        let mut replacements = vec![
            (tokens.x.as_str(), cell.x.to_string()),
            (tokens.y.as_str(), cell.y.to_string()),
            (tokens.z.as_str(), cell.z.to_string()),
        ];
        if template.wants_air_token() {
            let open = ctx.first_open_above(cell)?;
            replacements.push((tokens.air_y.as_str(), open.y.to_string()));
        }
        return Some(substitute(template.text(), &replacements));
    }

    Some(template.text().to_string())
}

/// Replace every token occurrence in one left-to-right pass.
///
/// Replacement text is never rescanned. Where tokens overlap, the longest
/// one starting at a position wins.
fn substitute<S: AsRef<str>>(text: &str, replacements: &[(&str, S)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        let best = replacements
            .iter()
            .filter(|(token, _)| !token.is_empty() && rest.starts_with(*token))
            .max_by_key(|(token, _)| token.len());
        if let Some((token, value)) = best {
            out.push_str(value.as_ref());
            rest = &rest[token.len()..];
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }
    out
}
