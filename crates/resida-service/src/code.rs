//! Invite code generation.
//!
//! Codes are short and human-typeable: two groups of four characters from an
//! alphabet with the ambiguous glyphs (`I`, `O`, `0`, `1`) removed, joined by
//! a dash. Uniqueness is checked case-insensitively against every code the
//! caller already knows about, because the storage backend cannot enforce it.

use std::collections::HashSet;

/// Tracing target for code generation.
const TRACING_TARGET: &str = "resida_service::code";

/// Characters a code may contain.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of each code group.
const GROUP_LEN: usize = 4;

/// How many candidates to draw before giving up on uniqueness.
const MAX_DRAWS: usize = 5;

/// Draws one random `XXXX-XXXX` candidate code.
pub fn draw_code() -> String {
    let draw_group = |out: &mut String| {
        for _ in 0..GROUP_LEN {
            let idx = rand::random_range(0..ALPHABET.len());
            out.push(ALPHABET[idx] as char);
        }
    };

    let mut code = String::with_capacity(GROUP_LEN * 2 + 1);
    draw_group(&mut code);
    code.push('-');
    draw_group(&mut code);
    code
}

/// Generates a code that collides with none of `existing` (case-insensitive).
///
/// Draws up to five candidates. If every draw collides, the last candidate is
/// returned anyway with a warning: the residual collision risk is accepted
/// rather than failing the whole create, but it is surfaced, never silent.
pub fn generate_unique(existing: &HashSet<String>) -> String {
    generate_with(draw_code, existing)
}

fn generate_with(mut draw: impl FnMut() -> String, existing: &HashSet<String>) -> String {
    let mut candidate = String::new();
    for _ in 0..MAX_DRAWS {
        candidate = draw();
        if !existing.contains(&candidate.to_lowercase()) {
            return candidate;
        }
    }

    tracing::warn!(
        target: TRACING_TARGET,
        draws = MAX_DRAWS,
        "invite code draws exhausted, proceeding with possibly colliding code"
    );
    candidate
}

/// Folds a code into the form used for collision checks.
pub fn fold(code: &str) -> String {
    code.trim().to_lowercase()
}
