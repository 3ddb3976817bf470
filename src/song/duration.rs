//! Duration expressions
//!
//! A duration is one or more terms tied with `+`. A term is either a raw tick
//! count (`90`) or a note symbol with an optional modifier (`q`, `qd`, `et`).

/// Ticks in a whole note
pub const TICKS_PER_WHOLE: u32 = 480;

/// Length used when a duration is missing or evaluates to nothing
pub const DEFAULT_DURATION: u32 = 120;

/// Base tick value of a duration symbol
pub fn symbol_ticks(symbol: char) -> Option<u32> {
    match symbol.to_ascii_lowercase() {
        'w' => Some(TICKS_PER_WHOLE),
        'h' => Some(240),
        'q' => Some(120),
        'e' => Some(60),
        's' => Some(30),
        't' => Some(15),
        'z' => Some(7),
        _ => None,
    }
}

/// Evaluate a duration expression to ticks.
///
/// Never fails: unknown terms contribute nothing and a total of zero falls
/// back to [`DEFAULT_DURATION`].
pub fn evaluate(expr: &str) -> u32 {
    let total = expr
        .split('+')
        .map(|term| term_ticks(term.trim()))
        .fold(0u32, |acc, ticks| acc.saturating_add(ticks));

    if total == 0 {
        DEFAULT_DURATION
    } else {
        total
    }
}

fn term_ticks(term: &str) -> u32 {
    if term.is_empty() {
        return 0;
    }

    if term.bytes().all(|b| b.is_ascii_digit()) {
        return term.parse().unwrap_or(0);
    }

    let mut chars = term.chars();
    let Some(base) = chars.next().and_then(symbol_ticks) else {
        return 0;
    };

    match (chars.next().map(|c| c.to_ascii_lowercase()), chars.next()) {
        (None, _) => base,
        // Dotted
        (Some('d' | '.'), None) => base + base / 2,
        // Triplet
        (Some('t'), None) => base * 2 / 3,
        _ => 0,
    }
}
