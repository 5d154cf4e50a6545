use std::cmp::Ordering;

use crate::scheme::SchemeFile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Loser {
    First,
    Second,
}

// Decides whether two files are the same color scheme. Maintainer identity
// is the strongest signal but is often absent or written inconsistently
// ("Jane Doe <jane@foo>", "jane@foo", "Jane M. Doe"), so token-wise partial
// matches and raw-line fallbacks pick up the slack. The step order is
// deliberate; every step is symmetric in its arguments.
pub fn same_scheme(a: &SchemeFile, b: &SchemeFile) -> bool {
    if let (Some(ma), Some(mb)) = (a.maintainer(), b.maintainer()) {
        if ma == mb {
            return true;
        }
        let ta: Vec<&str> = ma.split_whitespace().collect();
        let tb: Vec<&str> = mb.split_whitespace().collect();
        // Same name, only the trailing token (usually an email) changed.
        if ta.len() == tb.len() && ta.len() > 3 && ta[..ta.len() - 1] == tb[..tb.len() - 1] {
            return true;
        }
        // Trailing token alone is usually the email address.
        if ta.last() == tb.last() {
            return true;
        }
        // "First Last <email>" vs "First Last email": surnames line up.
        if ta.len() >= 3 && tb.len() >= 3 && ta[1] == tb[1] {
            return true;
        }
    }
    if matching_positions(&a.head, &b.head, 6) >= 5 {
        return true;
    }
    if matching_positions(&a.tail, &b.tail, 10) == 10 {
        return true;
    }
    false
}

// Position-wise line comparison; a position where both files have run out
// of lines counts as a match.
fn matching_positions(a: &[String], b: &[String], count: usize) -> usize {
    (0..count).filter(|&i| a.get(i) == b.get(i)).count()
}

// Picks which of two same-scheme files is stale. The steps form an else-if
// chain gated on which signals both files carry; only the first applicable
// step is evaluated. Version and year comparisons are plain string
// comparisons, not numeric ("10" sorts below "9") -- downstream behavior
// depends on that exact ordering.
pub fn resolve(a: &SchemeFile, b: &SchemeFile) -> Option<Loser> {
    if let (Some(va), Some(vb)) = (a.version(), b.version()) {
        return match va.cmp(&vb) {
            Ordering::Less => Some(Loser::First),
            Ordering::Greater => Some(Loser::Second),
            Ordering::Equal => None,
        };
    }
    if let (Some(ya), Some(yb)) = (a.year(), b.year()) {
        return match ya.cmp(&yb) {
            Ordering::Less => Some(Loser::First),
            Ordering::Greater => Some(Loser::Second),
            Ordering::Equal => None,
        };
    }
    Some(match a.size.cmp(&b.size) {
        Ordering::Less => Loser::First,
        Ordering::Greater => Loser::Second,
        // Equal sizes discard the second argument. Arbitrary, but callers
        // rely on it being deterministic.
        Ordering::Equal => Loser::Second,
    })
}
