use super::ConflictKind;
use crate::model::Interval;

/// Premier conflit entre `candidate` et `existing`, dans l'ordre donné.
///
/// Bornes incluses. Deux intervalles qui se touchent (`a.end == b.start`) ne
/// sont pas en conflit.
pub fn find_conflict<'a, I>(candidate: &Interval, existing: I) -> Option<ConflictKind>
where
    I: IntoIterator<Item = &'a Interval>,
{
    existing
        .into_iter()
        .find_map(|e| classify(candidate, e))
}

/// Classe le chevauchement de `c` sur `e` ; règles évaluées dans l'ordre.
pub fn classify(c: &Interval, e: &Interval) -> Option<ConflictKind> {
    if c.start >= e.start && c.end <= e.end {
        return Some(ConflictKind::ContainedWithin);
    }
    if c.end > e.start && c.end < e.end {
        return Some(ConflictKind::EndOverlaps);
    }
    if c.start < e.end && c.start >= e.start {
        return Some(ConflictKind::StartOverlaps);
    }
    // fin inclusive : [9h, 12h] contre [10h, 12h] doit être détecté
    if c.start < e.start && c.end >= e.end {
        return Some(ConflictKind::Encloses);
    }
    None
}
