use std::collections::{BTreeMap, BTreeSet};

use crate::model::Signature;

/// Identity of a signature within one surface: its position in the input list.
///
/// Overloads share a plain name, so names are never used as keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignatureId(pub usize);

/// Name disambiguation state for one generation run.
///
/// The first signature with a given name keeps it; later ones get `name1`,
/// `name2`, ... in declaration order. A suffixed candidate is skipped when it
/// was already handed out or is declared as a plain name elsewhere in the
/// surface, so every assigned name is unique and first occurrences stay bare.
/// Create a fresh context per surface; reusing one lets counters leak from one
/// surface into the next.
#[derive(Debug, Default)]
pub struct NameContext {
    next_suffix: BTreeMap<String, usize>,
    /// Plain names declared in the surface; suffixes never land on these.
    reserved: BTreeSet<String>,
    taken: BTreeSet<String>,
    assigned: BTreeMap<SignatureId, String>,
}

impl NameContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the generated name for `id`, assigning one on first visit.
    pub fn assign(&mut self, id: SignatureId, plain: &str) -> &str {
        if !self.assigned.contains_key(&id) {
            let name = self.fresh(plain);
            self.assigned.insert(id, name);
        }
        &self.assigned[&id]
    }

    pub fn get(&self, id: SignatureId) -> Option<&str> {
        self.assigned.get(&id).map(String::as_str)
    }

    /// Assigns every signature in order and returns the names by position.
    pub fn assign_all(&mut self, signatures: &[Signature]) -> Vec<String> {
        self.reserved.extend(signatures.iter().map(|sig| sig.name.clone()));
        signatures
            .iter()
            .enumerate()
            .map(|(idx, sig)| self.assign(SignatureId(idx), &sig.name).to_string())
            .collect()
    }

    fn fresh(&mut self, plain: &str) -> String {
        let next = self.next_suffix.entry(plain.to_string()).or_insert(0);
        loop {
            let candidate = match *next {
                0 => plain.to_string(),
                n => format!("{plain}{n}"),
            };
            let suffixed = *next > 0;
            *next += 1;
            if suffixed && self.reserved.contains(&candidate) {
                continue;
            }
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{NameContext, SignatureId};
    use crate::model::Signature;

    fn sigs(names: &[&str]) -> Vec<Signature> {
        names
            .iter()
            .map(|n| Signature::new(*n, Vec::new(), None))
            .collect()
    }

    #[test]
    fn overloads_get_numeric_suffixes_in_order() {
        let mut names = NameContext::new();
        let got = names.assign_all(&sigs(&["A", "B", "A", "A", "B"]));
        assert_eq!(got, vec!["A", "B", "A1", "A2", "B1"]);
    }

    #[test]
    fn assignment_is_cached_per_signature() {
        let mut names = NameContext::new();
        let first = names.assign(SignatureId(0), "A").to_string();
        let second = names.assign(SignatureId(1), "A").to_string();
        assert_eq!(names.assign(SignatureId(0), "A"), first);
        assert_eq!(names.assign(SignatureId(1), "A"), second);
        assert_eq!(names.get(SignatureId(1)), Some("A1"));
        assert_eq!(names.get(SignatureId(2)), None);
    }

    #[test]
    fn declared_suffix_lookalikes_never_collide() {
        let mut names = NameContext::new();
        let got = names.assign_all(&sigs(&["A1", "A", "A", "A1"]));
        assert_eq!(got, vec!["A1", "A", "A2", "A11"]);
        let unique: BTreeSet<&String> = got.iter().collect();
        assert_eq!(unique.len(), got.len());
    }

    #[test]
    fn later_declared_plain_names_keep_their_bare_name() {
        let mut names = NameContext::new();
        let got = names.assign_all(&sigs(&["A", "A", "A1"]));
        assert_eq!(got, vec!["A", "A2", "A1"]);

        let mut names = NameContext::new();
        let got = names.assign_all(&sigs(&["B", "B", "B", "B1", "B2"]));
        assert_eq!(got, vec!["B", "B3", "B4", "B1", "B2"]);
    }

    #[test]
    fn fresh_contexts_do_not_share_counters() {
        let mut first = NameContext::new();
        first.assign_all(&sigs(&["A", "A"]));
        let mut second = NameContext::new();
        assert_eq!(second.assign_all(&sigs(&["A"])), vec!["A"]);
    }
}
