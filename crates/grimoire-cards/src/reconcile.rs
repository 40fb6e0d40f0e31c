//! Single-pass reconciliation of one set's raw card records.
//!
//! Processing order is significant: split/flip detection keys off ids
//! already seen, double-face linking keys off collector numbers already
//! seen, and both accumulate while scanning. The pass is pure and
//! deterministic; failures are structural (bad data), never transient.

use crate::{CardRecord, Classification, MalformedRecord, RecordError};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Result of reconciling one set.
///
/// Every input record lands in exactly one of the two halves. `cards` is
/// keyed by card id; `BTreeMap` keeps it in the sorted-by-id order the
/// output document wants.
#[derive(Debug, Default)]
pub struct ReconciledSet {
    pub cards: BTreeMap<String, CardRecord>,
    pub malformed: Vec<MalformedRecord>,
}

/// Strip a single trailing `a`/`b` face suffix from a collector number.
///
/// Idempotent: a number without the suffix comes back unchanged.
pub fn cleaned_number(number: &str) -> &str {
    number.strip_suffix(['a', 'b']).unwrap_or(number)
}

/// Reconcile one set's records, in the exact order supplied.
///
/// A malformed record (wrong shape, or a split/flip second occurrence with
/// no `de` localization to recover the combined name from) goes to the
/// malformed list and the pass continues; a single bad record never aborts
/// the set.
pub fn reconcile_set(records: Vec<serde_json::Value>) -> ReconciledSet {
    let mut out = ReconciledSet::default();

    // Running state, scoped to this pass: ids already classified, and the
    // id currently holding each cleaned collector number.
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_numbers: HashMap<String, String> = HashMap::new();

    for raw in records {
        let mut card: CardRecord = match serde_json::from_value(raw.clone()) {
            Ok(card) => card,
            Err(e) => {
                out.malformed
                    .push(MalformedRecord::from_raw(&raw, &RecordError::Shape(e)));
                continue;
            }
        };

        // Basic lands pass through untouched and never feed the running
        // state: their ids are not unique upstream.
        if card.is_basic_land() {
            out.cards.insert(card.id.clone(), card);
            continue;
        }

        // Older sets predate collector numbers. Without one there is
        // nothing to classify against; the record stays `normal` and is
        // still registered and written.
        let Some(number) = card.number.clone() else {
            seen_ids.insert(card.id.clone());
            out.cards.insert(card.id.clone(), card);
            continue;
        };
        let cleaned = cleaned_number(&number).to_string();

        if seen_ids.contains(&card.id) {
            // Second report of this id: the two halves of a split/flip
            // card. The combined name only exists in structured form in
            // the German localization.
            match card.alternate_names.get("de") {
                Some(localized) => {
                    card.classification = Classification::SplitOrFlip;
                    card.name = localized.name.clone();
                }
                None => {
                    out.malformed.push(MalformedRecord::from_card(
                        &card,
                        &RecordError::MissingGermanName,
                    ));
                    continue;
                }
            }
        } else if let Some(partner_id) = seen_numbers.get(&cleaned).cloned() {
            // Two distinct ids sharing a cleaned number: the faces of a
            // double-faced card. Link both directions now; the partner is
            // already in the output map.
            if let Some(partner) = out.cards.get_mut(&partner_id) {
                partner.classification = Classification::DoubleFace;
                partner.companion_id = Some(card.id.clone());
                card.classification = Classification::DoubleFace;
                card.companion_id = Some(partner_id);
            }
        }

        // A third record sharing a cleaned number displaces the second
        // here and links only to it, not the first. Upstream behavior for
        // more than two faces is undefined; preserved as-is.
        seen_numbers.insert(cleaned, card.id.clone());
        seen_ids.insert(card.id.clone());
        out.cards.insert(card.id.clone(), card);
    }

    out
}
