//! Pure hand evaluation over any number of cards.
//!
//! [`eval`] reduces a set of cards to its best five-card hand expressed as
//! a list of [`SubHand`]s. Evaluations compare lexicographically, so the
//! derived `Ord` on `Vec<SubHand>` orders hands from weakest to strongest.

use super::entities::{Card, Rank, SubHand};

const ACE: u8 = 14;
const LOW_ACE: u8 = 1;
const HAND_SIZE: usize = 5;

/// Sorts cards strongest first, the order [`eval`] reports values in.
pub fn prepare_hand(hand: &mut [Card]) {
    hand.sort_unstable_by(|a, b| b.cmp(a));
}

/// Highest card of the best straight among `faces`, aces playing low too.
fn best_straight(faces: &[u8]) -> Option<u8> {
    let has = |face: u8| faces.contains(&face) || (face == LOW_ACE && faces.contains(&ACE));
    (5..=ACE)
        .rev()
        .find(|&high| (high - 4..=high).all(|face| has(face)))
}

fn kickers(faces: &[u8], exclude: &[u8], n: usize) -> Vec<u8> {
    faces
        .iter()
        .copied()
        .filter(|face| !exclude.contains(face))
        .take(n)
        .collect()
}

fn with_kickers(rank: Rank, values: Vec<u8>, kickers: Vec<u8>) -> Vec<SubHand> {
    let mut hand = vec![SubHand { rank, values }];
    if !kickers.is_empty() {
        hand.push(SubHand {
            rank: Rank::HighCard,
            values: kickers,
        });
    }
    hand
}

/// Evaluates the best five-card hand contained in `cards`.
///
/// The first subhand carries the category and its defining values
/// (e.g. `[trips, pair]` for a full house); the optional second one holds
/// the kickers. No cards evaluate to an empty list.
#[must_use]
pub fn eval(cards: &[Card]) -> Vec<SubHand> {
    if cards.is_empty() {
        return Vec::new();
    }

    let mut faces: Vec<u8> = cards.iter().map(Card::face).collect();
    faces.sort_unstable_by(|a, b| b.cmp(a));

    let mut counts = [0u8; ACE as usize + 1];
    for &face in &faces {
        counts[usize::from(face)] += 1;
    }
    let at_least = |n: u8| -> Vec<u8> {
        (2..=ACE)
            .rev()
            .filter(|&face| counts[usize::from(face)] >= n)
            .collect()
    };

    let mut by_suit: [Vec<u8>; 4] = Default::default();
    for card in cards {
        by_suit[card.suit as usize].push(card.face());
    }
    for suited in &mut by_suit {
        suited.sort_unstable_by(|a, b| b.cmp(a));
    }

    let straight_flush = by_suit
        .iter()
        .filter(|suited| suited.len() >= HAND_SIZE)
        .filter_map(|suited| best_straight(suited))
        .max();
    if let Some(high) = straight_flush {
        return vec![SubHand {
            rank: Rank::StraightFlush,
            values: vec![high],
        }];
    }

    if let Some(&quads) = at_least(4).first() {
        return with_kickers(Rank::FourOfAKind, vec![quads], kickers(&faces, &[quads], 1));
    }

    let trips = at_least(3);
    if let Some(&three) = trips.first() {
        let pair = (2..=ACE)
            .rev()
            .find(|&face| face != three && counts[usize::from(face)] >= 2);
        if let Some(two) = pair {
            return vec![SubHand {
                rank: Rank::FullHouse,
                values: vec![three, two],
            }];
        }
    }

    let flush = by_suit
        .iter()
        .filter(|suited| suited.len() >= HAND_SIZE)
        .map(|suited| suited[..HAND_SIZE].to_vec())
        .max();
    if let Some(values) = flush {
        return vec![SubHand {
            rank: Rank::Flush,
            values,
        }];
    }

    if let Some(high) = best_straight(&faces) {
        return vec![SubHand {
            rank: Rank::Straight,
            values: vec![high],
        }];
    }

    if let Some(&three) = trips.first() {
        return with_kickers(Rank::ThreeOfAKind, vec![three], kickers(&faces, &[three], 2));
    }

    let pairs = at_least(2);
    match pairs.as_slice() {
        [high, low, ..] => with_kickers(
            Rank::TwoPair,
            vec![*high, *low],
            kickers(&faces, &[*high, *low], 1),
        ),
        [pair] => with_kickers(Rank::OnePair, vec![*pair], kickers(&faces, &[*pair], 3)),
        [] => vec![SubHand {
            rank: Rank::HighCard,
            values: faces.into_iter().take(HAND_SIZE).collect(),
        }],
    }
}

/// Packs an evaluation into a single comparable number.
///
/// The category occupies the bits above 20 and the (up to five) values
/// follow as 4-bit digits, so `strength(a) < strength(b)` exactly when
/// `a < b` for evaluations over the same number of cards.
#[must_use]
pub fn strength(hand: &[SubHand]) -> u32 {
    let Some(first) = hand.first() else {
        return 0;
    };
    let mut packed = 0u32;
    let mut digits = 0;
    for value in hand.iter().flat_map(|sub| sub.values.iter()).take(HAND_SIZE) {
        packed = packed << 4 | u32::from(*value);
        digits += 1;
    }
    packed <<= 4 * (HAND_SIZE - digits);
    (first.rank as u32 + 1) << 20 | packed
}

/// Indices of the best hands. Several indices mean a tie.
#[must_use]
pub fn argmax(hands: &[Vec<SubHand>]) -> Vec<usize> {
    let Some(best) = hands.iter().max() else {
        return Vec::new();
    };
    hands
        .iter()
        .enumerate()
        .filter(|(_, hand)| *hand == best)
        .map(|(idx, _)| idx)
        .collect()
}
