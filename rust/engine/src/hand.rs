use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// Poker hand categories, weakest first. The discriminant is the rank index used for
/// both payout lookup and "meets the requirement" comparisons.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PokerHand {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

/// Static row of the category table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandInfo {
    pub hand: PokerHand,
    pub name: &'static str,
    pub multiplier: f64,
}

/// Reference tuning, indexed by [`PokerHand::rank_index`].
pub const HAND_TABLE: [HandInfo; 10] = [
    HandInfo { hand: PokerHand::HighCard, name: "High Card", multiplier: 0.1 },
    HandInfo { hand: PokerHand::Pair, name: "Pair", multiplier: 0.4 },
    HandInfo { hand: PokerHand::TwoPair, name: "Two Pair", multiplier: 0.6 },
    HandInfo { hand: PokerHand::ThreeOfAKind, name: "Three of a Kind", multiplier: 1.0 },
    HandInfo { hand: PokerHand::Straight, name: "Straight", multiplier: 1.5 },
    HandInfo { hand: PokerHand::Flush, name: "Flush", multiplier: 2.0 },
    HandInfo { hand: PokerHand::FullHouse, name: "Full House", multiplier: 5.0 },
    HandInfo { hand: PokerHand::FourOfAKind, name: "Four of a Kind", multiplier: 10.0 },
    HandInfo { hand: PokerHand::StraightFlush, name: "Straight Flush", multiplier: 50.0 },
    HandInfo { hand: PokerHand::RoyalFlush, name: "Royal Flush", multiplier: 100.0 },
];

impl PokerHand {
    pub const ALL: [PokerHand; 10] = [
        PokerHand::HighCard,
        PokerHand::Pair,
        PokerHand::TwoPair,
        PokerHand::ThreeOfAKind,
        PokerHand::Straight,
        PokerHand::Flush,
        PokerHand::FullHouse,
        PokerHand::FourOfAKind,
        PokerHand::StraightFlush,
        PokerHand::RoyalFlush,
    ];

    pub fn rank_index(self) -> usize {
        self as usize
    }

    pub fn info(self) -> &'static HandInfo {
        &HAND_TABLE[self.rank_index()]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Multiplier from the reference tuning.
    pub fn multiplier(self) -> f64 {
        self.info().multiplier
    }

    /// True when this category is at least as strong as `required`.
    pub fn meets(self, required: PokerHand) -> bool {
        self >= required
    }
}

impl fmt::Display for PokerHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payout multipliers per category, re-tunable through configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandTable {
    multipliers: [f64; 10],
}

impl Default for HandTable {
    fn default() -> Self {
        Self {
            multipliers: PokerHand::ALL.map(PokerHand::multiplier),
        }
    }
}

impl HandTable {
    pub fn new(multipliers: [f64; 10]) -> Self {
        Self { multipliers }
    }

    pub fn multiplier(&self, hand: PokerHand) -> f64 {
        self.multipliers[hand.rank_index()]
    }

    pub fn multipliers(&self) -> &[f64; 10] {
        &self.multipliers
    }
}

/// Classifies a played set of cards.
///
/// Flushes and straights only exist for exactly five cards; smaller plays can still
/// score pairs, trips and quads. An empty slice is a high card.
pub fn classify(cards: &[Card]) -> PokerHand {
    if cards.is_empty() {
        return PokerHand::HighCard;
    }
    let mut sorted = cards.to_vec();
    sorted.sort_unstable_by(|a, b| b.rank.cmp(&a.rank));

    let five = sorted.len() == 5;
    let is_flush = five && check_flush(&sorted);
    let is_straight = five && check_straight(&sorted);

    if is_flush && is_straight {
        return if is_royal_sequence(&sorted) {
            PokerHand::RoyalFlush
        } else {
            PokerHand::StraightFlush
        };
    }

    let mut rank_counts: HashMap<Rank, u8> = HashMap::new();
    for c in &sorted {
        *rank_counts.entry(c.rank).or_insert(0) += 1;
    }
    let mut counts: Vec<u8> = rank_counts.into_values().collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    let top = counts[0];
    let second = counts.get(1).copied().unwrap_or(0);

    if top == 4 {
        return PokerHand::FourOfAKind;
    }
    if five && top == 3 && second == 2 {
        return PokerHand::FullHouse;
    }
    if is_flush {
        return PokerHand::Flush;
    }
    if is_straight {
        return PokerHand::Straight;
    }
    if top == 3 {
        return PokerHand::ThreeOfAKind;
    }
    if top == 2 && second == 2 {
        return PokerHand::TwoPair;
    }
    if top == 2 {
        return PokerHand::Pair;
    }
    PokerHand::HighCard
}

/// Best-paying category over every 5-card subset under `table`; five or fewer cards
/// are classified as-is.
pub fn evaluate_best_hand(cards: &[Card], table: &HandTable) -> PokerHand {
    best_five(cards, table).0
}

/// Like [`evaluate_best_hand`], also returning the winning cards.
///
/// Subsets are ranked by their multiplier in `table`; equal payouts prefer the stronger
/// category, then the first subset in combination order.
///
/// ```
/// use chamber_engine::cards::Card;
/// use chamber_engine::hand::{best_five, HandTable, PokerHand};
///
/// let hand: Vec<Card> = "2H 7H 9H JH KH 2C 7D 3S"
///     .split_whitespace()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// assert_eq!(best_five(&hand, &HandTable::default()).0, PokerHand::Flush);
/// ```
pub fn best_five(cards: &[Card], table: &HandTable) -> (PokerHand, Vec<Card>) {
    if cards.len() <= 5 {
        return (classify(cards), cards.to_vec());
    }
    let mut best: Option<(PokerHand, Vec<Card>)> = None;
    for combo in combinations(cards, 5) {
        let hand = classify(&combo);
        let better = match &best {
            None => true,
            Some((current, _)) => {
                let (m, cur) = (table.multiplier(hand), table.multiplier(*current));
                m > cur || (m == cur && hand > *current)
            }
        };
        if better {
            best = Some((hand, combo));
        }
    }
    best.unwrap_or_else(|| (classify(cards), cards.to_vec()))
}

/// All `k`-element subsets of `cards`, in lexicographic index order.
pub fn combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    combine(cards, k, 0, &mut current, &mut out);
    out
}

fn combine(cards: &[Card], k: usize, start: usize, current: &mut Vec<Card>, out: &mut Vec<Vec<Card>>) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    for i in start..cards.len() {
        current.push(cards[i]);
        combine(cards, k, i + 1, current, out);
        current.pop();
    }
}

fn check_flush(sorted: &[Card]) -> bool {
    let first = sorted[0].suit;
    sorted.iter().all(|c| c.suit == first)
}

// Expects the descending sort; the wheel is matched position by position.
fn check_straight(sorted: &[Card]) -> bool {
    if sorted.len() != 5 {
        return false;
    }
    let consecutive = sorted
        .windows(2)
        .all(|w| w[0].rank.strength() as i16 - w[1].rank.strength() as i16 == 1);
    consecutive || ranks_are(sorted, &[Rank::Ace, Rank::Five, Rank::Four, Rank::Three, Rank::Two])
}

fn is_royal_sequence(sorted: &[Card]) -> bool {
    ranks_are(sorted, &[Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten])
}

fn ranks_are(sorted: &[Card], expected: &[Rank]) -> bool {
    sorted.len() == expected.len() && sorted.iter().zip(expected).all(|(c, r)| c.rank == *r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn c(r: Rank, s: Suit) -> Card {
        Card::new(r, s)
    }

    #[test]
    fn table_is_ordered_by_rank_and_payout() {
        for (i, info) in HAND_TABLE.iter().enumerate() {
            assert_eq!(info.hand.rank_index(), i);
        }
        for pair in HAND_TABLE.windows(2) {
            assert!(pair[0].hand < pair[1].hand);
            assert!(pair[0].multiplier < pair[1].multiplier);
        }
    }

    #[test]
    fn combinations_count_matches_binomial() {
        let cards: Vec<Card> = crate::cards::full_deck().into_iter().take(8).collect();
        assert_eq!(combinations(&cards, 5).len(), 56);
        assert_eq!(combinations(&cards[..6], 5).len(), 6);
        assert_eq!(combinations(&cards[..5], 5).len(), 1);
    }

    #[test]
    fn small_plays_never_flush_or_straight() {
        let four_hearts = [
            c(Rank::Ace, Suit::Hearts),
            c(Rank::King, Suit::Hearts),
            c(Rank::Queen, Suit::Hearts),
            c(Rank::Jack, Suit::Hearts),
        ];
        assert_eq!(classify(&four_hearts), PokerHand::HighCard);
        let pair = [c(Rank::Nine, Suit::Hearts), c(Rank::Nine, Suit::Clubs)];
        assert_eq!(classify(&pair), PokerHand::Pair);
        assert_eq!(classify(&[]), PokerHand::HighCard);
    }

    #[test]
    fn hand_table_retunes_independently_of_ordering() {
        let mut m = *HandTable::default().multipliers();
        m[PokerHand::Pair.rank_index()] = 3.0;
        let table = HandTable::new(m);
        assert_eq!(table.multiplier(PokerHand::Pair), 3.0);
        assert_eq!(table.multiplier(PokerHand::Flush), 2.0);
        assert!(PokerHand::Flush > PokerHand::Pair);
    }

    #[test]
    fn default_table_matches_reference_rows() {
        let table = HandTable::default();
        for hand in PokerHand::ALL {
            assert_eq!(table.multiplier(hand), hand.info().multiplier);
        }
    }

    #[test]
    fn best_five_ranks_by_configured_payout() {
        let hand: Vec<Card> = "2H 7H 9H JH KH 2C 7D 3S"
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect();
        let mut m = *HandTable::default().multipliers();
        m[PokerHand::Pair.rank_index()] = 200.0;
        let table = HandTable::new(m);

        let (best, chosen) = best_five(&hand, &table);
        assert_eq!(best, PokerHand::Pair);
        assert_eq!(classify(&chosen), PokerHand::Pair);
        assert_eq!(best_five(&hand, &HandTable::default()).0, PokerHand::Flush);
    }

    #[test]
    fn equal_payouts_prefer_the_stronger_category() {
        let hand: Vec<Card> = "2H 7H 9H JH KH 2C"
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect();
        let table = HandTable::new([1.0; 10]);
        assert_eq!(best_five(&hand, &table).0, PokerHand::Flush);
    }
}
