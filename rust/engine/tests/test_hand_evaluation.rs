use chamber_engine::cards::Card;
use chamber_engine::hand::{best_five, classify, combinations, evaluate_best_hand, HandTable, PokerHand};

fn cards(s: &str) -> Vec<Card> {
    s.split_whitespace()
        .map(|c| c.parse().expect("valid card"))
        .collect()
}

#[test]
fn classifies_every_category_from_literal_hands() {
    let cases = [
        ("AH KH QH JH TH", PokerHand::RoyalFlush),
        ("9S 8S 7S 6S 5S", PokerHand::StraightFlush),
        ("7C 7D 7H 7S 2C", PokerHand::FourOfAKind),
        ("QC QD QH 4S 4C", PokerHand::FullHouse),
        ("2D 9D JD 4D KD", PokerHand::Flush),
        ("9C TD JH QS KC", PokerHand::Straight),
        ("5C 5D 5H 9S KC", PokerHand::ThreeOfAKind),
        ("5C 5D 9H 9S KC", PokerHand::TwoPair),
        ("AC AD 3H 8S KC", PokerHand::Pair),
        ("2C 7D 9H JS KC", PokerHand::HighCard),
    ];
    for (hand, expected) in cases {
        assert_eq!(classify(&cards(hand)), expected, "hand {}", hand);
    }
}

#[test]
fn wheel_counts_as_straight() {
    assert_eq!(classify(&cards("AS 2D 3C 4H 5S")), PokerHand::Straight);
    assert_eq!(classify(&cards("AH 2H 3H 4H 5H")), PokerHand::StraightFlush);
}

#[test]
fn wraparound_is_not_a_straight() {
    assert_eq!(classify(&cards("QS KD AC 2H 3S")), PokerHand::HighCard);
}

#[test]
fn short_selections_only_count_multiples() {
    assert_eq!(classify(&cards("AH AD")), PokerHand::Pair);
    assert_eq!(classify(&cards("AH AD AC")), PokerHand::ThreeOfAKind);
    assert_eq!(classify(&cards("AH AD AC AS")), PokerHand::FourOfAKind);
    assert_eq!(classify(&cards("2H 3H 4H 5H")), PokerHand::HighCard);
    assert_eq!(classify(&[]), PokerHand::HighCard);
}

#[test]
fn classifies_reference_fixtures() {
    let cases = [
        ("A♥ K♥ Q♥ J♥ 10♥", PokerHand::RoyalFlush),
        ("9♠ 8♠ 7♠ 6♠ 5♠", PokerHand::StraightFlush),
        ("A♦ A♣ A♥ A♠ K♦", PokerHand::FourOfAKind),
        ("K♣ K♦ K♥ 9♣ 9♦", PokerHand::FullHouse),
        ("A♥ J♥ 8♥ 6♥ 2♥", PokerHand::Flush),
        ("10♣ 9♦ 8♥ 7♠ 6♣", PokerHand::Straight),
        ("A♥ 5♠ 4♦ 3♣ 2♥", PokerHand::Straight),
        ("Q♦ Q♣ Q♥ 7♠ 2♦", PokerHand::ThreeOfAKind),
        ("J♠ J♦ 10♥ 10♣ A♠", PokerHand::TwoPair),
        ("A♠ A♥ K♦ Q♣ J♠", PokerHand::Pair),
        ("A♣ J♦ 9♥ 5♠ 2♣", PokerHand::HighCard),
    ];
    for (hand, expected) in cases {
        assert_eq!(classify(&cards(hand)), expected, "hand {}", hand);
    }
}

#[test]
fn best_of_eight_finds_the_hidden_flush() {
    let table = HandTable::default();
    let hand = cards("2H 7H 9H JH KH 2C 7D 3S");
    assert_eq!(evaluate_best_hand(&hand, &table), PokerHand::Flush);
    let (best, chosen) = best_five(&hand, &table);
    assert_eq!(best, PokerHand::Flush);
    assert_eq!(chosen.len(), 5);
    assert!(chosen.iter().all(|c| c.suit == hand[0].suit));
}

#[test]
fn best_of_five_is_direct_classification() {
    let table = HandTable::default();
    for hand in [
        "AH KH QH JH TH",
        "AS 2D 3C 4H 5S",
        "QC QD QH 4S 4C",
        "2C 7D 9H JS KC",
        "5C 5D 9H 9S KC",
    ] {
        let hand = cards(hand);
        assert_eq!(evaluate_best_hand(&hand, &table), classify(&hand));
    }
}

#[test]
fn best_of_n_never_worse_than_any_five_card_subset() {
    let table = HandTable::default();
    for hand in [
        "QC QD QH 4S 4C 9D 2S 8H",
        "2H 7H 9H JH KH 2C 7D 3S",
        "AS 2D 3C 4H 5S 5D 9C",
        "2C 7D 9H JS KC 4D",
    ] {
        let hand = cards(hand);
        let best = evaluate_best_hand(&hand, &table);
        for subset in combinations(&hand, 5) {
            let other = classify(&subset);
            assert!(
                table.multiplier(best) >= table.multiplier(other),
                "{:?} beats {:?} in {:?}",
                other,
                best,
                hand
            );
        }
    }
    assert_eq!(
        evaluate_best_hand(&cards("QC QD QH 4S 4C 9D 2S 8H"), &table),
        PokerHand::FullHouse
    );
}
