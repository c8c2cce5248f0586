use crate::cards::{full_deck, Card};
use crate::rng::RandomSource;

/// A draw pile plus a discard pile.
///
/// Cards leave through [`draw`](Deck::draw) and come back through
/// [`discard`](Deck::discard); only [`reset`](Deck::reset) moves discarded cards back
/// into play. For a standard deck, draw pile + discard pile + cards held by the caller
/// always add up to 52.
#[derive(Debug, Clone)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Standard 52-card deck in canonical order; call [`shuffle`](Deck::shuffle) before use.
    pub fn new() -> Self {
        Self {
            draw_pile: full_deck(),
            discard_pile: Vec::new(),
        }
    }

    pub fn shuffle(&mut self, rng: &mut dyn RandomSource) {
        rng.shuffle_cards(&mut self.draw_pile);
    }

    /// Takes up to `n` cards off the top. A short result means the pile ran dry.
    pub fn draw(&mut self, n: usize) -> Vec<Card> {
        let n = n.min(self.draw_pile.len());
        self.draw_pile.drain(..n).collect()
    }

    pub fn discard<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.discard_pile.extend(cards);
    }

    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        self.draw_pile = full_deck();
        self.discard_pile.clear();
        self.shuffle(rng);
    }

    pub fn remaining(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discarded(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }

    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }
}
