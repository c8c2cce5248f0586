use crate::cards::Card;
use crate::deck::Deck;
use crate::hand::PokerHand;
use crate::rng::RandomSource;
use crate::rules::{requirement_for_round, Rules};

/// The authoritative session record: progression counters, economy, the current hand
/// and selection, and the deck that feeds them.
///
/// Fields are only mutated through the engine; the UI reads them through the getters.
#[derive(Debug, Clone)]
pub struct GameState {
    rules: Rules,
    /// Money gained over all won rounds
    score: u64,
    current_round: u32,
    /// 1-based blind within the round
    current_blind: u8,
    hands_played: u32,
    discards_remaining: u32,
    multiplier: f64,
    money: u64,
    target_money: u64,
    required_hand: PokerHand,
    deck: Deck,
    player_hand: Vec<Card>,
    selected_cards: Vec<Card>,
}

impl GameState {
    pub fn new(rules: Rules, rng: &mut dyn RandomSource) -> Self {
        let req = requirement_for_round(1, rules.overflow_growth);
        let mut gs = Self {
            score: 0,
            current_round: 1,
            current_blind: 1,
            hands_played: 0,
            discards_remaining: rules.discards_per_round,
            multiplier: 1.0,
            money: rules.starting_money,
            target_money: req.target_money,
            required_hand: req.required_hand,
            deck: Deck::new(),
            player_hand: Vec::with_capacity(rules.hand_size),
            selected_cards: Vec::with_capacity(rules.max_selection),
            rules,
        };
        gs.deck.reset(rng);
        gs
    }

    /// Back to round 1 with starting money and a fresh deck.
    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        *self = Self::new(self.rules.clone(), rng);
    }

    /// Fresh deck and counters for `current_round`; money and score carry over.
    pub fn start_new_round(&mut self, rng: &mut dyn RandomSource) {
        self.deck.reset(rng);
        self.current_blind = 1;
        self.hands_played = 0;
        self.multiplier = 1.0;
        self.discards_remaining = self.rules.discards_per_round;
        self.player_hand.clear();
        self.selected_cards.clear();
        self.update_requirement();
    }

    /// Advances the blind. Leftover hand cards go to the discard pile; money and
    /// multiplier are untouched.
    pub fn next_blind(&mut self) {
        self.current_blind = self.current_blind.saturating_add(1);
        self.hands_played = 0;
        self.clear_hand();
    }

    pub fn next_round(&mut self) {
        self.current_round += 1;
        self.update_requirement();
    }

    fn update_requirement(&mut self) {
        let req = requirement_for_round(self.current_round, self.rules.overflow_growth);
        self.required_hand = req.required_hand;
        self.target_money = req.target_money;
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }
    pub fn score(&self) -> u64 {
        self.score
    }
    pub fn current_round(&self) -> u32 {
        self.current_round
    }
    pub fn current_blind(&self) -> u8 {
        self.current_blind
    }
    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }
    pub fn hands_remaining(&self) -> u32 {
        self.rules.max_hands_per_blind.saturating_sub(self.hands_played)
    }
    pub fn discards_remaining(&self) -> u32 {
        self.discards_remaining
    }
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
    pub fn money(&self) -> u64 {
        self.money
    }
    pub fn target_money(&self) -> u64 {
        self.target_money
    }
    pub fn required_hand(&self) -> PokerHand {
        self.required_hand
    }
    pub fn deck(&self) -> &Deck {
        &self.deck
    }
    pub fn player_hand(&self) -> &[Card] {
        &self.player_hand
    }
    pub fn selected_cards(&self) -> &[Card] {
        &self.selected_cards
    }
    pub fn is_last_blind(&self) -> bool {
        self.current_blind >= self.rules.blinds_per_round
    }

    /// `money x multiplier`, truncated.
    pub fn projected_money(&self) -> u64 {
        (self.money as f64 * self.multiplier) as u64
    }

    pub(crate) fn add_multiplier(&mut self, amount: f64) {
        self.multiplier = (self.multiplier + amount).max(0.0);
    }

    pub(crate) fn scale_multiplier(&mut self, factor: f64) {
        self.multiplier = (self.multiplier * factor).max(0.0);
    }

    pub(crate) fn set_multiplier(&mut self, value: f64) {
        self.multiplier = value.max(0.0);
    }

    /// Sets money and credits any gain to the score.
    pub(crate) fn settle_money(&mut self, money: u64) {
        self.score = self.score.saturating_add(money.saturating_sub(self.money));
        self.money = money;
    }

    pub(crate) fn force_last_blind(&mut self) {
        self.current_blind = self.rules.blinds_per_round;
    }

    pub(crate) fn record_hand_played(&mut self) {
        self.hands_played += 1;
    }

    pub(crate) fn use_discard(&mut self) {
        self.discards_remaining = self.discards_remaining.saturating_sub(1);
    }

    /// Draws until the hand holds `hand_size` cards. Returns false if the deck ran dry.
    pub(crate) fn fill_hand(&mut self) -> bool {
        let needed = self.rules.hand_size.saturating_sub(self.player_hand.len());
        let drawn = self.deck.draw(needed);
        let complete = drawn.len() == needed;
        self.player_hand.extend(drawn);
        complete
    }

    /// Toggles the card at `index`. Out-of-range indices and selections past the
    /// limit are ignored. Returns whether the card is selected afterwards.
    pub(crate) fn toggle_selection(&mut self, index: usize) -> bool {
        let Some(card) = self.player_hand.get(index).copied() else {
            return false;
        };
        if let Some(pos) = self.selected_cards.iter().position(|c| *c == card) {
            self.selected_cards.remove(pos);
            false
        } else if self.selected_cards.len() < self.rules.max_selection {
            self.selected_cards.push(card);
            true
        } else {
            false
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected_cards.clear();
    }

    /// Moves the selection out of the hand into the discard pile.
    pub(crate) fn spend_selection(&mut self) -> Vec<Card> {
        let spent = std::mem::take(&mut self.selected_cards);
        self.player_hand.retain(|c| !spent.contains(c));
        self.deck.discard(spent.iter().copied());
        spent
    }

    fn clear_hand(&mut self) {
        self.selected_cards.clear();
        let hand = std::mem::take(&mut self.player_hand);
        self.deck.discard(hand);
    }
}
