use crate::card::{Hand, DECK_SIZE};
use crate::player::Player;

/// Width of the network input: card presence slots plus the raw score
pub const STATE_SIZE: usize = DECK_SIZE + 1;

/// One slot per card index, 1.0 where the card is held
pub fn encode_hand(hand: &Hand) -> [f32; DECK_SIZE] {
    let mut slots = [0f32; DECK_SIZE];
    for card in hand.iter() {
        slots[card.index()] = 1.0;
    }
    slots
}

/// Feature vector the value network sees for `player`
pub fn observation(player: &Player) -> Vec<f32> {
    let mut features = Vec::with_capacity(STATE_SIZE);
    features.extend_from_slice(&encode_hand(player.hand()));
    features.push(player.score() as f32);
    features
}
