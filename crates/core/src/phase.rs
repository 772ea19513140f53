/// Whose turn it is. Exactly one phase is active in an initialized game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The player acts
    PlayerTurn,
    /// The house acts; the player's turn is over
    HouseTurn,
}
