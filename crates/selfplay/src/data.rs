use blackjack_core::ActionKind;

/// Record of a single finished game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    /// Actions in the order they were executed
    pub actions: Vec<ActionKind>,
    pub final_score: u32,
    pub broken: bool,
    pub won: bool,
}

impl GameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: ActionKind) {
        self.actions.push(action);
    }

    /// Number of actions taken
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of cards drawn
    pub fn draws(&self) -> usize {
        self.actions
            .iter()
            .filter(|&&a| a == ActionKind::Draw)
            .count()
    }
}

/// Aggregate over many games played by one agent
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub games: usize,
    pub busts: usize,
    /// Share of broken games, in percent
    pub bust_percent: f32,
    /// Mean final score of the games that did not break; `None` if all broke
    pub mean_score: Option<f32>,
}

impl EvaluationReport {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let games = records.len();
        let busts = records.iter().filter(|r| r.broken).count();
        let kept: Vec<u32> = records
            .iter()
            .filter(|r| !r.broken)
            .map(|r| r.final_score)
            .collect();

        let bust_percent = if games == 0 {
            0.0
        } else {
            busts as f32 * 100.0 / games as f32
        };
        let mean_score = if kept.is_empty() {
            None
        } else {
            Some(kept.iter().sum::<u32>() as f32 / kept.len() as f32)
        };

        Self {
            games,
            busts,
            bust_percent,
            mean_score,
        }
    }
}
