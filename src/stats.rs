/// Score, level and lives for the current game. `high_score` survives
/// `reset` for as long as the process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    pub ships_left: u32,
    pub score: u32,
    pub level: u32,
    pub high_score: u32,
}

impl GameStats {
    pub fn new(ship_limit: u32) -> Self {
        Self {
            ships_left: ship_limit,
            score: 0,
            level: 1,
            high_score: 0,
        }
    }

    pub fn reset(&mut self, ship_limit: u32) {
        self.ships_left = ship_limit;
        self.score = 0;
        self.level = 1;
    }

    /// Award `points` for each of `kills` aliens
    pub fn record_kills(&mut self, kills: usize, points: u32) {
        self.score = self.score.saturating_add(points.saturating_mul(kills as u32));
    }

    /// Returns true when the high score moved
    pub fn check_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}
