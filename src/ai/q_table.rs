//! Tabular action values for the adaptive agent.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;

use crate::game::{BoardKey, COLS};

/// Action values per board plus how often each action was updated.
///
/// Rows are created lazily with small random values so that greedy play on an
/// untrained table is not biased towards column 0.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<BoardKey, [f64; COLS]>,
    visits: HashMap<BoardKey, [u32; COLS]>,
    init_range: f64,
}

impl QTable {
    pub fn new(init_range: f64) -> Self {
        QTable {
            values: HashMap::new(),
            visits: HashMap::new(),
            init_range,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &BoardKey) -> Option<&[f64; COLS]> {
        self.values.get(key)
    }

    pub fn visits(&self, key: &BoardKey) -> Option<&[u32; COLS]> {
        self.visits.get(key)
    }

    /// Row for `key`, created on first access.
    pub fn row(&mut self, key: BoardKey, rng: &mut StdRng) -> &mut [f64; COLS] {
        let range = self.init_range;
        self.visits.entry(key).or_insert([0; COLS]);
        self.values.entry(key).or_insert_with(|| {
            let mut row = [0.0; COLS];
            if range > 0.0 {
                for value in &mut row {
                    *value = rng.random_range(-range..=range);
                }
            }
            row
        })
    }

    /// Best value over `legal` columns of `key`, or 0 when nothing is legal.
    pub fn max_legal(&mut self, key: BoardKey, legal: &[usize], rng: &mut StdRng) -> f64 {
        if legal.is_empty() {
            return 0.0;
        }
        let row = self.row(key, rng);
        legal
            .iter()
            .map(|&col| row[col])
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// `Q[s][a] += alpha * (target - Q[s][a])`, counting the visit.
    pub fn update_towards(
        &mut self,
        key: BoardKey,
        action: usize,
        target: f64,
        alpha: f64,
        rng: &mut StdRng,
    ) {
        let row = self.row(key, rng);
        row[action] += alpha * (target - row[action]);
        if let Some(visits) = self.visits.get_mut(&key) {
            visits[action] = visits[action].saturating_add(1);
        }
    }

    /// Inserts a row verbatim, replacing any existing one.
    pub fn insert(&mut self, key: BoardKey, values: [f64; COLS], visits: [u32; COLS]) {
        self.values.insert(key, values);
        self.visits.insert(key, visits);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BoardKey, &[f64; COLS], [u32; COLS])> + '_ {
        self.values.iter().map(|(key, values)| {
            let visits = self.visits.get(key).copied().unwrap_or([0; COLS]);
            (key, values, visits)
        })
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.visits.clear();
    }
}
