//! Sources of draws for the flaky endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Produces values in `[0, 1)`.
///
/// Shared across concurrent requests, so implementations must be `Sync`.
pub trait DrawSource: Send + Sync {
    fn next_draw(&self) -> f64;
}

/// Uniform draws from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDraws;

impl DrawSource for RandomDraws {
    fn next_draw(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
#[derive(Debug)]
pub struct ScriptedDraws {
    values: Vec<f64>,
    next: AtomicUsize,
}

impl ScriptedDraws {
    /// An empty script always yields `0.0`.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            next: AtomicUsize::new(0),
        }
    }

    /// How many draws have been taken so far.
    pub fn taken(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl DrawSource for ScriptedDraws {
    fn next_draw(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        self.values[index % self.values.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_draws_stay_in_unit_interval() {
        let source = RandomDraws;
        for _ in 0..10_000 {
            let v = source.next_draw();
            assert!((0.0..1.0).contains(&v), "draw {v} out of range");
        }
    }

    #[test]
    fn scripted_draws_replay_and_wrap() {
        let source = ScriptedDraws::new([0.1, 0.9]);
        assert_eq!(source.next_draw(), 0.1);
        assert_eq!(source.next_draw(), 0.9);
        assert_eq!(source.next_draw(), 0.1);
        assert_eq!(source.taken(), 3);
    }

    #[test]
    fn empty_script_yields_zero() {
        assert_eq!(ScriptedDraws::new(Vec::<f64>::new()).next_draw(), 0.0);
    }
}
