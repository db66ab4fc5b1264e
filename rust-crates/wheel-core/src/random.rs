use rand::{
    Rng,
    rngs::{
        StdRng,
        ThreadRng,
    },
};

/// Source of uniform draws in `[0, 1)` for winner selection and landing jitter.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for ThreadRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Replays a fixed sequence of draws, cycling when it runs out.
///
/// Values are clamped into `[0, 1)` so a sequence can never push a draw
/// outside the range real generators produce.
#[derive(Clone, Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "SequenceRandom needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn sequence_random__cycles_through_values() {
        // given
        let mut rng = SequenceRandom::new(vec![0.1, 0.5]);

        // when
        let draws: Vec<f64> = (0..5).map(|_| rng.next_unit()).collect();

        // then
        assert_eq!(draws, vec![0.1, 0.5, 0.1, 0.5, 0.1]);
        assert_eq!(rng.draws(), 5);
    }

    #[test]
    fn sequence_random__clamps_out_of_range_values() {
        // given
        let mut rng = SequenceRandom::new(vec![-1.0, 1.0]);

        // then
        assert_eq!(rng.next_unit(), 0.0);
        assert!(rng.next_unit() < 1.0);
    }

    #[test]
    fn std_rng__draws_stay_in_unit_range() {
        // given
        let mut rng = StdRng::seed_from_u64(7);

        // then
        for _ in 0..1_000 {
            let value = rng.next_unit();
            assert!((0.0..1.0).contains(&value));
        }
    }
}
