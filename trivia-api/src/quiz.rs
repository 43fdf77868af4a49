use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::Question;

/// Picks quiz questions the player has not seen yet.
pub struct QuizSelector<R> {
    rng: R,
}

impl QuizSelector<StdRng> {
    /// Entropy-seeded selector. Must stay `Send` to live inside handlers.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for QuizSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// A uniformly random question whose id is not in `previous`, or `None`
    /// once every question in the pool has been asked.
    pub fn pick(&mut self, pool: &[Question], previous: &[i64]) -> Option<Question> {
        let unused: Vec<&Question> = pool
            .iter()
            .filter(|question| !previous.contains(&question.id))
            .collect();
        unused.choose(&mut self.rng).map(|question| (*question).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pool(ids: &[i64]) -> Vec<Question> {
        ids.iter()
            .map(|&id| Question {
                id,
                question: format!("question {id}"),
                answer: format!("answer {id}"),
                category: 1,
                difficulty: 1,
            })
            .collect()
    }

    #[test]
    fn never_repeats_previous_questions() {
        let questions = pool(&[1, 2, 3, 4, 5]);
        let mut selector = QuizSelector::with_rng(StdRng::seed_from_u64(7));
        let mut previous = Vec::new();

        for _ in 0..questions.len() {
            let next = selector.pick(&questions, &previous).unwrap();
            assert!(!previous.contains(&next.id));
            previous.push(next.id);
        }

        let seen: HashSet<_> = previous.iter().copied().collect();
        assert_eq!(seen.len(), 5);
        assert!(selector.pick(&questions, &previous).is_none());
    }

    #[test]
    fn last_unused_question_is_always_chosen() {
        let questions = pool(&[10, 20, 30]);
        let mut selector = QuizSelector::with_rng(StdRng::seed_from_u64(1));
        for _ in 0..20 {
            let next = selector.pick(&questions, &[10, 30]).unwrap();
            assert_eq!(next.id, 20);
        }
    }

    #[test]
    fn empty_pool_is_exhausted() {
        let mut selector = QuizSelector::new();
        assert!(selector.pick(&[], &[]).is_none());
    }

    #[test]
    fn unknown_previous_ids_are_ignored() {
        let questions = pool(&[1]);
        let mut selector = QuizSelector::new();
        let next = selector.pick(&questions, &[99, 100]).unwrap();
        assert_eq!(next.id, 1);
    }
}
