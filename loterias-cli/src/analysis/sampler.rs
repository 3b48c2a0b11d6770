use anyhow::{bail, Result};
use rand::SeedableRng;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;

use loterias_db::models::{NumberProbability, Suggestion};

pub fn generate_suggestions(
    probs: &[NumberProbability],
    count: usize,
    size: usize,
    seed: Option<u64>,
) -> Result<Vec<Suggestion>> {
    if size > probs.len() {
        bail!("Aposta de {} dezenas maior que o universo de {}", size, probs.len());
    }

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let uniform = 1.0 / probs.len() as f64;
    let mut suggestions = Vec::with_capacity(count);

    for _ in 0..count {
        let (mut numbers, score) = sample_without_replacement(probs, size, uniform, &mut rng)?;
        numbers.sort();
        suggestions.push(Suggestion { numbers, score });
    }

    Ok(suggestions)
}

fn sample_without_replacement(
    probs: &[NumberProbability],
    count: usize,
    uniform_prob: f64,
    rng: &mut StdRng,
) -> Result<(Vec<u8>, f64)> {
    let mut available: Vec<(u8, f64)> = probs.iter().map(|p| (p.number, p.probability)).collect();
    let mut selected = Vec::with_capacity(count);
    let mut score = 1.0f64;

    for _ in 0..count {
        let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = WeightedIndex::new(&weights)?;
        let idx = dist.sample(rng);

        let (number, prob) = available.remove(idx);
        selected.push(number);
        score *= prob / uniform_prob;
    }

    Ok((selected, score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_probs(n: u8) -> Vec<NumberProbability> {
        (1..=n)
            .map(|number| NumberProbability {
                number,
                probability: 1.0 / n as f64,
            })
            .collect()
    }

    #[test]
    fn test_suggestions_shape() {
        let suggestions = generate_suggestions(&uniform_probs(60), 4, 6, Some(7)).unwrap();
        assert_eq!(suggestions.len(), 4);
        for s in &suggestions {
            assert_eq!(s.numbers.len(), 6);
            assert!(s.numbers.windows(2).all(|w| w[0] < w[1]), "{:?}", s.numbers);
            assert!((s.score - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = generate_suggestions(&uniform_probs(25), 2, 15, Some(42)).unwrap();
        let b = generate_suggestions(&uniform_probs(25), 2, 15, Some(42)).unwrap();
        assert_eq!(a[0].numbers, b[0].numbers);
        assert_eq!(a[1].numbers, b[1].numbers);
    }

    #[test]
    fn test_zero_weight_never_picked() {
        let mut probs = uniform_probs(10);
        probs[0].probability = 0.0;
        let suggestions = generate_suggestions(&probs, 20, 9, Some(1)).unwrap();
        for s in &suggestions {
            assert!(!s.numbers.contains(&1));
        }
    }

    #[test]
    fn test_size_larger_than_pool() {
        assert!(generate_suggestions(&uniform_probs(5), 1, 6, Some(1)).is_err());
    }
}
