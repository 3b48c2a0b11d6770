pub mod sampler;

use loterias_db::models::{Game, NumberProbability, NumberStats};

/// Frequência e atraso de cada dezena do jogo, em ordem crescente.
///
/// `draws` vai do concurso mais recente ao mais antigo. O atraso (`gap`) é o
/// índice do último concurso em que a dezena saiu, ou `draws.len()` se nunca saiu.
pub fn compute_frequencies(draws: &[Vec<u8>], game: Game) -> Vec<NumberStats> {
    let first = *game.number_range().start();
    let mut stats: Vec<NumberStats> = game
        .number_range()
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: draws.len() as u32,
        })
        .collect();

    for (i, numbers) in draws.iter().enumerate() {
        for &n in numbers {
            let Some(idx) = n.checked_sub(first).map(usize::from) else {
                continue;
            };
            if let Some(stat) = stats.get_mut(idx) {
                if stat.frequency == 0 {
                    stat.gap = i as u32;
                }
                stat.frequency += 1;
            }
        }
    }

    stats
}

/// As `n` dezenas mais frequentes; empate favorece a menor dezena.
pub fn top_numbers(stats: &[NumberStats], n: usize) -> Vec<NumberStats> {
    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));
    sorted.truncate(n);
    sorted
}

/// Probabilidade suavizada (Dirichlet) a partir das frequências.
pub fn frequency_probabilities(stats: &[NumberStats], alpha: f64) -> Vec<NumberProbability> {
    let total: u32 = stats.iter().map(|s| s.frequency).sum();
    let denominator = stats.len() as f64 * alpha + total as f64;

    stats
        .iter()
        .map(|s| {
            let probability = if denominator > 0.0 {
                (alpha + s.frequency as f64) / denominator
            } else {
                1.0 / stats.len() as f64
            };
            NumberProbability {
                number: s.number,
                probability,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draws() -> Vec<Vec<u8>> {
        vec![
            vec![1, 2, 3, 4, 5, 6],
            vec![1, 10, 20, 30, 40, 50],
            vec![1, 2, 11, 21, 31, 60],
        ]
    }

    #[test]
    fn test_frequencies() {
        let stats = compute_frequencies(&sample_draws(), Game::MegaSena);
        assert_eq!(stats.len(), 60);
        assert_eq!(stats[0].number, 1);
        assert_eq!(stats[0].frequency, 3);
        assert_eq!(stats[1].frequency, 2);
        assert_eq!(stats[59].frequency, 1);
        let total: u32 = stats.iter().map(|s| s.frequency).sum();
        assert_eq!(total, 18);
    }

    #[test]
    fn test_gap_is_most_recent_draw() {
        let stats = compute_frequencies(&sample_draws(), Game::MegaSena);
        assert_eq!(stats[0].gap, 0);
        assert_eq!(stats[9].gap, 1);
        assert_eq!(stats[59].gap, 2);
        // nunca sorteada
        assert_eq!(stats[58].gap, 3);
    }

    #[test]
    fn test_lotomania_zero_counted() {
        let draws = vec![vec![0, 99, 50]];
        let stats = compute_frequencies(&draws, Game::Lotomania);
        assert_eq!(stats.len(), 100);
        assert_eq!(stats[0].number, 0);
        assert_eq!(stats[0].frequency, 1);
        assert_eq!(stats[99].frequency, 1);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let draws = vec![vec![0, 26, 25]];
        let stats = compute_frequencies(&draws, Game::Lotofacil);
        let total: u32 = stats.iter().map(|s| s.frequency).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_top_numbers_ties() {
        let stats = compute_frequencies(&sample_draws(), Game::MegaSena);
        let top = top_numbers(&stats, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].number, 1);
        assert_eq!(top[1].number, 2);
        assert_eq!(top[2].number, 3);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let stats = compute_frequencies(&sample_draws(), Game::MegaSena);
        let probs = frequency_probabilities(&stats, 1.0);
        let sum: f64 = probs.iter().map(|p| p.probability).sum();
        assert!((sum - 1.0).abs() < 1e-10, "Sum = {}", sum);
        assert!(probs[0].probability > probs[58].probability);
    }
}
