use serde::{Deserialize, Serialize};

use crate::allocation::{calculate_allocation, AllocationResult};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub multiplier: f64,
    pub prize_amount: f64,
    pub scenario: AllocationResult,
}

/// Recalcula o bolão para prêmios iguais a `total_value * multiplicador`.
///
/// Usa apenas contribuição e cotas originais. Um multiplicador `<= 0`
/// ou não finito interrompe a simulação com o mesmo erro de um prêmio inválido.
pub fn simulate_scenarios(result: &AllocationResult, multipliers: &[f64]) -> Result<Vec<Scenario>> {
    let participants = result.inputs();
    multipliers
        .iter()
        .map(|&multiplier| {
            let prize_amount = result.total_value * multiplier;
            let scenario = calculate_allocation(result.total_value, &participants, prize_amount)?;
            Ok(Scenario {
                multiplier,
                prize_amount,
                scenario,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::Participant;
    use crate::error::BolaoError;

    fn base() -> AllocationResult {
        let participants = vec![
            Participant::new("Ana", 15.0, 3.0),
            Participant::new("Bruno", 5.0, 1.0),
        ];
        calculate_allocation(20.0, &participants, 1_000.0).unwrap()
    }

    #[test]
    fn test_scenarios_follow_multipliers() {
        let scenarios = simulate_scenarios(&base(), &[2.0, 50.0]).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert!((scenarios[0].prize_amount - 40.0).abs() < 1e-9);
        assert!((scenarios[1].scenario.prize_amount - 1_000.0).abs() < 1e-9);
        assert!((scenarios[1].scenario.participants[0].prize_share - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_multipliers() {
        assert!(simulate_scenarios(&base(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_non_positive_multiplier_fails() {
        let err = simulate_scenarios(&base(), &[10.0, 0.0]).unwrap_err();
        assert_eq!(err, BolaoError::invalid_input("prize must be positive"));
        assert!(simulate_scenarios(&base(), &[-3.0]).is_err());
    }

    #[test]
    fn test_infinite_multiplier_fails() {
        let err = simulate_scenarios(&base(), &[f64::INFINITY]).unwrap_err();
        assert_eq!(err, BolaoError::invalid_input("prize must be finite"));
        assert!(simulate_scenarios(&base(), &[f64::NAN]).is_err());
    }
}
