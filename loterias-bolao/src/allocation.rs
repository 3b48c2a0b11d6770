use serde::{Deserialize, Serialize};

use crate::error::{BolaoError, Result};

/// Tolerância, em unidades monetárias, entre a soma das contribuições e o total.
pub const CONTRIBUTION_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub contribution: f64,
    pub shares: f64,
}

impl Participant {
    pub fn new(name: impl Into<String>, contribution: f64, shares: f64) -> Self {
        Self {
            name: name.into(),
            contribution,
            shares,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantShare {
    pub name: String,
    pub contribution: f64,
    pub shares: f64,
    pub shareholding_percent: f64,
    pub prize_share: f64,
}

impl ParticipantShare {
    pub fn participant(&self) -> Participant {
        Participant::new(self.name.clone(), self.contribution, self.shares)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub total_value: f64,
    pub total_shares: f64,
    pub prize_amount: f64,
    pub share_value: f64,
    pub participants: Vec<ParticipantShare>,
}

impl AllocationResult {
    /// Participantes originais, sem os valores calculados.
    pub fn inputs(&self) -> Vec<Participant> {
        self.participants.iter().map(ParticipantShare::participant).collect()
    }
}

/// Reparte custo e prêmio do bolão proporcionalmente às cotas de cada participante.
///
/// A ordem dos participantes é preservada. Nenhum arredondamento é aplicado;
/// ver [`crate::format`] para a apresentação.
pub fn calculate_allocation(
    total_value: f64,
    participants: &[Participant],
    prize_amount: f64,
) -> Result<AllocationResult> {
    // `!(x > 0.0)` também rejeita NaN
    if !(total_value > 0.0) {
        return Err(BolaoError::invalid_input("total value must be positive"));
    }
    if !total_value.is_finite() {
        return Err(BolaoError::invalid_input("total value must be finite"));
    }
    if participants.is_empty() {
        return Err(BolaoError::invalid_input("at least one participant required"));
    }
    if !(prize_amount > 0.0) {
        return Err(BolaoError::invalid_input("prize must be positive"));
    }
    if !prize_amount.is_finite() {
        return Err(BolaoError::invalid_input("prize must be finite"));
    }
    if let Some(p) = participants
        .iter()
        .find(|p| !p.contribution.is_finite() || !p.shares.is_finite())
    {
        return Err(BolaoError::invalid_input(format!(
            "participant '{}' has a non-finite contribution or share count",
            p.name
        )));
    }

    let contributions: f64 = participants.iter().map(|p| p.contribution).sum();
    if !((contributions - total_value).abs() <= CONTRIBUTION_TOLERANCE) {
        return Err(BolaoError::consistency(contributions, total_value));
    }

    let total_shares: f64 = participants.iter().map(|p| p.shares).sum();
    if !(total_shares > 0.0) {
        return Err(BolaoError::invalid_input("total shares must be positive"));
    }
    // soma de cotas finitas pode estourar para inf
    if !total_shares.is_finite() {
        return Err(BolaoError::invalid_input("total shares must be finite"));
    }

    let share_value = total_value / total_shares;
    let shares = participants
        .iter()
        .map(|p| {
            let shareholding_percent = (p.shares / total_shares) * 100.0;
            ParticipantShare {
                name: p.name.clone(),
                contribution: p.contribution,
                shares: p.shares,
                shareholding_percent,
                prize_share: (shareholding_percent / 100.0) * prize_amount,
            }
        })
        .collect();

    log::debug!(
        "bolão: {} participants, {} shares, share value {}",
        participants.len(),
        total_shares,
        share_value
    );

    Ok(AllocationResult {
        total_value,
        total_shares,
        prize_amount,
        share_value,
        participants: shares,
    })
}
