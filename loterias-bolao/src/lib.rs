//! Divisão proporcional de bolões: custo e prêmio repartidos por cotas.

pub mod allocation;
pub mod error;
pub mod format;
pub mod scenario;

pub use allocation::{calculate_allocation, AllocationResult, Participant, ParticipantShare};
pub use error::{BolaoError, Result};
pub use scenario::{simulate_scenarios, Scenario};
