//! Erros do cálculo de bolão.

use thiserror::Error;

/// `Result` das operações de divisão.
pub type Result<T> = std::result::Result<T, BolaoError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BolaoError {
    /// Um valor isolado é inválido (não positivo, não finito ou lista vazia).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A soma das contribuições não bate com o valor total informado.
    #[error("Sum of contributions {sum:.2} does not match total value {expected:.2}")]
    Consistency { sum: f64, expected: f64 },
}

impl BolaoError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn consistency(sum: f64, expected: f64) -> Self {
        Self::Consistency { sum, expected }
    }

    /// Diferença entre a soma das contribuições e o total, quando houver.
    pub fn discrepancy(&self) -> Option<f64> {
        match self {
            Self::Consistency { sum, expected } => Some(sum - expected),
            Self::InvalidInput { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_message_two_decimals() {
        let err = BolaoError::consistency(50.0, 100.0);
        assert_eq!(
            err.to_string(),
            "Sum of contributions 50.00 does not match total value 100.00"
        );
        assert_eq!(err.discrepancy(), Some(-50.0));
    }

    #[test]
    fn test_invalid_input_message() {
        let err = BolaoError::invalid_input("prize must be positive");
        assert_eq!(err.to_string(), "Invalid input: prize must be positive");
        assert!(err.discrepancy().is_none());
    }
}
