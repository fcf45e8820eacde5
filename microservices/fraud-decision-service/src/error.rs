//! Error taxonomy for the fraud decision service (spec §7).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FraudError>;

#[derive(Error, Debug)]
pub enum FraudError {
    /// Malformed event. Never retried internally.
    #[error("validation error: {0}")]
    Validation(String),

    /// KV or DB unreachable. Recovered where possible.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// A soft budget tripped. Recovered by proceeding with partial data.
    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),

    /// Registry entry or model file missing. Recovered to rules-only.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// No active policy. Fatal unless safe-mode is on.
    #[error("policy undefined: {0}")]
    PolicyUndefined(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl FraudError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::DependencyUnavailable(_) => 503,
            Self::BudgetExceeded(_) => 503,
            Self::ModelUnavailable(_) => 503,
            Self::PolicyUndefined(_) => 500,
            Self::Internal(_) => 500,
            Self::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::DependencyUnavailable(_) => "DEPENDENCY_UNAVAILABLE",
            Self::BudgetExceeded(_) => "BUDGET_EXCEEDED",
            Self::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            Self::PolicyUndefined(_) => "POLICY_UNDEFINED",
            Self::Internal(_) => "INTERNAL",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<redis::RedisError> for FraudError {
    fn from(err: redis::RedisError) -> Self {
        FraudError::DependencyUnavailable(err.to_string())
    }
}

impl From<tokio_postgres::Error> for FraudError {
    fn from(err: tokio_postgres::Error) -> Self {
        FraudError::DependencyUnavailable(err.to_string())
    }
}

impl From<brivas_core::BrivasError> for FraudError {
    fn from(err: brivas_core::BrivasError) -> Self {
        FraudError::Internal(err.to_string())
    }
}

impl From<brivas_lumadb::LumaDbError> for FraudError {
    fn from(err: brivas_lumadb::LumaDbError) -> Self {
        FraudError::DependencyUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for FraudError {
    fn from(err: serde_json::Error) -> Self {
        FraudError::Internal(err.to_string())
    }
}

impl From<FraudError> for brivas_core::BrivasError {
    fn from(err: FraudError) -> Self {
        match err {
            FraudError::Validation(m) => brivas_core::BrivasError::Validation(m),
            FraudError::DependencyUnavailable(m) => brivas_core::BrivasError::Unavailable(m),
            FraudError::BudgetExceeded(m) => brivas_core::BrivasError::Timeout(m),
            FraudError::ModelUnavailable(m) => brivas_core::BrivasError::Unavailable(m),
            FraudError::PolicyUndefined(m) => brivas_core::BrivasError::Internal(m),
            FraudError::Internal(m) => brivas_core::BrivasError::Internal(m),
            FraudError::Config(m) => brivas_core::BrivasError::Config(m),
        }
    }
}
