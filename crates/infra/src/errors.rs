//! Conversions from external infrastructure errors into domain errors.

use medibook_domain::MedibookError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MedibookError);

impl From<InfraError> for MedibookError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MedibookError> for InfraError {
    fn from(value: MedibookError) -> Self {
        InfraError(value)
    }
}

impl From<SqlError> for InfraError {
    fn from(err: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        let mapped = match err {
            RE::SqliteFailure(code, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match code.code {
                    ErrorCode::DatabaseBusy => MedibookError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        MedibookError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => MedibookError::Database(format!(
                        "constraint violation: {message}"
                    )),
                    _ => MedibookError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        code.code, code.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                MedibookError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                MedibookError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                MedibookError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidQuery => MedibookError::Database("invalid SQL query".into()),
            other => MedibookError::Database(other.to_string()),
        };
        InfraError(mapped)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        InfraError(MedibookError::Database(format!("connection pool error: {err}")))
    }
}

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let mapped = if err.is_timeout() {
            MedibookError::Network(format!("request timed out: {err}"))
        } else if err.is_connect() {
            MedibookError::Network(format!("connection failed: {err}"))
        } else {
            MedibookError::Network(err.to_string())
        };
        InfraError(mapped)
    }
}
