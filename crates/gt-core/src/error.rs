use thiserror::Error;

pub type GtResult<T> = Result<T, GtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Value out of range for {what}: {value} not in [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
