use thiserror::Error;

pub type TwixResult<T> = Result<T, TwixError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TwixError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
