use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unknown page: {0}")]
    UnknownPage(String),

    #[error("the link graph has no pages")]
    EmptyGraph,

    #[error("invalid parameter: {name}={value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("no convergence after {iterations} iterations, max delta {delta}")]
    DidNotConverge { iterations: usize, delta: f64 },

    #[error("sampling error: {0}")]
    Sampling(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn check_damping(damping: f64) -> Result<()> {
    if damping > 0.0 && damping < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "damping",
            value: damping,
        })
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}
