use thiserror::Error;

/// Common error type shared by the playground crates
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Conversion engine is already installed")]
    EngineAlreadyInstalled,
}

/// Failures talking to an out-of-process conversion engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to start conversion engine `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("conversion engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}
