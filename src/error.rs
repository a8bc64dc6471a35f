use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AsymError {
    #[error("Invalid hex string `{0}`")]
    InvalidHex(String),

    #[error("Unknown hash function `{0}`")]
    UnknownHash(String),

    #[error("Unknown signature scheme `{0}`, expect `pss` or `pkcs1`")]
    UnknownScheme(String),

    #[error("The key file does not contain the `{0}` part")]
    MissingKeyPart(&'static str),

    #[error("{0}")]
    InvalidConfig(String),
}
