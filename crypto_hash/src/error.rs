#[derive(Clone, Debug, thiserror::Error)]
pub enum HashError {
    #[error("unknown hash algorithm `{0}`")]
    UnknownHasher(String),
    #[error("{0} is not valid HasherType value")]
    InvalidHasherValue(u32),
}
