use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NumError {
    /// 模数必须是正整数
    #[error("the modulus must be a positive integer")]
    NonPositiveModulus,

    /// gcd(a, n) != 1
    #[error("the value is not invertible under the given modulus")]
    NotInvertible,

    #[error("prime size must be at least 2-bits, got `{0}`")]
    InvalidPrimeBits(usize),
}
