//! 大整数运算扩展
//!
//! 加减乘除、取模、移位、位运算以及比较直接使用`num-bigint`的运算符; 这里补充RSA需要的
//! 模幂、模逆、符号安全的大端字节编码以及概率素数生成.

mod error;
pub use error::NumError;

mod bigint_ext;
pub use bigint_ext::BigIntExt;

mod biguint_ext;
pub use biguint_ext::{BigUintExt, MILLER_RABIN_ROUNDS};
