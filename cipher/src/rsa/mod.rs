//! RSA
//!
//! - 随机选择两个质数$p$和$q$($p\neq q$), 则模数$n=p*q$. 模数的字节长度$k$满足: $2^{((k-1)*8}\le n \lt 2^{k*8}$;
//! - 公钥指数固定为$e=65537$, 要求$e$和$(p-1)(q-1)$互质;
//! - 私钥的指数部分$d$满足: $d*e \equiv 1 \mod (p-1)(q-1)$;
//!
//! 加密: $y = x ^ e \mod n$;
//!
//! 解密: $y = x^d \mod n$;
//!
//! 原理: 欧拉定理$a^{\phi(n)} \equiv 1 \mod n$
//! - $x ^ {k(p-1)(q-1)+1} \equiv x \mod n$
//!
//! 编码方案参考[RFC 8017](https://www.rfc-editor.org/rfc/rfc8017):
//! - `OAEP`: 加密填充;
//! - `PSS`: 概率签名;
//! - `PKCS1`: 确定性签名(PKCS #1 v1.5);
//!

mod key;
pub use key::{PrivateKey, PublicKey};

mod octet;
pub use octet::{i2osp, os2ip};

mod mgf;
pub use mgf::{mgf1, mgf1_xor};

mod oaep;
pub use oaep::{OAEPDecrypt, OAEPEncrypt, OAEP};

mod pss;
pub use pss::PSS;

mod pkcs1;
pub use pkcs1::PKCS1;

mod keygen;
pub use keygen::KeyPair;

mod signature;
pub use signature::{pkcs1_sha256, pss_sha256, RSASignature, SignatureScheme};

/// 模数的字节长度$k = \lceil bits(n) / 8 \rceil$
#[inline]
pub(crate) const fn byte_len(bits: usize) -> usize {
    (bits + 7) >> 3
}
