//! RSA密钥及其数学原语, RFC 8017 §3和§5
use crate::rsa::byte_len;
use crate::CipherError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use utils::BigIntExt;
use xrand::rngs::SmallRng;
use xrand::{Rng, SeedableRng};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyParts")]
pub struct PublicKey {
    // n = p * q
    n: BigInt,
    // public exponent, gcd(e, (p-1)(q-1)) = 1
    e: BigInt,
    #[serde(skip_serializing)]
    bit_len: usize,
}

#[derive(Deserialize)]
struct PublicKeyParts {
    n: BigInt,
    e: BigInt,
}

impl TryFrom<PublicKeyParts> for PublicKey {
    type Error = CipherError;

    fn try_from(value: PublicKeyParts) -> Result<Self, Self::Error> {
        let pk = PublicKey::new(value.n, value.e);
        pk.is_valid()?;
        Ok(pk)
    }
}

/// 私钥的两种形式, 构造之后不再修改.
///
/// 反序列化时检查各部分的结构: CRT形式要求`n = p * q`且`q * q_inv = 1 mod p`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "PrivateKeyParts")]
pub enum PrivateKey {
    /// 模数和私钥指数
    Mod { n: BigInt, d: BigInt },
    /// CRT形式, 用两个素因子加速私钥运算
    Crt {
        p: BigInt,
        q: BigInt,
        // $e \cdot d_p \equiv 1 \mod (p-1)$
        d_p: BigInt,
        // $e \cdot d_q \equiv 1 \mod (q-1)$
        d_q: BigInt,
        // $q \cdot q_inv \equiv 1 \mod p$
        q_inv: BigInt,
        // CRT运算不需要d, 只在密钥生成和`from_primes`时保存
        #[serde(default)]
        d: Option<BigInt>,
        n: BigInt,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum PrivateKeyParts {
    Mod {
        n: BigInt,
        d: BigInt,
    },
    Crt {
        p: BigInt,
        q: BigInt,
        d_p: BigInt,
        d_q: BigInt,
        q_inv: BigInt,
        #[serde(default)]
        d: Option<BigInt>,
        n: BigInt,
    },
}

impl TryFrom<PrivateKeyParts> for PrivateKey {
    type Error = CipherError;

    fn try_from(value: PrivateKeyParts) -> Result<Self, Self::Error> {
        match value {
            PrivateKeyParts::Mod { n, d } => {
                if n <= BigInt::one() || !d.is_positive() || d >= n {
                    return Err(CipherError::BadParameter(
                        "rsa: invalid modulus or private exponent".to_string(),
                    ));
                }
                Ok(Self::Mod { n, d })
            }
            PrivateKeyParts::Crt {
                p,
                q,
                d_p,
                d_q,
                q_inv,
                d,
                n,
            } => {
                if p <= BigInt::one() || q <= BigInt::one() || p == q || &p * &q != n {
                    return Err(CipherError::BadParameter(
                        "rsa: the modulus is not the product of the prime factors".to_string(),
                    ));
                }

                if !d_p.is_positive() || !d_q.is_positive() || !(&q * &q_inv).mod_floor(&p).is_one()
                {
                    return Err(CipherError::BadParameter(
                        "rsa: invalid CRT exponents or coefficient".to_string(),
                    ));
                }

                Ok(Self::Crt {
                    p,
                    q,
                    d_p,
                    d_q,
                    q_inv,
                    d,
                    n,
                })
            }
        }
    }
}

impl PublicKey {
    /// n: RSA modulus
    /// e: public key exponent
    /// note: not to check the `n` and `e` are right RSA parameters
    pub fn new(n: BigInt, e: BigInt) -> Self {
        let bit_len = n.bits() as usize;
        Self { n, e, bit_len }
    }

    /// n
    pub fn modulus(&self) -> &BigInt {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> &BigInt {
        &self.e
    }

    /// 模数的位长度
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// 模数的字节长度$k$
    pub fn key_len(&self) -> usize {
        byte_len(self.bit_len)
    }

    /// `e`是大于等于3的奇数且`e < n`
    pub fn is_valid(&self) -> Result<(), CipherError> {
        if !self.n.is_positive() {
            Err(CipherError::BadParameter(
                "rsa: the modulus must be positive".to_string(),
            ))
        } else if self.e < BigInt::from(3u8) || self.e.is_even() {
            Err(CipherError::BadParameter(format!(
                "rsa: public exponent {:#x} must be an odd integer not less than 3",
                self.e
            )))
        } else if self.e >= self.n {
            Err(CipherError::BadParameter(
                "rsa: public exponent is not less than the modulus".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn in_range(&self, x: &BigInt) -> bool {
        !x.is_negative() && x < &self.n
    }

    /// RSAEP: RSA Encrypt primitive, $c = m^e \mod n$
    pub fn rsaep(&self, m: &BigInt) -> Result<BigInt, CipherError> {
        if !self.in_range(m) {
            return Err(CipherError::BadParameter(
                "rsaep: message representative out of range".to_string(),
            ));
        }

        Ok(BigIntExt(m).mod_pow(&self.e, &self.n)?)
    }

    /// RSAVP1: RSA Verification primitive, $m = s^e \mod n$
    ///
    /// 返回前随机睡眠不超过1毫秒, 随机数来自以当前时间为种子的`SmallRng`.
    pub fn rsavp1(&self, s: &BigInt) -> Result<BigInt, CipherError> {
        if !self.in_range(s) {
            return Err(CipherError::Signature(
                "rsavp1: signature representative out of range".to_string(),
            ));
        }

        let m = BigIntExt(s).mod_pow(&self.e, &self.n)?;
        Self::jitter();
        Ok(m)
    }

    fn jitter() {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let mut rng = SmallRng::seed_from_u64(seed);
        std::thread::sleep(Duration::from_nanos(rng.gen_range(0..1_000_000)));
    }
}

impl PrivateKey {
    pub fn new_mod(n: BigInt, d: BigInt) -> Self {
        Self::Mod { n, d }
    }

    /// `n = p * q`, 私钥指数未知, 可以通过`with_private_exponent`补上
    pub fn new_crt(p: BigInt, q: BigInt, d_p: BigInt, d_q: BigInt, q_inv: BigInt) -> Self {
        let n = &p * &q;
        Self::Crt {
            p,
            q,
            d_p,
            d_q,
            q_inv,
            d: None,
            n,
        }
    }

    pub fn with_private_exponent(self, private_exp: BigInt) -> Self {
        match self {
            Self::Mod { n, .. } => Self::Mod { n, d: private_exp },
            Self::Crt {
                p,
                q,
                d_p,
                d_q,
                q_inv,
                n,
                ..
            } => Self::Crt {
                p,
                q,
                d_p,
                d_q,
                q_inv,
                d: Some(private_exp),
                n,
            },
        }
    }

    /// 由素因子`p, q`和公钥指数`e`计算CRT形式的私钥
    pub fn from_primes(p: BigInt, q: BigInt, e: &BigInt) -> Result<Self, CipherError> {
        if p == q {
            return Err(CipherError::BadParameter(
                "rsa: the two prime factors are equal".to_string(),
            ));
        }

        let (pm1, qm1) = (&p - 1u8, &q - 1u8);
        let e = BigIntExt(e);
        let d = e.mod_inverse(&(&pm1 * &qm1))?;
        let (d_p, d_q, q_inv) = (
            e.mod_inverse(&pm1)?,
            e.mod_inverse(&qm1)?,
            BigIntExt(&q).mod_inverse(&p)?,
        );

        Ok(Self::new_crt(p, q, d_p, d_q, q_inv).with_private_exponent(d))
    }

    /// n
    pub fn modulus(&self) -> &BigInt {
        match self {
            Self::Mod { n, .. } | Self::Crt { n, .. } => n,
        }
    }

    /// d, CRT形式未设置时为`None`
    pub fn private_exponent(&self) -> Option<&BigInt> {
        match self {
            Self::Mod { d, .. } => Some(d),
            Self::Crt { d, .. } => d.as_ref(),
        }
    }

    /// (p, q)
    pub fn primes(&self) -> Option<(&BigInt, &BigInt)> {
        match self {
            Self::Mod { .. } => None,
            Self::Crt { p, q, .. } => Some((p, q)),
        }
    }

    /// (dP, dQ, qInv)
    pub fn crt_exponents(&self) -> Option<(&BigInt, &BigInt, &BigInt)> {
        match self {
            Self::Mod { .. } => None,
            Self::Crt { d_p, d_q, q_inv, .. } => Some((d_p, d_q, q_inv)),
        }
    }

    pub fn is_crt(&self) -> bool {
        matches!(self, Self::Crt { .. })
    }

    pub fn bit_len(&self) -> usize {
        self.modulus().bits() as usize
    }

    pub fn key_len(&self) -> usize {
        byte_len(self.bit_len())
    }

    /// 检查私钥和公钥`pk`是否匹配, CRT形式还会检查各个预计算值
    pub fn is_valid(&self, pk: &PublicKey) -> Result<(), CipherError> {
        pk.is_valid()?;
        if self.modulus() != pk.modulus() {
            return Err(CipherError::BadParameter(
                "rsa: the private key modulus not match to public key".to_string(),
            ));
        }

        let e = pk.exponent();
        let invalid_exp = || CipherError::BadParameter("rsa: invalid private exponent".to_string());
        match self {
            Self::Mod { n, d } => {
                // 2^{e*d} \equiv 2 \mod n
                let two = BigInt::from(2u8);
                let x = BigIntExt(&two).mod_pow(e, n)?;
                if BigIntExt(&x).mod_pow(d, n)? != two {
                    return Err(invalid_exp());
                }
            }
            Self::Crt {
                p,
                q,
                d_p,
                d_q,
                q_inv,
                d,
                n,
            } => {
                if p <= &BigInt::one() || q <= &BigInt::one() || &(p * q) != n {
                    return Err(CipherError::BadParameter(
                        "rsa: invalid prime factors".to_string(),
                    ));
                }

                let (pm1, qm1) = (p - 1u8, q - 1u8);
                if !(e * d_p).mod_floor(&pm1).is_one() || !(e * d_q).mod_floor(&qm1).is_one() {
                    return Err(invalid_exp());
                }

                if !(q * q_inv).mod_floor(p).is_one() {
                    return Err(CipherError::BadParameter(
                        "rsa: invalid CRT coefficient".to_string(),
                    ));
                }

                if let Some(d) = d {
                    let de = e * d;
                    if !de.mod_floor(&pm1).is_one() || !de.mod_floor(&qm1).is_one() {
                        return Err(invalid_exp());
                    }
                }
            }
        }

        Ok(())
    }

    /// RSADP: RSA Decrypt primitive
    pub fn rsadp(&self, c: &BigInt) -> Result<BigInt, CipherError> {
        if !self.in_range(c) {
            return Err(match self {
                Self::Mod { .. } => CipherError::BadParameter(
                    "rsadp: ciphertext representative out of range".to_string(),
                ),
                Self::Crt { .. } => CipherError::Decryption,
            });
        }

        self.private_op(c)
    }

    /// RSASP1: RSA Signature primitive
    pub fn rsasp1(&self, m: &BigInt) -> Result<BigInt, CipherError> {
        if !self.in_range(m) {
            return Err(CipherError::BadParameter(
                "rsasp1: message representative out of range".to_string(),
            ));
        }

        self.private_op(m)
    }

    fn in_range(&self, x: &BigInt) -> bool {
        !x.is_negative() && x < self.modulus()
    }

    // m1 = c^{dp} % p, m2 = c^{dq} % q
    // h = (m1 - m2) * qinv % p
    // m = m2 + q * h
    fn private_op(&self, c: &BigInt) -> Result<BigInt, CipherError> {
        match self {
            Self::Mod { n, d } => Ok(BigIntExt(c).mod_pow(d, n)?),
            Self::Crt {
                p,
                q,
                d_p,
                d_q,
                q_inv,
                ..
            } => {
                let c = BigIntExt(c);
                let (m1, m2) = (c.mod_pow(d_p, p)?, c.mod_pow(d_q, q)?);
                // h \in [0, p), 所以m2 + q * h \le q - 1 + q(p - 1) < n
                let h = ((m1 - &m2) * q_inv).mod_floor(p);
                Ok(m2 + q * h)
            }
        }
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{n={:#x}, e={:#x}}}", self.n, self.e)
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mod { n, .. } => write!(f, "{{mod: n={:#x}}}", n),
            Self::Crt { n, .. } => write!(f, "{{crt: n={:#x}}}", n),
        }
    }
}
