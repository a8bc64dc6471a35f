//! RSA密钥对生成
use crate::rsa::{PrivateKey, PublicKey};
use crate::{CipherError, Rand};
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use serde::{Deserialize, Serialize};
use utils::{BigIntExt, BigUintExt};

/// 公钥指数固定为65537
pub const PUBLIC_EXPONENT: u32 = 65537;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyPair {
    pk: PublicKey,
    sk: PrivateKey,
}

impl KeyPair {
    /// 生成`bits`位模数的密钥对, `crt`为`true`时私钥为CRT形式.
    ///
    /// `p, q`各为`bits/2`位的概率素数, `p·q`不足`bits`位或`p == q`时重新生成;
    /// `gcd(e, (p-1)(q-1)) != 1`时同样重新生成.
    pub fn generate<R: Rand>(bits: usize, crt: bool, rng: &mut R) -> Result<Self, CipherError> {
        if bits < 32 || bits & 1 != 0 {
            return Err(CipherError::BadParameter(format!(
                "rsa: invalid modulus bits `{bits}`"
            )));
        }

        let e = BigInt::from(PUBLIC_EXPONENT);
        let (p, q, d) = 'next_pair: loop {
            let (p, q) = (
                BigUintExt::<BigUint>::generate_prime(bits >> 1, false, rng)?,
                BigUintExt::<BigUint>::generate_prime(bits >> 1, false, rng)?,
            );

            if p == q || (&p * &q).bits() as usize != bits {
                continue 'next_pair;
            }

            let (p, q) = (BigInt::from(p), BigInt::from(q));
            let phi = (&p - 1u8) * (&q - 1u8);
            if !BigIntExt(&e).gcd(&phi).is_one() {
                log::debug!("rsa: e is not coprime to (p-1)(q-1), regenerate primes");
                continue 'next_pair;
            }

            let d = BigIntExt(&e).mod_inverse(&phi)?;
            break (p, q, d);
        };

        let n = &p * &q;
        let sk = if crt {
            PrivateKey::from_primes(p, q, &e)?
        } else {
            PrivateKey::new_mod(n.clone(), d)
        };
        log::debug!("rsa: generated {bits}-bits key pair, crt: {crt}");

        Ok(Self {
            pk: PublicKey::new(n, e),
            sk,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.sk
    }

    pub fn into_parts(self) -> (PublicKey, PrivateKey) {
        (self.pk, self.sk)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyPair, PUBLIC_EXPONENT};
    use crate::{CipherError, DefaultRand};
    use num_bigint::BigInt;
    use num_traits::One;
    use utils::BigIntExt;

    #[test]
    fn generate() {
        let mut rng = DefaultRand::default();
        for (i, &(bits, crt)) in [(32usize, true), (64, false), (512, true), (1024, false)]
            .iter()
            .enumerate()
        {
            let kp = KeyPair::generate(bits, crt, &mut rng).unwrap();
            let (pk, sk) = (kp.public_key(), kp.private_key());
            assert_eq!(pk.bit_len(), bits, "case {i}");
            assert_eq!(pk.key_len(), (bits + 7) / 8, "case {i}");
            assert_eq!(pk.exponent(), &BigInt::from(PUBLIC_EXPONENT), "case {i}");
            assert_eq!(sk.is_crt(), crt, "case {i}");
            assert_eq!(sk.modulus(), pk.modulus(), "case {i}");
            pk.is_valid().unwrap();
            sk.is_valid(pk).unwrap();

            let m = BigInt::from(0x5a5au32);
            let c = pk.rsaep(&m).unwrap();
            assert_eq!(sk.rsadp(&c).unwrap(), m, "case {i}");
        }
    }

    #[test]
    fn crt_factors() {
        let mut rng = DefaultRand::default();
        let kp = KeyPair::generate(512, true, &mut rng).unwrap();
        let (p, q) = kp.private_key().primes().unwrap();
        assert_ne!(p, q);
        assert_eq!(&(p * q), kp.public_key().modulus());

        // d·e ≡ 1 mod (p-1)(q-1)
        let phi = (p - 1u8) * (q - 1u8);
        let d = kp.private_key().private_exponent().unwrap();
        let de = BigIntExt(d * kp.public_key().exponent()).mod_pow(&BigInt::one(), &phi);
        assert!(de.unwrap().is_one());
    }

    #[test]
    fn invalid_bits() {
        let mut rng = DefaultRand::default();
        for bits in [0usize, 15, 16, 31, 33, 1025] {
            assert!(
                matches!(
                    KeyPair::generate(bits, true, &mut rng),
                    Err(CipherError::BadParameter(_))
                ),
                "case {bits}"
            );
        }
    }

    #[test]
    fn serde_json_round_trip() {
        let mut rng = DefaultRand::default();
        let kp = KeyPair::generate(256, true, &mut rng).unwrap();
        let s = serde_json::to_string(&kp).unwrap();
        let kp2: KeyPair = serde_json::from_str(&s).unwrap();
        assert_eq!(kp2.public_key(), kp.public_key());
        assert_eq!(kp2.private_key(), kp.private_key());
    }
}
