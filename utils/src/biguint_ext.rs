use crate::NumError;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::Rand;
use std::borrow::Borrow;
use std::ops::Deref;

/// 素数生成时Miller-Rabin测试的轮数, 出错概率至多为$2^{-128}$
pub const MILLER_RABIN_ROUNDS: usize = 64;

// 候选素数先和这些小素数做互质检查
const SIEVE_PRIMES: [u32; 7] = [3, 5, 7, 11, 13, 17, 19];
const SIEVE_PRIMES_PRODUCT: u32 = 3 * 5 * 7 * 11 * 13 * 17 * 19;

pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigUint>> BigUintExt<T> {
    // 生成[0..self)之间的随机数, self > 0
    pub fn gen_random<R: Rand>(&self, rng: &mut R) -> BigUint {
        let bits = self.bits() as usize;
        let (mut n, top) = (vec![0u8; (bits + 7) >> 3], bits & 7);

        loop {
            rng.rand(n.as_mut_slice());
            if top != 0 {
                if let Some(x) = n.last_mut() {
                    *x &= (1u8 << top) - 1;
                }
            }

            let r = BigUint::from_bytes_le(n.as_slice());
            if self.deref() > &r {
                return r;
            }
        }
    }

    /// 小素数试除加`test_rounds`轮随机底数的Miller-Rabin测试.
    ///
    /// 对于任意大于2的奇数, 每轮Miller-Rabin测试误判的概率至多为$1/4$.
    pub fn probably_prime_test<R: Rand>(&self, test_rounds: usize, rng: &mut R) -> bool {
        const PRIME_BIT_MASK: u128 = 1 << 2
            | 1 << 3
            | 1 << 5
            | 1 << 7
            | 1 << 11
            | 1 << 13
            | 1 << 17
            | 1 << 19
            | 1 << 23
            | 1 << 29
            | 1 << 31
            | 1 << 37
            | 1 << 41
            | 1 << 43
            | 1 << 47
            | 1 << 53
            | 1 << 59
            | 1 << 61
            | 1 << 67
            | 1 << 71
            | 1 << 73
            | 1 << 79
            | 1 << 83
            | 1 << 89
            | 1 << 97
            | 1 << 101
            | 1 << 103
            | 1 << 107
            | 1 << 109
            | 1 << 113
            | 1 << 127;
        const SMALL_PRIMES: [u32; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

        if self.bits() < 8 {
            // 小于128的数直接查表
            let x = self.to_u32().unwrap_or(0);
            return ((1u128 << x) & PRIME_BIT_MASK) != 0;
        } else if self.is_even() {
            return false;
        }

        if SMALL_PRIMES
            .iter()
            .any(|&p| (self.deref() % p).is_zero())
        {
            return false;
        }

        self.miller_rabin(test_rounds, rng)
    }

    /// self是大于127的奇数
    fn miller_rabin<R: Rand>(&self, rounds: usize, rng: &mut R) -> bool {
        let n = self.deref();
        // n - 1 = 2^s * r
        let n_m1 = n - 1u32;
        let s = n_m1.trailing_zeros().unwrap_or(0);
        let r = &n_m1 >> s;
        let n_m3 = n - 3u32;

        'next_round: for _ in 0..rounds {
            // a \in [2, n-2]
            let a = BigUintExt(&n_m3).gen_random(rng) + 2u32;
            let mut y = a.modpow(&r, n);
            if y.is_one() || y == n_m1 {
                continue;
            }

            for _ in 1..s {
                y = &y * &y % n;
                if y == n_m1 {
                    continue 'next_round;
                } else if y.is_one() {
                    return false;
                }
            }

            return false;
        }

        true
    }
}

impl BigUintExt<BigUint> {
    /// 生成位长度为`bits_len`的概率素数.
    ///
    /// 随机选取一个最高两位为1的奇数, 若和`{3,5,7,11,13,17,19}`中的某个数不互质则加2, 然后进行
    /// `MILLER_RABIN_ROUNDS`轮测试, 失败则加2重新检查. `safe`为`true`时还要求`2p+1`同样通过测试,
    /// 否则从`p+2`开始重新搜索. 候选值超出`bits_len`时重新随机选取.
    pub fn generate_prime<R: Rand>(
        bits_len: usize,
        safe: bool,
        rng: &mut R,
    ) -> Result<BigUint, NumError> {
        if bits_len < 2 {
            return Err(NumError::InvalidPrimeBits(bits_len));
        }

        let mut tested = 0usize;
        'next_draw: loop {
            let mut p = Self::random_odd(bits_len, rng);

            loop {
                while Self::shares_sieve_factor(&p) {
                    p += 2u32;
                }

                if p.bits() as usize != bits_len {
                    continue 'next_draw;
                }

                tested += 1;
                if BigUintExt(&p).probably_prime_test(MILLER_RABIN_ROUNDS, rng) {
                    if !safe {
                        log::trace!("found {bits_len}-bits prime after {tested} candidates");
                        return Ok(p);
                    }

                    let sp: BigUint = (&p << 1u32) + 1u32;
                    if BigUintExt(&sp).probably_prime_test(MILLER_RABIN_ROUNDS, rng) {
                        log::trace!("found {bits_len}-bits safe prime after {tested} candidates");
                        return Ok(p);
                    }
                }

                p += 2u32;
            }
        }
    }

    // 最高两位置1, 两个这样的数相乘后位长度不会少一位
    fn random_odd<R: Rand>(bits_len: usize, rng: &mut R) -> BigUint {
        let mut buf = vec![0u8; (bits_len + 7) >> 3];
        rng.rand(buf.as_mut_slice());

        let mut p = BigUint::from_bytes_le(buf.as_slice());
        p &= (BigUint::one() << bits_len) - 1u32;
        p.set_bit(bits_len as u64 - 1, true);
        p.set_bit(bits_len as u64 - 2, true);
        p.set_bit(0, true);
        p
    }

    fn shares_sieve_factor(p: &BigUint) -> bool {
        let m = (p % SIEVE_PRIMES_PRODUCT).to_u32().unwrap_or_default();

        // p本身就是筛选用的小素数时不算
        SIEVE_PRIMES
            .iter()
            .any(|&q| m % q == 0 && (p.bits() > 5 || m != q))
    }
}

#[cfg(test)]
mod tests {
    use crate::{BigUintExt, NumError};
    use num_bigint::BigUint;
    use num_traits::Num;
    use rand::DefaultRand;

    #[test]
    fn gen_small_prime() {
        let mut rng = DefaultRand::default();
        for bits_len in 2..16 {
            let p = BigUintExt::<BigUint>::generate_prime(bits_len, false, &mut rng).unwrap();
            assert_eq!(p.bits() as usize, bits_len);
            assert!(BigUintExt(p).probably_prime_test(31, &mut rng));
        }

        assert_eq!(
            BigUintExt::<BigUint>::generate_prime(1, false, &mut rng),
            Err(NumError::InvalidPrimeBits(1))
        );
    }

    #[test]
    fn gen_prime_512() {
        let mut rng = DefaultRand::default();
        let p = BigUintExt::<BigUint>::generate_prime(512, false, &mut rng).unwrap();
        assert_eq!(p.bits(), 512);
        assert!(BigUintExt(&p).probably_prime_test(20, &mut rng));
    }

    #[test]
    fn gen_safe_prime() {
        let mut rng = DefaultRand::default();
        for bits_len in [8usize, 32, 64] {
            let p = BigUintExt::<BigUint>::generate_prime(bits_len, true, &mut rng).unwrap();
            assert_eq!(p.bits() as usize, bits_len);
            let sp: BigUint = (&p << 1u32) + 1u32;
            assert!(BigUintExt(&p).probably_prime_test(20, &mut rng));
            assert!(
                BigUintExt(&sp).probably_prime_test(20, &mut rng),
                "2 * {p} + 1 is not prime"
            );
        }
    }

    #[test]
    fn random_range() {
        let mut rng = DefaultRand::default();
        for x in [1u32, 2, 3, 255, 256, 257, 65535] {
            let n = BigUint::from(x);
            for _ in 0..64 {
                assert!(BigUintExt(&n).gen_random(&mut rng) < n);
            }
        }
    }

    #[test]
    fn composite_validate() {
        let cases = [
            "0",
            "1",
            "21284175091214687912771199898307297748211672914763848041968395774954376176754",
            "6084766654921918907427900243509372380954290099172559290432744450051395395951",
            "82793403787388584738507275144194252681",
            // strong pseudoprime to prime bases 2 through 29
            "1195068768795265792518361315725116351898245581",
            // Carmichael numbers
            "561",
            "41041",
            "825265",
            "3673744903",
            "3281593591",
            "2385076987",
            "80579735209",
            "105919633",
        ];

        let mut rng = DefaultRand::default();
        for s in cases {
            let composite = BigUint::from_str_radix(s, 10).unwrap();
            assert!(
                !BigUintExt(composite).probably_prime_test(20, &mut rng),
                "composite `{}` test failed",
                s
            );
        }
    }

    #[test]
    fn prime_validate() {
        let cases = [
            "2",
            "3",
            "5",
            "127",
            "131",
            "13756265695458089029",
            "13496181268022124907",
            "18699199384836356663",
            "98920366548084643601728869055592650835572950932266967461790948584315647051443",
            "94560208308847015747498523884063394671606671904944666360068158221458669711639",
            // 2^255 - 19
            "57896044618658097711785492504343953926634992332820282019728792003956564819949",
            // 2^521 - 1
            "6864797660130609714981900799081393217269435300143305409394463459185543183397656052122559640661454554977296311391480858037121987999716643812574028291115057151",
        ];

        let mut rng = DefaultRand::default();
        for s in cases {
            let prime = BigUint::from_str_radix(s, 10).unwrap();
            assert!(
                BigUintExt(prime).probably_prime_test(20, &mut rng),
                "prime `{}` test failed",
                s
            );
        }
    }
}
