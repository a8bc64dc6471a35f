use crate::NumError;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::borrow::Borrow;
use std::ops::Deref;

/// `BigInt`的扩展运算, 所有运算都返回新值, 不修改`self`.
pub struct BigIntExt<T: Borrow<BigInt>>(pub T);

impl<T: Borrow<BigInt>> Deref for BigIntExt<T> {
    type Target = BigInt;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl BigIntExt<BigInt> {
    /// 按无符号大端字节解码
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self(BigInt::from_bytes_be(Sign::Plus, bytes))
    }
}

impl<T: Borrow<BigInt>> BigIntExt<T> {
    /// 符号安全的大端编码: 编码总是表示`|self|`, 最高字节的最高位为1时在前面补一个`0x00`,
    /// 这样按补码解读时也不会被当作负数. 0编码为`[0x00]`.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let (_, mut mag) = self.to_bytes_be();
        if mag.first().is_some_and(|&x| x & 0x80 != 0) {
            mag.insert(0, 0);
        }
        mag
    }

    /// `|self|`的位长度
    pub fn bit_len(&self) -> usize {
        self.bits() as usize
    }

    /// `|self|`的第`i`位是否为1
    pub fn test_bit(&self, i: u64) -> bool {
        self.magnitude().bit(i)
    }

    /// 返回将`|self|`的第`i`位置1后的新值, 符号不变(0视为正数)
    pub fn set_bit(&self, i: u64) -> BigInt {
        let mut mag = self.magnitude().clone();
        mag.set_bit(i, true);
        let sign = match self.sign() {
            Sign::Minus => Sign::Minus,
            _ => Sign::Plus,
        };
        BigInt::from_biguint(sign, mag)
    }

    /// 翻转`|self|`低`bit_len`位, 结果非负. 例如`0b1010 -> 0b0101`, 0的结果为0.
    ///
    /// 注意与`!`不同, `!x`是补码语义的`-x - 1`.
    pub fn invert(&self) -> BigInt {
        let n = self.bits();
        if n == 0 {
            return BigInt::zero();
        }

        let mask = (BigUint::one() << n) - 1u32;
        BigInt::from_biguint(Sign::Plus, mask ^ self.magnitude())
    }

    /// 非负的最大公约数
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        Integer::gcd(self.deref(), other)
    }

    /// $self^{exp} \mod m$, 结果位于$[0, m)$.
    ///
    /// - `m <= 0`返回错误;
    /// - `m == 1`时结果为0;
    /// - `exp < 0`时结果为`mod_inverse(self^{-exp} mod m, m)`;
    pub fn mod_pow(&self, exp: &BigInt, m: &BigInt) -> Result<BigInt, NumError> {
        if !m.is_positive() {
            return Err(NumError::NonPositiveModulus);
        }

        if m.is_one() {
            return Ok(BigInt::zero());
        }

        if exp.is_negative() {
            let x = self.modpow(&-exp, m);
            BigIntExt(x).mod_inverse(m)
        } else {
            // 底数为负时num-bigint的结果同样落在[0, m)
            Ok(self.modpow(exp, m))
        }
    }

    /// <<算法导论>>
    /// 定理31.23: 若有d=gcd(a, n), 假设对于某些整数x'和y', 有d=ax'+ny'.
    /// 当d=1时, x'即是a在模n下的逆元.
    ///
    /// $self \cdot inv \equiv 1 \mod n$, `n == 1`时返回0.
    pub fn mod_inverse(&self, n: &BigInt) -> Result<BigInt, NumError> {
        if !n.is_positive() {
            return Err(NumError::NonPositiveModulus);
        }

        if n.is_one() {
            return Ok(BigInt::zero());
        }

        let a = self.mod_floor(n);
        let g = a.extended_gcd(n);
        if !g.gcd.is_one() {
            return Err(NumError::NotInvertible);
        }

        let mut x = g.x % n;
        if x.is_negative() {
            x += n;
        }

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BigIntExt, NumError};
    use num_bigint::BigInt;
    use num_integer::Integer;
    use num_traits::{Num, One, Zero};

    fn reference_mod_pow(a: i64, b: u32, m: i64) -> i64 {
        let mut x = 1i64;
        for _ in 0..b {
            x = (x * a).rem_euclid(m);
        }
        x.rem_euclid(m)
    }

    #[test]
    fn mod_pow_small() {
        let x = BigIntExt(BigInt::from(7));
        let r = x.mod_pow(&BigInt::from(13), &BigInt::from(11)).unwrap();
        assert_eq!(r, BigInt::from(2));

        for a in -9i64..=17 {
            for b in 0u32..12 {
                for m in 2i64..23 {
                    let r = BigIntExt(BigInt::from(a))
                        .mod_pow(&BigInt::from(b), &BigInt::from(m))
                        .unwrap();
                    assert_eq!(
                        r,
                        BigInt::from(reference_mod_pow(a, b, m)),
                        "case {a}^{b} mod {m}"
                    );
                }
            }
        }
    }

    #[test]
    fn mod_pow_edge() {
        let x = BigIntExt(BigInt::from(12345));
        assert!(x
            .mod_pow(&BigInt::from(7), &BigInt::one())
            .unwrap()
            .is_zero());
        assert_eq!(
            x.mod_pow(&BigInt::from(3), &BigInt::zero()),
            Err(NumError::NonPositiveModulus)
        );
        assert_eq!(
            x.mod_pow(&BigInt::from(3), &BigInt::from(-7)),
            Err(NumError::NonPositiveModulus)
        );
        assert!(x
            .mod_pow(&BigInt::zero(), &BigInt::from(97))
            .unwrap()
            .is_one());
    }

    #[test]
    fn mod_pow_negative_exp() {
        // 3^-1 mod 7 = 5, 3^-2 mod 7 = 4
        let x = BigIntExt(BigInt::from(3));
        assert_eq!(
            x.mod_pow(&BigInt::from(-1), &BigInt::from(7)).unwrap(),
            BigInt::from(5)
        );
        assert_eq!(
            x.mod_pow(&BigInt::from(-2), &BigInt::from(7)).unwrap(),
            BigInt::from(4)
        );
        assert_eq!(
            BigIntExt(BigInt::from(6)).mod_pow(&BigInt::from(-1), &BigInt::from(9)),
            Err(NumError::NotInvertible)
        );
    }

    #[test]
    fn mod_inverse() {
        let cases = [
            ("1234567", "458948883992"),
            ("239487239847", "2410312426921032588552076022197566074856950548502459942654116941958108831682612228890093858261341614673227141477904012196503648957050582631942730706805009223062734745341073406696246014589361659774041027169249453200378729434170325843778659198143763193776859869524088940195577346119843545301547043747207749969763750084308926339295559968882457872412993810129130294592999947926365264059284647209730384947211681434464714438488520940127459844288859336526896320919633919"),
            ("-10", "13"),
            ("65537", "3120"),
            ("3", "7"),
        ];

        for (i, case) in cases.iter().enumerate() {
            let (a, n) = (
                BigInt::from_str_radix(case.0, 10).unwrap(),
                BigInt::from_str_radix(case.1, 10).unwrap(),
            );

            let inv = BigIntExt(&a).mod_inverse(&n).unwrap();
            assert!(inv >= BigInt::zero() && inv < n, "case {i} inverse out of range");
            let one = (a * &inv).mod_floor(&n);
            assert!(one.is_one(), "case {i}: {} * {} != 1 % n", case.0, inv);
        }
    }

    #[test]
    fn mod_inverse_not_coprime() {
        let cases = [(6, 9), (0, 7), (10, 4), (65537 * 3, 65537 * 11)];
        for (a, n) in cases {
            assert_eq!(
                BigIntExt(BigInt::from(a)).mod_inverse(&BigInt::from(n)),
                Err(NumError::NotInvertible),
                "case {a} mod {n}"
            );
        }

        assert!(BigIntExt(BigInt::from(42))
            .mod_inverse(&BigInt::one())
            .unwrap()
            .is_zero());
        assert_eq!(
            BigIntExt(BigInt::from(3)).mod_inverse(&BigInt::from(-7)),
            Err(NumError::NonPositiveModulus)
        );
    }

    #[test]
    fn sign_safe_bytes() {
        let cases: [(i64, &[u8]); 7] = [
            (0, &[0x00]),
            (1, &[0x01]),
            (0x7f, &[0x7f]),
            (0x80, &[0x00, 0x80]),
            (0xff, &[0x00, 0xff]),
            (0x0100, &[0x01, 0x00]),
            (-0x80, &[0x00, 0x80]),
        ];

        for (x, tgt) in cases {
            assert_eq!(BigIntExt(BigInt::from(x)).to_be_bytes(), tgt, "case {x:#x}");
        }

        let x = BigIntExt::from_be_bytes(&[0xff, 0x00]);
        assert_eq!(*x, BigInt::from(0xff00));
        assert!(BigIntExt::from_be_bytes(&[]).is_zero());
        assert_eq!(BigIntExt(BigInt::from(0xff00)).bit_len(), 16);
    }

    #[test]
    fn bits_and_gcd() {
        let x = BigIntExt(BigInt::from(0b1010));
        assert!(x.test_bit(1) && x.test_bit(3));
        assert!(!x.test_bit(0) && !x.test_bit(2));
        assert_eq!(x.set_bit(0), BigInt::from(0b1011));
        // self不变
        assert_eq!(*x, BigInt::from(0b1010));

        assert_eq!(BigIntExt(BigInt::zero()).set_bit(4), BigInt::from(0b10000));

        assert_eq!(
            BigIntExt(BigInt::from(-12)).gcd(&BigInt::from(18)),
            BigInt::from(6)
        );
        assert_eq!(
            BigIntExt(BigInt::from(65537)).gcd(&BigInt::from(3120)),
            BigInt::one()
        );
    }

    #[test]
    fn negative_bits() {
        // 位运算都作用于绝对值
        let x = BigIntExt(BigInt::from(-2));
        assert!(x.test_bit(1));
        assert!(!x.test_bit(0) && !x.test_bit(2) && !x.test_bit(64));
        assert_eq!(x.set_bit(0), BigInt::from(-3));
        assert_eq!(x.set_bit(3), BigInt::from(-10));
        assert_eq!(x.bit_len(), 2);

        let y = BigIntExt(BigInt::from(-0x80));
        assert!(y.test_bit(7) && !y.test_bit(8));
        assert_eq!(y.to_be_bytes(), [0x00, 0x80]);
    }

    #[test]
    fn invert() {
        let cases: [(i64, i64); 7] = [
            (0b1010, 0b0101),
            (-0b1010, 0b0101),
            (0, 0),
            (1, 0),
            (0b1000, 0b0111),
            (0xff, 0),
            (0x100, 0xff),
        ];

        for (x, tgt) in cases {
            assert_eq!(
                BigIntExt(BigInt::from(x)).invert(),
                BigInt::from(tgt),
                "case {x:#b}"
            );
        }

        // 两次翻转不一定还原, 高位的0不会被翻回
        let x = BigIntExt(BigInt::from(0b1010));
        assert_eq!(BigIntExt(x.invert()).invert(), BigInt::from(0b10));
        assert_eq!(!BigInt::from(0b1010), BigInt::from(-11));
    }
}
