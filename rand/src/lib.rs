//! 随机源
//!
//! `Rand`是密码学安全随机数生成器的最小接口, 只负责将随机字节填充到给定缓冲区.

/// 密码学安全随机数生成器
pub trait Rand: Default {
    /// 用随机字节填满`random`
    fn rand(&mut self, random: &mut [u8]);
}

mod default_rand;
pub use default_rand::DefaultRand;

impl<T: xrand::RngCore + xrand::CryptoRng + Default> Rand for T {
    fn rand(&mut self, random: &mut [u8]) {
        self.fill_bytes(random);
    }
}
