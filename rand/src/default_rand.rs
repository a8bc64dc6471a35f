use crate::Rand;
use xrand::rngs::OsRng;
use xrand::RngCore;

/// 操作系统提供的随机源(`getrandom`), 用于素数生成、OAEP种子和PSS盐值
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultRand {
    os: OsRng,
}

impl DefaultRand {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rand for DefaultRand {
    fn rand(&mut self, random: &mut [u8]) {
        if !random.is_empty() {
            self.os.fill_bytes(random);
        }
    }
}
