use crate::error::AsymError;
use config::Config;
use crypto_hash::HasherType;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AsymConfig {
    // RSA modulus bits of the generated key
    pub key_bits: usize,

    // hash function name, see `HasherType`
    pub hash: String,

    // PSS salt byte size
    pub salt_len: usize,

    // generate the private key in CRT form
    pub crt: bool,
}

impl Default for AsymConfig {
    fn default() -> Self {
        Self {
            key_bits: 2048,
            hash: "sha256".to_string(),
            salt_len: 32,
            crt: true,
        }
    }
}

impl AsymConfig {
    /// 默认值 < 配置文件`f` < 环境变量`ASYM_*`
    pub fn load(f: Option<&Path>) -> anyhow::Result<Self> {
        let default_config = Config::try_from(&AsymConfig::default())?;

        let mut config = Config::builder().add_source(default_config);
        if let Some(f) = f {
            config = config.add_source(config::File::from(f).required(true));
        }

        config = config.add_source(
            config::Environment::with_prefix("ASYM")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        );

        let config: AsymConfig = config.build()?.try_deserialize()?;
        config.check()?;
        log::trace!("{:?}", config);

        Ok(config)
    }

    fn check(&self) -> Result<(), AsymError> {
        self.hasher_type()?;
        if self.key_bits < 32 || self.key_bits & 1 != 0 {
            return Err(AsymError::InvalidConfig(format!(
                "key_bits `{}` must be an even number not less than 32",
                self.key_bits
            )));
        }

        Ok(())
    }

    pub fn hasher_type(&self) -> Result<HasherType, AsymError> {
        self.hash
            .parse()
            .map_err(|_| AsymError::UnknownHash(self.hash.clone()))
    }
}
