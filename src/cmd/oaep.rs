use crate::cmd::{decode_hex, hash_arg, hasher_type, key_arg, read_key_part, AsymConfig, Cmd};
use cipher::rsa::{OAEPDecrypt, OAEPEncrypt, PrivateKey, PublicKey};
use cipher::{Decrypt, DefaultRand, Encrypt};
use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use crypto_hash::HasherBuilder;

pub struct OAEPCmd<'a> {
    cfg: &'a AsymConfig,
    pipe: &'a [u8],
}

impl<'a> OAEPCmd<'a> {
    pub fn new(cfg: &'a AsymConfig, pipe: &'a [u8]) -> Self {
        Self { cfg, pipe }
    }

    // 命令行未给出时使用管道数据
    fn data(&self, m: &ArgMatches, id: &str) -> anyhow::Result<Vec<u8>> {
        match m.get_one::<String>(id) {
            Some(s) if !s.is_empty() => Ok(decode_hex(s)?),
            _ => Ok(decode_hex(String::from_utf8_lossy(self.pipe).as_ref())?),
        }
    }
}

impl<'a> Cmd for OAEPCmd<'a> {
    const NAME: &'static str = "oaep";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("rsa oaep encrypt/decrypt, the input and output are hex strings")
            .arg(key_arg())
            .arg(hash_arg())
            .arg(
                Arg::new("encrypt")
                    .long("encrypt")
                    .short('e')
                    .action(ArgAction::Set)
                    .num_args(0..=1)
                    .default_missing_value("")
                    .value_parser(value_parser!(String))
                    .help("the plaintext in hex to encrypt"),
            )
            .arg(
                Arg::new("decrypt")
                    .long("decrypt")
                    .short('d')
                    .action(ArgAction::Set)
                    .num_args(0..=1)
                    .default_missing_value("")
                    .value_parser(value_parser!(String))
                    .help("the ciphertext in hex to decrypt"),
            )
            .group(
                ArgGroup::new("op")
                    .args(["encrypt", "decrypt"])
                    .required(true),
            )
            .arg(
                Arg::new("label")
                    .long("label")
                    .short('l')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(String))
                    .help("the oaep label"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let out = self.exec(m)?;
        println!("{}", hex::encode(out.as_slice()));
        Ok(())
    }
}

impl<'a> OAEPCmd<'a> {
    /// 返回加密或解密的结果
    pub(super) fn exec(&self, m: &ArgMatches) -> anyhow::Result<Vec<u8>> {
        let builder = HasherBuilder::new(hasher_type(m, self.cfg)?);
        let label = m
            .get_one::<String>("label")
            .map(|s| s.as_bytes().to_vec())
            .unwrap_or_default();

        let mut out = Vec::with_capacity(512);
        if m.contains_id("encrypt") {
            let key: PublicKey = read_key_part(m, "pk")?;
            let msg = self.data(m, "encrypt")?;
            let oaep = OAEPEncrypt::new(key, builder.build(), DefaultRand::default(), &label)?;
            oaep.encrypt(msg.as_slice(), &mut out)?;
        } else {
            let key: PrivateKey = read_key_part(m, "sk")?;
            let c = self.data(m, "decrypt")?;
            let oaep = OAEPDecrypt::new(key, builder.build(), &label)?;
            oaep.decrypt(c.as_slice(), &mut out)?;
        }

        Ok(out)
    }
}
