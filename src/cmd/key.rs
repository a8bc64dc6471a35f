use crate::cmd::{AsymConfig, Cmd};
use cipher::rsa::KeyPair;
use cipher::DefaultRand;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub struct KeyCmd<'a> {
    cfg: &'a AsymConfig,
}

impl<'a> KeyCmd<'a> {
    pub fn new(cfg: &'a AsymConfig) -> Self {
        Self { cfg }
    }
}

impl<'a> Cmd for KeyCmd<'a> {
    const NAME: &'static str = "key";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("rsa key pair generate")
            .arg(
                Arg::new("bits")
                    .long("bits")
                    .short('b')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(usize))
                    .help("to specify the public key modulus bits length, default from the config"),
            )
            .arg(
                Arg::new("mod")
                    .long("mod")
                    .action(ArgAction::SetTrue)
                    .required(false)
                    .help("save the private key as modulus and private exponent instead of CRT form"),
            )
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .help("to specify the output file path to save the key pair"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let bits = m
            .get_one::<usize>("bits")
            .copied()
            .unwrap_or(self.cfg.key_bits);
        let crt = self.cfg.crt && !m.get_flag("mod");

        let mut out: Box<dyn Write> = match m.get_one::<PathBuf>("output") {
            Some(p) => {
                let f = OpenOptions::new().create_new(true).write(true).open(p)?;
                Box::new(f)
            }
            None => Box::new(std::io::stdout().lock()),
        };

        log::info!("generating {bits}-bits rsa key pair");
        let mut rng = DefaultRand::default();
        let kp = KeyPair::generate(bits, crt, &mut rng)?;
        let kp = serde_json::to_string_pretty(&kp)?;
        out.write_all(kp.as_bytes())?;
        out.write_all(b"\n")?;

        Ok(())
    }
}
