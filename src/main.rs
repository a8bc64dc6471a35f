use asym::cmd::{AsymConfig, Cmd, KeyCmd, OAEPCmd, SignCmd, VerifyCmd};
use asym::log_error;
use clap::{value_parser, Arg, ArgAction, Command};
use log::LevelFilter;
use std::io::Read;
use std::path::PathBuf;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let version = format!("{} {}", env!("ASYM_VERSION_INFO"), env!("ASYM_GIT_INFO"));
    let app = Command::new("asym")
        .version(version.clone())
        .about("rsa key generation, oaep encryption and pss/pkcs1 signature")
        .arg(
            Arg::new("pipe")
                .long("pipe")
                .short('p')
                .action(ArgAction::SetTrue)
                .global(true)
                .required(false)
                .help("read the message or hex input from the stdin"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .action(ArgAction::Set)
                .global(true)
                .required(false)
                .value_parser(value_parser!(PathBuf))
                .help("the config file path"),
        )
        .subcommand(KeyCmd::cmd())
        .subcommand(OAEPCmd::cmd())
        .subcommand(SignCmd::cmd())
        .subcommand(VerifyCmd::cmd())
        .get_matches();

    let Some((s, m)) = app.subcommand() else {
        println!("{} {}", env!("CARGO_PKG_NAME"), version);
        return;
    };

    let Some(cfg) = log_error(AsymConfig::load(
        m.get_one::<PathBuf>("config").map(|p| p.as_path()),
    )) else {
        std::process::exit(1);
    };

    let mut pdata = Vec::with_capacity(1024);
    if m.get_flag("pipe") {
        if let Err(e) = std::io::stdin().lock().read_to_end(&mut pdata) {
            log::error!("read stdin failed, {e}");
            std::process::exit(1);
        }
    }

    let res = match s {
        KeyCmd::NAME => KeyCmd::new(&cfg).run(m),
        OAEPCmd::NAME => OAEPCmd::new(&cfg, pdata.as_slice()).run(m),
        SignCmd::NAME => SignCmd::new(&cfg, pdata.as_slice()).run(m),
        VerifyCmd::NAME => VerifyCmd::new(&cfg, pdata.as_slice()).run(m),
        name => Err(anyhow::anyhow!("unsupport for {name}")),
    };

    if log_error(res).is_none() {
        std::process::exit(1);
    }
}
