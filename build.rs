use chrono::{DateTime, Local};
use std::{process::Command, time::SystemTime};

fn exe_cmd(cmd: &mut Command) -> anyhow::Result<String> {
    let output = cmd.output()?;
    anyhow::ensure!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr).trim()
    );

    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

// 源码不在git仓库中时版本信息里不带提交号
fn git_info() -> String {
    let commit = exe_cmd(Command::new("git").args(["log", "-n", "1", "--pretty=format:%H"]))
        .map(|s| s[..8.min(s.len())].to_string());
    let branch = exe_cmd(Command::new("git").args(["branch", "--show-current"]));

    match (branch, commit) {
        (Ok(b), Ok(c)) => format!("{b}-{c}"),
        (_, Err(e)) | (Err(e), _) => {
            let e = e.to_string();
            println!(
                "cargo:warning=git info unavailable: {}",
                e.lines().next().unwrap_or_default()
            );
            "unknown".to_string()
        }
    }
}

fn main() {
    println!(
        "cargo:rustc-env=ASYM_VERSION_INFO={}-{}",
        env!("CARGO_PKG_VERSION"),
        DateTime::<Local>::from(SystemTime::now()).format("%Y/%m/%d-%H:%M:%S:%Z")
    );

    println!("cargo:rustc-env=ASYM_GIT_INFO={}", git_info());
    println!("cargo:rerun-if-changed=build.rs");
}
