//! Command-line surface for running the monitor server standalone.
//!
//! Exposes an idiomatic `--address` / `--enable` / `--disable` surface, plus
//! a pre-parse shim recognizing the historical `-binarymonitor`,
//! `+binarymonitor`, and `-binarymonitoraddress <addr>` spellings — `clap`
//! has no way to model a leading `+` as a flag, so those are rewritten into
//! their long-form equivalents before `Cli::parse` ever sees them.

use clap::Parser;

use crate::config::DEFAULT_ADDRESS;

#[derive(Debug, Parser)]
#[command(name = "retromon")]
#[command(about = "Binary remote monitor protocol server")]
#[command(version)]
pub struct Cli {
    /// Bind address, e.g. `ip4://127.0.0.1:6502` or `ip6://[::1]:6502`.
    #[arg(long, default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Start with the monitor enabled (default: use the persisted setting).
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Start with the monitor disabled (default: use the persisted setting).
    #[arg(long, conflicts_with = "enable")]
    pub disable: bool,
}

/// Rewrites legacy single-dash/plus-prefixed VICE resource spellings into
/// the long-form flags `Cli` understands, leaving anything else untouched.
pub fn normalize_legacy_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out = Vec::new();
    let mut iter = args.into_iter().peekable();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-binarymonitor" => out.push("--enable".to_string()),
            "+binarymonitor" => out.push("--disable".to_string()),
            "-binarymonitoraddress" => {
                out.push("--address".to_string());
                if let Some(value) = iter.next() {
                    out.push(value);
                }
            }
            _ => out.push(arg),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_legacy_enable_flag() {
        let args = normalize_legacy_args(vec!["retromon".into(), "-binarymonitor".into()]);
        assert_eq!(args, vec!["retromon", "--enable"]);
    }

    #[test]
    fn rewrites_legacy_disable_flag() {
        let args = normalize_legacy_args(vec!["retromon".into(), "+binarymonitor".into()]);
        assert_eq!(args, vec!["retromon", "--disable"]);
    }

    #[test]
    fn rewrites_legacy_address_flag_with_value() {
        let args = normalize_legacy_args(vec![
            "retromon".into(),
            "-binarymonitoraddress".into(),
            "ip4://0.0.0.0:6502".into(),
        ]);
        assert_eq!(args, vec!["retromon", "--address", "ip4://0.0.0.0:6502"]);
    }

    #[test]
    fn leaves_modern_flags_untouched() {
        let args = normalize_legacy_args(vec!["retromon".into(), "--address".into(), "x".into()]);
        assert_eq!(args, vec!["retromon", "--address", "x"]);
    }
}
