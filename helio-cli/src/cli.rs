//! CLI plumbing: argv scanning and help text.

/// One parsed invocation: the command word, its positional arguments,
/// and every `--key value` pair in the order given (keys may repeat).
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: String,
    pub positionals: Vec<String>,
    pub flags: Vec<(String, String)>,
}

/// Scan argv. `--key value` becomes a flag pair (a bare `--key` gets
/// "true"); everything else is positional, and the first positional is
/// the command. Returns `None` when help should be printed instead.
pub fn parse_invocation(args: &[String]) -> Option<Invocation> {
    let mut positionals = Vec::new();
    let mut flags = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if let Some(key) = args[i].strip_prefix("--") {
            if key == "help" {
                return None;
            }
            if i + 1 < args.len() && !args[i + 1].starts_with("--") {
                flags.push((key.to_string(), args[i + 1].clone()));
                i += 2;
            } else {
                flags.push((key.to_string(), "true".to_string()));
                i += 1;
            }
        } else if args[i] == "-h" {
            return None;
        } else {
            positionals.push(args[i].clone());
            i += 1;
        }
    }
    let command = if positionals.is_empty() {
        return None;
    } else {
        positionals.remove(0)
    };
    Some(Invocation {
        command,
        positionals,
        flags,
    })
}

/// Last value given for `name`, if any.
pub fn flag<'a>(flags: &'a [(String, String)], name: &str) -> Option<&'a str> {
    flags
        .iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Every value given for `name`, in order.
pub fn flag_all<'a>(flags: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    flags
        .iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .collect()
}

pub fn print_help() {
    println!("🔧 helio — ledger submission client");
    println!();
    println!("USAGE:");
    println!("  helio [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("OPTIONS:");
    println!("  --endpoint <URL>         RPC endpoint (default http://127.0.0.1:8899)");
    println!("  --keypair <FILE>         Keypair file (JSON array of 64 bytes)");
    println!("  --config <FILE>          TOML client config");
    println!("  --commitment <LEVEL>     processed|confirmed|finalized (default confirmed)");
    println!();
    println!("COMMANDS:");
    println!("  generate <FILE>              Write a fresh keypair file");
    println!("  address                      Print the keypair's address");
    println!("  balance <ADDRESS>            Print an account's balance and owner");
    println!("  airdrop <ADDRESS> <AMOUNT>   Request test-network funds, wait for confirmation");
    println!("  transfer <TO> <AMOUNT>       Move value from the keypair's account to TO");
    println!("  invoke --program <ID> --account <ADDR[:ws]> [--data <HEX>]");
    println!("                               Call a deployed program (repeat --account as needed;");
    println!("                               flag suffix: w = writable, s = signer)");
    println!();
    println!("AMOUNT is a decimal coin value; 1 coin = 1000000000 lamports.");
    println!("ADDRESS is base58 (or 64 hex chars).");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_command_flags_and_positionals() {
        let inv = parse_invocation(&args(&[
            "--endpoint",
            "http://localhost:8899",
            "transfer",
            "abc",
            "0.5",
        ]))
        .unwrap();
        assert_eq!(inv.command, "transfer");
        assert_eq!(inv.positionals, vec!["abc", "0.5"]);
        assert_eq!(flag(&inv.flags, "endpoint"), Some("http://localhost:8899"));
    }

    #[test]
    fn repeated_flags_are_kept_in_order() {
        let inv =
            parse_invocation(&args(&["invoke", "--account", "aaa", "--account", "bbb:ws"]))
                .unwrap();
        assert_eq!(flag_all(&inv.flags, "account"), vec!["aaa", "bbb:ws"]);
    }

    #[test]
    fn help_and_empty_argv_request_help() {
        assert!(parse_invocation(&args(&[])).is_none());
        assert!(parse_invocation(&args(&["--help"])).is_none());
    }
}
