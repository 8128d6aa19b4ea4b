//! Subcommand implementations.
//!
//! These are the before/after scripts: read balances, do the thing,
//! read balances again, print the signature. Every failure propagates
//! to the caller; nothing is printed-and-ignored.

use helio_client::client::SubmissionClient;
use helio_client::config::RetryPolicy;
use helio_client::confirm::{SubmissionResult, SubmissionStatus};
use helio_client::error::ClientError;
use helio_client::retry::with_backoff;
use helio_core::instruction::{self, AccountMeta, Instruction};
use helio_core::keys::{Keypair, Pubkey};
use helio_core::transaction::UnsignedTransaction;

use crate::hex;
use crate::keyfile;

/// Base units per display coin.
pub const LAMPORTS_PER_COIN: u64 = 1_000_000_000;

pub fn generate(path: &str) -> Result<(), String> {
    let keypair = Keypair::generate();
    keyfile::save_keypair(path, &keypair)?;
    println!("🔑 Wrote new keypair to {path}");
    println!("   address: {}", keypair.pubkey());
    Ok(())
}

pub fn address(keypair: &Keypair) -> Result<(), String> {
    println!("{}", keypair.pubkey());
    Ok(())
}

pub async fn balance(client: &SubmissionClient, address: &str) -> Result<(), String> {
    let address = Pubkey::parse(address).map_err(|e| e.to_string())?;
    match client.fetch_account(&address).await {
        Ok(account) => {
            println!(
                "💰 {address}: {} ({} lamports)",
                format_amount(account.lamports),
                account.lamports
            );
            println!("   owner: {}", account.owner);
            if !account.data.is_empty() {
                println!("   data: {} bytes", account.data.len());
            }
            Ok(())
        }
        // Absence is an answer here, not a failure.
        Err(ClientError::AccountNotFound { .. }) => {
            println!("💰 {address}: 0 (account not found)");
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    }
}

pub async fn airdrop(
    client: &SubmissionClient,
    retry: &RetryPolicy,
    address: &str,
    amount: &str,
) -> Result<(), String> {
    let address = Pubkey::parse(address).map_err(|e| e.to_string())?;
    let lamports = parse_amount(amount)?;

    let pre = client.get_balance(&address).await.map_err(|e| e.to_string())?;
    println!("balance before: {}", format_amount(pre));

    println!("📤 Requesting airdrop of {} ...", format_amount(lamports));
    let result = with_backoff(retry, || {
        let client = client.clone();
        async move { client.airdrop_and_confirm(&address, lamports).await }
    })
    .await
    .map_err(|e| e.to_string())?;
    report_outcome(&result)?;

    let post = client.get_balance(&address).await.map_err(|e| e.to_string())?;
    println!("balance after: {}", format_amount(post));
    println!();
    println!("Airdrop signature: {}", result.signature);
    Ok(())
}

pub async fn transfer(
    client: &SubmissionClient,
    retry: &RetryPolicy,
    sender: &Keypair,
    to: &str,
    amount: &str,
) -> Result<(), String> {
    let receiver = Pubkey::parse(to).map_err(|e| e.to_string())?;
    let lamports = parse_amount(amount)?;

    let pre_sender = client
        .get_balance(&sender.pubkey())
        .await
        .map_err(|e| e.to_string())?;
    let pre_receiver = client
        .get_balance(&receiver)
        .await
        .map_err(|e| e.to_string())?;
    println!("sender prebalance: {}", format_amount(pre_sender));
    println!("receiver prebalance: {}", format_amount(pre_receiver));
    println!();

    let instruction =
        instruction::transfer(sender.pubkey(), receiver, lamports).map_err(|e| e.to_string())?;

    println!("📤 Submitting transfer of {} ...", format_amount(lamports));
    let result = submit_with_fresh_reference(client, retry, sender, instruction).await?;
    report_outcome(&result)?;

    let post_sender = client
        .get_balance(&sender.pubkey())
        .await
        .map_err(|e| e.to_string())?;
    let post_receiver = client
        .get_balance(&receiver)
        .await
        .map_err(|e| e.to_string())?;
    println!("sender postbalance: {}", format_amount(post_sender));
    println!("receiver postbalance: {}", format_amount(post_receiver));
    println!();
    println!("Transaction signature: {}", result.signature);
    Ok(())
}

pub async fn invoke(
    client: &SubmissionClient,
    retry: &RetryPolicy,
    signer: &Keypair,
    program: &str,
    account_specs: &[&str],
    data_hex: Option<&str>,
) -> Result<(), String> {
    let program_id = Pubkey::parse(program).map_err(|e| e.to_string())?;
    let mut accounts = Vec::new();
    for spec in account_specs {
        accounts.push(parse_account_spec(spec)?);
    }
    let data = match data_hex {
        Some(h) => hex::hex_decode(h)?,
        None => Vec::new(),
    };

    let instruction =
        instruction::program_call(program_id, accounts, data).map_err(|e| e.to_string())?;
    println!(
        "📤 Invoking program {program_id} with {} account(s), {} payload byte(s) ...",
        instruction.accounts.len(),
        instruction.data.len()
    );

    let result = submit_with_fresh_reference(client, retry, signer, instruction).await?;
    report_outcome(&result)?;
    println!("Transaction signature: {}", result.signature);
    Ok(())
}

/// Build, sign, and submit, re-fetching the block reference on every
/// attempt, since the previous one may have expired while backing off.
async fn submit_with_fresh_reference(
    client: &SubmissionClient,
    retry: &RetryPolicy,
    signer: &Keypair,
    instruction: Instruction,
) -> Result<SubmissionResult, String> {
    with_backoff(retry, || {
        let client = client.clone();
        let signer = signer.clone();
        let instruction = instruction.clone();
        async move {
            let reference = client.latest_block_reference().await?;
            let transaction =
                UnsignedTransaction::assemble(vec![instruction], reference)?.sign(&[&signer])?;
            client.submit_and_confirm(&transaction).await
        }
    })
    .await
    .map_err(|e| e.to_string())
}

fn report_outcome(result: &SubmissionResult) -> Result<(), String> {
    match &result.status {
        SubmissionStatus::Failed { reason } => {
            Err(format!("transaction {} failed on-chain: {reason}", result.signature))
        }
        status => {
            println!("✅ Reached '{status}'");
            Ok(())
        }
    }
}

/// `ADDR[:flags]` where flags are drawn from `w` (writable) and `s`
/// (signer).
fn parse_account_spec(spec: &str) -> Result<AccountMeta, String> {
    let (addr, flags) = match spec.rsplit_once(':') {
        Some((addr, flags)) => (addr, flags),
        None => (spec, ""),
    };
    let pubkey = Pubkey::parse(addr).map_err(|e| e.to_string())?;
    let mut is_writable = false;
    let mut is_signer = false;
    for c in flags.chars() {
        match c {
            'w' => is_writable = true,
            's' => is_signer = true,
            other => {
                return Err(format!(
                    "unknown account flag '{other}' in '{spec}' (expected w and/or s)"
                ))
            }
        }
    }
    Ok(AccountMeta {
        pubkey,
        is_signer,
        is_writable,
    })
}

/// Parse a decimal coin amount ("0.01") into lamports, exactly.
pub fn parse_amount(input: &str) -> Result<u64, String> {
    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(format!("'{input}' is not an amount"));
    }
    if frac.len() > 9 {
        return Err(format!(
            "'{input}' has {} decimal places, lamports resolve at most 9",
            frac.len()
        ));
    }
    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|e| format!("invalid amount '{input}': {e}"))?
    };
    let frac_lamports: u64 = if frac.is_empty() {
        0
    } else {
        let digits: u64 = frac
            .parse()
            .map_err(|e| format!("invalid amount '{input}': {e}"))?;
        digits * 10u64.pow((9 - frac.len()) as u32)
    };
    whole
        .checked_mul(LAMPORTS_PER_COIN)
        .and_then(|w| w.checked_add(frac_lamports))
        .ok_or_else(|| format!("amount '{input}' overflows"))
}

/// Render lamports as a decimal coin value, trailing zeros trimmed.
pub fn format_amount(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_COIN;
    let frac = lamports % LAMPORTS_PER_COIN;
    if frac == 0 {
        return whole.to_string();
    }
    let mut out = format!("{whole}.{frac:09}");
    while out.ends_with('0') {
        out.pop();
    }
    out
}
