//! Submission client behavior against an in-memory executing ledger.
//!
//! The mock decodes wire bytes, applies native transfers with a fixed
//! fee, and reports statuses: enough to run the transfer and airdrop
//! scenarios end to end without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use helio_client::client::SubmissionClient;
use helio_client::config::ConfirmPolicy;
use helio_client::confirm::SubmissionStatus;
use helio_client::error::ClientError;
use helio_client::rpc::{AccountSnapshot, Commitment, LedgerRpc, SignatureStatus};
use helio_core::error::CoreError;
use helio_core::instruction::{transfer, NativeInstruction, NATIVE_PROGRAM_ID};
use helio_core::keys::{Keypair, Pubkey, Signature};
use helio_core::transaction::{BlockReference, Transaction, UnsignedTransaction};

const FEE: u64 = 5_000;
const COIN: u64 = 1_000_000_000;

struct MockLedger {
    accounts: Mutex<HashMap<Pubkey, u64>>,
    statuses: Mutex<HashMap<Signature, SignatureStatus>>,
    send_calls: AtomicU32,
    airdrop_seq: AtomicU64,
}

impl MockLedger {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            accounts: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            send_calls: AtomicU32::new(0),
            airdrop_seq: AtomicU64::new(0),
        })
    }

    fn with_account(self: Arc<Self>, address: Pubkey, lamports: u64) -> Arc<Self> {
        self.accounts.lock().unwrap().insert(address, lamports);
        self
    }

    fn send_calls(&self) -> u32 {
        self.send_calls.load(Ordering::SeqCst)
    }

    fn record(&self, signature: Signature, err: Option<String>) {
        self.statuses.lock().unwrap().insert(
            signature,
            SignatureStatus {
                commitment: Commitment::Finalized,
                err,
            },
        );
    }

    /// Execute every native transfer, charging the fee to the first
    /// signer. An execution failure still produces a status; the
    /// transaction landed, it just failed.
    fn execute(&self, transaction: &Transaction) -> Result<(), String> {
        let mut accounts = self.accounts.lock().unwrap();
        let payer = transaction.signers()[0];
        let payer_balance = accounts.entry(payer).or_insert(0);
        if *payer_balance < FEE {
            return Err("insufficient funds for fee".to_string());
        }
        *payer_balance -= FEE;

        for instruction in &transaction.message.instructions {
            if instruction.program_id != NATIVE_PROGRAM_ID {
                return Err(format!("unknown program {}", instruction.program_id));
            }
            let payload: NativeInstruction = borsh::from_slice(&instruction.data)
                .map_err(|e| format!("bad native payload: {e}"))?;
            let NativeInstruction::Transfer { lamports } = payload;
            let from = instruction.accounts[0].pubkey;
            let to = instruction.accounts[1].pubkey;

            let from_balance = accounts.entry(from).or_insert(0);
            if *from_balance < lamports {
                return Err("insufficient funds for transfer".to_string());
            }
            *from_balance -= lamports;
            *accounts.entry(to).or_insert(0) += lamports;
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn send_transaction(&self, wire_bytes: &[u8]) -> Result<Signature, ClientError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        let transaction = Transaction::from_wire_bytes(wire_bytes)
            .map_err(|e| ClientError::Rejected {
                reason: e.to_string(),
            })?;
        // The network re-checks signatures before accepting anything.
        transaction.verify().map_err(|e| ClientError::Rejected {
            reason: e.to_string(),
        })?;
        let signature = *transaction.primary_signature().expect("verified above");
        match self.execute(&transaction) {
            Ok(()) => self.record(signature, None),
            Err(reason) => self.record(signature, Some(reason)),
        }
        Ok(signature)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, ClientError> {
        Ok(self.statuses.lock().unwrap().get(signature).cloned())
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ClientError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(0))
    }

    async fn get_account(
        &self,
        address: &Pubkey,
    ) -> Result<Option<AccountSnapshot>, ClientError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(address)
            .map(|&lamports| AccountSnapshot {
                owner: NATIVE_PROGRAM_ID,
                lamports,
                data: Vec::new(),
            }))
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ClientError> {
        let seq = self.airdrop_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&seq.to_le_bytes());
        let signature = Signature::new(bytes);

        *self.accounts.lock().unwrap().entry(*address).or_insert(0) += lamports;
        self.record(signature, None);
        Ok(signature)
    }

    async fn get_latest_block_reference(&self) -> Result<BlockReference, ClientError> {
        Ok(BlockReference([7u8; 32]))
    }

    async fn is_block_reference_valid(
        &self,
        _reference: &BlockReference,
    ) -> Result<bool, ClientError> {
        Ok(true)
    }
}

fn client(ledger: Arc<MockLedger>) -> SubmissionClient {
    SubmissionClient::new(ledger).with_confirm_policy(ConfirmPolicy {
        poll_interval_ms: 1,
        max_attempts: 5,
        target: Commitment::Confirmed,
    })
}

fn signed_transfer(sender: &Keypair, to: Pubkey, lamports: u64) -> Transaction {
    let instruction = transfer(sender.pubkey(), to, lamports).unwrap();
    UnsignedTransaction::assemble(vec![instruction], BlockReference([7u8; 32]))
        .unwrap()
        .sign(&[sender])
        .unwrap()
}

#[tokio::test]
async fn under_signed_transaction_never_reaches_the_network() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate().pubkey();
    let ledger = MockLedger::new();
    let client = client(ledger.clone());

    let instruction = transfer(sender.pubkey(), receiver, 100).unwrap();
    let unsigned =
        UnsignedTransaction::assemble(vec![instruction], BlockReference([7u8; 32])).unwrap();
    let stripped = Transaction {
        message: unsigned.message().clone(),
        signatures: vec![],
    };

    let err = client.submit(&stripped).await.unwrap_err();
    match err {
        ClientError::Core(CoreError::MissingSigner { signer }) => {
            assert_eq!(signer, sender.pubkey());
        }
        other => panic!("expected MissingSigner, got {other:?}"),
    }
    assert_eq!(ledger.send_calls(), 0, "validation must stay local");
}

#[tokio::test]
async fn transfer_end_to_end_updates_both_balances() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate().pubkey();
    let ledger = MockLedger::new().with_account(sender.pubkey(), COIN);
    let client = client(ledger.clone());

    let amount = COIN / 100; // 0.01
    let transaction = signed_transfer(&sender, receiver, amount);
    let result = client.submit_and_confirm(&transaction).await.unwrap();
    assert_eq!(result.status, SubmissionStatus::Finalized);

    // Both reads reflect the post-state, not the pre-state.
    let sender_after = client.get_balance(&sender.pubkey()).await.unwrap();
    let receiver_after = client.get_balance(&receiver).await.unwrap();
    assert_eq!(sender_after, COIN - amount - FEE);
    assert_eq!(receiver_after, amount);
}

#[tokio::test]
async fn airdrop_then_fetch_reflects_the_new_balance() {
    let target = Keypair::generate().pubkey();
    let ledger = MockLedger::new();
    let client = client(ledger);

    assert_eq!(client.get_balance(&target).await.unwrap(), 0);

    let result = client.airdrop_and_confirm(&target, 500).await.unwrap();
    assert!(result.status.satisfies(Commitment::Confirmed));

    let snapshot = client.fetch_account(&target).await.unwrap();
    assert_eq!(snapshot.lamports, 500);
}

#[tokio::test]
async fn absent_account_is_account_not_found() {
    let nowhere = Keypair::generate().pubkey();
    let client = client(MockLedger::new());

    let err = client.fetch_account(&nowhere).await.unwrap_err();
    match err {
        ClientError::AccountNotFound { address } => assert_eq!(address, nowhere),
        other => panic!("expected AccountNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn execution_failure_surfaces_as_failed_status() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate().pubkey();
    // Enough for the fee, nowhere near enough for the transfer.
    let ledger = MockLedger::new().with_account(sender.pubkey(), FEE + 10);
    let client = client(ledger);

    let transaction = signed_transfer(&sender, receiver, COIN);
    let result = client.submit_and_confirm(&transaction).await.unwrap();
    match &result.status {
        SubmissionStatus::Failed { reason } => assert!(reason.contains("insufficient")),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_submissions_do_not_interfere() {
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let carol = Keypair::generate().pubkey();
    let ledger = MockLedger::new()
        .with_account(alice.pubkey(), COIN)
        .with_account(bob.pubkey(), COIN);
    let client = client(ledger);

    let tx_a = signed_transfer(&alice, carol, 1_000);
    let tx_b = signed_transfer(&bob, carol, 2_000);

    let (a, b) = tokio::join!(
        client.submit_and_confirm(&tx_a),
        client.submit_and_confirm(&tx_b),
    );
    assert_eq!(a.unwrap().status, SubmissionStatus::Finalized);
    assert_eq!(b.unwrap().status, SubmissionStatus::Finalized);

    assert_eq!(client.get_balance(&carol).await.unwrap(), 3_000);
    assert_eq!(
        client.get_balance(&alice.pubkey()).await.unwrap(),
        COIN - 1_000 - FEE
    );
}
