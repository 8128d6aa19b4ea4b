//! Assembly and signing invariants: every required signer signs the
//! canonical message bytes, and a signed transaction round-trips
//! through its wire form without losing the signer set.

use helio_core::error::CoreError;
use helio_core::instruction::{program_call, transfer, AccountMeta};
use helio_core::keys::Keypair;
use helio_core::transaction::{BlockReference, Transaction, UnsignedTransaction};

fn reference() -> BlockReference {
    BlockReference([7u8; 32])
}

#[test]
fn empty_transaction_is_rejected() {
    let err = UnsignedTransaction::assemble(vec![], reference()).unwrap_err();
    assert!(matches!(err, CoreError::EmptyTransaction));
}

#[test]
fn signing_without_required_keypair_fails() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate().pubkey();
    let bystander = Keypair::generate();

    let instruction = transfer(sender.pubkey(), receiver, 100).unwrap();
    let unsigned = UnsignedTransaction::assemble(vec![instruction], reference()).unwrap();

    let err = unsigned.sign(&[&bystander]).unwrap_err();
    match err {
        CoreError::MissingSigner { signer } => assert_eq!(signer, sender.pubkey()),
        other => panic!("expected MissingSigner, got {other:?}"),
    }
}

#[test]
fn signing_is_deterministic() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate().pubkey();

    let instruction = transfer(sender.pubkey(), receiver, 100).unwrap();
    let unsigned = UnsignedTransaction::assemble(vec![instruction], reference()).unwrap();

    let first = unsigned.sign(&[&sender]).unwrap();
    let second = unsigned.sign(&[&sender]).unwrap();
    assert_eq!(
        first.signatures[0].signature, second.signatures[0].signature,
        "same content and keypair must yield identical signature bytes"
    );
}

#[test]
fn signing_does_not_mutate_the_unsigned_transaction() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate().pubkey();

    let instruction = transfer(sender.pubkey(), receiver, 100).unwrap();
    let unsigned = UnsignedTransaction::assemble(vec![instruction], reference()).unwrap();
    let before = unsigned.clone();

    let _ = unsigned.sign(&[&sender]).unwrap();
    assert_eq!(unsigned, before);
}

#[test]
fn wire_round_trip_recovers_exactly_the_signer_set() {
    let payer = Keypair::generate();
    let authority = Keypair::generate();
    let program = Keypair::generate().pubkey();
    let state = Keypair::generate().pubkey();

    // Two instructions; `payer` signs in both, so it must appear once.
    let first = transfer(payer.pubkey(), state, 50).unwrap();
    let second = program_call(
        program,
        vec![
            AccountMeta::writable(state, false),
            AccountMeta::readonly(authority.pubkey(), true),
            AccountMeta::readonly(payer.pubkey(), true),
        ],
        vec![1],
    )
    .unwrap();

    let unsigned = UnsignedTransaction::assemble(vec![first, second], reference()).unwrap();
    let signed = unsigned.sign(&[&payer, &authority]).unwrap();

    let wire = signed.to_wire_bytes().unwrap();
    let decoded = Transaction::from_wire_bytes(&wire).unwrap();
    decoded.verify().unwrap();

    assert_eq!(decoded.signers(), vec![payer.pubkey(), authority.pubkey()]);
}

#[test]
fn surplus_keypairs_are_ignored() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate().pubkey();
    let extra = Keypair::generate();

    let instruction = transfer(sender.pubkey(), receiver, 100).unwrap();
    let unsigned = UnsignedTransaction::assemble(vec![instruction], reference()).unwrap();
    let signed = unsigned.sign(&[&extra, &sender]).unwrap();

    assert_eq!(signed.signers(), vec![sender.pubkey()]);
    signed.verify().unwrap();
}

#[test]
fn tampered_message_fails_verification() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate().pubkey();

    let instruction = transfer(sender.pubkey(), receiver, 100).unwrap();
    let unsigned = UnsignedTransaction::assemble(vec![instruction], reference()).unwrap();
    let mut signed = unsigned.sign(&[&sender]).unwrap();

    // Change the freshness token after signing.
    signed.message.recent_block_reference = BlockReference([9u8; 32]);

    let err = signed.verify().unwrap_err();
    match err {
        CoreError::InvalidSignature { signer } => assert_eq!(signer, sender.pubkey()),
        other => panic!("expected InvalidSignature, got {other:?}"),
    }
}

#[test]
fn stripped_signature_fails_verification() {
    let sender = Keypair::generate();
    let receiver = Keypair::generate().pubkey();

    let instruction = transfer(sender.pubkey(), receiver, 100).unwrap();
    let unsigned = UnsignedTransaction::assemble(vec![instruction], reference()).unwrap();
    let mut signed = unsigned.sign(&[&sender]).unwrap();
    signed.signatures.clear();

    assert!(matches!(
        signed.verify().unwrap_err(),
        CoreError::MissingSigner { .. }
    ));
}
