use mixpool_privacy::commitment::{
    commit, default_h_point, point_coords, random_blinding, split_blinding,
};
use mixpool_privacy::hash::Hash;
use mixpool_privacy::note::NoteSecret;
use mixpool_prover::CircuitKind;
use mixpool_prover::public_inputs::{
    AuthorizePublicInput, DepositPublicInput, TransferInputPublicInput,
    TransferOutputPublicInput, WithdrawPublicInput,
};
use mixpool_prover::snark::{self, Groth16Verifier};
use mixpool_prover::witness::DepositWitness;

use crate::error::PoolError;
use crate::types::{
    AuthorizeAction, ConfigAction, DepositAction, MixAction, TransferAction, WithdrawAction,
    ZkProofInfo,
};

use super::{AlwaysValid, GOV, KeyedVerifier, hash, plain_note, register_all_keys, test_executor};

fn proof_for(public_input: String) -> ZkProofInfo {
    ZkProofInfo {
        proof: "00".to_string(),
        public_input,
        secrets: None,
    }
}

fn deposit_action(secret: &NoteSecret) -> MixAction {
    let public = DepositPublicInput {
        note_hash: secret.note_hash(),
        amount: secret.amount,
    };
    MixAction::Deposit(DepositAction {
        proofs: vec![proof_for(public.encode())],
    })
}

fn withdraw_action(secret: &NoteSecret, root: Hash, spend_hash: Hash) -> MixAction {
    let public = WithdrawPublicInput {
        tree_root_hash: root,
        authorize_spend_hash: spend_hash,
        nullifier_hash: secret.nullifier(),
        amount: secret.amount,
    };
    MixAction::Withdraw(WithdrawAction {
        proofs: vec![proof_for(public.encode())],
        amount: secret.amount,
    })
}

#[test]
fn deposit_withdraw_then_double_spend_fails() {
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 1000);

    let secret = plain_note(1000, 7);
    let receipt = executor.execute("alice", &deposit_action(&secret)).unwrap();
    let root = receipt.tree.unwrap().root;
    assert_eq!(executor.ledger.balance("alice"), 0);
    assert_eq!(executor.ledger.balance("mix-pool"), 1000);

    let withdraw = withdraw_action(&secret, root, Hash::zero());
    executor.execute("alice", &withdraw).unwrap();
    assert_eq!(executor.ledger.balance("alice"), 1000);
    assert_eq!(executor.ledger.balance("mix-pool"), 0);

    match executor.execute("alice", &withdraw) {
        Err(PoolError::DoubleSpend(n)) => assert_eq!(n, secret.nullifier()),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn withdraw_against_unknown_root_rejected() {
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    let secret = plain_note(100, 8);
    assert!(matches!(
        executor.execute("alice", &withdraw_action(&secret, hash(404), Hash::zero())),
        Err(PoolError::UnknownRoot(_))
    ));
}

#[test]
fn withdraw_claiming_wrong_total_rejected() {
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 100);

    let secret = plain_note(100, 9);
    let root = executor
        .execute("alice", &deposit_action(&secret))
        .unwrap()
        .tree
        .unwrap()
        .root;

    let public = WithdrawPublicInput {
        tree_root_hash: root,
        authorize_spend_hash: Hash::zero(),
        nullifier_hash: secret.nullifier(),
        amount: 100,
    };
    let action = MixAction::Withdraw(WithdrawAction {
        proofs: vec![proof_for(public.encode())],
        amount: 150,
    });
    assert!(matches!(
        executor.execute("alice", &action),
        Err(PoolError::ValueMismatch(_))
    ));
    // The nullifier was not consumed by the failed attempt.
    executor
        .execute("alice", &withdraw_action(&secret, root, Hash::zero()))
        .unwrap();
}

#[test]
fn transfer_conserves_value_and_charges_fee() {
    let mut rng = rand::thread_rng();
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 500);

    let input_secret = plain_note(500, 21);
    let root = executor
        .execute("alice", &deposit_action(&input_secret))
        .unwrap()
        .tree
        .unwrap()
        .root;

    let h = default_h_point();
    let r_in = random_blinding(&mut rng);
    let (r_out, r_chg) = split_blinding(&r_in, &mut rng);
    let c_in = commit(500, &r_in, &h);
    let c_out = commit(300, &r_out, &h);
    let c_chg = commit(195, &r_chg, &h);

    let (in_x, in_y) = point_coords(&c_in);
    let input_public = TransferInputPublicInput {
        tree_root_hash: root,
        authorize_spend_hash: Hash::zero(),
        nullifier_hash: input_secret.nullifier(),
        shield_amount_x: Hash::from_field(&in_x),
        shield_amount_y: Hash::from_field(&in_y),
    };

    let (h_x, h_y) = point_coords(&h);
    let output_public = |note: &NoteSecret, c: &ark_ed_on_bn254::EdwardsAffine| {
        let (x, y) = point_coords(c);
        TransferOutputPublicInput {
            note_hash: note.note_hash(),
            shield_amount_x: Hash::from_field(&x),
            shield_amount_y: Hash::from_field(&y),
            shield_point_h_x: Hash::from_field(&h_x),
            shield_point_h_y: Hash::from_field(&h_y),
        }
    };
    let out_note = plain_note(300, 22);
    let chg_note = plain_note(195, 23);

    let action = MixAction::Transfer(TransferAction {
        inputs: vec![proof_for(input_public.encode())],
        output: proof_for(output_public(&out_note, &c_out).encode()),
        change: proof_for(output_public(&chg_note, &c_chg).encode()),
    });
    let receipt = executor.execute("alice", &action).unwrap();

    assert_eq!(executor.ledger.balance("mix-pool-fee"), 5);
    assert_eq!(executor.ledger.balance("mix-pool"), 495);
    // Both new notes are provable leaves.
    let tree = receipt.tree.unwrap();
    for note in [&out_note, &chg_note] {
        let proof =
            crate::query::get_tree_path(executor.tree(), &executor.store, &note.note_hash(), None)
                .unwrap();
        assert!(proof.verify());
    }
    assert_eq!(tree.leaves_total, 4); // sentinel + deposit + two outputs

    // The input nullifier is gone.
    assert!(matches!(
        executor.execute("alice", &withdraw_action(&input_secret, root, Hash::zero())),
        Err(PoolError::DoubleSpend(_))
    ));
}

#[test]
fn batched_deposit_debits_total_once() {
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 500);

    let first = plain_note(300, 91);
    let second = plain_note(200, 92);
    let action = MixAction::Deposit(DepositAction {
        proofs: vec![
            proof_for(
                DepositPublicInput {
                    note_hash: first.note_hash(),
                    amount: first.amount,
                }
                .encode(),
            ),
            proof_for(
                DepositPublicInput {
                    note_hash: second.note_hash(),
                    amount: second.amount,
                }
                .encode(),
            ),
        ],
    });
    let receipt = executor.execute("alice", &action).unwrap();

    // One debit for the whole batch.
    assert_eq!(executor.ledger.balance("alice"), 0);
    assert_eq!(executor.ledger.balance("mix-pool"), 500);
    assert_eq!(receipt.tree.unwrap().leaves_total, 3); // sentinel + both notes
    for note in [&first, &second] {
        let proof = executor
            .tree()
            .prove_membership(&executor.store, &note.note_hash(), None)
            .unwrap();
        assert!(proof.verify());
    }
}

#[test]
fn deposit_repeating_a_note_hash_rejected() {
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 200);

    let note = plain_note(100, 93);
    let proof = proof_for(
        DepositPublicInput {
            note_hash: note.note_hash(),
            amount: note.amount,
        }
        .encode(),
    );
    let action = MixAction::Deposit(DepositAction {
        proofs: vec![proof.clone(), proof],
    });
    assert!(matches!(
        executor.execute("alice", &action),
        Err(PoolError::MalformedInput(_))
    ));
    // Nothing was debited.
    assert_eq!(executor.ledger.balance("alice"), 200);
}

#[test]
fn multi_input_transfer_balances_across_notes() {
    let mut rng = rand::thread_rng();
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 500);

    let note_a = plain_note(300, 94);
    let note_b = plain_note(200, 95);
    let root = executor
        .execute(
            "alice",
            &MixAction::Deposit(DepositAction {
                proofs: vec![
                    proof_for(
                        DepositPublicInput {
                            note_hash: note_a.note_hash(),
                            amount: note_a.amount,
                        }
                        .encode(),
                    ),
                    proof_for(
                        DepositPublicInput {
                            note_hash: note_b.note_hash(),
                            amount: note_b.amount,
                        }
                        .encode(),
                    ),
                ],
            }),
        )
        .unwrap()
        .tree
        .unwrap()
        .root;

    let h = default_h_point();
    let r_a = random_blinding(&mut rng);
    let r_b = random_blinding(&mut rng);
    let (r_out, r_chg) = split_blinding(&(r_a + r_b), &mut rng);

    let input_public = |note: &NoteSecret, r: &ark_ed_on_bn254::Fr| {
        let (x, y) = point_coords(&commit(note.amount, r, &h));
        TransferInputPublicInput {
            tree_root_hash: root,
            authorize_spend_hash: Hash::zero(),
            nullifier_hash: note.nullifier(),
            shield_amount_x: Hash::from_field(&x),
            shield_amount_y: Hash::from_field(&y),
        }
    };
    let (h_x, h_y) = point_coords(&h);
    let output_public = |note: &NoteSecret, amount: u64, r: &ark_ed_on_bn254::Fr| {
        let (x, y) = point_coords(&commit(amount, r, &h));
        TransferOutputPublicInput {
            note_hash: note.note_hash(),
            shield_amount_x: Hash::from_field(&x),
            shield_amount_y: Hash::from_field(&y),
            shield_point_h_x: Hash::from_field(&h_x),
            shield_point_h_y: Hash::from_field(&h_y),
        }
    };
    let out_note = plain_note(450, 96);
    let chg_note = plain_note(45, 97);

    // 300 + 200 = 450 + 45 + fee 5, summed over both input commitments.
    let action = MixAction::Transfer(TransferAction {
        inputs: vec![
            proof_for(input_public(&note_a, &r_a).encode()),
            proof_for(input_public(&note_b, &r_b).encode()),
        ],
        output: proof_for(output_public(&out_note, 450, &r_out).encode()),
        change: proof_for(output_public(&chg_note, 45, &r_chg).encode()),
    });
    executor.execute("alice", &action).unwrap();
    assert_eq!(executor.ledger.balance("mix-pool-fee"), 5);

    // Both input nullifiers are consumed.
    for note in [&note_a, &note_b] {
        assert!(matches!(
            executor.execute("alice", &withdraw_action(note, root, Hash::zero())),
            Err(PoolError::DoubleSpend(_))
        ));
    }
}

#[test]
fn transfer_repeating_an_input_nullifier_rejected() {
    let mut rng = rand::thread_rng();
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 500);

    let note = plain_note(500, 98);
    let root = executor
        .execute("alice", &deposit_action(&note))
        .unwrap()
        .tree
        .unwrap()
        .root;

    let h = default_h_point();
    let r = random_blinding(&mut rng);
    let (x, y) = point_coords(&commit(note.amount, &r, &h));
    let input = proof_for(
        TransferInputPublicInput {
            tree_root_hash: root,
            authorize_spend_hash: Hash::zero(),
            nullifier_hash: note.nullifier(),
            shield_amount_x: Hash::from_field(&x),
            shield_amount_y: Hash::from_field(&y),
        }
        .encode(),
    );
    let (h_x, h_y) = point_coords(&h);
    let output = |note_hash: Hash| {
        proof_for(
            TransferOutputPublicInput {
                note_hash,
                shield_amount_x: Hash::from_field(&x),
                shield_amount_y: Hash::from_field(&y),
                shield_point_h_x: Hash::from_field(&h_x),
                shield_point_h_y: Hash::from_field(&h_y),
            }
            .encode(),
        )
    };

    // The same note opened twice in one transfer.
    let action = MixAction::Transfer(TransferAction {
        inputs: vec![input.clone(), input],
        output: output(hash(1)),
        change: output(hash(2)),
    });
    match executor.execute("alice", &action) {
        Err(PoolError::DoubleSpend(n)) => assert_eq!(n, note.nullifier()),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn zero_valued_change_output_accepted() {
    let mut rng = rand::thread_rng();
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 500);

    let input_secret = plain_note(500, 99);
    let root = executor
        .execute("alice", &deposit_action(&input_secret))
        .unwrap()
        .tree
        .unwrap()
        .root;

    let h = default_h_point();
    let r_in = random_blinding(&mut rng);
    let (r_out, r_chg) = split_blinding(&r_in, &mut rng);
    let (in_x, in_y) = point_coords(&commit(500, &r_in, &h));
    let (h_x, h_y) = point_coords(&h);
    let output_public = |note: &NoteSecret, c: &ark_ed_on_bn254::EdwardsAffine| {
        let (x, y) = point_coords(c);
        TransferOutputPublicInput {
            note_hash: note.note_hash(),
            shield_amount_x: Hash::from_field(&x),
            shield_amount_y: Hash::from_field(&y),
            shield_point_h_x: Hash::from_field(&h_x),
            shield_point_h_y: Hash::from_field(&h_y),
        }
    };

    // A transfer spending its whole input still carries a change note; the
    // commitment hides that it is worth nothing.
    let out_note = plain_note(495, 100);
    let chg_note = plain_note(0, 101);
    let action = MixAction::Transfer(TransferAction {
        inputs: vec![proof_for(
            TransferInputPublicInput {
                tree_root_hash: root,
                authorize_spend_hash: Hash::zero(),
                nullifier_hash: input_secret.nullifier(),
                shield_amount_x: Hash::from_field(&in_x),
                shield_amount_y: Hash::from_field(&in_y),
            }
            .encode(),
        )],
        output: proof_for(output_public(&out_note, &commit(495, &r_out, &h)).encode()),
        change: proof_for(output_public(&chg_note, &commit(0, &r_chg, &h)).encode()),
    });
    executor.execute("alice", &action).unwrap();

    // The empty change note is a real leaf like any other.
    let proof = executor
        .tree()
        .prove_membership(&executor.store, &chg_note.note_hash(), None)
        .unwrap();
    assert!(proof.verify());
}

#[test]
fn unbalanced_transfer_rejected() {
    let mut rng = rand::thread_rng();
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 500);

    let input_secret = plain_note(500, 31);
    let root = executor
        .execute("alice", &deposit_action(&input_secret))
        .unwrap()
        .tree
        .unwrap()
        .root;

    let h = default_h_point();
    let r_in = random_blinding(&mut rng);
    let (r_out, r_chg) = split_blinding(&r_in, &mut rng);
    let (h_x, h_y) = point_coords(&h);
    let coords = |c: &ark_ed_on_bn254::EdwardsAffine| {
        let (x, y) = point_coords(c);
        (Hash::from_field(&x), Hash::from_field(&y))
    };

    let (in_x, in_y) = coords(&commit(500, &r_in, &h));
    // 301 + 195 + 5 != 500.
    let (out_x, out_y) = coords(&commit(301, &r_out, &h));
    let (chg_x, chg_y) = coords(&commit(195, &r_chg, &h));

    let action = MixAction::Transfer(TransferAction {
        inputs: vec![proof_for(
            TransferInputPublicInput {
                tree_root_hash: root,
                authorize_spend_hash: Hash::zero(),
                nullifier_hash: input_secret.nullifier(),
                shield_amount_x: in_x,
                shield_amount_y: in_y,
            }
            .encode(),
        )],
        output: proof_for(
            TransferOutputPublicInput {
                note_hash: hash(1),
                shield_amount_x: out_x,
                shield_amount_y: out_y,
                shield_point_h_x: Hash::from_field(&h_x),
                shield_point_h_y: Hash::from_field(&h_y),
            }
            .encode(),
        ),
        change: proof_for(
            TransferOutputPublicInput {
                note_hash: hash(2),
                shield_amount_x: chg_x,
                shield_amount_y: chg_y,
                shield_point_h_x: Hash::from_field(&h_x),
                shield_point_h_y: Hash::from_field(&h_y),
            }
            .encode(),
        ),
    });
    assert!(matches!(
        executor.execute("alice", &action),
        Err(PoolError::ValueMismatch(_))
    ));
    // Failed transfer leaves the note spendable.
    executor
        .execute("alice", &withdraw_action(&input_secret, root, Hash::zero()))
        .unwrap();
}

#[test]
fn transfer_output_must_use_configured_generator() {
    let mut rng = rand::thread_rng();
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 500);

    let input_secret = plain_note(500, 41);
    let root = executor
        .execute("alice", &deposit_action(&input_secret))
        .unwrap()
        .tree
        .unwrap()
        .root;

    let h = default_h_point();
    let r = random_blinding(&mut rng);
    let (in_x, in_y) = point_coords(&commit(500, &r, &h));
    // A generator the pool never configured.
    let foreign = mixpool_privacy::commitment::base_point();
    let (f_x, f_y) = point_coords(&foreign);
    let (c_x, c_y) = point_coords(&commit(500, &r, &foreign));

    let output = TransferOutputPublicInput {
        note_hash: hash(1),
        shield_amount_x: Hash::from_field(&c_x),
        shield_amount_y: Hash::from_field(&c_y),
        shield_point_h_x: Hash::from_field(&f_x),
        shield_point_h_y: Hash::from_field(&f_y),
    };
    let action = MixAction::Transfer(TransferAction {
        inputs: vec![proof_for(
            TransferInputPublicInput {
                tree_root_hash: root,
                authorize_spend_hash: Hash::zero(),
                nullifier_hash: input_secret.nullifier(),
                shield_amount_x: Hash::from_field(&in_x),
                shield_amount_y: Hash::from_field(&in_y),
            }
            .encode(),
        )],
        output: proof_for(output.clone().encode()),
        change: proof_for(output.encode()),
    });
    assert!(matches!(
        executor.execute("alice", &action),
        Err(PoolError::ValueMismatch(_))
    ));
}

#[test]
fn authorization_gates_delegated_spends() {
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    executor.ledger.credit("alice", 200);

    let mut secret = plain_note(200, 51);
    secret.authorize_key = hash(77);
    let root = executor
        .execute("alice", &deposit_action(&secret))
        .unwrap()
        .tree
        .unwrap()
        .root;
    let spend_hash = secret.authorize_spend_hash(&secret.receiver_key);

    // Spending before the authorizer signs off is refused.
    match executor.execute("alice", &withdraw_action(&secret, root, spend_hash)) {
        Err(PoolError::AuthorizationMissing(h)) => assert_eq!(h, spend_hash),
        other => panic!("unexpected: {other:?}"),
    }

    let authorize = MixAction::Authorize(AuthorizeAction {
        proof: proof_for(
            AuthorizePublicInput {
                tree_root_hash: root,
                authorize_hash: secret.authorize_hash(),
                authorize_spend_hash: spend_hash,
            }
            .encode(),
        ),
    });
    executor.execute("auth", &authorize).unwrap();

    // Replaying the same authorization is refused.
    assert!(matches!(
        executor.execute("auth", &authorize),
        Err(PoolError::AuthorizationReplay(_))
    ));

    executor
        .execute("alice", &withdraw_action(&secret, root, spend_hash))
        .unwrap();
    assert_eq!(executor.ledger.balance("alice"), 200);
}

#[test]
fn config_requires_manager() {
    let mut executor = test_executor(AlwaysValid);
    let action = MixAction::Config(ConfigAction::AuthPubKey {
        key: hash(1),
        add: true,
    });
    assert!(matches!(
        executor.execute("mallory", &action),
        Err(PoolError::NotAuthorized(_))
    ));
    executor.execute(GOV, &action).unwrap();
    assert!(crate::query::authorizer_allowed(&executor.store, &hash(1)).unwrap());
}

#[test]
fn published_payment_key_is_queryable() {
    let mut executor = test_executor(AlwaysValid);
    let payment = mixpool_privacy::keys::PaymentKey {
        addr: "alice".to_string(),
        receive_key: hash(11),
        dh_public: [7u8; 32],
    };
    executor
        .execute(GOV, &MixAction::Config(ConfigAction::PaymentKey(payment)))
        .unwrap();
    let found = crate::query::payment_pub_key(&executor.store, "alice").unwrap();
    assert_eq!(found.receive_key, hash(11));
    assert_eq!(found.dh_public, [7u8; 32]);
}

#[test]
fn verify_key_rotation_keeps_previous_key_live() {
    // The stub only accepts proofs checked against "k1".
    let mut executor = test_executor(KeyedVerifier(b"k1".to_vec()));
    fn rotate(
        executor: &mut crate::executor::MixExecutor<
            crate::storage::MemoryStore,
            crate::executor::MemoryLedger,
            KeyedVerifier,
        >,
        key: &str,
    ) {
        executor
            .execute(
                GOV,
                &MixAction::Config(ConfigAction::VerifyKey {
                    circuit: CircuitKind::Deposit,
                    key: hex::encode(key),
                }),
            )
            .unwrap();
    }
    rotate(&mut executor, "k1");
    executor.ledger.credit("alice", 10);
    executor
        .execute("alice", &deposit_action(&plain_note(10, 61)))
        .unwrap();

    // One rotation later, k1 is still in the ring.
    rotate(&mut executor, "k2");
    executor.ledger.credit("alice", 10);
    executor
        .execute("alice", &deposit_action(&plain_note(10, 62)))
        .unwrap();

    // A second rotation evicts it.
    rotate(&mut executor, "k3");
    executor.ledger.credit("alice", 10);
    assert!(matches!(
        executor.execute("alice", &deposit_action(&plain_note(10, 63))),
        Err(PoolError::ProofInvalid(_))
    ));
}

#[test]
fn insufficient_balance_fails_before_state_writes() {
    let mut executor = test_executor(AlwaysValid);
    register_all_keys(&mut executor);
    // Alice holds nothing.
    let secret = plain_note(1000, 71);
    assert!(matches!(
        executor.execute("alice", &deposit_action(&secret)),
        Err(PoolError::Ledger(_))
    ));
    // The note never entered the tree.
    assert!(matches!(
        executor
            .tree()
            .prove_membership(&executor.store, &secret.note_hash(), None),
        Err(PoolError::LeafNotFound(_))
    ));
}

// Full path with real Groth16 material instead of the stub verifier.
#[test]
fn real_deposit_proof_through_executor() {
    let mut rng = rand::thread_rng();
    let witness = DepositWitness {
        secret: plain_note(1000, 81),
    };
    let keys = snark::setup(mixpool_prover::circuit::DepositCircuit::blank(), &mut rng).unwrap();
    let proof = snark::prove(&keys.proving_key, witness.circuit(), &mut rng).unwrap();

    let mut executor = crate::executor::MixExecutor::new(
        crate::storage::MemoryStore::new(),
        crate::executor::MemoryLedger::new(),
        Groth16Verifier,
        super::pool_config(),
    );
    executor
        .execute(
            GOV,
            &MixAction::Config(ConfigAction::VerifyKey {
                circuit: CircuitKind::Deposit,
                key: hex::encode(&keys.verifying_key),
            }),
        )
        .unwrap();
    executor.ledger.credit("alice", 1000);

    let action = MixAction::Deposit(DepositAction {
        proofs: vec![ZkProofInfo {
            proof,
            public_input: witness.public().encode(),
            secrets: None,
        }],
    });
    executor.execute("alice", &action).unwrap();
    assert_eq!(executor.ledger.balance("mix-pool"), 1000);

    // The same proof blob with a doctored amount is rejected.
    let mut forged = witness.public();
    forged.amount = 1;
    let bad = MixAction::Deposit(DepositAction {
        proofs: vec![ZkProofInfo {
            proof: match &action {
                MixAction::Deposit(d) => d.proofs[0].proof.clone(),
                _ => unreachable!(),
            },
            public_input: forged.encode(),
            secrets: None,
        }],
    });
    assert!(matches!(
        executor.execute("alice", &bad),
        Err(PoolError::ProofInvalid(_))
    ));
}
