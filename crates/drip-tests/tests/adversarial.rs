//! Adversarial property-based tests for the Drip ledger.
//!
//! Random call sequences (including unauthorized callers, zero amounts,
//! over-withdrawals and block regressions) are thrown at a ledger. After
//! every call, successful or not, the ledger invariants must hold.
//!
//! Properties checked:
//! - Productivity sum matches the global total
//! - Accumulator and mint cumulation never decrease
//! - Realized supply never exceeds what was minted
//! - Failed calls leave no trace (state and event log unchanged)
//! - Reward paid out never depends on how often participants poke the ledger

use proptest::prelude::*;

use drip_core::constants::COIN;
use drip_core::traits::Custody;
use drip_core::types::{Address, U256};
use drip_ledger::Ledger;
use drip_tests::helpers::*;

// ---------------------------------------------------------------------------
// Operation model
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Op {
    Increase { who: u8, value: u128 },
    Decrease { who: u8, value: u128 },
    Mint { who: u8 },
    Transfer { from: u8, to: u8, value: u128 },
    SetRate { by_governor: bool, rate: u128 },
    Advance { blocks: u64 },
    Rewind,
}

fn participant(who: u8) -> Address {
    addr(1 + who % 4)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..4, 0u128..1_000).prop_map(|(who, value)| Op::Increase { who, value }),
        3 => (0u8..4, 0u128..1_200).prop_map(|(who, value)| Op::Decrease { who, value }),
        3 => (0u8..4).prop_map(|who| Op::Mint { who }),
        2 => (0u8..4, 0u8..4, 0u128..(5 * COIN))
            .prop_map(|(from, to, value)| Op::Transfer { from, to, value }),
        1 => (any::<bool>(), 0u128..(3 * COIN))
            .prop_map(|(by_governor, rate)| Op::SetRate { by_governor, rate }),
        4 => (0u64..20).prop_map(|blocks| Op::Advance { blocks }),
        1 => Just(Op::Rewind),
    ]
}

/// Apply one op at `block`. Returns whether it succeeded.
fn apply(ledger: &mut Ledger, op: &Op, block: &mut u64) -> bool {
    match *op {
        Op::Increase { who, value } => ledger
            .increase_productivity(&at(DEPLOYER, *block), &participant(who), value)
            .is_ok(),
        Op::Decrease { who, value } => ledger
            .decrease_productivity(&at(DEPLOYER, *block), &participant(who), value)
            .is_ok(),
        Op::Mint { who } => ledger.mint(&at(participant(who), *block)).is_ok(),
        Op::Transfer { from, to, value } => ledger
            .transfer(&at(participant(from), *block), &participant(to), value)
            .is_ok(),
        Op::SetRate { by_governor, rate } => {
            let caller = if by_governor { DEPLOYER } else { addr(0xEE) };
            ledger
                .change_interest_rate_per_block(&at(caller, *block), rate)
                .is_ok()
        }
        Op::Advance { blocks } => {
            *block += blocks;
            true
        }
        // Calls at an earlier height than the last settlement must bounce.
        Op::Rewind => {
            let last = ledger.global().last_reward_block;
            last == 0 || ledger.mint(&at(participant(0), last - 1)).is_ok()
        }
    }
}

// ---------------------------------------------------------------------------
// Invariants under random sequences
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn invariants_hold_after_every_call(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = deployed();
        let mut block = 0u64;
        let mut last_acc = U256::zero();
        let mut last_minted = 0u128;

        for op in &ops {
            apply(&mut ledger, op, &mut block);

            prop_assert!(ledger.check_invariants().is_ok(), "after {:?}", op);
            let g = ledger.global();
            prop_assert!(g.acc_amount_per_share >= last_acc);
            prop_assert!(g.mint_cumulation >= last_minted);
            prop_assert!(ledger.total_supply() <= g.mint_cumulation);
            last_acc = g.acc_amount_per_share;
            last_minted = g.mint_cumulation;
        }
    }

    #[test]
    fn failed_calls_leave_no_trace(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = deployed();
        let mut block = 0u64;

        for op in &ops {
            if matches!(op, Op::Advance { .. }) {
                apply(&mut ledger, op, &mut block);
                continue;
            }
            let before = ledger.to_snapshot();
            let events_before = ledger.events().len();
            if !apply(&mut ledger, op, &mut block) {
                prop_assert_eq!(ledger.to_snapshot(), before, "after {:?}", op);
                prop_assert_eq!(ledger.events().len(), events_before);
            }
        }
    }

    #[test]
    fn take_matches_mint(
        weights in prop::collection::vec(1u128..10_000, 1..6),
        blocks in 1u64..500,
    ) {
        let mut ledger = deployed();
        for (i, w) in weights.iter().enumerate() {
            ledger.increase_productivity(&at(DEPLOYER, 0), &addr(i as u8 + 1), *w).unwrap();
        }
        for i in 0..weights.len() {
            let who = addr(i as u8 + 1);
            let quoted = ledger.take(&at(who, blocks)).unwrap();
            prop_assert_eq!(ledger.take(&at(who, blocks)).unwrap(), quoted);
            prop_assert_eq!(ledger.mint(&at(who, blocks)).unwrap(), quoted);
            prop_assert_eq!(ledger.mint(&at(who, blocks)).unwrap(), 0);
        }
    }

    /// A participant who mints every block ends up with the same balance
    /// (up to flooring dust) as one who mints only at the end.
    #[test]
    fn poking_does_not_change_payout(
        wa in 1u128..1_000,
        wb in 1u128..1_000,
        blocks in 1u64..200,
    ) {
        let (a, b) = (addr(0xA), addr(0xB));
        let mut lazy = deployed();
        lazy.increase_productivity(&at(DEPLOYER, 0), &a, wa).unwrap();
        lazy.increase_productivity(&at(DEPLOYER, 0), &b, wb).unwrap();
        let mut eager = lazy.clone();

        for blk in 1..=blocks {
            eager.mint(&at(a, blk)).unwrap();
        }
        lazy.mint(&at(a, blocks)).unwrap();

        let diff = lazy.balance_of(&a).abs_diff(eager.balance_of(&a));
        // Each extra mint floors at most one base unit plus accumulator dust.
        prop_assert!(diff <= 2 * blocks as u128);
        prop_assert_eq!(
            lazy.global().mint_cumulation,
            eager.global().mint_cumulation
        );
    }

    #[test]
    fn pool_stake_cycles_conserve_collateral(
        amounts in prop::collection::vec((0u8..3, 1u128..300, any::<bool>()), 1..40),
    ) {
        let owners = [addr(0x21), addr(0x22), addr(0x23)];
        let (mut ledger, mut pool) = with_pool(&owners, 1_000);
        let funded = 3 * 1_000u128;

        for (block, (who, amount, unstake)) in amounts.into_iter().enumerate() {
            let owner = owners[who as usize];
            let ctx = at(owner, block as u64);
            let _ = if unstake {
                pool.unstake(&mut ledger, &ctx, amount)
            } else {
                pool.stake(&mut ledger, &ctx, amount)
            };

            let wallets: u128 = owners.iter().map(|o| pool.custody().wallet(o)).sum();
            prop_assert_eq!(wallets + pool.custody().held(), funded);
            prop_assert_eq!(pool.custody().held(), ledger.global().total_productivity);
            prop_assert!(ledger.check_invariants().is_ok());
        }
    }
}

// ---------------------------------------------------------------------------
// Targeted attacks
// ---------------------------------------------------------------------------

#[test]
fn outsider_cannot_touch_registry_or_governance() {
    let mut ledger = deployed();
    let eve = addr(0xEE);
    let before = ledger.to_snapshot();

    assert!(ledger.increase_productivity(&at(eve, 1), &eve, 1).is_err());
    assert!(ledger.decrease_productivity(&at(eve, 1), &addr(1), 1).is_err());
    assert!(ledger.change_interest_rate_per_block(&at(eve, 1), u128::MAX).is_err());
    assert!(ledger.change_governor(&at(eve, 1), &eve).is_err());
    assert!(ledger.upgrade_impl(&at(eve, 1), &eve).is_err());

    assert_eq!(ledger.to_snapshot(), before);
    assert!(ledger.events().is_empty());
}

#[test]
fn huge_rate_overflow_is_rejected_cleanly() {
    let mut ledger = deployed();
    let a = addr(0xA);
    ledger.increase_productivity(&at(DEPLOYER, 0), &a, 1).unwrap();
    ledger
        .change_interest_rate_per_block(&at(DEPLOYER, 0), u128::MAX)
        .unwrap();
    ledger.drain_events();
    let before = ledger.to_snapshot();

    assert!(ledger.mint(&at(a, 2)).is_err());
    assert_eq!(ledger.to_snapshot(), before);
    assert!(ledger.events().is_empty());
}

#[test]
fn self_transfer_keeps_balance() {
    let mut ledger = deployed();
    let a = addr(0xA);
    ledger.increase_productivity(&at(DEPLOYER, 0), &a, 1).unwrap();
    ledger.mint(&at(a, 3)).unwrap();
    ledger.transfer(&at(a, 3), &a, 3 * COIN).unwrap();
    assert_eq!(ledger.balance_of(&a), 3 * COIN);
    ledger.check_invariants().unwrap();
}
