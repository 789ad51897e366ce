// ============================================================================
// FORMAL VERIFICATION & PROPERTY TESTS
// ============================================================================
//
// Run with: cargo test --lib formal_verification
//
// Invariants of the accounting core, checked over deterministic parameter
// grids instead of hand-picked cases:
// 1. Principal reward conservation
// 2. Boost pool conservation
// 3. Withdrawal order independence
// 4. Zero-engagement hybrid share
// 5. Accrual idempotence and monotonicity
// 6. Gamma boundaries
// ============================================================================

#[cfg(test)]
mod formal_tests {
    use anchor_lang::prelude::Pubkey;

    use crate::constants::*;
    use crate::engine::WithdrawReceipt;
    use crate::helpers::boost::boost_breakdown;
    use crate::helpers::fixed::Fixed;
    use crate::helpers::ledger::Asset;
    use crate::tests::support::*;

    #[derive(Clone, Copy, Debug)]
    enum Action {
        Deposit(u64),
        CheckIn,
    }

    /// A session plan: funding, window length, gamma and timed actions
    #[derive(Clone, Debug)]
    struct Scenario {
        total_reward: u64,
        check_in_pool: u64,
        duration: i64,
        gamma: u128,
        actions: Vec<(i64, Pubkey, Action)>,
    }

    fn user(index: u8) -> Pubkey {
        Pubkey::new_from_array([20 + index; 32])
    }

    impl Scenario {
        fn users(&self) -> Vec<Pubkey> {
            let mut users: Vec<Pubkey> = Vec::new();
            for (_, u, _) in &self.actions {
                if !users.contains(u) {
                    users.push(*u);
                }
            }
            users
        }

        fn deposit_count(&self) -> u64 {
            self.actions
                .iter()
                .filter(|(_, _, a)| matches!(a, Action::Deposit(_)))
                .count() as u64
        }

        /// Play every action, then withdraw in `order` after the window closes
        fn run(&self, order: &[Pubkey]) -> (Harness, Vec<(Pubkey, WithdrawReceipt)>) {
            let mut h = Harness::new();
            for u in self.users() {
                h.ledger.fund(Asset::Stake, u, u64::MAX / 16);
            }

            let id = h
                .create_session(self.total_reward, self.check_in_pool, T0, T0 + self.duration, T0 - 1)
                .unwrap();
            h.set_gamma(id, OWNER, self.gamma, T0 - 1).unwrap();

            let mut actions = self.actions.clone();
            actions.sort_by_key(|(at, _, _)| *at);
            for (at, u, action) in actions {
                match action {
                    Action::Deposit(amount) => h.deposit(id, u, amount, T0 + at).unwrap(),
                    Action::CheckIn => {
                        h.check_in(id, u, T0 + at).unwrap();
                    }
                }
            }

            let end = T0 + self.duration + 1;
            let receipts = order
                .iter()
                .map(|u| (*u, h.withdraw(id, *u, end).unwrap()))
                .collect();
            (h, receipts)
        }
    }

    /// Scenarios with a staker from the first second, so no reward is idle
    fn scenario_grid() -> Vec<Scenario> {
        let mut grid = Vec::new();
        let fundings: [(u64, u64); 4] = [
            (10_000 * UNIT, 5_000 * UNIT),
            (1_000_003, 999_999),
            (123_456_789_012, 7),
            (u32::MAX as u64, u32::MAX as u64),
        ];
        let durations: [i64; 3] = [3_600, 7 * DAY, 30 * DAY];
        let gammas: [u128; 4] = [0, WAD / 3, DEFAULT_GAMMA, WAD];
        let stake_sets: [[u64; 3]; 3] = [
            [6_000 * UNIT, 4_000 * UNIT, 5 * UNIT],
            [5 * UNIT, 5 * UNIT + 1, 49 * UNIT + 999_999],
            [1_000_000 * UNIT, 7 * UNIT, 123 * UNIT],
        ];
        let dust_first_stakes: [[u64; 2]; 2] = [
            [100_000 * UNIT, 100_000 * UNIT],
            [100_000 * UNIT, u64::MAX / 64],
        ];

        for &(total_reward, check_in_pool) in &fundings {
            for &duration in &durations {
                for &gamma in &gammas {
                    for stakes in &stake_sets {
                        let third = duration / 3;
                        let actions = vec![
                            (0, user(0), Action::Deposit(stakes[0])),
                            (0, user(0), Action::CheckIn),
                            (third, user(1), Action::Deposit(stakes[1])),
                            (third, user(0), Action::Deposit(stakes[2])),
                            (third + 1, user(1), Action::CheckIn),
                            (2 * third, user(2), Action::Deposit(stakes[2])),
                            (2 * third + 1, user(0), Action::CheckIn),
                            (duration, user(1), Action::Deposit(stakes[0])),
                        ];
                        grid.push(Scenario {
                            total_reward,
                            check_in_pool,
                            duration,
                            gamma,
                            actions,
                        });
                    }

                    // a single base unit staked alone for a third of the
                    // window, then stakes up to u64 scale join
                    for &[big, whale] in &dust_first_stakes {
                        let third = duration / 3;
                        let actions = vec![
                            (0, user(0), Action::Deposit(1)),
                            (third, user(1), Action::Deposit(big)),
                            (third + 1, user(1), Action::CheckIn),
                            (third + 2, user(0), Action::Deposit(5 * UNIT)),
                            (third + 3, user(0), Action::CheckIn),
                            (2 * third, user(2), Action::Deposit(whale)),
                            (2 * third + 1, user(2), Action::CheckIn),
                            (duration, user(1), Action::Deposit(whale)),
                        ];
                        grid.push(Scenario {
                            total_reward,
                            check_in_pool,
                            duration,
                            gamma,
                            actions,
                        });
                    }
                }
            }
        }
        grid
    }

    // ========================================================================
    // SECTION 1: CONSERVATION
    // ========================================================================

    mod conservation {
        use super::*;

        /// Principal payouts never exceed the funded reward; the shortfall is
        /// bounded by emission truncation plus per-operation rounding dust
        #[test]
        fn principal_reward_conservation() {
            for scenario in scenario_grid() {
                let users = scenario.users();
                let (h, receipts) = scenario.run(&users);
                let session = h.session(1);

                let paid: u64 = receipts.iter().map(|(_, r)| r.principal_reward).sum();
                assert!(
                    paid <= scenario.total_reward,
                    "overpaid {} > {} for {:?}",
                    paid,
                    scenario.total_reward,
                    scenario
                );
                assert_eq!(paid, session.total_principal_paid);

                let released = session.reward_per_second * scenario.duration as u64;
                let ops = scenario.deposit_count() + users.len() as u64;
                let dust = released - paid.min(released);
                assert!(
                    dust <= 2 * ops,
                    "dust {} above bound {} for {:?}",
                    dust,
                    2 * ops,
                    scenario
                );
                assert!(h.ledger.custody_of(Asset::Reward) >= scenario.total_reward - paid);
            }
        }

        /// Boost payouts sum to at most P and lose at most one unit per payee
        /// per pool
        #[test]
        fn boost_pool_conservation() {
            for scenario in scenario_grid() {
                let users = scenario.users();
                let (h, receipts) = scenario.run(&users);

                let paid: u64 = receipts.iter().map(|(_, r)| r.boost.total().unwrap()).sum();
                assert!(paid <= scenario.check_in_pool, "boost overpaid for {:?}", scenario);
                assert_eq!(paid, h.session(1).total_boost_paid);

                let dust = scenario.check_in_pool - paid;
                assert!(
                    dust <= 2 * users.len() as u64,
                    "boost dust {} for {:?}",
                    dust,
                    scenario
                );
            }
        }

        /// Large stakes joining after a one-unit staker settle without overflow
        #[test]
        fn dust_first_stake_settles_at_u64_scale() {
            let dust_first = scenario_grid()
                .into_iter()
                .filter(|s| matches!(s.actions[0].2, Action::Deposit(1)));
            let mut checked = 0;
            for scenario in dust_first {
                let users = scenario.users();
                let (h, receipts) = scenario.run(&users);
                let session = h.session(1);

                let staked: u64 = receipts.iter().map(|(_, r)| r.principal).sum();
                assert_eq!(staked, session.total_staked);
                assert!(session.total_staked > 100_000 * UNIT);

                let paid: u64 = receipts.iter().map(|(_, r)| r.principal_reward).sum();
                assert!(paid <= scenario.total_reward, "overpaid for {:?}", scenario);
                checked += 1;
            }
            assert!(checked > 0);
        }

        /// Every staker gets the exact principal back
        #[test]
        fn principal_returned_in_full() {
            for scenario in scenario_grid().into_iter().step_by(5) {
                let users = scenario.users();
                let (h, receipts) = scenario.run(&users);
                let staked: u64 = receipts.iter().map(|(_, r)| r.principal).sum();
                assert_eq!(staked, h.session(1).total_staked);
                assert_eq!(h.ledger.custody_of(Asset::Stake), 0);
            }
        }
    }

    // ========================================================================
    // SECTION 2: ORDER INDEPENDENCE
    // ========================================================================

    mod order_independence {
        use super::*;

        #[test]
        fn withdrawal_order_does_not_change_payouts() {
            for scenario in scenario_grid() {
                let users = scenario.users();
                let mut reversed = users.clone();
                reversed.reverse();
                let mut rotated = users.clone();
                rotated.rotate_left(1);

                let (_, forward) = scenario.run(&users);
                for order in [&reversed, &rotated] {
                    let (_, other) = scenario.run(order);
                    for (u, receipt) in &forward {
                        let (_, matching) = other
                            .iter()
                            .find(|(v, _)| v == u)
                            .unwrap();
                        assert_eq!(receipt, matching, "payout of {} depends on order", u);
                    }
                }
            }
        }

        /// Queries before any withdrawal equal the binding payouts
        #[test]
        fn estimate_matches_final_payout() {
            for scenario in scenario_grid().into_iter().step_by(3) {
                let users = scenario.users();
                let (_, receipts) = scenario.run(&users);

                let (mut h, _) = scenario.run(&[]);
                let end = T0 + scenario.duration + 1;
                for (u, receipt) in &receipts {
                    assert_eq!(h.pending_principal(1, *u, end), receipt.principal_reward);
                    assert_eq!(h.pending_boost(1, *u), receipt.boost.total().unwrap());
                }
                for u in &users {
                    h.withdraw(1, *u, end).unwrap();
                }
            }
        }
    }

    // ========================================================================
    // SECTION 3: BOOST SPLIT PROPERTIES
    // ========================================================================

    mod boost_properties {
        use super::*;

        /// A participant who never checked in gets nothing from the hybrid pool
        #[test]
        fn zero_engagement_gets_no_hybrid() {
            let gammas = [0, 1, WAD / 2, DEFAULT_GAMMA, WAD - 1, WAD];
            let stakes = [1, 5 * UNIT - 1, 50 * UNIT, 1_000_000_000 * UNIT];
            for &gamma in &gammas {
                for &stake in &stakes {
                    let mut h = Harness::new();
                    let id = h.create_session(1_000, 1_000_000, T0, T0 + DAY, T0 - 1).unwrap();
                    h.set_gamma(id, OWNER, gamma, T0 - 1).unwrap();
                    h.deposit(id, ALICE, 10 * UNIT, T0).unwrap();
                    h.check_in(id, ALICE, T0).unwrap();
                    h.deposit(id, BOB, stake, T0 + 1).unwrap();

                    let bob = boost_breakdown(h.session(id), h.participant(id, BOB).unwrap()).unwrap();
                    assert_eq!(bob.hybrid_part, 0, "gamma={} stake={}", gamma, stake);
                }
            }
        }

        /// gamma = 1: payouts are stake-proportional whatever the check-in counts
        #[test]
        fn gamma_one_ignores_engagement() {
            for extra_check_ins in 0..4i64 {
                let mut h = Harness::new();
                let id = h.create_session(1_000, 1_000_000, T0, T0 + DAY, T0 - 1).unwrap();
                h.set_gamma(id, OWNER, WAD, T0 - 1).unwrap();
                h.deposit(id, ALICE, 20 * UNIT, T0).unwrap();
                h.deposit(id, BOB, 60 * UNIT, T0).unwrap();
                h.check_in(id, BOB, T0).unwrap();
                for k in 0..=extra_check_ins {
                    h.check_in(id, ALICE, T0 + k * 300).unwrap();
                }

                let alice = boost_breakdown(h.session(id), h.participant(id, ALICE).unwrap()).unwrap();
                let bob = boost_breakdown(h.session(id), h.participant(id, BOB).unwrap()).unwrap();
                assert_eq!(alice.total().unwrap(), 250_000);
                assert_eq!(bob.total().unwrap(), 750_000);
            }
        }

        /// gamma = 0: nothing flows through the stake pool
        #[test]
        fn gamma_zero_has_no_stake_part() {
            for scenario in scenario_grid().into_iter().filter(|s| s.gamma == 0) {
                let users = scenario.users();
                let (_, receipts) = scenario.run(&users);
                for (_, r) in receipts {
                    assert_eq!(r.boost.stake_part, 0);
                }
            }
        }

        /// Splits never exceed their pool for any gamma
        #[test]
        fn parts_bounded_by_pools() {
            for scenario in scenario_grid() {
                let users = scenario.users();
                let (h, receipts) = scenario.run(&users);
                let (stake_pool, hybrid_pool) = crate::helpers::boost::split_pool(h.session(1)).unwrap();
                assert_eq!(stake_pool + hybrid_pool, scenario.check_in_pool as u128);

                let stake_sum: u128 = receipts.iter().map(|(_, r)| r.boost.stake_part as u128).sum();
                let hybrid_sum: u128 = receipts.iter().map(|(_, r)| r.boost.hybrid_part as u128).sum();
                assert!(stake_sum <= stake_pool);
                assert!(hybrid_sum <= hybrid_pool);
            }
        }
    }

    // ========================================================================
    // SECTION 4: ACCRUAL PROPERTIES
    // ========================================================================

    mod accrual {
        use super::*;

        #[test]
        fn accrue_twice_equals_once() {
            let stakes = [1u64, 7, 5 * UNIT, 1_000_000_000 * UNIT];
            let offsets = [-10i64, 0, 1, 59, 3_600, DAY, 2 * DAY];
            for &stake in &stakes {
                for &offset in &offsets {
                    let mut h = Harness::new();
                    let id = h
                        .create_session(987_654_321, 1, T0, T0 + DAY, T0 - 1)
                        .unwrap();
                    h.deposit(id, ALICE, stake, T0).unwrap();

                    let mut once = h.session(id).clone();
                    once.accrue(T0 + offset).unwrap();
                    let mut twice = once.clone();
                    twice.accrue(T0 + offset).unwrap();
                    assert_eq!(once, twice, "stake={} offset={}", stake, offset);
                }
            }
        }

        /// The accumulator never decreases and never moves past the end
        #[test]
        fn accumulator_is_monotonic() {
            let mut h = Harness::new();
            let id = h.create_session(1_000_000_007, 1, T0, T0 + 10_000, T0 - 1).unwrap();
            h.deposit(id, ALICE, 3 * UNIT, T0).unwrap();

            let mut session = h.session(id).clone();
            let mut last = Fixed::ZERO;
            for step in (0..12_000i64).step_by(37) {
                session.accrue(T0 + step).unwrap();
                assert!(session.acc_reward_per_share >= last);
                assert!(session.last_accrual_time <= T0 + 10_000);
                last = session.acc_reward_per_share;
            }
        }

        /// Restaking at any instant never lowers what is already owed
        #[test]
        fn restake_never_forfeits() {
            let times = [0i64, 1, 299, 3_600, DAY / 2, DAY];
            let amounts = [1u64, 5 * UNIT, 999 * UNIT];
            for &at in &times {
                for &amount in &amounts {
                    let mut h = Harness::new();
                    let id = h.create_session(86_400_000, 1, T0, T0 + DAY, T0 - 1).unwrap();
                    h.deposit(id, ALICE, 10 * UNIT, T0).unwrap();
                    h.deposit(id, BOB, 3 * UNIT, T0).unwrap();

                    let before = h.pending_principal(id, ALICE, T0 + at);
                    h.deposit(id, ALICE, amount, T0 + at).unwrap();
                    let after = h.pending_principal(id, ALICE, T0 + at);
                    assert!(after + 1 >= before, "at={} amount={}: {} -> {}", at, amount, before, after);
                }
            }
        }
    }
}
