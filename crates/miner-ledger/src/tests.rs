//! Ledger-level tests against the in-memory store.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use miner_core::{Amount, Rate};
use miner_store::MemoryStore;

use crate::{Capability, Ledger, LedgerError, LedgerParams, WithdrawalStatus};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn ledger() -> Arc<Ledger> {
    Arc::new(Ledger::new(
        Arc::new(MemoryStore::new()),
        LedgerParams::default(),
    ))
}

async fn create(ledger: &Ledger, id: &str) -> crate::UserRecord {
    ledger
        .create_account(id, &format!("{id}@example.com"), id, t0())
        .await
        .unwrap()
}

// ── Accounts ────────────────────────────────────────────────

#[tokio::test]
async fn create_account_is_idempotent() {
    let ledger = ledger();
    let first = create(&ledger, "alice").await;

    // A repeated create must not reset accrued state.
    ledger.watch_ad("alice", t0() + Duration::seconds(10)).await.unwrap();
    let again = ledger
        .create_account("alice", "other@example.com", "Other", t0() + Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(again.referral_code, first.referral_code);
    assert_eq!(again.email, first.email);
    assert_eq!(again.ads_watched_today, 1);
}

#[tokio::test]
async fn create_account_rejects_bad_ids() {
    let ledger = ledger();
    for bad in ["", "has:colon", "has space", &"x".repeat(65)] {
        let err = ledger
            .create_account(bad, "a@b.com", "A", t0())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)), "id {bad:?}");
    }
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let ledger = ledger();
    assert!(matches!(
        ledger.get_profile("ghost").await.unwrap_err(),
        LedgerError::NotFound
    ));
    assert!(matches!(
        ledger.settle_and_report("ghost", t0()).await.unwrap_err(),
        LedgerError::NotFound
    ));
}

// ── Accrual through the facade ──────────────────────────────

#[tokio::test]
async fn settle_reports_rate_times_elapsed() {
    let ledger = ledger();
    let record = create(&ledger, "alice").await;
    let rate = record.current_mining_rate;

    let status = ledger
        .settle_and_report("alice", t0() + Duration::seconds(500))
        .await
        .unwrap();

    assert_eq!(status.balance, rate.for_seconds(500));
    assert_eq!(status.total_mined, status.balance);
    assert_eq!(
        status.seconds_to_reset,
        24 * 3600 - 500,
        "window countdown reflects elapsed time"
    );
}

#[tokio::test]
async fn repeated_settle_at_same_now_changes_nothing() {
    let ledger = ledger();
    create(&ledger, "alice").await;
    let now = t0() + Duration::hours(30);

    let first = ledger.settle_and_report("alice", now).await.unwrap();
    let second = ledger.settle_and_report("alice", now).await.unwrap();

    assert_eq!(second.balance, first.balance);
    assert_eq!(second.total_mined, first.total_mined);
    assert_eq!(second.current_mining_rate, first.current_mining_rate);
}

// ── Ad boosts ───────────────────────────────────────────────

#[tokio::test]
async fn ad_boosts_stack_until_the_cap_then_reset() {
    let ledger = ledger();
    let record = create(&ledger, "alice").await;
    let base = record.base_mining_rate;
    let inc = ledger.params().ad_boost_increment.micros_per_second();
    let cap = record.deposit_boost_cap;
    assert_eq!(cap, 50);

    let now = t0() + Duration::seconds(1);
    for n in 1..=cap {
        let out = ledger.watch_ad("alice", now).await.unwrap();
        assert_eq!(
            out.current_mining_rate,
            Rate::per_second(base.micros_per_second() + u64::from(n) * inc)
        );
        assert_eq!(out.ads_watched_today, n);
    }

    // 51st attempt fails until the window rolls over.
    let err = ledger.watch_ad("alice", now).await.unwrap_err();
    assert!(matches!(err, LedgerError::DailyLimitReached));

    let after_reset = t0() + Duration::hours(25);
    let status = ledger.settle_and_report("alice", after_reset).await.unwrap();
    assert_eq!(status.ads_watched_today, 0);
    assert_eq!(status.current_mining_rate, base);

    let out = ledger.watch_ad("alice", after_reset).await.unwrap();
    assert_eq!(out.ads_watched_today, 1);
}

#[tokio::test]
async fn concurrent_ad_watches_lose_no_updates() {
    let ledger = ledger();
    create(&ledger, "alice").await;
    let now = t0() + Duration::seconds(1);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.watch_ad("alice", now).await.unwrap()
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let status = ledger.settle_and_report("alice", now).await.unwrap();
    assert_eq!(status.ads_watched_today, 10);
}

// ── Deposits ────────────────────────────────────────────────

#[tokio::test]
async fn deposit_raises_cap_and_never_credits_balance() {
    let ledger = ledger();
    create(&ledger, "alice").await;

    let out = ledger
        .deposit_boost("alice", Amount::from_units(30), t0())
        .await
        .unwrap();
    assert_eq!(out.ads_added, 30);
    assert_eq!(out.deposit_boost_cap, 80);

    let status = ledger.settle_and_report("alice", t0()).await.unwrap();
    assert!(status.balance.is_zero(), "deposits do not mint currency");
}

#[tokio::test]
async fn deposit_below_minimum_is_rejected() {
    let ledger = ledger();
    create(&ledger, "alice").await;
    let err = ledger
        .deposit_boost("alice", Amount::from_units(9), t0())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BelowMinimum { .. }));
}

// ── Referrals ───────────────────────────────────────────────

#[tokio::test]
async fn referral_link_at_threshold_boosts_both_sides() {
    let ledger = ledger();
    let referrer = create(&ledger, "referrer").await;
    let referee = create(&ledger, "referee").await;
    let inc = ledger.params().ad_boost_increment.micros_per_second();
    let now = t0() + Duration::seconds(10);

    for _ in 0..3 {
        ledger.watch_ad("referee", now).await.unwrap();
    }
    ledger
        .apply_referral_code("referee", &referrer.referral_code, now)
        .await
        .unwrap();

    let referee_after = ledger.get_profile("referee").await.unwrap();
    let referrer_after = ledger.get_profile("referrer").await.unwrap();

    let expected_referee = Rate::per_second(
        referee.base_mining_rate.micros_per_second()
            + 3 * inc
            + ledger.params().referee_bonus_rate.micros_per_second(),
    );
    assert_eq!(referee_after.current_mining_rate, expected_referee);
    assert_eq!(referee_after.referred_by.as_deref(), Some("referrer"));

    let expected_referrer =
        Rate::per_second(referrer.base_mining_rate.micros_per_second() + 2 * inc);
    assert_eq!(referrer_after.current_mining_rate, expected_referrer);
    assert_eq!(referrer_after.referral_count, 1);
}

#[tokio::test]
async fn referral_link_below_threshold_grants_no_boost() {
    let ledger = ledger();
    let referrer = create(&ledger, "referrer").await;
    create(&ledger, "referee").await;

    ledger
        .apply_referral_code("referee", &referrer.referral_code, t0())
        .await
        .unwrap();

    let referee = ledger.get_profile("referee").await.unwrap();
    let referrer_after = ledger.get_profile("referrer").await.unwrap();
    assert_eq!(referee.referred_by.as_deref(), Some("referrer"));
    assert_eq!(referee.current_mining_rate, referee.base_mining_rate);
    assert_eq!(referrer_after.referral_count, 0);

    // Watching ads later does not retroactively trigger the link bonus.
    let later = t0() + Duration::seconds(30);
    for _ in 0..3 {
        ledger.watch_ad("referee", later).await.unwrap();
    }
    assert_eq!(
        ledger.get_profile("referrer").await.unwrap().referral_count,
        0
    );
}

#[tokio::test]
async fn second_link_always_fails_with_already_referred() {
    let ledger = ledger();
    let referrer = create(&ledger, "referrer").await;
    let other = create(&ledger, "other").await;
    create(&ledger, "referee").await;

    ledger
        .apply_referral_code("referee", &referrer.referral_code, t0())
        .await
        .unwrap();

    // Valid code, invalid code, own code: all AlreadyReferred.
    for code in [
        other.referral_code.as_str(),
        "MINE-DOESNOTEXIST",
        referrer.referral_code.as_str(),
    ] {
        let err = ledger
            .apply_referral_code("referee", code, t0())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyReferred), "code {code:?}");
    }
}

#[tokio::test]
async fn self_and_invalid_codes_are_rejected() {
    let ledger = ledger();
    let alice = create(&ledger, "alice").await;

    let err = ledger
        .apply_referral_code("alice", &alice.referral_code, t0())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::SelfReferral));

    let err = ledger
        .apply_referral_code("alice", "MINE-00000000", t0())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidCode));
}

#[tokio::test]
async fn referrer_bonus_is_granted_exactly_once() {
    let ledger = ledger();
    let referrer = create(&ledger, "referrer").await;
    create(&ledger, "referee").await;
    let now = t0() + Duration::seconds(60);

    for _ in 0..3 {
        ledger.watch_ad("referee", now).await.unwrap();
    }
    ledger
        .apply_referral_code("referee", &referrer.referral_code, now)
        .await
        .unwrap();

    let before = ledger.settle_and_report("referrer", now).await.unwrap().balance;

    let first = ledger.check_and_grant_mining_bonus("referee", now).await.unwrap();
    assert!(first.granted);
    let after_first = ledger.get_profile("referrer").await.unwrap().balance;
    assert_eq!(after_first, before + ledger.params().referral_bonus);

    let second = ledger.check_and_grant_mining_bonus("referee", now).await.unwrap();
    assert!(!second.granted);
    let after_second = ledger.get_profile("referrer").await.unwrap().balance;
    assert_eq!(after_second, after_first, "credit applied exactly once");
}

#[tokio::test]
async fn bonus_without_referrer_or_threshold_is_not_granted() {
    let ledger = ledger();
    let referrer = create(&ledger, "referrer").await;
    create(&ledger, "referee").await;

    // No referrer linked yet.
    let out = ledger.check_and_grant_mining_bonus("referee", t0()).await.unwrap();
    assert!(!out.granted);

    // Linked, but below the ad threshold.
    ledger
        .apply_referral_code("referee", &referrer.referral_code, t0())
        .await
        .unwrap();
    let out = ledger
        .check_and_grant_mining_bonus("referee", t0() + Duration::seconds(5))
        .await
        .unwrap();
    assert!(!out.granted);
}

// ── Withdrawals ─────────────────────────────────────────────

#[tokio::test]
async fn withdrawal_before_eligibility_reports_days_remaining() {
    let ledger = ledger();
    let record = create(&ledger, "alice").await;
    assert_eq!(record.withdraw_eligible_at, t0() + Duration::days(7));

    let err = ledger
        .request_withdrawal(
            "alice",
            Amount::from_units(100),
            "wallet-addr",
            "Alice",
            t0() + Duration::days(1),
        )
        .await
        .unwrap_err();
    match err {
        LedgerError::NotYetEligible { days_remaining } => assert_eq!(days_remaining, 6),
        other => panic!("expected NotYetEligible, got {other:?}"),
    }
}

#[tokio::test]
async fn withdrawal_conserves_balance_and_creates_the_record() {
    let ledger = ledger();
    create(&ledger, "alice").await;
    // 90 days of accrual clears both eligibility and the minimum.
    let now = t0() + Duration::days(90);
    let before = ledger.settle_and_report("alice", now).await.unwrap().balance;
    let amount = Amount::from_units(100);
    assert!(before >= amount);

    let receipt = ledger
        .request_withdrawal("alice", amount, "wallet-addr", "Alice", now)
        .await
        .unwrap();

    assert_eq!(receipt.balance, before.checked_sub(amount).unwrap());
    assert_eq!(
        ledger.get_profile("alice").await.unwrap().balance,
        receipt.balance
    );

    let listed = ledger.list_withdrawals("alice").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, receipt.id);
    assert_eq!(listed[0].amount, amount);
    assert_eq!(listed[0].status, WithdrawalStatus::Pending);
    assert!(listed[0].processed_at.is_none());
}

#[tokio::test]
async fn withdrawal_minimum_and_balance_are_enforced() {
    let ledger = ledger();
    create(&ledger, "alice").await;
    let now = t0() + Duration::days(8);

    let err = ledger
        .request_withdrawal("alice", Amount::from_units(99), "w", "A", now)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BelowMinimum { .. }));

    // 8 days of base accrual is nowhere near 100 units.
    let err = ledger
        .request_withdrawal("alice", Amount::from_units(100), "w", "A", now)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance));

    // Failed requests leave no record behind.
    assert!(ledger.list_withdrawals("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_settle_is_terminal_and_capability_gated() {
    let ledger = ledger();
    create(&ledger, "alice").await;
    let now = t0() + Duration::days(90);
    ledger.settle_and_report("alice", now).await.unwrap();
    let receipt = ledger
        .request_withdrawal("alice", Amount::from_units(100), "w", "Alice", now)
        .await
        .unwrap();

    assert!(matches!(
        ledger.admin_list_all(Capability::User).await.unwrap_err(),
        LedgerError::Forbidden
    ));
    assert!(matches!(
        ledger
            .admin_settle_withdrawal(Capability::User, &receipt.id, now)
            .await
            .unwrap_err(),
        LedgerError::Forbidden
    ));
    assert!(matches!(
        ledger
            .admin_settle_withdrawal(Capability::Admin, "nope:1", now)
            .await
            .unwrap_err(),
        LedgerError::NotFound
    ));

    let settled_at = now + Duration::hours(1);
    ledger
        .admin_settle_withdrawal(Capability::Admin, &receipt.id, settled_at)
        .await
        .unwrap();

    let all = ledger.admin_list_all(Capability::Admin).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, WithdrawalStatus::Completed);
    assert_eq!(all[0].processed_at, Some(settled_at));

    // A repeat settle keeps the original stamp.
    ledger
        .admin_settle_withdrawal(Capability::Admin, &receipt.id, settled_at + Duration::hours(1))
        .await
        .unwrap();
    let all = ledger.admin_list_all(Capability::Admin).await.unwrap();
    assert_eq!(all[0].processed_at, Some(settled_at));
}

#[tokio::test]
async fn list_withdrawals_is_per_user_and_ordered() {
    let ledger = ledger();
    create(&ledger, "alice").await;
    create(&ledger, "bob").await;
    let now = t0() + Duration::days(365);
    ledger.settle_and_report("alice", now).await.unwrap();
    ledger.settle_and_report("bob", now).await.unwrap();

    let r1 = ledger
        .request_withdrawal("alice", Amount::from_units(100), "w", "A", now)
        .await
        .unwrap();
    let r2 = ledger
        .request_withdrawal("alice", Amount::from_units(100), "w", "A", now + Duration::seconds(1))
        .await
        .unwrap();
    ledger
        .request_withdrawal("bob", Amount::from_units(100), "w", "B", now)
        .await
        .unwrap();

    let alice = ledger.list_withdrawals("alice").await.unwrap();
    assert_eq!(
        alice.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        vec![r1.id.as_str(), r2.id.as_str()]
    );
    assert_eq!(ledger.admin_list_all(Capability::Admin).await.unwrap().len(), 3);
}
