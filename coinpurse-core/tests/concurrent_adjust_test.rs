//! Concurrent balance adjustment tests
//!
//! The store port requires the sufficiency check and the write to be one
//! atomic step. These tests hammer balances from many threads and verify
//! there are no lost updates and no overdraws.

use std::sync::Arc;
use std::thread;

use rust_decimal::Decimal;
use uuid::Uuid;

use coinpurse_core::adapters::memory::MemoryStore;
use coinpurse_core::domain::Currency;
use coinpurse_core::ports::WalletStore;
use coinpurse_core::services::ExchangeService;

#[test]
fn test_concurrent_withdrawals_never_overdraw() {
    let store = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    store
        .adjust_balance(user_id, Currency::Usdt, Decimal::new(100, 0))
        .unwrap();

    // 20 threads each try to take 10; only 10 can succeed
    let handles: Vec<_> = (0..20)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .adjust_balance(user_id, Currency::Usdt, Decimal::new(-10, 0))
                    .is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 10);

    let balances = store.get_balances(user_id).unwrap();
    assert_eq!(balances[0].amount, Decimal::ZERO);
}

#[test]
fn test_concurrent_mixed_credits_and_debits() {
    let store = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    store
        .adjust_balance(user_id, Currency::Eth, Decimal::new(50, 0))
        .unwrap();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = Arc::clone(&store);
            let delta = if i % 2 == 0 {
                Decimal::new(5, 0)
            } else {
                Decimal::new(-5, 0)
            };
            thread::spawn(move || {
                (
                    delta,
                    store.adjust_balance(user_id, Currency::Eth, delta).is_ok(),
                )
            })
        })
        .collect();

    let mut expected = Decimal::new(50, 0);
    for handle in handles {
        let (delta, ok) = handle.join().unwrap();
        if ok {
            expected += delta;
        }
    }

    let balances = store.get_balances(user_id).unwrap();
    assert_eq!(balances[0].amount, expected);
    assert!(balances[0].amount >= Decimal::ZERO);
}

#[test]
fn test_concurrent_transfers_preserve_total() {
    let store = Arc::new(MemoryStore::new());
    let exchange = Arc::new(ExchangeService::new(
        Arc::clone(&store) as Arc<dyn WalletStore>
    ));

    let alice = store.insert_user("alice", "hash").unwrap();
    let bob = store.insert_user("bob", "hash").unwrap();
    for user_id in [alice.id, bob.id] {
        store.init_balances(user_id, &Currency::ALL).unwrap();
        store
            .adjust_balance(user_id, Currency::Usdt, Decimal::new(100, 0))
            .unwrap();
    }

    // Transfers run both directions at once
    let mut handles = Vec::new();
    for _ in 0..5 {
        let exchange_a = Arc::clone(&exchange);
        let sender = alice.id;
        handles.push(thread::spawn(move || {
            exchange_a.send(sender, "bob", Decimal::new(10, 0)).unwrap();
        }));

        let exchange_b = Arc::clone(&exchange);
        let sender = bob.id;
        handles.push(thread::spawn(move || {
            exchange_b
                .send(sender, "alice", Decimal::new(10, 0))
                .unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let total: Decimal = [alice.id, bob.id]
        .iter()
        .map(|&user_id| {
            store
                .get_balances(user_id)
                .unwrap()
                .into_iter()
                .find(|b| b.currency == Currency::Usdt)
                .map(|b| b.amount)
                .unwrap_or(Decimal::ZERO)
        })
        .sum();
    assert_eq!(total, Decimal::new(200, 0));
}
