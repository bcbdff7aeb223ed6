//! Integration tests for coinpurse-core services
//!
//! These tests run full wallet journeys against the in-memory store. No
//! network IO happens here; the store adapter provides the same atomic
//! balance adjustment the hosted backend does.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use rust_decimal::Decimal;

use coinpurse_core::adapters::memory::MemoryStore;
use coinpurse_core::domain::{Currency, EntryKind};
use coinpurse_core::ports::WalletStore;
use coinpurse_core::services::{
    AuthService, BonusService, ExchangeService, HistoryService, WalletService,
};

// ============================================================================
// Test Helpers
// ============================================================================

struct Wallet {
    store: Arc<MemoryStore>,
    auth: AuthService,
    wallet: WalletService,
    exchange: ExchangeService,
    bonus: BonusService,
    history: HistoryService,
}

/// Wire every service over one shared in-memory store
fn wallet() -> Wallet {
    let store = Arc::new(MemoryStore::new());
    let auth = AuthService::new(Arc::clone(&store) as Arc<dyn WalletStore>);
    let wallet_service = WalletService::new(
        Arc::clone(&store) as Arc<dyn WalletStore>,
        Decimal::new(15_000, 0),
    );
    let exchange = ExchangeService::new(Arc::clone(&store) as Arc<dyn WalletStore>);
    let bonus = BonusService::new(Arc::clone(&store) as Arc<dyn WalletStore>);
    let history = HistoryService::new(Arc::clone(&store) as Arc<dyn WalletStore>);

    Wallet {
        store,
        auth,
        wallet: wallet_service,
        exchange,
        bonus,
        history,
    }
}

fn amount_of(wallet: &Wallet, user_id: uuid::Uuid, currency: Currency) -> Decimal {
    wallet
        .store
        .get_balances(user_id)
        .unwrap()
        .into_iter()
        .find(|b| b.currency == currency)
        .map(|b| b.amount)
        .unwrap_or(Decimal::ZERO)
}

// ============================================================================
// Full Journey
// ============================================================================

#[test]
fn test_full_wallet_journey() {
    let w = wallet();

    // Register and claim the bonus in USDT
    let alice = w.auth.register("alice", "hunter2").unwrap();
    w.bonus.claim(alice.id, Currency::Usdt).unwrap();
    assert_eq!(amount_of(&w, alice.id, Currency::Usdt), Decimal::new(300, 0));

    // Fund the floor currencies through simulated deposits
    w.wallet
        .credit_deposit(alice.id, Currency::Bnb, Decimal::ONE)
        .unwrap();
    w.wallet
        .credit_deposit(alice.id, Currency::Eth, Decimal::ONE)
        .unwrap();
    w.wallet
        .credit_deposit(alice.id, Currency::Sol, Decimal::ONE)
        .unwrap();
    assert!(w.wallet.meets_minimum_floor(alice.id).unwrap());

    // Swap 180 USDT into exactly 1 SOL at static prices
    let swap = w
        .exchange
        .swap(alice.id, Currency::Usdt, Currency::Sol, Decimal::new(180, 0))
        .unwrap();
    assert_eq!(swap.to_amount, Decimal::ONE);
    assert_eq!(amount_of(&w, alice.id, Currency::Usdt), Decimal::new(120, 0));
    assert_eq!(amount_of(&w, alice.id, Currency::Sol), Decimal::new(2, 0));

    // Withdraw 50 USDT
    w.exchange
        .withdraw(alice.id, Currency::Usdt, Decimal::new(50, 0), "0xdeadbeef")
        .unwrap();
    assert_eq!(amount_of(&w, alice.id, Currency::Usdt), Decimal::new(70, 0));

    // Send 20 USDT to a second user
    let bob = w.auth.register("bob", "secret").unwrap();
    w.exchange
        .send(alice.id, "bob", Decimal::new(20, 0))
        .unwrap();
    assert_eq!(amount_of(&w, alice.id, Currency::Usdt), Decimal::new(50, 0));
    assert_eq!(amount_of(&w, bob.id, Currency::Usdt), Decimal::new(20, 0));

    // Alice's history, newest first: send, withdraw, swap, 3 deposits, bonus
    let entries = w.history.recent(alice.id, 20).unwrap();
    let kinds: Vec<EntryKind> = entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::Send,
            EntryKind::Withdraw,
            EntryKind::Swap,
            EntryKind::Deposit,
            EntryKind::Deposit,
            EntryKind::Deposit,
            EntryKind::Bonus,
        ]
    );

    // Bob sees only the matching receive entry
    let bob_entries = w.history.recent(bob.id, 20).unwrap();
    assert_eq!(bob_entries.len(), 1);
    assert_eq!(bob_entries[0].kind, EntryKind::Receive);
    assert_eq!(bob_entries[0].amount, Decimal::new(20, 0));
}

#[test]
fn test_valuation_tracks_mutations() {
    let w = wallet();
    let user = w.auth.register("carol", "pw").unwrap();

    w.bonus.claim(user.id, Currency::Usdt).unwrap();
    let after_bonus = w.wallet.total_usd(user.id).unwrap();
    assert_eq!(after_bonus, Decimal::new(300, 0));

    // A swap moves value between currencies but not the total
    w.wallet
        .credit_deposit(user.id, Currency::Bnb, Decimal::ONE)
        .unwrap();
    w.wallet
        .credit_deposit(user.id, Currency::Eth, Decimal::ONE)
        .unwrap();
    w.wallet
        .credit_deposit(user.id, Currency::Sol, Decimal::ONE)
        .unwrap();
    let before_swap = w.wallet.total_usd(user.id).unwrap();
    w.exchange
        .swap(user.id, Currency::Usdt, Currency::Eth, Decimal::new(100, 0))
        .unwrap();
    assert_eq!(w.wallet.total_usd(user.id).unwrap(), before_swap);

    // A withdrawal removes value
    w.exchange
        .withdraw(user.id, Currency::Usdt, Decimal::new(100, 0), "0xabc")
        .unwrap();
    assert_eq!(
        w.wallet.total_usd(user.id).unwrap(),
        before_swap - Decimal::new(100, 0)
    );
}

#[test]
fn test_failed_mutation_leaves_no_ledger_entry() {
    let w = wallet();
    let user = w.auth.register("dave", "pw").unwrap();
    w.bonus.claim(user.id, Currency::Usdt).unwrap();
    w.wallet
        .credit_deposit(user.id, Currency::Bnb, Decimal::ONE)
        .unwrap();
    w.wallet
        .credit_deposit(user.id, Currency::Eth, Decimal::ONE)
        .unwrap();
    w.wallet
        .credit_deposit(user.id, Currency::Sol, Decimal::ONE)
        .unwrap();

    let before = w.history.recent(user.id, 50).unwrap().len();

    // Over-withdrawal fails at the atomic adjust, before the ledger write
    assert!(w
        .exchange
        .withdraw(user.id, Currency::Usdt, Decimal::new(10_000, 0), "0xabc")
        .is_err());

    assert_eq!(w.history.recent(user.id, 50).unwrap().len(), before);
    assert_eq!(amount_of(&w, user.id, Currency::Usdt), Decimal::new(300, 0));
}

#[test]
fn test_registration_initializes_every_currency() {
    let w = wallet();
    let user = w.auth.register("erin", "pw").unwrap();

    let balances = w.store.get_balances(user.id).unwrap();
    assert_eq!(balances.len(), Currency::ALL.len());
    assert!(balances.iter().all(|b| b.amount.is_zero()));

    // The sheet prices everything at zero value
    let sheet = w.wallet.balance_sheet(user.id).unwrap();
    assert_eq!(sheet.total_usd, Decimal::ZERO);
    assert_eq!(sheet.total_idr, Decimal::ZERO);
}
