//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
mod bonus;
mod exchange;
mod history;
mod prices;
mod wallet;

pub use auth::AuthService;
pub use bonus::{BonusReceipt, BonusService};
pub use exchange::{ExchangeService, SendReceipt, SwapReceipt, WithdrawReceipt};
pub use history::{HistoryService, DEFAULT_HISTORY_LIMIT};
pub use prices::{PriceQuote, PriceService, PriceSnapshot};
pub use wallet::{BalanceLine, BalanceSheet, DepositReceipt, WalletService, FLOOR_CURRENCIES};
