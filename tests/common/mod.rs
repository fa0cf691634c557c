// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use bursa::application::BrokerageService;
use bursa::domain::Cents;

/// Reference listing prices, in cents.
pub const AAPL_PRICE: Cents = 15000;
pub const TSLA_PRICE: Cents = 75000;
pub const GOOGL_PRICE: Cents = 280000;

/// Service backed by the reference listings, no account open yet.
pub fn test_service() -> BrokerageService {
    BrokerageService::with_default_listings()
}

/// Service with an account open for "u1" holding the given starting cash.
pub fn funded_service(initial_deposit_cents: Cents) -> BrokerageService {
    let mut service = test_service();
    service
        .open_account("u1", initial_deposit_cents)
        .expect("open_account with a positive deposit succeeds");
    service
}
