//! Shared fixtures for scenario and adversarial tests.

use drip_core::constants::COIN;
use drip_core::types::{Address, CallContext};
use drip_ledger::Ledger;
use drip_stake::{MemoryCustody, StakePool};

pub const DEPLOYER: Address = Address([0xD0; 20]);
pub const POOL: Address = Address([0x50; 20]);

/// Deterministic participant address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address([seed; 20])
}

/// Call context for `caller` at `block`.
pub fn at(caller: Address, block: u64) -> CallContext {
    CallContext::new(caller, block)
}

/// A ledger deployed at block 0 paying one token per block, with the
/// deployer still holding the productivity authority.
pub fn deployed() -> Ledger {
    Ledger::new(DEPLOYER, COIN, 0)
}

/// A deployed ledger plus a bound stake pool whose custody has funded
/// `wallets` of `funding` each.
pub fn with_pool(wallets: &[Address], funding: u128) -> (Ledger, StakePool<MemoryCustody>) {
    let mut ledger = deployed();
    let mut custody = MemoryCustody::new();
    for w in wallets {
        custody
            .fund(w, funding)
            .unwrap_or_else(|e| panic!("funding {w}: {e}"));
    }
    let pool = StakePool::new(POOL, custody);
    pool.bind(&mut ledger, &at(DEPLOYER, 0))
        .unwrap_or_else(|e| panic!("binding pool: {e}"));
    ledger.drain_events();
    (ledger, pool)
}
