#![allow(dead_code)]

use escrow_ledger::application::engine::EscrowEngine;
use escrow_ledger::domain::actor::{Actor, Role};
use escrow_ledger::infrastructure::in_memory::InMemoryStore;

pub fn setup() -> (InMemoryStore, EscrowEngine) {
    (InMemoryStore::new(), EscrowEngine::new())
}

pub fn brand() -> Actor {
    Actor::new(Role::Brand, "brand@test.dev")
}

pub fn creator() -> Actor {
    Actor::new(Role::Creator, "creator@test.dev")
}

pub fn admin() -> Actor {
    Actor::new(Role::Admin, "admin@test.dev")
}
