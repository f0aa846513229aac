//! Contract events. Payloads are versioned so downstream indexers can
//! evolve with the schema.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

pub const EVENT_VERSION: u32 = 1;

#[contracttype]
#[derive(Clone, Debug)]
pub struct BookingCreated {
    pub version: u32,
    pub booking_id: u64,
    pub renter: Address,
    pub owner: Address,
    pub amount: i128,
    pub commission: i128,
    pub end_time: u64,
}

pub fn emit_booking_created(env: &Env, event: BookingCreated) {
    let topics = (symbol_short!("booking"), event.booking_id);
    env.events().publish(topics, event.clone());
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DisputeRaised {
    pub version: u32,
    pub booking_id: u64,
    pub raised_by: Address,
    pub timestamp: u64,
}

pub fn emit_dispute_raised(env: &Env, event: DisputeRaised) {
    let topics = (symbol_short!("dispute"), event.booking_id);
    env.events().publish(topics, event.clone());
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DisputeResolved {
    pub version: u32,
    pub booking_id: u64,
    pub resolved_by: Address,
    pub favor_renter: bool,
    pub timestamp: u64,
}

pub fn emit_dispute_resolved(env: &Env, event: DisputeResolved) {
    let topics = (symbol_short!("resolve"), event.booking_id);
    env.events().publish(topics, event.clone());
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PaymentReleased {
    pub version: u32,
    pub booking_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub timestamp: u64,
}

pub fn emit_payment_released(env: &Env, event: PaymentReleased) {
    let topics = (symbol_short!("release"), event.booking_id);
    env.events().publish(topics, event.clone());
}

pub fn emit_manager_changed(env: &Env, account: Address, granted: bool) {
    let topics = (symbol_short!("manager"), account);
    env.events().publish(
        topics,
        if granted {
            symbol_short!("add")
        } else {
            symbol_short!("remove")
        },
    );
}
