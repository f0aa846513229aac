#![no_std]
//! Rental payment escrow: holds booking funds until the rental period
//! ends, splits a commission to the platform wallet at creation, and
//! lets managers adjudicate disputes before anything is paid out.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env, Vec,
};

mod events;
pub use events::*;

#[cfg(test)]
mod test_roles;

/// Commission rate applied to new bookings until the admin changes it.
pub const DEFAULT_COMMISSION_PCT: u32 = 5;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    DuplicateBooking = 5,
    BookingNotFound = 6,
    InvalidState = 7,
    InvalidParameter = 8,
    NothingToRelease = 9,
    TransferFailed = 10,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Admin,
    Manager,
}

/// One escrowed rental transaction. `amount` is net of commission and
/// fixed for the life of the booking; `paid` never goes back to false.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Booking {
    pub renter: Address,
    pub owner: Address,
    pub amount: i128,
    pub end_time: u64,
    pub disputed: bool,
    pub paid: bool,
}

#[contracttype]
pub enum DataKey {
    Admin,
    Token,
    MobifiWallet,
    CommissionPercentage,
    Booking(u64),
    /// Persistent Vec<u64> of booking ids in insertion order.
    BookingIndex,
    Manager(Address),
}

#[contract]
pub struct RentalPaymentContract;

#[contractimpl]
impl RentalPaymentContract {
    /// Initialize with admin, payment token, and commission wallet.
    /// Call once. Commission starts at [`DEFAULT_COMMISSION_PCT`].
    pub fn init(
        env: Env,
        admin: Address,
        token: Address,
        mobifi_wallet: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage()
            .instance()
            .set(&DataKey::MobifiWallet, &mobifi_wallet);
        env.storage()
            .instance()
            .set(&DataKey::CommissionPercentage, &DEFAULT_COMMISSION_PCT);

        env.events()
            .publish((symbol_short!("init"),), (admin, token, mobifi_wallet));

        Ok(())
    }

    /// Escrow a booking payment. The renter pays `amount`; the
    /// commission cut goes straight to the platform wallet and the
    /// remainder is held by this contract until release.
    pub fn create_booking(
        env: Env,
        renter: Address,
        id: u64,
        owner: Address,
        amount: i128,
        end_time: u64,
    ) -> Result<(), Error> {
        renter.require_auth();

        if !env.storage().instance().has(&DataKey::Admin) {
            return Err(Error::NotInitialized);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if env.storage().persistent().has(&DataKey::Booking(id)) {
            return Err(Error::DuplicateBooking);
        }

        let pct = Self::commission_percentage(env.clone());
        let commission = amount * pct as i128 / 100;
        let net_amount = amount - commission;

        let wallet: Address = env
            .storage()
            .instance()
            .get(&DataKey::MobifiWallet)
            .ok_or(Error::NotInitialized)?;
        if commission > 0 {
            Self::transfer_or_fail(&env, &renter, &wallet, commission)?;
        }
        if net_amount > 0 {
            Self::transfer_or_fail(&env, &renter, &env.current_contract_address(), net_amount)?;
        }

        let booking = Booking {
            renter: renter.clone(),
            owner,
            amount: net_amount,
            end_time,
            disputed: false,
            paid: false,
        };
        env.storage()
            .persistent()
            .set(&DataKey::Booking(id), &booking);

        let mut index: Vec<u64> = env
            .storage()
            .persistent()
            .get(&DataKey::BookingIndex)
            .unwrap_or_else(|| Vec::new(&env));
        index.push_back(id);
        env.storage()
            .persistent()
            .set(&DataKey::BookingIndex, &index);

        events::emit_booking_created(
            &env,
            events::BookingCreated {
                version: events::EVENT_VERSION,
                booking_id: id,
                renter,
                owner: booking.owner,
                amount: net_amount,
                commission,
                end_time,
            },
        );

        Ok(())
    }

    /// Flag a booking as disputed, blocking release until a manager
    /// resolves it. Only the booking's renter or owner may raise.
    /// Raising an already-disputed booking is a no-op.
    pub fn raise_dispute(env: Env, caller: Address, id: u64) -> Result<(), Error> {
        caller.require_auth();

        let mut booking = Self::get_booking(env.clone(), id)?;
        if caller != booking.renter && caller != booking.owner {
            return Err(Error::Unauthorized);
        }
        if booking.paid {
            return Err(Error::InvalidState);
        }
        if booking.disputed {
            return Ok(());
        }

        booking.disputed = true;
        env.storage()
            .persistent()
            .set(&DataKey::Booking(id), &booking);

        events::emit_dispute_raised(
            &env,
            events::DisputeRaised {
                version: events::EVENT_VERSION,
                booking_id: id,
                raised_by: caller,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(())
    }

    /// Adjudicate a disputed booking. Manager or admin only. In favor
    /// of the renter: refund the escrowed amount and close the booking.
    /// In favor of the owner: clear the dispute; the owner still
    /// collects through `release_payment` once the end time passes.
    pub fn resolve_dispute(
        env: Env,
        caller: Address,
        id: u64,
        favor_renter: bool,
    ) -> Result<(), Error> {
        caller.require_auth();
        if !Self::has_role(env.clone(), Role::Manager, caller.clone())
            && !Self::has_role(env.clone(), Role::Admin, caller.clone())
        {
            return Err(Error::Unauthorized);
        }

        let mut booking = Self::get_booking(env.clone(), id)?;
        if !booking.disputed {
            return Err(Error::InvalidState);
        }

        booking.disputed = false;
        if favor_renter {
            Self::transfer_or_fail(
                &env,
                &env.current_contract_address(),
                &booking.renter,
                booking.amount,
            )?;
            booking.paid = true;
        }
        env.storage()
            .persistent()
            .set(&DataKey::Booking(id), &booking);

        events::emit_dispute_resolved(
            &env,
            events::DisputeResolved {
                version: events::EVENT_VERSION,
                booking_id: id,
                resolved_by: caller,
                favor_renter,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(())
    }

    /// Pay out every matured booking owned by the caller: not disputed,
    /// not yet paid, end time reached. Bookings settle in insertion
    /// order and all eligible ones settle in this one call. Fails with
    /// `NothingToRelease` when no booking qualifies.
    pub fn release_payment(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();

        let index: Vec<u64> = env
            .storage()
            .persistent()
            .get(&DataKey::BookingIndex)
            .unwrap_or_else(|| Vec::new(&env));
        let now = env.ledger().timestamp();

        let mut released = 0u32;
        for id in index.iter() {
            let mut booking: Booking = env
                .storage()
                .persistent()
                .get(&DataKey::Booking(id))
                .ok_or(Error::BookingNotFound)?;
            if booking.owner != caller || booking.disputed || booking.paid || now < booking.end_time
            {
                continue;
            }

            Self::transfer_or_fail(
                &env,
                &env.current_contract_address(),
                &caller,
                booking.amount,
            )?;
            booking.paid = true;
            env.storage()
                .persistent()
                .set(&DataKey::Booking(id), &booking);
            released += 1;

            events::emit_payment_released(
                &env,
                events::PaymentReleased {
                    version: events::EVENT_VERSION,
                    booking_id: id,
                    owner: caller.clone(),
                    amount: booking.amount,
                    timestamp: now,
                },
            );
        }

        if released == 0 {
            return Err(Error::NothingToRelease);
        }
        Ok(())
    }

    /// Grant the manager role. Admin only; adding an existing manager
    /// is a no-op.
    pub fn add_manager(env: Env, caller: Address, account: Address) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;

        let key = DataKey::Manager(account.clone());
        if env.storage().persistent().get(&key).unwrap_or(false) {
            return Ok(());
        }
        env.storage().persistent().set(&key, &true);

        events::emit_manager_changed(&env, account, true);
        Ok(())
    }

    /// Revoke the manager role. Admin only.
    pub fn remove_manager(env: Env, caller: Address, account: Address) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;

        let key = DataKey::Manager(account.clone());
        if !env.storage().persistent().get(&key).unwrap_or(false) {
            return Ok(());
        }
        env.storage().persistent().remove(&key);

        events::emit_manager_changed(&env, account, false);
        Ok(())
    }

    /// Point future commissions at a new wallet. Admin only.
    pub fn change_mobifi_wallet(
        env: Env,
        caller: Address,
        new_wallet: Address,
    ) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        env.storage()
            .instance()
            .set(&DataKey::MobifiWallet, &new_wallet);

        env.events()
            .publish((symbol_short!("wallet"),), new_wallet);
        Ok(())
    }

    /// Set the commission rate for future bookings. Admin only;
    /// anything over 100 is rejected.
    pub fn change_commission_percentage(
        env: Env,
        caller: Address,
        pct: u32,
    ) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        if pct > 100 {
            return Err(Error::InvalidParameter);
        }
        env.storage()
            .instance()
            .set(&DataKey::CommissionPercentage, &pct);

        env.events().publish((symbol_short!("fee"),), pct);
        Ok(())
    }

    pub fn get_booking(env: Env, id: u64) -> Result<Booking, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Booking(id))
            .ok_or(Error::BookingNotFound)
    }

    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        match role {
            Role::Admin => {
                let admin: Option<Address> = env.storage().instance().get(&DataKey::Admin);
                admin == Some(account)
            }
            Role::Manager => env
                .storage()
                .persistent()
                .get(&DataKey::Manager(account))
                .unwrap_or(false),
        }
    }

    pub fn commission_percentage(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::CommissionPercentage)
            .unwrap_or(DEFAULT_COMMISSION_PCT)
    }

    pub fn mobifi_wallet(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::MobifiWallet)
            .ok_or(Error::NotInitialized)
    }

    pub fn booking_count(env: Env) -> u32 {
        let index: Vec<u64> = env
            .storage()
            .persistent()
            .get(&DataKey::BookingIndex)
            .unwrap_or_else(|| Vec::new(&env));
        index.len()
    }

    pub fn booking_ids(env: Env) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::BookingIndex)
            .unwrap_or_else(|| Vec::new(&env))
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        if *caller != admin {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    /// Move tokens through the payment token contract. Any failure in
    /// the token call aborts the whole invocation; returning `Err`
    /// rolls back every storage write made before it.
    fn transfer_or_fail(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
        let token_addr: Address = env
            .storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)?;
        let client = token::Client::new(env, &token_addr);
        match client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(Error::TransferFailed),
        }
    }
}
