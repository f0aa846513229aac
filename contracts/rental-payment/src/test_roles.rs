#![cfg(test)]

use super::*;
use soroban_sdk::{testutils::Address as _, Address, Env};

struct Setup {
    admin: Address,
    manager: Address,
    renter: Address,
    client: RentalPaymentContractClient<'static>,
}

impl Setup {
    fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        let admin = Address::generate(&env);
        let manager = Address::generate(&env);
        let renter = Address::generate(&env);
        let token = Address::generate(&env);
        let mobifi = Address::generate(&env);
        let contract_id = env.register_contract(None, RentalPaymentContract);
        let client = RentalPaymentContractClient::new(&env, &contract_id);
        client.init(&admin, &token, &mobifi);
        Setup {
            admin,
            manager,
            renter,
            client,
        }
    }
}

#[test]
fn test_admin_grants_manager_role() {
    let s = Setup::new();

    assert!(!s.client.has_role(&Role::Manager, &s.manager));
    s.client.add_manager(&s.admin, &s.manager);
    assert!(s.client.has_role(&Role::Manager, &s.manager));
}

#[test]
fn test_non_admin_cannot_grant_manager_role() {
    let s = Setup::new();

    let result = s.client.try_add_manager(&s.renter, &s.manager);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    assert!(!s.client.has_role(&Role::Manager, &s.manager));
}

#[test]
fn test_admin_revokes_manager_role() {
    let s = Setup::new();

    s.client.add_manager(&s.admin, &s.manager);
    s.client.remove_manager(&s.admin, &s.manager);
    assert!(!s.client.has_role(&Role::Manager, &s.manager));
}

#[test]
fn test_non_admin_cannot_revoke_manager_role() {
    let s = Setup::new();

    s.client.add_manager(&s.admin, &s.manager);
    let result = s.client.try_remove_manager(&s.renter, &s.manager);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    assert!(s.client.has_role(&Role::Manager, &s.manager));
}

#[test]
fn test_grant_is_idempotent() {
    let s = Setup::new();

    s.client.add_manager(&s.admin, &s.manager);
    s.client.add_manager(&s.admin, &s.manager);
    assert!(s.client.has_role(&Role::Manager, &s.manager));

    // a single revoke clears the role, so no duplicate entry existed
    s.client.remove_manager(&s.admin, &s.manager);
    assert!(!s.client.has_role(&Role::Manager, &s.manager));
}

#[test]
fn test_admin_role_query() {
    let s = Setup::new();

    assert!(s.client.has_role(&Role::Admin, &s.admin));
    assert!(!s.client.has_role(&Role::Admin, &s.renter));
    assert!(!s.client.has_role(&Role::Manager, &s.admin));
}
