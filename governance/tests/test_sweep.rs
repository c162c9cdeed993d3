//! Sweep Integration Tests.
//!
//! Tokens sent to the governance contract by mistake are recovered with
//! `SWEEP_TOKENS`. Native denoms go through the bank module, CW20 tokens
//! through a transfer on the token contract.

use cosmwasm_std::{coins, Addr, Binary, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};

use governance::msg::{ExecuteMsg, InstantiateMsg};
use governance::opcodes::SWEEP_TOKENS;

// ============================================================================
// Test Setup
// ============================================================================

fn contract_governance() -> Box<dyn cw_multi_test::Contract<cosmwasm_std::Empty>> {
    let contract = ContractWrapper::new(
        governance::contract::execute,
        governance::contract::instantiate,
        governance::contract::query,
    );
    Box::new(contract)
}

fn contract_cw20() -> Box<dyn cw_multi_test::Contract<cosmwasm_std::Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

struct TestEnv {
    app: App,
    contract_addr: Addr,
    owner: Addr,
    admin: Addr,
    user: Addr,
}

impl TestEnv {
    fn sweep(&mut self, sender: &Addr, token: &str, amount: u128) -> anyhow::Result<AppResponse> {
        let mut payload = vec![SWEEP_TOKENS, token.len() as u8];
        payload.extend_from_slice(token.as_bytes());
        payload.extend_from_slice(&amount.to_be_bytes());

        self.app.execute_contract(
            sender.clone(),
            self.contract_addr.clone(),
            &ExecuteMsg::Execute {
                payload: Binary::from(payload),
            },
            &[],
        )
    }

    fn native_balance(&self, addr: &Addr) -> u128 {
        self.app.wrap().query_balance(addr, "uluna").unwrap().amount.u128()
    }

    fn cw20_balance(&self, token: &Addr, addr: &Addr) -> u128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                token,
                &Cw20QueryMsg::Balance {
                    address: addr.to_string(),
                },
            )
            .unwrap();
        res.balance.u128()
    }

    fn deploy_cw20(&mut self) -> Addr {
        let code_id = self.app.store_code(contract_cw20());
        self.app
            .instantiate_contract(
                code_id,
                self.owner.clone(),
                &cw20_base::msg::InstantiateMsg {
                    name: "Test Token".to_string(),
                    symbol: "TST".to_string(),
                    decimals: 6,
                    initial_balances: vec![Cw20Coin {
                        address: self.user.to_string(),
                        amount: Uint128::from(10_000_000u128),
                    }],
                    mint: None,
                    marketing: None,
                },
                &[],
                "cw20-test",
                None,
            )
            .unwrap()
    }
}

fn setup() -> TestEnv {
    let mut app = App::default();
    let owner = Addr::unchecked("terra1owner");
    let admin = Addr::unchecked("terra1admin");
    let user = Addr::unchecked("terra1user");

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &user, coins(10_000_000, "uluna"))
            .unwrap();
    });

    let code_id = app.store_code(contract_governance());
    let contract_addr = app
        .instantiate_contract(
            code_id,
            owner.clone(),
            &InstantiateMsg {
                owner: owner.to_string(),
                admins: vec![admin.to_string()],
            },
            &[],
            "cl8y-governance",
            None,
        )
        .unwrap();

    TestEnv {
        app,
        contract_addr,
        owner,
        admin,
        user,
    }
}

// ============================================================================
// Native
// ============================================================================

#[test]
fn test_sweep_native_funds_to_admin() {
    let mut env = setup();
    let (user, admin, contract) = (env.user.clone(), env.admin.clone(), env.contract_addr.clone());

    // funds attached to an empty stream stay on the contract
    env.app
        .execute_contract(
            user,
            contract.clone(),
            &ExecuteMsg::Execute {
                payload: Binary::default(),
            },
            &coins(1_000, "uluna"),
        )
        .unwrap();
    assert_eq!(env.native_balance(&contract), 1_000);

    env.sweep(&admin, "uluna", 600).unwrap();
    assert_eq!(env.native_balance(&admin), 600);
    assert_eq!(env.native_balance(&contract), 400);
}

#[test]
fn test_sweep_native_by_owner() {
    let mut env = setup();
    let (user, owner, contract) = (env.user.clone(), env.owner.clone(), env.contract_addr.clone());

    env.app
        .send_tokens(user, contract.clone(), &coins(250, "uluna"))
        .unwrap();

    env.sweep(&owner, "uluna", 250).unwrap();
    assert_eq!(env.native_balance(&owner), 250);
    assert_eq!(env.native_balance(&contract), 0);
}

#[test]
fn test_sweep_more_than_held_fails() {
    let mut env = setup();
    let (user, admin, contract) = (env.user.clone(), env.admin.clone(), env.contract_addr.clone());

    env.app
        .send_tokens(user, contract.clone(), &coins(100, "uluna"))
        .unwrap();

    assert!(env.sweep(&admin, "uluna", 101).is_err());
    assert_eq!(env.native_balance(&contract), 100);
}

// ============================================================================
// CW20
// ============================================================================

#[test]
fn test_sweep_cw20_to_admin() {
    let mut env = setup();
    let token = env.deploy_cw20();
    let (user, admin, contract) = (env.user.clone(), env.admin.clone(), env.contract_addr.clone());

    env.app
        .execute_contract(
            user,
            token.clone(),
            &Cw20ExecuteMsg::Transfer {
                recipient: contract.to_string(),
                amount: Uint128::from(5_000u128),
            },
            &[],
        )
        .unwrap();

    let res = env.sweep(&admin, token.as_str(), 5_000).unwrap();
    assert!(res.has_event(
        &cosmwasm_std::Event::new("wasm").add_attribute("sweep_asset", token.to_string())
    ));

    assert_eq!(env.cw20_balance(&token, &admin), 5_000);
    assert_eq!(env.cw20_balance(&token, &contract), 0);
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_sweep_requires_admin() {
    let mut env = setup();
    let (user, contract) = (env.user.clone(), env.contract_addr.clone());

    env.app
        .send_tokens(user.clone(), contract.clone(), &coins(100, "uluna"))
        .unwrap();

    let err = env.sweep(&user, "uluna", 100).unwrap_err();
    assert!(err.root_cause().to_string().contains("Not authorized"));
    assert_eq!(env.native_balance(&contract), 100);
}

#[test]
fn test_sweep_rejects_zero_amount() {
    let mut env = setup();
    let admin = env.admin.clone();

    let err = env.sweep(&admin, "uluna", 0).unwrap_err();
    assert!(err.root_cause().to_string().contains("Invalid amount"));
}

#[test]
fn test_sweep_rejects_empty_token() {
    let mut env = setup();
    let admin = env.admin.clone();

    let err = env.sweep(&admin, "", 10).unwrap_err();
    assert!(err.root_cause().to_string().contains("Invalid address"));
}
