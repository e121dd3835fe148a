//! Scripted in-memory bridge for tests.
//!
//! Every operation records its call, optionally waits on a hold gate armed by
//! the test, then answers from the scripted state.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::channel::oneshot;
use wslp_types::{AccountAddress, TokenAddress, TokenDescriptor};

use crate::{BridgeClient, ReturnRequest};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StubProvider(pub String);

impl StubProvider {
    pub fn new(label: &str) -> Self {
        Self(label.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceCall {
    pub provider: StubProvider,
    pub account: AccountAddress,
    pub token: TokenAddress,
}

#[derive(Default)]
pub struct StubBridge {
    state: RefCell<StubState>,
}

#[derive(Default)]
struct StubState {
    return_failure: Option<String>,
    return_calls: Vec<ReturnRequest>,
    return_gates: VecDeque<oneshot::Receiver<()>>,
    tokens: Vec<TokenDescriptor>,
    token_failure: Option<String>,
    token_calls: usize,
    token_gates: VecDeque<oneshot::Receiver<()>>,
    balances: HashMap<String, Result<String, String>>,
    balance_calls: Vec<BalanceCall>,
    balance_gates: HashMap<String, VecDeque<oneshot::Receiver<()>>>,
}

impl StubBridge {
    pub fn new() -> Self {
        Self::default()
    }

    // ── return operation ──

    pub fn fail_returns_with(&self, message: &str) {
        self.state.borrow_mut().return_failure = Some(message.to_owned());
    }

    pub fn succeed_returns(&self) {
        self.state.borrow_mut().return_failure = None;
    }

    /// Keep the next return call pending until the sender fires or drops.
    pub fn hold_next_return(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().return_gates.push_back(rx);
        tx
    }

    pub fn return_calls(&self) -> Vec<ReturnRequest> {
        self.state.borrow().return_calls.clone()
    }

    // ── token listing ──

    pub fn set_tokens(&self, tokens: Vec<TokenDescriptor>) {
        let mut state = self.state.borrow_mut();
        state.tokens = tokens;
        state.token_failure = None;
    }

    pub fn fail_token_listing(&self, message: &str) {
        self.state.borrow_mut().token_failure = Some(message.to_owned());
    }

    pub fn hold_next_token_listing(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().token_gates.push_back(rx);
        tx
    }

    pub fn token_calls(&self) -> usize {
        self.state.borrow().token_calls
    }

    // ── balances ──

    pub fn set_balance(&self, token: &str, amount: &str) {
        self.state
            .borrow_mut()
            .balances
            .insert(token.to_owned(), Ok(amount.to_owned()));
    }

    pub fn fail_balance(&self, token: &str, message: &str) {
        self.state
            .borrow_mut()
            .balances
            .insert(token.to_owned(), Err(message.to_owned()));
    }

    pub fn hold_next_balance(&self, token: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state
            .borrow_mut()
            .balance_gates
            .entry(token.to_owned())
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn balance_calls(&self) -> Vec<BalanceCall> {
        self.state.borrow().balance_calls.clone()
    }

    pub fn balance_calls_for(&self, token: &str) -> usize {
        self.state
            .borrow()
            .balance_calls
            .iter()
            .filter(|call| call.token.0 == token)
            .count()
    }
}

async fn wait(gate: Option<oneshot::Receiver<()>>) {
    if let Some(gate) = gate {
        // a dropped sender releases the hold as well
        let _ = gate.await;
    }
}

#[async_trait(?Send)]
impl BridgeClient for StubBridge {
    type Provider = StubProvider;

    async fn return_wrapped_token(&self, _provider: &StubProvider, req: &ReturnRequest) -> Result<()> {
        let gate = {
            let mut state = self.state.borrow_mut();
            state.return_calls.push(req.clone());
            state.return_gates.pop_front()
        };
        wait(gate).await;

        match self.state.borrow().return_failure.clone() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(()),
        }
    }

    async fn list_known_wrapped_tokens(&self, _provider: &StubProvider) -> Result<Vec<TokenDescriptor>> {
        let gate = {
            let mut state = self.state.borrow_mut();
            state.token_calls += 1;
            state.token_gates.pop_front()
        };
        wait(gate).await;

        let state = self.state.borrow();
        match &state.token_failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(state.tokens.clone()),
        }
    }

    async fn query_token_balance(
        &self,
        provider: &StubProvider,
        account: &AccountAddress,
        token: &TokenAddress,
    ) -> Result<String> {
        let gate = {
            let mut state = self.state.borrow_mut();
            state.balance_calls.push(BalanceCall {
                provider: provider.clone(),
                account: account.clone(),
                token: token.clone(),
            });
            state
                .balance_gates
                .get_mut(&token.0)
                .and_then(VecDeque::pop_front)
        };
        wait(gate).await;

        match self.state.borrow().balances.get(&token.0) {
            Some(Ok(amount)) => Ok(amount.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Err(anyhow!("no balance for token {}", token.0)),
        }
    }
}
