use async_trait::async_trait;
use baboon_core::{
    Address, BaboonError, ContractAddresses, ContractCall, ContractGateway, GameRecord,
    ReceiptStatus, Result, TransactionRequest, TxHash, WalletAdapter, U256,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub const GAMES: Address = Address::repeat_byte(0x0a);
pub const TOKEN: Address = Address::repeat_byte(0x0b);
pub const ADMIN: Address = Address::repeat_byte(0xad);
pub const PLAYER: Address = Address::repeat_byte(0x01);

pub const P1_TEXT: &str = "0x00000000000000000000000000000000000000aa";
pub const P2_TEXT: &str = "0x00000000000000000000000000000000000000bb";

pub const P1: Address = Address::with_last_byte(0xaa);
pub const P2: Address = Address::with_last_byte(0xbb);

pub struct MockWallet {
    account: Address,
    connected: Mutex<Option<Address>>,
    reject: bool,
}

impl MockWallet {
    pub fn new(account: Address) -> Arc<Self> {
        Arc::new(Self {
            account,
            connected: Mutex::new(None),
            reject: false,
        })
    }

    pub fn rejecting(account: Address) -> Arc<Self> {
        Arc::new(Self {
            account,
            connected: Mutex::new(None),
            reject: true,
        })
    }
}

#[async_trait]
impl WalletAdapter for MockWallet {
    async fn connect(&self) -> Result<Address> {
        if self.reject {
            return Err(BaboonError::WalletRejected("User rejected the request.".into()));
        }
        *self.connected.lock() = Some(self.account);
        Ok(self.account)
    }

    async fn disconnect(&self) -> Result<()> {
        *self.connected.lock() = None;
        Ok(())
    }

    fn address(&self) -> Option<Address> {
        *self.connected.lock()
    }

    async fn send_transaction(&self, _request: TransactionRequest) -> Result<TxHash> {
        Err(BaboonError::internal("MockWallet does not broadcast"))
    }
}

/// Gateway double that records every write and replays scripted receipts.
pub struct MockGateway {
    contracts: ContractAddresses,
    deposit_amount: U256,
    calls: Mutex<Vec<ContractCall>>,
    fail_on: Mutex<Option<&'static str>>,
    receipts: Mutex<HashMap<TxHash, VecDeque<ReceiptStatus>>>,
}

impl MockGateway {
    pub fn new(deposit_amount: u64) -> Arc<Self> {
        Arc::new(Self {
            contracts: ContractAddresses {
                games: GAMES,
                token: TOKEN,
            },
            deposit_amount: U256::from(deposit_amount),
            calls: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
            receipts: Mutex::new(HashMap::new()),
        })
    }

    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls.lock().clone()
    }

    /// Make writes of `function` fail as if the user declined to sign.
    pub fn fail_on(&self, function: &'static str) {
        *self.fail_on.lock() = Some(function);
    }

    pub fn script_receipt(&self, hash: TxHash, statuses: Vec<ReceiptStatus>) {
        self.receipts.lock().insert(hash, statuses.into());
    }

    /// Hash the mock hands out for the n-th write (1-based).
    pub fn hash_for(n: usize) -> TxHash {
        TxHash::with_last_byte(n as u8)
    }
}

#[async_trait]
impl ContractGateway for MockGateway {
    fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    async fn deposit_amount(&self) -> Result<U256> {
        Ok(self.deposit_amount)
    }

    async fn game(&self, id: U256) -> Result<GameRecord> {
        Ok(GameRecord {
            id,
            players: [P1, P2],
            winner: Address::ZERO,
            is_played: false,
        })
    }

    async fn token(&self) -> Result<Address> {
        Ok(self.contracts.token)
    }

    async fn balance_of(&self, _account: Address) -> Result<U256> {
        Ok(self.deposit_amount * U256::from(3))
    }

    async fn write(&self, call: ContractCall) -> Result<TxHash> {
        if *self.fail_on.lock() == Some(call.function_name()) {
            return Err(BaboonError::WalletRejected("User rejected the request.".into()));
        }
        let mut calls = self.calls.lock();
        calls.push(call);
        Ok(Self::hash_for(calls.len()))
    }

    async fn receipt_status(&self, hash: TxHash) -> Result<ReceiptStatus> {
        let mut receipts = self.receipts.lock();
        let queue = receipts
            .get_mut(&hash)
            .ok_or_else(|| BaboonError::internal(format!("unknown transaction {}", hash)))?;

        // the last scripted status repeats
        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap_or(ReceiptStatus::Pending))
        } else {
            Ok(queue.front().cloned().unwrap_or(ReceiptStatus::Pending))
        }
    }
}
