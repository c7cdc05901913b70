//! Nullable wallet: scripted approvals, recorded transfers.

use std::collections::VecDeque;
use std::sync::Mutex;

use anima_types::{PaymentRequest, Principal, TransferReceipt};
use anima_wallet_core::{ConnectRequest, WalletError, WalletProvider};

/// A wallet that approves or rejects on script and never moves funds.
pub struct NullWallet {
    principal: Principal,
    connected: Mutex<bool>,
    approve_connect: bool,
    transfer_script: Mutex<VecDeque<Result<TransferReceipt, WalletError>>>,
    next_height: Mutex<u64>,
    transfers: Mutex<Vec<PaymentRequest>>,
    connect_requests: Mutex<Vec<ConnectRequest>>,
    fail_status: bool,
}

impl NullWallet {
    /// A wallet that is not connected yet but approves any connection.
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            connected: Mutex::new(false),
            approve_connect: true,
            transfer_script: Mutex::new(VecDeque::new()),
            next_height: Mutex::new(1),
            transfers: Mutex::new(Vec::new()),
            connect_requests: Mutex::new(Vec::new()),
            fail_status: false,
        }
    }

    /// A wallet that already reports a live connection.
    pub fn connected(principal: Principal) -> Self {
        let wallet = Self::new(principal);
        *wallet.connected.lock().unwrap() = true;
        wallet
    }

    /// Make `request_connect` answer `false`.
    pub fn declining(mut self) -> Self {
        self.approve_connect = false;
        self
    }

    /// Make `is_connected` fail, as when the extension is missing.
    pub fn not_installed(mut self) -> Self {
        self.fail_status = true;
        self
    }

    /// Queue the outcome of the next transfer. Unscripted transfers succeed
    /// with increasing heights.
    pub fn script_transfer(&self, outcome: Result<TransferReceipt, WalletError>) {
        self.transfer_script.lock().unwrap().push_back(outcome);
    }

    /// All transfers submitted, in order.
    pub fn transfers(&self) -> Vec<PaymentRequest> {
        self.transfers.lock().unwrap().clone()
    }

    pub fn connect_requests(&self) -> Vec<ConnectRequest> {
        self.connect_requests.lock().unwrap().clone()
    }

    pub fn is_connected_now(&self) -> bool {
        *self.connected.lock().unwrap()
    }
}

impl WalletProvider for NullWallet {
    async fn request_connect(&self, request: &ConnectRequest) -> Result<bool, WalletError> {
        self.connect_requests.lock().unwrap().push(request.clone());
        if self.approve_connect {
            *self.connected.lock().unwrap() = true;
        }
        Ok(self.approve_connect)
    }

    async fn is_connected(&self) -> Result<bool, WalletError> {
        if self.fail_status {
            return Err(WalletError::NotInstalled);
        }
        Ok(self.is_connected_now())
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        *self.connected.lock().unwrap() = false;
        Ok(())
    }

    async fn request_transfer(
        &self,
        request: &PaymentRequest,
    ) -> Result<TransferReceipt, WalletError> {
        self.transfers.lock().unwrap().push(request.clone());
        if let Some(outcome) = self.transfer_script.lock().unwrap().pop_front() {
            return outcome;
        }
        let mut height = self.next_height.lock().unwrap();
        let receipt = TransferReceipt::at_height(*height);
        *height += 1;
        Ok(receipt)
    }

    async fn get_principal(&self) -> Result<Principal, WalletError> {
        if !self.is_connected_now() {
            return Err(WalletError::NotConnected);
        }
        Ok(self.principal.clone())
    }
}
