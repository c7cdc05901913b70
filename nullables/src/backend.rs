//! Nullable backend: in-memory canister with scripted answers.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use anima_rpc::{AnimaBackend, BackendResult, RpcError};
use anima_types::{AnimaData, InteractionResponse, MintResult, Principal, TokenId};

/// Experience granted per interaction.
pub const EXPERIENCE_PER_INTERACTION: u64 = 10;

type VerifyHook = Box<dyn FnMut(usize) + Send>;

/// An in-memory stand-in for the backend canister.
///
/// Unscripted calls behave like the real canister as far as the client can
/// observe: mints assign sequential ids with designation `ANIMA-{id:08X}`,
/// interactions grant 10 experience and level up at `level * 100`.
pub struct NullBackend {
    animas: Mutex<BTreeMap<TokenId, AnimaData>>,
    next_token_id: Mutex<TokenId>,
    verify_script: Mutex<VecDeque<Result<bool, String>>>,
    verify_default: bool,
    verify_calls: Mutex<Vec<Principal>>,
    verify_hook: Mutex<Option<VerifyHook>>,
    mint_script: Mutex<VecDeque<Result<BackendResult<MintResult>, String>>>,
    mint_calls: Mutex<Vec<Principal>>,
    interact_calls: Mutex<Vec<(TokenId, Option<String>)>>,
    interact_failure: Mutex<Option<String>>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self {
            animas: Mutex::new(BTreeMap::new()),
            next_token_id: Mutex::new(0),
            verify_script: Mutex::new(VecDeque::new()),
            verify_default: false,
            verify_calls: Mutex::new(Vec::new()),
            verify_hook: Mutex::new(None),
            mint_script: Mutex::new(VecDeque::new()),
            mint_calls: Mutex::new(Vec::new()),
            interact_calls: Mutex::new(Vec::new()),
            interact_failure: Mutex::new(None),
        }
    }

    /// Answer once the script runs dry.
    pub fn verify_default(mut self, confirmed: bool) -> Self {
        self.verify_default = confirmed;
        self
    }

    /// Queue `verify_payment` answers. `Err` becomes a transport failure.
    pub fn script_verify(&self, answers: impl IntoIterator<Item = Result<bool, String>>) {
        self.verify_script.lock().unwrap().extend(answers);
    }

    /// Run `hook` with the 1-based call number on every `verify_payment`.
    pub fn on_verify(&self, hook: impl FnMut(usize) + Send + 'static) {
        *self.verify_hook.lock().unwrap() = Some(Box::new(hook));
    }

    /// Queue a `mint_anima` outcome. `Err` becomes a transport failure.
    pub fn script_mint(&self, outcome: Result<BackendResult<MintResult>, String>) {
        self.mint_script.lock().unwrap().push_back(outcome);
    }

    /// Make every `interact` call fail at the transport level.
    pub fn fail_interactions(&self, reason: impl Into<String>) {
        *self.interact_failure.lock().unwrap() = Some(reason.into());
    }

    pub fn insert_anima(&self, token_id: TokenId, data: AnimaData) {
        self.animas.lock().unwrap().insert(token_id, data);
        let mut next = self.next_token_id.lock().unwrap();
        if *next <= token_id {
            *next = token_id + 1;
        }
    }

    pub fn anima(&self, token_id: TokenId) -> Option<AnimaData> {
        self.animas.lock().unwrap().get(&token_id).cloned()
    }

    pub fn verify_calls(&self) -> Vec<Principal> {
        self.verify_calls.lock().unwrap().clone()
    }

    pub fn mint_calls(&self) -> Vec<Principal> {
        self.mint_calls.lock().unwrap().clone()
    }

    pub fn interact_calls(&self) -> Vec<(TokenId, Option<String>)> {
        self.interact_calls.lock().unwrap().clone()
    }

    fn mint_in_memory(&self, owner: &Principal) -> MintResult {
        let mut next = self.next_token_id.lock().unwrap();
        let token_id = *next;
        *next += 1;
        let designation = format!("ANIMA-{:08X}", token_id);
        self.animas.lock().unwrap().insert(
            token_id,
            AnimaData {
                owner: owner.clone(),
                designation: designation.clone(),
                created_at: 0,
                level: 1,
                experience: 0,
                payment_memo: 0,
            },
        );
        MintResult {
            token_id,
            designation,
        }
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimaBackend for NullBackend {
    async fn mint_anima(&self, owner: &Principal) -> Result<BackendResult<MintResult>, RpcError> {
        self.mint_calls.lock().unwrap().push(owner.clone());
        let scripted = self.mint_script.lock().unwrap().pop_front();
        match scripted {
            Some(Ok(Ok(result))) => {
                self.insert_anima(
                    result.token_id,
                    AnimaData {
                        owner: owner.clone(),
                        designation: result.designation.clone(),
                        created_at: 0,
                        level: 1,
                        experience: 0,
                        payment_memo: 0,
                    },
                );
                Ok(Ok(result))
            }
            Some(Ok(Err(reason))) => Ok(Err(reason)),
            Some(Err(transport)) => Err(RpcError::Transport(transport)),
            None => Ok(Ok(self.mint_in_memory(owner))),
        }
    }

    async fn get_anima(&self, token_id: TokenId) -> Result<Option<AnimaData>, RpcError> {
        Ok(self.anima(token_id))
    }

    async fn get_user_animas(
        &self,
        owner: &Principal,
    ) -> Result<Vec<(TokenId, AnimaData)>, RpcError> {
        Ok(self
            .animas
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, data)| &data.owner == owner)
            .map(|(id, data)| (*id, data.clone()))
            .collect())
    }

    async fn interact(
        &self,
        token_id: TokenId,
        message: Option<String>,
    ) -> Result<BackendResult<InteractionResponse>, RpcError> {
        self.interact_calls.lock().unwrap().push((token_id, message));
        if let Some(reason) = self.interact_failure.lock().unwrap().clone() {
            return Err(RpcError::Transport(reason));
        }
        let mut animas = self.animas.lock().unwrap();
        let Some(anima) = animas.get_mut(&token_id) else {
            return Ok(Err("ANIMA not found".to_string()));
        };
        anima.experience += EXPERIENCE_PER_INTERACTION;
        if anima.experience >= anima.level * 100 {
            anima.level += 1;
        }
        Ok(Ok(InteractionResponse {
            message: format!(
                "Interaction successful. Experience gained: {EXPERIENCE_PER_INTERACTION}"
            ),
            experience_gained: EXPERIENCE_PER_INTERACTION,
        }))
    }

    async fn verify_payment(&self, owner: &Principal) -> Result<bool, RpcError> {
        let call = {
            let mut calls = self.verify_calls.lock().unwrap();
            calls.push(owner.clone());
            calls.len()
        };
        if let Some(hook) = self.verify_hook.lock().unwrap().as_mut() {
            hook(call);
        }
        let scripted = self.verify_script.lock().unwrap().pop_front();
        match scripted {
            Some(Ok(confirmed)) => Ok(confirmed),
            Some(Err(reason)) => Err(RpcError::Transport(reason)),
            None => Ok(self.verify_default),
        }
    }
}
