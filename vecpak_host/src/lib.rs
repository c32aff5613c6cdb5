//! An in-memory stand-in for the sandbox host.
//!
//! [`InMemoryHost`] implements the full [`HostIo`] boundary over a
//! `BTreeMap`, so guest business logic (and this workspace's own SDK
//! surface) runs unmodified in ordinary tests: install the host, then use
//! `vecpak_rt`'s free functions as a guest would.
//!
//! ```
//! use std::rc::Rc;
//! use vecpak_host::InMemoryHost;
//!
//! let host = Rc::new(InMemoryHost::new());
//! host.install();
//! vecpak_rt::kv_put("greeting", "hello");
//! assert_eq!(vecpak_rt::kv_get::<Vec<u8>>("greeting"), Some(b"hello".to_vec()));
//! ```

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap},
    ops::Bound,
    rc::Rc,
};

use anyhow::Result;
use itertools::Itertools;
use vecpak_rt::{HostIo, KeyValuePair};

/// A cross-call handler: receives the host plus the positional and extra
/// argument payloads, returns the response payload. Errors abort the
/// execution, as a trapping callee would on the real host.
pub type Handler = Rc<dyn Fn(&InMemoryHost, &[Vec<u8>], &[Vec<u8>]) -> Result<Vec<u8>>>;

/// Context values the real host would write into guest memory before the
/// entrypoint runs.
#[derive(Clone, Debug)]
pub struct ContextValues {
    pub seed: Vec<u8>,
    pub entry_slot: u64,
    pub entry_height: u64,
    pub entry_epoch: u64,
    pub entry_signer: Vec<u8>,
    pub entry_prev_hash: Vec<u8>,
    pub entry_vr: Vec<u8>,
    pub entry_dr: Vec<u8>,
    pub tx_nonce: u64,
    pub tx_signer: Vec<u8>,
    pub account_current: Vec<u8>,
    pub account_caller: Vec<u8>,
    pub account_origin: Vec<u8>,
    pub attachment: Option<(Vec<u8>, Vec<u8>)>,
}

impl Default for ContextValues {
    fn default() -> Self {
        Self {
            seed: vec![0u8; 32],
            entry_slot: 0,
            entry_height: 0,
            entry_epoch: 0,
            entry_signer: Vec::new(),
            entry_prev_hash: Vec::new(),
            entry_vr: Vec::new(),
            entry_dr: Vec::new(),
            tx_nonce: 0,
            tx_signer: Vec::new(),
            account_current: Vec::new(),
            account_caller: Vec::new(),
            account_origin: Vec::new(),
            attachment: None,
        }
    }
}

const DEFAULT_MAX_CALL_DEPTH: usize = 8;

pub struct InMemoryHost {
    store: RefCell<BTreeMap<Vec<u8>, Vec<u8>>>,
    context: RefCell<ContextValues>,
    contracts: RefCell<HashMap<(Vec<u8>, String), Handler>>,
    logs: RefCell<Vec<String>>,
    returned: RefCell<Option<Vec<u8>>>,
    depth: Cell<usize>,
    max_call_depth: usize,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            store: RefCell::new(BTreeMap::new()),
            context: RefCell::new(ContextValues::default()),
            contracts: RefCell::new(HashMap::new()),
            logs: RefCell::new(Vec::new()),
            returned: RefCell::new(None),
            depth: Cell::new(0),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Overrides the re-entrancy budget for cross-calls. The depth limit
    /// stands in for the gas/recursion policy the real host enforces.
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Makes this host the boundary behind `vecpak_rt`'s free functions
    /// on the current thread.
    pub fn install(self: &Rc<Self>) {
        vecpak_rt::install_host(self.clone());
    }

    pub fn set_context(&self, context: ContextValues) {
        *self.context.borrow_mut() = context;
    }

    pub fn update_context(&self, f: impl FnOnce(&mut ContextValues)) {
        f(&mut self.context.borrow_mut());
    }

    /// Registers a handler for `contract`/`func` so guests can cross-call it.
    pub fn register_contract(
        &self,
        contract: impl AsRef<[u8]>,
        func: &str,
        handler: impl Fn(&InMemoryHost, &[Vec<u8>], &[Vec<u8>]) -> Result<Vec<u8>> + 'static,
    ) {
        self.contracts.borrow_mut().insert(
            (contract.as_ref().to_vec(), func.to_owned()),
            Rc::new(handler),
        );
    }

    pub fn logs(&self) -> Vec<String> {
        self.logs.borrow().clone()
    }

    /// The payload the guest handed back through `ret`, if any.
    pub fn returned(&self) -> Option<Vec<u8>> {
        self.returned.borrow().clone()
    }

    pub fn storage_snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.store.borrow().clone()
    }

    /// Human-readable `key=value` dump for debugging assertions.
    pub fn storage_dump(&self) -> String {
        self.store
            .borrow()
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    String::from_utf8_lossy(k),
                    String::from_utf8_lossy(v)
                )
            })
            .join("\n")
    }

    fn parse_decimal(value: &[u8], what: &str) -> i128 {
        std::str::from_utf8(value)
            .ok()
            .and_then(|s| s.trim().parse::<i128>().ok())
            .unwrap_or_else(|| panic!("non-decimal {what}: {:?}", String::from_utf8_lossy(value)))
    }
}

impl HostIo for InMemoryHost {
    fn kv_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.borrow().get(key).cloned()
    }

    fn kv_exists(&self, key: &[u8]) -> bool {
        self.store.borrow().contains_key(key)
    }

    fn kv_put(&self, key: &[u8], value: &[u8]) {
        tracing::trace!(key = %String::from_utf8_lossy(key), len = value.len(), "kv_put");
        self.store.borrow_mut().insert(key.to_vec(), value.to_vec());
    }

    fn kv_increment(&self, key: &[u8], delta: &[u8]) -> String {
        let delta = Self::parse_decimal(delta, "increment delta");
        let mut store = self.store.borrow_mut();
        let current = store
            .get(key)
            .map(|v| Self::parse_decimal(v, "stored value"))
            .unwrap_or(0);
        let next = current + delta;
        store.insert(key.to_vec(), next.to_string().into_bytes());
        next.to_string()
    }

    fn kv_delete(&self, key: &[u8]) {
        self.store.borrow_mut().remove(key);
    }

    fn kv_get_prev(&self, prefix: &[u8], key: &[u8]) -> KeyValuePair {
        let bound = [prefix, key].concat();
        let store = self.store.borrow();
        // The largest key below the bound either carries the prefix or no
        // key in the prefix region does.
        match store.range::<Vec<u8>, _>(..bound).next_back() {
            Some((k, v)) if k.starts_with(prefix) => KeyValuePair::new(k.clone(), v.clone()),
            _ => KeyValuePair::absent(),
        }
    }

    fn kv_get_next(&self, prefix: &[u8], key: &[u8]) -> KeyValuePair {
        let bound = [prefix, key].concat();
        let store = self.store.borrow();
        let after = (Bound::Excluded(bound), Bound::Unbounded);
        match store.range::<Vec<u8>, _>(after).next() {
            Some((k, v)) if k.starts_with(prefix) => KeyValuePair::new(k.clone(), v.clone()),
            _ => KeyValuePair::absent(),
        }
    }

    fn call(&self, contract: &[u8], func: &[u8], args: &[&[u8]], extra: &[&[u8]]) -> Vec<u8> {
        let func = String::from_utf8_lossy(func).into_owned();
        tracing::debug!(
            contract = %String::from_utf8_lossy(contract),
            func = %func,
            args = args.len(),
            depth = self.depth.get(),
            "cross-call"
        );
        if self.depth.get() >= self.max_call_depth {
            panic!("call depth limit ({}) exceeded", self.max_call_depth);
        }
        let handler = self
            .contracts
            .borrow()
            .get(&(contract.to_vec(), func.clone()))
            .cloned()
            .unwrap_or_else(|| {
                panic!(
                    "no handler registered for {}::{}",
                    String::from_utf8_lossy(contract),
                    func
                )
            });

        let args: Vec<Vec<u8>> = args.iter().map(|a| a.to_vec()).collect();
        let extra: Vec<Vec<u8>> = extra.iter().map(|a| a.to_vec()).collect();

        self.depth.set(self.depth.get() + 1);
        let outcome = handler(self, &args, &extra);
        self.depth.set(self.depth.get() - 1);

        match outcome {
            Ok(response) => response,
            Err(err) => panic!("callee {func} trapped: {err}"),
        }
    }

    fn log(&self, line: &[u8]) {
        let line = String::from_utf8_lossy(line).into_owned();
        tracing::debug!(target: "guest", "{line}");
        self.logs.borrow_mut().push(line);
    }

    fn ret(&self, value: &[u8]) {
        *self.returned.borrow_mut() = Some(value.to_vec());
    }

    fn seed(&self) -> Vec<u8> {
        self.context.borrow().seed.clone()
    }

    fn entry_slot(&self) -> u64 {
        self.context.borrow().entry_slot
    }

    fn entry_height(&self) -> u64 {
        self.context.borrow().entry_height
    }

    fn entry_epoch(&self) -> u64 {
        self.context.borrow().entry_epoch
    }

    fn entry_signer(&self) -> Vec<u8> {
        self.context.borrow().entry_signer.clone()
    }

    fn entry_prev_hash(&self) -> Vec<u8> {
        self.context.borrow().entry_prev_hash.clone()
    }

    fn entry_vr(&self) -> Vec<u8> {
        self.context.borrow().entry_vr.clone()
    }

    fn entry_dr(&self) -> Vec<u8> {
        self.context.borrow().entry_dr.clone()
    }

    fn tx_nonce(&self) -> u64 {
        self.context.borrow().tx_nonce
    }

    fn tx_signer(&self) -> Vec<u8> {
        self.context.borrow().tx_signer.clone()
    }

    fn account_current(&self) -> Vec<u8> {
        self.context.borrow().account_current.clone()
    }

    fn account_caller(&self) -> Vec<u8> {
        self.context.borrow().account_caller.clone()
    }

    fn account_origin(&self) -> Vec<u8> {
        self.context.borrow().account_origin.clone()
    }

    fn attachment(&self) -> Option<(Vec<u8>, Vec<u8>)> {
        self.context.borrow().attachment.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed() -> Rc<InMemoryHost> {
        let host = Rc::new(InMemoryHost::new());
        host.install();
        host
    }

    #[test]
    fn absent_key_differs_from_empty_value() {
        let host = installed();
        host.kv_put(b"existing_key_with_empty_value", b"");

        assert_eq!(vecpak_rt::kv_get::<Vec<u8>>("missing_key"), None);
        assert_eq!(
            vecpak_rt::kv_get::<Vec<u8>>("existing_key_with_empty_value"),
            Some(Vec::new())
        );
        assert!(!vecpak_rt::kv_exists("missing_key"));
        assert!(vecpak_rt::kv_exists("existing_key_with_empty_value"));
    }

    #[test]
    fn get_or_falls_back_only_when_absent() {
        let _host = installed();
        vecpak_rt::kv_put("counter", 7u64);
        assert_eq!(vecpak_rt::kv_get_or::<u64>("counter", 0), 7);
        assert_eq!(vecpak_rt::kv_get_or::<u64>("missing", 42), 42);
    }

    #[test]
    #[should_panic(expected = "kv_key_not_found")]
    fn required_get_aborts_on_missing_key() {
        let _host = installed();
        vecpak_rt::kv_get_required("missing");
    }

    #[test]
    #[should_panic(expected = "insufficient_balance")]
    fn failed_requirement_aborts() {
        let _host = installed();
        let balance = 5u64;
        vecpak_rt::require!(balance >= 100, "insufficient_balance");
    }

    #[test]
    fn increment_works_in_decimal_text() {
        let _host = installed();
        assert_eq!(vecpak_rt::kv_increment("supply", 500u64), "500");
        assert_eq!(vecpak_rt::kv_increment("supply", "-120"), "380");
        assert_eq!(vecpak_rt::kv_get::<u64>("supply"), Some(380));
    }

    #[test]
    fn prefix_scan_walks_keys_in_order() {
        let _host = installed();
        vecpak_rt::kv_put(vecpak_rt::b!(b"acct:", b"alice"), 1u64);
        vecpak_rt::kv_put(vecpak_rt::b!(b"acct:", b"bob"), 2u64);
        vecpak_rt::kv_put(vecpak_rt::b!(b"acct:", b"carol"), 3u64);
        vecpak_rt::kv_put("unrelated", 9u64);

        let mut seen = Vec::new();
        let mut cursor: Vec<u8> = Vec::new();
        loop {
            let pair = vecpak_rt::kv_get_next(&b"acct:"[..], &cursor);
            match pair.key {
                Some(key) => {
                    seen.push(key.clone());
                    cursor = key[b"acct:".len()..].to_vec();
                }
                None => break,
            }
        }
        assert_eq!(seen, vec![
            b"acct:alice".to_vec(),
            b"acct:bob".to_vec(),
            b"acct:carol".to_vec(),
        ]);

        let prev = vecpak_rt::kv_get_prev(&b"acct:"[..], &b"carol"[..]);
        assert_eq!(prev.key, Some(b"acct:bob".to_vec()));

        let before_first = vecpak_rt::kv_get_prev(&b"acct:"[..], &b"alice"[..]);
        assert!(before_first.is_absent());
    }

    #[test]
    fn cross_call_dispatches_to_registered_handler() {
        let host = installed();
        host.register_contract(b"token", "transfer", |host, args, _extra| {
            let to = args[0].clone();
            let amount = std::str::from_utf8(&args[1])?.parse::<i64>()?;
            host.kv_increment(&[b"bal:".as_slice(), to.as_slice()].concat(), args[1].as_slice());
            Ok(format!("moved {amount}").into_bytes())
        });

        let response = vecpak_rt::call!(&b"token"[..], "transfer", [&b"bob"[..], 500u64]);
        assert_eq!(response, b"moved 500");
        assert_eq!(vecpak_rt::kv_get::<u64>(&b"bal:bob"[..]), Some(500));
    }

    #[test]
    fn reentrant_calls_run_on_one_synchronous_stack() {
        let host = installed();
        host.register_contract(b"outer", "run", |_host, _args, _extra| {
            // Re-enters through the same free-function surface a guest uses.
            Ok(vecpak_rt::call!(&b"inner"[..], "run", [&b"x"[..]]))
        });
        host.register_contract(b"inner", "run", |_host, args, _extra| {
            Ok([b"inner saw ".as_slice(), &args[0]].concat())
        });

        let response = vecpak_rt::call!(&b"outer"[..], "run", []);
        assert_eq!(response, b"inner saw x");
    }

    #[test]
    #[should_panic(expected = "call depth limit")]
    fn runaway_recursion_hits_the_depth_limit() {
        let host = Rc::new(InMemoryHost::new().with_max_call_depth(4));
        host.install();
        host.register_contract(b"loop", "spin", |_host, _args, _extra| {
            Ok(vecpak_rt::call!(&b"loop"[..], "spin", []))
        });
        vecpak_rt::call!(&b"loop"[..], "spin", []);
    }

    #[test]
    fn extra_args_reach_the_handler() {
        let host = installed();
        host.register_contract(b"c", "f", |_host, args, extra| {
            assert_eq!(args.len(), 1);
            assert_eq!(extra, [b"attached".to_vec()]);
            Ok(Vec::new())
        });
        vecpak_rt::call!(&b"c"[..], "f", [&b"a0"[..]], [&b"attached"[..]]);
    }

    #[test]
    fn logs_and_return_value_are_captured() {
        let host = installed();
        vecpak_rt::log("minting 5 tokens");
        vecpak_rt::ret("ok");
        assert_eq!(host.logs(), vec!["minting 5 tokens".to_string()]);
        assert_eq!(host.returned(), Some(b"ok".to_vec()));
    }

    #[test]
    fn context_values_flow_through_the_accessors() {
        let host = installed();
        host.update_context(|ctx| {
            ctx.entry_slot = 777;
            ctx.tx_nonce = 3;
            ctx.tx_signer = b"alice".to_vec();
            ctx.attachment = Some((b"GOLD".to_vec(), b"1500".to_vec()));
        });

        assert_eq!(vecpak_rt::entry_slot(), 777);
        assert_eq!(vecpak_rt::tx_nonce(), 3);
        assert_eq!(vecpak_rt::tx_signer(), b"alice");
        assert_eq!(vecpak_rt::attached_symbol(), b"GOLD");
        assert_eq!(vecpak_rt::attached_amount(), b"1500");
        assert_eq!(vecpak_rt::entry_height(), 0);
        assert!(vecpak_rt::attachment().is_some());
    }

    #[test]
    fn storage_dump_is_sorted_and_readable() {
        let host = installed();
        host.kv_put(b"b", b"2");
        host.kv_put(b"a", b"1");
        assert_eq!(host.storage_dump(), "a=1\nb=2");
    }
}
