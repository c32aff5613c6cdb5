//! The sandbox boundary as an explicit capability.

/// One entry of an ordered range scan. Both sides `None` means "no entry
/// qualifies", which is distinct from a present key with an empty value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyValuePair {
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
}

impl KeyValuePair {
    pub fn new(key: Vec<u8>, value: Vec<u8>) -> Self {
        Self {
            key: Some(key),
            value: Some(value),
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.key.is_none()
    }
}

/// Everything the host does for a guest.
///
/// On `wasm32` the single implementation marshals through the `import_*`
/// boundary functions. Off-wasm, tests install an in-memory implementation
/// and the whole SDK surface runs against it unchanged.
///
/// Host calls are blocking and may re-enter other programs; any recursion
/// or gas budget is the implementation's policy to enforce.
pub trait HostIo {
    /// Permissive lookup: `None` when the key does not exist.
    fn kv_get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn kv_exists(&self, key: &[u8]) -> bool;
    fn kv_put(&self, key: &[u8], value: &[u8]);
    /// Adds decimal-text `delta` to the stored decimal-text value,
    /// returning the new value as decimal text.
    fn kv_increment(&self, key: &[u8], delta: &[u8]) -> String;
    fn kv_delete(&self, key: &[u8]);
    /// Last entry strictly before `prefix ‖ key` that still starts with `prefix`.
    fn kv_get_prev(&self, prefix: &[u8], key: &[u8]) -> KeyValuePair;
    /// First entry strictly after `prefix ‖ key` that still starts with `prefix`.
    fn kv_get_next(&self, prefix: &[u8], key: &[u8]) -> KeyValuePair;

    /// Invokes `func` in the program identified by `contract` and returns
    /// its response bytes.
    fn call(&self, contract: &[u8], func: &[u8], args: &[&[u8]], extra: &[&[u8]]) -> Vec<u8>;

    fn log(&self, line: &[u8]);
    /// Hands the entrypoint's return value to the host.
    fn ret(&self, value: &[u8]);

    // Execution context, populated by the host before the entrypoint runs.
    fn seed(&self) -> Vec<u8>;
    fn entry_slot(&self) -> u64;
    fn entry_height(&self) -> u64;
    fn entry_epoch(&self) -> u64;
    fn entry_signer(&self) -> Vec<u8>;
    fn entry_prev_hash(&self) -> Vec<u8>;
    fn entry_vr(&self) -> Vec<u8>;
    fn entry_dr(&self) -> Vec<u8>;
    fn tx_nonce(&self) -> u64;
    fn tx_signer(&self) -> Vec<u8>;
    fn account_current(&self) -> Vec<u8>;
    fn account_caller(&self) -> Vec<u8>;
    fn account_origin(&self) -> Vec<u8>;
    /// `(symbol, amount)` of the asset attached to the current call, if any.
    fn attachment(&self) -> Option<(Vec<u8>, Vec<u8>)>;
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        pub(crate) fn with_host<R>(f: impl FnOnce(&dyn HostIo) -> R) -> R {
            f(&crate::wasm::WasmHost)
        }
    } else {
        use std::{cell::RefCell, rc::Rc};

        thread_local! {
            static HOST: RefCell<Option<Rc<dyn HostIo>>> = const { RefCell::new(None) };
        }

        /// Installs the boundary implementation free functions route to.
        /// Execution is single threaded per guest instance, so the slot is
        /// thread local.
        pub fn install_host(host: Rc<dyn HostIo>) {
            HOST.with(|slot| *slot.borrow_mut() = Some(host));
        }

        pub fn clear_host() {
            HOST.with(|slot| *slot.borrow_mut() = None);
        }

        pub(crate) fn with_host<R>(f: impl FnOnce(&dyn HostIo) -> R) -> R {
            let host = HOST
                .with(|slot| slot.borrow().clone())
                .expect("no HostIo installed; call vecpak_rt::install_host first");
            f(host.as_ref())
        }
    }
}
