//! Guest-side runtime support for programs running inside the sandbox.
//!
//! A guest exchanges structured data with its host through a narrow
//! pointer/length calling convention over linear memory. This crate owns
//! that boundary: the [`HostIo`] capability trait, the call-table
//! marshaling, the fixed-offset context memory convention, and typed
//! wrappers over the host's key/value store.
//!
//! On `wasm32` every operation routes to the host's `import_*` functions.
//! Off-wasm the same API routes to whatever [`HostIo`] implementation the
//! test harness installs, so business logic is unit-testable against an
//! in-memory host (see the `vecpak_host` crate).

mod call;
mod context;
mod host;
pub mod layout;
pub mod marshal;
mod payload;
mod storage;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use call::{call, log, ret};
pub use context::{
    account_caller, account_current, account_origin, attached_amount, attached_symbol, attachment,
    entry_dr, entry_epoch, entry_height, entry_prev_hash, entry_signer, entry_slot, entry_vr, seed,
    tx_nonce, tx_signer,
};
pub use host::{HostIo, KeyValuePair};
#[cfg(not(target_arch = "wasm32"))]
pub use host::{clear_host, install_host};
pub use payload::{FromKvBytes, Payload};
pub use storage::{
    kv_delete, kv_exists, kv_get, kv_get_next, kv_get_or, kv_get_prev, kv_get_required,
    kv_increment, kv_put,
};

/// Logs a message through the host, then traps.
///
/// Structural codec errors and violated business invariants must never
/// return partial state to the host, so the only way out is down.
#[macro_export]
macro_rules! abort {
    ($msg:expr) => {{
        $crate::log($msg);

        #[cfg(target_arch = "wasm32")]
        core::arch::wasm32::unreachable();

        #[cfg(not(target_arch = "wasm32"))]
        panic!("guest aborted: {}", $msg);
    }};
}

#[macro_export]
macro_rules! require {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            $crate::abort!($msg);
        }
    };
}

/// Concatenates anything byte-like into one `Vec<u8>`. Storage keys are
/// built this way: `b!(b"balance:", owner)`.
#[macro_export]
macro_rules! b {
    ( $( $x:expr ),* ) => {
        {
            let mut out = ::std::vec::Vec::new();
            $(
                out.extend_from_slice($x.as_ref());
            )*
            out
        }
    };
}

/// Sugar over [`call`] taking heterogeneous `Payload` arguments.
///
/// ```ignore
/// let response = call!(token, "transfer", [to, amount, b"GOLD"]);
/// ```
#[macro_export]
macro_rules! call {
    ($contract:expr, $func:expr, [ $( $arg:expr ),* ], [ $( $earg:expr ),* ]) => {
        {
            let args: &[&dyn $crate::Payload] = &[ $( &$arg ),* ];
            let extra: &[&dyn $crate::Payload] = &[ $( &$earg ),* ];
            $crate::call($contract, $func, args, extra)
        }
    };

    ($contract:expr, $func:expr, [ $( $arg:expr ),* ]) => {
        {
            let args: &[&dyn $crate::Payload] = &[ $( &$arg ),* ];
            let extra: &[&dyn $crate::Payload] = &[];
            $crate::call($contract, $func, args, extra)
        }
    };
}
