//! Cross-program invocation and host diagnostics.

use std::borrow::Cow;

use crate::{host::with_host, payload::Payload};

/// Invokes `func` in the program identified by `contract`.
///
/// All arguments are converted to byte payloads in this frame, so they
/// outlive the marshaled call table the boundary implementation builds
/// from them. The response is the callee's return payload, empty when the
/// callee returned nothing.
pub fn call(
    contract: impl Payload,
    func: impl Payload,
    args: &[&dyn Payload],
    extra: &[&dyn Payload],
) -> Vec<u8> {
    let contract = contract.to_payload();
    let func = func.to_payload();
    let args: Vec<Cow<'_, [u8]>> = args.iter().map(|a| a.to_payload()).collect();
    let extra: Vec<Cow<'_, [u8]>> = extra.iter().map(|a| a.to_payload()).collect();
    let arg_refs: Vec<&[u8]> = args.iter().map(AsRef::as_ref).collect();
    let extra_refs: Vec<&[u8]> = extra.iter().map(AsRef::as_ref).collect();
    with_host(|h| h.call(contract.as_ref(), func.as_ref(), &arg_refs, &extra_refs))
}

pub fn log(line: impl Payload) {
    let line = line.to_payload();
    with_host(|h| h.log(line.as_ref()))
}

/// Hands the entrypoint's return value to the host.
pub fn ret(value: impl Payload) {
    let value = value.to_payload();
    with_host(|h| h.ret(value.as_ref()))
}
