// Path: crates/host/src/native.rs
//! The dispatcher used when the runtime is compiled natively instead of sandboxed.

use sbx_api::error::{ErrorCode, HostFault};
use sbx_api::host::{HostCall, HostDispatch, HostReturn};
use sbx_telemetry::error_metrics;
use sbx_telemetry::sinks::ErrorMetricsSink;

/// A dispatcher that faults on every call with [`HostFault::NativeCall`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDispatcher;

impl HostDispatch for NativeDispatcher {
    fn dispatch(&mut self, call: HostCall) -> Result<HostReturn, HostFault> {
        let name = call.name();
        let fault = HostFault::NativeCall(name);
        tracing::error!(target: "host", call = name, "host call issued outside the sandbox");
        error_metrics().inc_error("host", fault.code());
        Err(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbx_api::state::StoreId;

    #[test]
    fn every_call_faults_loudly() {
        let mut native = NativeDispatcher;
        let calls = [
            HostCall::StorageGet {
                store: StoreId::Top,
                key: b"k".to_vec(),
            },
            HostCall::StartTransaction,
            HostCall::StartBatchVerify,
            HostCall::MaxLevel,
            HostCall::PrintNum(7),
        ];
        for call in calls {
            let name = call.name();
            assert_eq!(native.dispatch(call), Err(HostFault::NativeCall(name)));
        }
    }
}
