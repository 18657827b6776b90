//! Target name resolution.
//!
//! One canonical `Backend` instance per architecture, reachable under
//! several `-t` flag aliases, built once behind a `OnceLock` and treated
//! as read-only for the rest of the process.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::aarch64::Aarch64Backend;
use crate::backend::Backend;
use crate::error::TargetError;
use crate::wasmedge::WasmEdgeBackend;
use crate::wat::WatBackend;
use crate::x86_64::X86_64Backend;

static X86_64: X86_64Backend = X86_64Backend;
static AARCH64: Aarch64Backend = Aarch64Backend;
static WAT: WatBackend = WatBackend;
static WASMEDGE: WasmEdgeBackend = WasmEdgeBackend::new();

fn registry() -> &'static HashMap<&'static str, &'static dyn Backend> {
    static REGISTRY: OnceLock<HashMap<&'static str, &'static dyn Backend>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map: HashMap<&'static str, &'static dyn Backend> = HashMap::new();
        map.insert("x86_64", &X86_64);
        map.insert("x86_64-linux", &X86_64);

        map.insert("aarch64", &AARCH64);
        map.insert("arm64", &AARCH64);
        map.insert("aarch64-linux", &AARCH64);

        map.insert("wasm", &WAT);
        map.insert("wasm32", &WAT);
        map.insert("wasmtime", &WAT);

        map.insert("wasmedge", &WASMEDGE);
        map
    })
}

/// Every canonical target name, for `-list-targets`. Aliases are omitted so
/// the listing names one entry per real backend.
pub fn canonical_names() -> &'static [&'static str] {
    &["x86_64", "aarch64", "wasm", "wasmedge"]
}

pub fn lookup(name: &str) -> Result<&'static dyn Backend, TargetError> {
    registry().get(name).copied().ok_or_else(|| TargetError::Unknown(name.to_string()))
}

/// Resolves a name and checks its toolchain is usable, the check `-t`
/// parsing runs before attempting to assemble/link.
pub fn resolve_available(name: &str) -> Result<&'static dyn Backend, TargetError> {
    let backend = lookup(name)?;
    if !backend.available() {
        return Err(TargetError::Unavailable(name.to_string()));
    }
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_documented_alias_resolves() {
        for name in
            ["x86_64", "x86_64-linux", "aarch64", "arm64", "aarch64-linux", "wasm", "wasm32", "wasmtime", "wasmedge"]
        {
            assert!(lookup(name).is_ok(), "{name} should resolve");
        }
    }

    #[test]
    fn aliases_of_the_same_architecture_share_a_name() {
        assert_eq!(lookup("arm64").unwrap().name(), lookup("aarch64").unwrap().name());
        assert_eq!(lookup("wasm32").unwrap().name(), lookup("wasm").unwrap().name());
    }

    #[test]
    fn an_unknown_target_name_is_an_error() {
        assert!(matches!(lookup("mips"), Err(TargetError::Unknown(_))));
    }
}
