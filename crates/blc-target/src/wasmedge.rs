//! WasmEdge AOT backend.
//!
//! Composes a [`WatBackend`] rather than inheriting from it: code
//! generation is identical WAT text, only the assemble/link commands
//! differ (`wat2wasm` then a WasmEdge AOT compile, instead of
//! `wasmtime compile`).

use blc_ir::Instr;
use blc_util::Interner;

use crate::backend::Backend;
use crate::wat::WatBackend;

pub struct WasmEdgeBackend {
    wat: WatBackend,
}

impl WasmEdgeBackend {
    pub const fn new() -> Self {
        Self { wat: WatBackend }
    }
}

impl Backend for WasmEdgeBackend {
    fn name(&self) -> &'static str {
        "wasmedge"
    }

    fn file_extension(&self) -> &'static str {
        self.wat.file_extension()
    }

    fn codegen(&self, ir: &[Instr], interner: &Interner) -> String {
        self.wat.codegen(ir, interner)
    }

    fn asm_cmd(&self, asm_path: &str, obj_path: &str) -> String {
        let wasm_temp = format!("{}_raw.wasm", asm_path.trim_end_matches(".wat"));
        format!(
            "wat2wasm {asm_path} -o {wasm_temp} && wasmedgec --optimize O3 --enable-wasi {wasm_temp} {obj_path}"
        )
    }

    fn ld_cmd(&self, obj_path: &str, exe_path: &str) -> String {
        format!("cp {obj_path} {exe_path}.aot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codegen_delegates_to_the_wat_backend() {
        let ir = vec![Instr::Ret(None)];
        let interner = Interner::new();
        let wasmedge = WasmEdgeBackend::new();
        assert_eq!(wasmedge.codegen(&ir, &interner), WatBackend.codegen(&ir, &interner));
    }

    #[test]
    fn asm_cmd_chains_wat2wasm_and_the_aot_compiler() {
        let wasmedge = WasmEdgeBackend::new();
        let cmd = wasmedge.asm_cmd("out.wat", "out.aot_obj");
        assert!(cmd.contains("wat2wasm out.wat"));
        assert!(cmd.contains("wasmedgec"));
    }

    #[test]
    fn link_step_copies_to_a_dot_aot_file() {
        let wasmedge = WasmEdgeBackend::new();
        assert_eq!(wasmedge.ld_cmd("out.aot_obj", "out"), "cp out.aot_obj out.aot");
    }
}
