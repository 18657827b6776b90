//! The `Backend` trait every target implements.

use blc_ir::Instr;
use blc_util::Interner;

pub trait Backend: Sync {
    /// Canonical name, as printed by `-list-targets`.
    fn name(&self) -> &'static str;

    /// Extension for the generated assembly/text file (`asm`, `s`, `wat`).
    fn file_extension(&self) -> &'static str;

    /// Lowers the whole-program IR to backend-specific assembly text.
    fn codegen(&self, ir: &[Instr], interner: &Interner) -> String;

    /// Shell command that turns an assembly file into an object file.
    fn asm_cmd(&self, asm_path: &str, obj_path: &str) -> String;

    /// Shell command that links an object file into the final executable.
    fn ld_cmd(&self, obj_path: &str, exe_path: &str) -> String;

    /// Whether this backend's toolchain is expected to be usable here.
    /// Every backend currently accepts the default `true`; a future
    /// `WasmEdge` probe of the actual runtime would override it.
    fn available(&self) -> bool {
        true
    }
}
