//! blc-wasminfo - Byte/text sniffer for `.wasm`/`.wat` files.
//!
//! Entirely unrelated to the compiler pipeline: the `-parse` driver flag
//! wants a quick answer to "what kind of WebAssembly artifact is this
//! file", without pulling in a real parser for either
//! format. Nothing here touches `Token`, AST, or IR types.

const WASM_MAGIC: [u8; 4] = [0x00, b'a', b's', b'm'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    BinaryWasm { version: u32 },
    WatText,
    Unrecognized,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::BinaryWasm { version } => write!(f, "binary wasm module, version {version}"),
            Kind::WatText => write!(f, "wat text module"),
            Kind::Unrecognized => write!(f, "unrecognized file format"),
        }
    }
}

/// Classifies `bytes` as a binary `.wasm` module, a `.wat` text module, or
/// neither. Binary detection only looks at the 8-byte header; text
/// detection looks for `(module` after skipping leading whitespace and
/// `;;`/block comments.
pub fn sniff(bytes: &[u8]) -> Kind {
    if bytes.len() >= 8 && bytes[0..4] == WASM_MAGIC {
        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        return Kind::BinaryWasm { version };
    }

    let text = String::from_utf8_lossy(bytes);
    if looks_like_wat(&text) {
        return Kind::WatText;
    }

    Kind::Unrecognized
}

fn looks_like_wat(text: &str) -> bool {
    let mut rest = text;
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix(";;") {
            rest = after.split_once('\n').map(|(_, tail)| tail).unwrap_or("");
            continue;
        }
        if let Some(after) = rest.strip_prefix("(;") {
            rest = after.split_once(";)").map(|(_, tail)| tail).unwrap_or("");
            continue;
        }
        break;
    }
    rest.starts_with("(module")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_the_binary_magic_and_version() {
        let mut bytes = WASM_MAGIC.to_vec();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        assert_eq!(sniff(&bytes), Kind::BinaryWasm { version: 1 });
    }

    #[test]
    fn recognizes_plain_wat_text() {
        assert_eq!(sniff(b"(module (func))"), Kind::WatText);
    }

    #[test]
    fn skips_leading_whitespace_and_comments_before_the_module_keyword() {
        let src = b"  ;; a comment\n  (; block ;)\n(module)";
        assert_eq!(sniff(src), Kind::WatText);
    }

    #[test]
    fn anything_else_is_unrecognized() {
        assert_eq!(sniff(b"not wasm at all"), Kind::Unrecognized);
        assert_eq!(sniff(b""), Kind::Unrecognized);
    }
}
