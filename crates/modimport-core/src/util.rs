use sha2::{Digest, Sha256};

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

// Keywords that cannot be written as raw identifiers either.
const NON_RAW: &[&str] = &["_", "crate", "self", "Self", "super"];

/// Spelling of `name` as a Rust identifier, raw when it is a keyword.
pub(crate) fn rust_ident(name: &str) -> Result<String, &'static str> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err("empty name");
    };
    if !(first == '_' || first.is_ascii_alphabetic()) {
        return Err("must start with a letter or '_'");
    }
    if !chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
        return Err("only ASCII letters, digits and '_' are allowed");
    }
    if NON_RAW.contains(&name) {
        return Err("reserved keyword");
    }
    if KEYWORDS.contains(&name) {
        return Ok(format!("r#{name}"));
    }
    Ok(name.to_string())
}

/// `DashStates1` -> `dash_states1`, `HTTPClient` -> `http_client`.
pub(crate) fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{rust_ident, sha256_hex, snake_case};

    #[test]
    fn snake_case_boundaries() {
        assert_eq!(snake_case("DashStates1"), "dash_states1");
        assert_eq!(snake_case("HTTPClient"), "http_client");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("A"), "a");
        assert_eq!(snake_case("Outer_Inner"), "outer_inner");
    }

    #[test]
    fn idents_and_keywords() {
        assert_eq!(rust_ident("GetState").as_deref(), Ok("GetState"));
        assert_eq!(rust_ident("type").as_deref(), Ok("r#type"));
        assert!(rust_ident("self").is_err());
        assert!(rust_ident("1abc").is_err());
        assert!(rust_ident("a-b").is_err());
        assert!(rust_ident("").is_err());
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
