use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// Language tag of the language-less source file of a translation group.
pub const DEFAULT_LANGUAGE: &str = "default";

/// File suffixes recognized as localization files. Matching is case-sensitive.
pub const LOCALIZATION_SUFFIXES: &[&str] = &[".xlf", ".xliff"];

/// `<2-lowercase-letter-code>.<baseName>.xlf`
static LANGUAGE_PREFIXED: OnceLock<Regex> = OnceLock::new();

fn language_prefixed() -> &'static Regex {
    LANGUAGE_PREFIXED.get_or_init(|| {
        Regex::new(r"^([a-z]{2})\.(.+)\.xlf$").expect("invalid language prefix pattern")
    })
}

/// Split a file name into `(language_tag, base_name)`.
///
/// - `de.messages.xlf` -> `("de", "messages")`
/// - `messages.xlf` / `messages.xliff` -> `("default", "messages")`
/// - anything else -> `("default", <file name>)`
///
/// Total and side-effect free: a name that does not follow the convention
/// degrades to the `"default"` tag instead of failing.
pub fn parse_file_name(file_name: &str) -> (String, String) {
    if let Some(caps) = language_prefixed().captures(file_name) {
        return (caps[1].to_string(), caps[2].to_string());
    }

    for suffix in LOCALIZATION_SUFFIXES {
        if let Some(base) = file_name.strip_suffix(suffix) {
            return (DEFAULT_LANGUAGE.to_string(), base.to_string());
        }
    }

    (DEFAULT_LANGUAGE.to_string(), file_name.to_string())
}

/// Returns true if `name` ends in one of [`LOCALIZATION_SUFFIXES`].
pub fn has_localization_suffix(name: &str) -> bool {
    has_localization_suffix_os(OsStr::new(name))
}

/// Like [`has_localization_suffix`], on the raw bytes of a file name, so
/// names that are not valid UTF-8 still match.
pub fn has_localization_suffix_os(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    LOCALIZATION_SUFFIXES
        .iter()
        .any(|s| bytes.ends_with(s.as_bytes()))
}

/// Returns true if the final component of `path` is a localization file name.
pub fn is_localization_file(path: &Path) -> bool {
    path.file_name()
        .map(has_localization_suffix_os)
        .unwrap_or(false)
}

/// Returns true if `tag` is a two-letter lowercase ASCII language code.
pub fn is_language_code(tag: &str) -> bool {
    tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_lowercase())
}

/// Ordering for language tags: `"default"` sorts before everything else,
/// the remaining tags compare lexicographically.
pub fn compare_languages(a: &str, b: &str) -> Ordering {
    match (a == DEFAULT_LANGUAGE, b == DEFAULT_LANGUAGE) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}
