//! Route metadata read from App Router page modules.
//!
//! Pages declare their head metadata as an exported object literal, either
//! directly or through the `buildRouteMetadata` helper:
//!
//! ```text
//! const TITLE = "Local SEO for dental practices"
//!
//! export const metadata = buildRouteMetadata({
//!   titleStem: TITLE,
//!   description: `Rank in the map pack with ${BRAND}.`,
//!   path: "/local-seo",
//! })
//! ```
//!
//! Only literal values evaluate: quoted strings, template literals whose
//! substitutions are `const` strings, `+` concatenation, and identifiers bound
//! by a top-level `const`. Anything computed at runtime reads as absent.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static CONST_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:export[ \t]+)?const[ \t]+([A-Za-z_$][\w$]*)[ \t]*(?::[^=\n]+)?=[ \t]*(.+?)[ \t]*;?[ \t]*$")
        .expect("valid const regex")
});

static METADATA_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+const\s+metadata\b[^=]*=\s*(buildRouteMetadata\s*\(\s*)?\{")
        .expect("valid metadata regex")
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").expect("valid identifier regex"));

/// Metadata as declared in a page module, before title and description rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredMetadata {
    pub title_stem: String,
    pub description: String,
    /// `alternates.canonical`, or the helper's `path`.
    pub canonical: Option<String>,
    pub noindex: bool,
}

/// Call `visit(index, byte, depth)` for every byte of `code` outside string
/// literals and comments. `depth` is the bracket depth before the byte.
/// Returning `false` stops the walk.
fn walk_code(code: &str, mut visit: impl FnMut(usize, u8, usize) -> bool) {
    let bytes = code.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' | b'\'' | b'`' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 1;
            }
            _ => {
                if !visit(i, b, depth) {
                    return;
                }
                match b {
                    b'{' | b'[' | b'(' => depth += 1,
                    b'}' | b']' | b')' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
        }
        i += 1;
    }
}

/// Index of the bracket that closes the one at `open`.
fn matching_close(code: &str, open: usize) -> Option<usize> {
    let slice = code.get(open..)?;
    let mut close = None;
    walk_code(slice, |i, b, depth| {
        if i > 0 && depth == 1 && matches!(b, b'}' | b']' | b')') {
            close = Some(open + i);
            return false;
        }
        true
    });
    close
}

fn find_top_level(code: &str, target: u8) -> Option<usize> {
    let mut found = None;
    walk_code(code, |i, b, depth| {
        if depth == 0 && b == target {
            found = Some(i);
            return false;
        }
        true
    });
    found
}

fn split_top_level(code: &str, separator: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    walk_code(code, |i, b, depth| {
        if depth == 0 && b == separator {
            parts.push(&code[start..i]);
            start = i + 1;
        }
        true
    });
    parts.push(&code[start..]);
    parts
}

/// `key: value` pairs at the top level of an object literal body. Spreads,
/// shorthand properties and methods are skipped.
pub(crate) fn object_entries(body: &str) -> Vec<(String, &str)> {
    split_top_level(body, b',')
        .into_iter()
        .filter_map(|entry| {
            let colon = find_top_level(entry, b':')?;
            let key = entry[..colon].split_whitespace().last()?;
            let key = key.trim_matches(|c| c == '"' || c == '\'');
            Some((key.to_string(), entry[colon + 1..].trim()))
        })
        .collect()
}

/// Body of an object literal `{ ... }`, without the braces.
fn object_body(value: &str) -> Option<&str> {
    let value = value.trim();
    if !value.starts_with('{') {
        return None;
    }
    let close = matching_close(value, 0)?;
    Some(&value[1..close])
}

fn lookup<'a>(entries: &[(String, &'a str)], key: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| *value)
}

fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn template_value(inner: &str, consts: &HashMap<String, String>) -> Option<String> {
    let mut out = String::with_capacity(inner.len());
    let mut rest = inner;
    while let Some(start) = rest.find("${") {
        out.push_str(&unescape(&rest[..start]));
        let end = start + rest[start..].find('}')?;
        out.push_str(consts.get(rest[start + 2..end].trim())?);
        rest = &rest[end + 1..];
    }
    out.push_str(&unescape(rest));
    Some(out)
}

/// Evaluate a string-valued expression, or `None` when it is not a literal.
pub(crate) fn string_value(expr: &str, consts: &HashMap<String, String>) -> Option<String> {
    let expr = expr.trim();
    let expr = expr.strip_suffix(" as const").map(str::trim_end).unwrap_or(expr);

    let pieces = split_top_level(expr, b'+');
    if pieces.len() > 1 {
        return pieces
            .into_iter()
            .map(|piece| string_value(piece, consts))
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.concat());
    }

    if expr.starts_with('(') && matching_close(expr, 0) == Some(expr.len() - 1) {
        return string_value(&expr[1..expr.len() - 1], consts);
    }

    let quote = expr.chars().next()?;
    match quote {
        '"' | '\'' | '`' if expr.len() >= 2 && expr.ends_with(quote) => {
            let inner = &expr[1..expr.len() - 1];
            if quote == '`' {
                template_value(inner, consts)
            } else {
                Some(unescape(inner))
            }
        }
        _ if IDENTIFIER.is_match(expr) => consts.get(expr).cloned(),
        _ => None,
    }
}

/// String values of the module's `const` declarations, in declaration order
/// so later constants can build on earlier ones.
pub(crate) fn const_strings(source: &str) -> HashMap<String, String> {
    let mut consts = HashMap::new();
    for caps in CONST_DECL.captures_iter(source) {
        if let Some(value) = string_value(&caps[2], &consts) {
            consts.insert(caps[1].to_string(), value);
        }
    }
    consts
}

fn is_false(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim() == "false")
}

/// Read `export const metadata` from a page module. `None` when the module
/// does not export metadata as a literal.
pub fn declared_metadata(source: &str) -> Option<DeclaredMetadata> {
    let caps = METADATA_EXPORT.captures(source)?;
    let open = caps.get(0)?.end() - 1;
    let close = matching_close(source, open)?;
    let entries = object_entries(&source[open + 1..close]);
    let consts = const_strings(source);
    let text = |entries: &[(String, &str)], key: &str| {
        lookup(entries, key).and_then(|value| string_value(value, &consts))
    };

    if caps.get(1).is_some() {
        return Some(DeclaredMetadata {
            title_stem: text(&entries, "titleStem").unwrap_or_default(),
            description: text(&entries, "description").unwrap_or_default(),
            canonical: text(&entries, "path"),
            noindex: is_false(lookup(&entries, "index")),
        });
    }

    let title_stem = match lookup(&entries, "title").and_then(object_body) {
        Some(title) => {
            let title = object_entries(title);
            text(&title, "default").or_else(|| text(&title, "absolute"))
        }
        None => text(&entries, "title"),
    };

    let canonical = lookup(&entries, "alternates")
        .and_then(object_body)
        .and_then(|alternates| text(&object_entries(alternates), "canonical"));

    let noindex = match lookup(&entries, "robots") {
        Some(robots) => match object_body(robots) {
            Some(body) => is_false(lookup(&object_entries(body), "index")),
            None => string_value(robots, &consts)
                .is_some_and(|value| value.to_lowercase().contains("noindex")),
        },
        None => false,
    };

    Some(DeclaredMetadata {
        title_stem: title_stem.unwrap_or_default(),
        description: text(&entries, "description").unwrap_or_default(),
        canonical,
        noindex,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consts(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn string_literals_evaluate() {
        let none = HashMap::new();
        assert_eq!(string_value(r#""Local SEO""#, &none).as_deref(), Some("Local SEO"));
        assert_eq!(string_value(r"'It\'s fast'", &none).as_deref(), Some("It's fast"));
        assert_eq!(string_value("`plain`", &none).as_deref(), Some("plain"));
        assert_eq!(string_value("getTitle()", &none), None);
    }

    #[test]
    fn templates_and_concatenation_use_constants() {
        let consts = consts(&[("BRAND", "Prism"), ("CITY", "Oakland")]);
        assert_eq!(
            string_value("`Agency in ${CITY} by ${BRAND}`", &consts).as_deref(),
            Some("Agency in Oakland by Prism")
        );
        assert_eq!(
            string_value(r#"("Design by " + BRAND)"#, &consts).as_deref(),
            Some("Design by Prism")
        );
        assert_eq!(string_value("`Hi ${user.name}`", &consts), None);
    }

    #[test]
    fn const_strings_chain_in_order() {
        let source = "const BRAND = \"Prism\"\nexport const TITLE: string = `Growth | ${BRAND}`;\nconst COUNT = 3\n";
        let consts = const_strings(source);
        assert_eq!(consts.get("TITLE").map(String::as_str), Some("Growth | Prism"));
        assert!(!consts.contains_key("COUNT"));
    }

    #[test]
    fn object_entries_skip_nested_and_quoted_separators() {
        let entries = object_entries(
            "title: \"A, b: c\", openGraph: { title: \"x\" }, // note: ignored\n \"robots\": 'noindex', ...rest",
        );
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["title", "openGraph", "robots"]);
        assert_eq!(entries[0].1, "\"A, b: c\"");
    }

    #[test]
    fn helper_call_metadata() {
        let source = r#"import { buildRouteMetadata } from "@/lib/seo/metadata"

const TITLE = "Local SEO for dentists"

export const metadata = buildRouteMetadata({
  titleStem: TITLE,
  description: "Rank in the map pack.",
  path: "/local-seo",
  index: false,
})

export default function Page() {
  return <h1>Local SEO</h1>
}
"#;
        assert_eq!(
            declared_metadata(source),
            Some(DeclaredMetadata {
                title_stem: "Local SEO for dentists".into(),
                description: "Rank in the map pack.".into(),
                canonical: Some("/local-seo".into()),
                noindex: true,
            })
        );
    }

    #[test]
    fn object_metadata_reads_nested_fields() {
        let source = r#"const PRICING = "Pricing plans"

export const metadata: Metadata = {
  title: { default: PRICING, template: "%s | Prism" },
  description: "Plans for every stage.",
  openGraph: { title: "Ignored" },
  alternates: { canonical: "/pricing" },
  robots: { index: false, follow: true },
}
"#;
        let metadata = declared_metadata(source).unwrap();
        assert_eq!(metadata.title_stem, "Pricing plans");
        assert_eq!(metadata.canonical.as_deref(), Some("/pricing"));
        assert!(metadata.noindex);
    }

    #[test]
    fn robots_string_and_plain_title() {
        let source = "export const metadata = { title: \"Thanks\", robots: \"NOINDEX, nofollow\" }\n";
        let metadata = declared_metadata(source).unwrap();
        assert_eq!(metadata.title_stem, "Thanks");
        assert_eq!(metadata.canonical, None);
        assert!(metadata.noindex);
    }

    #[test]
    fn computed_metadata_is_not_declared() {
        assert_eq!(declared_metadata("export const metadata = makeMetadata(\"x\")\n"), None);
        assert_eq!(declared_metadata("export default function Page() {}\n"), None);
    }
}
