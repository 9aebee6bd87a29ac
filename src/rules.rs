//! Rule normalization, filtering and Pi-hole conversion.
//!
//! Raw lines from hosts files or adblock-style lists are rewritten into the
//! canonical `||domain^` form (exceptions keep their `@@` prefix). Lines that
//! do not describe a bare domain are dropped, and a restricted variant
//! without adblock markers is derived for consumers such as Pi-hole.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::allowlist::Allowlist;
use crate::utils::truncate;

/// Hosts-file address prefixes, stripped in this order
const HOSTS_PREFIXES: &[&str] = &["0.0.0.0 ", "127.0.0.1 "];

/// Characters that mark comments, paths, modifiers or multi-token lines
const DISALLOWED: &[char] = &[' ', '#', '!', '/', '$'];

static DOMAIN_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-.\w]+$").unwrap());

/// Rewrite one raw line into a canonical rule candidate.
///
/// Never checks validity: garbage in gives garbage out, and [`skip_line`]
/// decides what survives. The result always ends with a single `^` and
/// starts with `||` or `@@`.
///
/// # Examples
/// ```
/// use listforge::rules::normalize_line;
/// assert_eq!(normalize_line("0.0.0.0 ads.example.com"), "||ads.example.com^");
/// assert_eq!(normalize_line("||tracker.net^$third-party"), "||tracker.net^");
/// assert_eq!(normalize_line("@@||good.org^"), "@@||good.org^");
/// ```
pub fn normalize_line(line: &str) -> String {
    let mut rest = line;
    for prefix in HOSTS_PREFIXES {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
        }
    }

    let mut rule: String = rest.chars().filter(|&c| c != '^').collect();
    if let Some(pos) = rule.find('$') {
        rule.truncate(pos);
    }
    rule.push('^');

    if rule.starts_with("||") || rule.starts_with("@@") {
        rule
    } else {
        format!("||{}", rule)
    }
}

/// Strip the `||`, `@@` and `^` markers from a rule
pub fn bare_domain(line: &str) -> String {
    line.replace("||", "").replace("@@", "").replace('^', "")
}

/// Decide whether a normalized line is dropped.
///
/// Markers are removed before inspection only; the rule itself is kept
/// unchanged when this returns `false`.
pub fn skip_line(line: &str, allowlist: &Allowlist) -> bool {
    let bare = bare_domain(line);

    allowlist.matches(&bare) || bare.is_empty() || bare.contains(DISALLOWED)
}

/// Check that a rule reduces to a plausible hostname token.
///
/// Diagnostic only: callers log failures but keep the rule.
pub fn is_valid_rule(line: &str) -> bool {
    let bare = line
        .replace('|', "")
        .replace("@@", "")
        .replace('*', "")
        .replace('^', "");
    DOMAIN_TOKEN.is_match(&bare)
}

/// Derive the restricted (Pi-hole) form of canonical rules.
///
/// Wildcard and exception rules have no restricted equivalent and are
/// dropped, as are rules that still carry a `|` once `||` is removed.
pub fn to_restricted(rules: &[String]) -> Vec<String> {
    rules
        .iter()
        .filter_map(|rule| {
            let rule = rule.replace('^', "");
            if !rule.contains("||") || rule.contains('*') || rule.contains("@@") {
                return None;
            }
            let rule = rule.replace("||", "");
            if rule.contains('|') {
                None
            } else {
                Some(rule)
            }
        })
        .collect()
}

/// Canonical rules produced from one source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertedList {
    pub rules: Vec<String>,
    /// Input lines seen
    pub total: usize,
    /// Lines dropped by [`skip_line`]
    pub skipped: usize,
    /// Kept rules that failed [`is_valid_rule`]
    pub invalid: usize,
}

/// Normalize and filter every line of a source text.
pub fn convert_lines(text: &str, allowlist: &Allowlist) -> ConvertedList {
    let mut out = ConvertedList::default();

    for raw in text.lines() {
        out.total += 1;

        let rule = normalize_line(raw);
        if skip_line(&rule, allowlist) {
            out.skipped += 1;
            continue;
        }
        if !is_valid_rule(&rule) {
            warn!("[INVALID] {}", truncate(&rule, 120));
            out.invalid += 1;
        }
        out.rules.push(rule);
    }

    out
}
