//! `Link` response header parsing for paginated collections.
//!
//! The inventory endpoint advertises neighbouring pages with a header such as:
//!
//! ```text
//! Link: </channel/ufc/allocation/merchant/1?page=3>; rel="next",
//!       </channel/ufc/allocation/merchant/1?page=1>; rel="prev"
//! ```
//!
//! Page numbers come from the `page` query parameter of the advertised URL.
//! When a relation is present but its URL carries no usable `page`, or the
//! header is not in `<url>; rel=...` form at all and merely mentions `next` or
//! `prev`, the number is derived from the requested page instead.

use url::Url;

/// Base used to resolve relative link targets.
const RELATIVE_BASE: &str = "http://link.invalid/";

const NEXT_RELS: &[&str] = &["next"];
const PREV_RELS: &[&str] = &["prev", "previous"];

/// Neighbouring pages advertised by a `Link` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageLinks {
    /// Page after the requested one.
    pub next: Option<u32>,
    /// Page before the requested one.
    pub prev: Option<u32>,
}

/// One `<url>; rel="..."` entry.
#[derive(Debug, PartialEq, Eq)]
struct LinkEntry<'a> {
    target: &'a str,
    rels: Vec<&'a str>,
}

/// Extract next/prev page numbers from a `Link` header value.
///
/// `requested_page` is the page that produced the header; `None` means the
/// server default, page 1.
#[must_use]
pub fn parse_page_links(header: &str, requested_page: Option<u32>) -> PageLinks {
    let current = requested_page.unwrap_or(1);
    let entries = parse_entries(header);

    let lookup = |names: &[&str]| -> Option<Option<u32>> {
        if entries.is_empty() {
            return names
                .iter()
                .any(|name| header.contains(name))
                .then_some(None);
        }
        entries
            .iter()
            .find(|entry| {
                entry
                    .rels
                    .iter()
                    .any(|rel| names.iter().any(|name| rel.eq_ignore_ascii_case(name)))
            })
            .map(|entry| page_param(entry.target))
    };

    let next = lookup(NEXT_RELS).map(|page| page.unwrap_or_else(|| current.saturating_add(1)));
    let prev = lookup(PREV_RELS)
        .and_then(|page| page.or_else(|| current.checked_sub(1)))
        .filter(|page| *page >= 1);

    PageLinks { next, prev }
}

/// Split a header into `<target>; rel=...` entries, skipping malformed ones.
fn parse_entries(header: &str) -> Vec<LinkEntry<'_>> {
    split_outside_brackets(header)
        .into_iter()
        .filter_map(|part| {
            let part = part.trim();
            let rest = part.strip_prefix('<')?;
            let (target, params) = rest.split_once('>')?;

            let rels = params
                .split(';')
                .filter_map(|param| {
                    let (name, value) = param.split_once('=')?;
                    name.trim()
                        .eq_ignore_ascii_case("rel")
                        .then(|| value.trim().trim_matches('"'))
                })
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>();

            Some(LinkEntry {
                target: target.trim(),
                rels,
            })
        })
        .collect()
}

/// Split on commas that are not inside a `<...>` target.
fn split_outside_brackets(header: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;

    for (index, ch) in header.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.extend(header.get(start..index));
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.extend(header.get(start..));
    parts
}

/// The `page` query parameter of a (possibly relative) link target.
fn page_param(target: &str) -> Option<u32> {
    let url = Url::parse(RELATIVE_BASE).ok()?.join(target).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == "page")
        .and_then(|(_, value)| value.parse().ok())
}
