//! Link header parsing (RFC 5988)
//!
//! Format: `Link: <https://canvas.example.edu/api/v1/courses?page=2>; rel="next", ...`

use super::types::LinkRelations;
use url::Url;

/// Parse a `Link` header value into the four recognized relations.
///
/// Entries without a bracketed URL, without a `rel` parameter, or whose URL
/// is not absolute are skipped. Relations other than `first`, `prev`, `next`
/// and `last` are ignored. When a relation repeats, the first entry wins.
pub fn parse_link_header(header: &str) -> LinkRelations {
    let mut relations = LinkRelations::default();
    let mut rest = header;

    while let Some(open) = rest.find('<') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('>') else {
            break;
        };
        let target = after_open[..close].trim();
        let tail = &after_open[close + 1..];

        let params_end = entry_end(tail);
        let params = &tail[..params_end];
        rest = &tail[params_end..];

        let Some(rel) = rel_param(params) else {
            continue;
        };
        let Ok(url) = Url::parse(target) else {
            continue;
        };

        for name in rel.split_whitespace() {
            relations.set_if_absent(name, &url);
        }
    }

    relations
}

/// Index of the comma ending the current entry's parameters, ignoring
/// commas inside quoted values.
fn entry_end(params: &str) -> usize {
    let mut quoted = false;
    for (i, c) in params.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => return i,
            '<' if !quoted => return i,
            _ => {}
        }
    }
    params.len()
}

/// Extract the `rel` parameter from `; rel="next"; title="..."`
fn rel_param(params: &str) -> Option<&str> {
    params.split(';').find_map(|segment| {
        let (key, value) = segment.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("rel") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'').trim();
        (!value.is_empty()).then_some(value)
    })
}
