//! Query-string and fragment assembly.
//!
//! Keys and values are percent-encoded with the same set of unreserved
//! characters browsers leave alone in `encodeURIComponent`, so a space is
//! `%20` (never `+`).

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::value::ParamValue;

/// Characters escaped in a URI component: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Like [`URI_COMPONENT`] but leaves `/` unescaped, for path-shaped values.
pub const PATH_COMPONENT: &AsciiSet = &URI_COMPONENT.remove(b'/');

/// Percent-encodes a single URI component.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Serializes `(key, value)` pairs into a query string (without the `?`).
///
/// Lists expand into one `key=item` pair per item. Objects, at the top
/// level or inside a list, are skipped.
///
/// # Examples
///
/// ```
/// use routemap_urls::params::Params;
/// use routemap_urls::query::encode_query;
///
/// let params = Params::new().with("q", "a b").with("tags", vec!["x", "y"]);
/// assert_eq!(encode_query(params.iter()), "q=a%20b&tags=x&tags=y");
/// ```
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a ParamValue)>,
{
    let mut parts = Vec::new();
    for (key, value) in pairs {
        let key = encode_component(key);
        match value {
            ParamValue::Object(_) => {}
            ParamValue::List(items) => {
                for item in items.iter().filter(|item| !item.is_object()) {
                    parts.push(format!("{key}={}", encode_component(&item.to_string())));
                }
            }
            scalar => parts.push(format!("{key}={}", encode_component(&scalar.to_string()))),
        }
    }
    parts.join("&")
}

/// Appends an already-encoded query string to `url`.
///
/// Uses `&` when `url` already carries a query, `?` otherwise. An empty
/// query leaves `url` untouched.
pub fn append_query(url: &mut String, query: &str) {
    if query.is_empty() {
        return;
    }
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(query);
}

/// Appends `#fragment` to `url`.
pub fn append_fragment(url: &mut String, fragment: Option<&str>) {
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use serde_json::json;

    #[test]
    fn test_encode_component_unreserved() {
        assert_eq!(encode_component("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
        assert_eq!(encode_component("a b/c?d&e=f"), "a%20b%2Fc%3Fd%26e%3Df");
        assert_eq!(encode_component("ü"), "%C3%BC");
    }

    #[test]
    fn test_encode_query_scalars() {
        let params = Params::new()
            .with("flag", true)
            .with("n", ParamValue::Null)
            .with("u", ParamValue::Undefined)
            .with("x", 1.5);
        assert_eq!(
            encode_query(params.iter()),
            "flag=true&n=null&u=undefined&x=1.5"
        );
    }

    #[test]
    fn test_encode_query_skips_objects() {
        let params = Params::new()
            .with("a", 1)
            .with("filter", ParamValue::from(json!({"k": "v"})))
            .with("list", ParamValue::from(json!([1, {"k": "v"}, 2])));
        assert_eq!(encode_query(params.iter()), "a=1&list=1&list=2");
    }

    #[test]
    fn test_encode_query_encodes_keys() {
        let params = Params::new().with("a b", "c");
        assert_eq!(encode_query(params.iter()), "a%20b=c");
    }

    #[test]
    fn test_encode_query_empty_list() {
        let params = Params::new().with("tags", ParamValue::List(Vec::new()));
        assert_eq!(encode_query(params.iter()), "");
    }

    #[test]
    fn test_append_query_separator() {
        let mut url = "/search".to_string();
        append_query(&mut url, "q=1");
        assert_eq!(url, "/search?q=1");
        append_query(&mut url, "r=2");
        assert_eq!(url, "/search?q=1&r=2");
        append_query(&mut url, "");
        assert_eq!(url, "/search?q=1&r=2");
    }

    #[test]
    fn test_append_fragment() {
        let mut url = "/a".to_string();
        append_fragment(&mut url, None);
        assert_eq!(url, "/a");
        append_fragment(&mut url, Some("sec-2"));
        assert_eq!(url, "/a#sec-2");
    }
}
