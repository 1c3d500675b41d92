use std::collections::HashMap;

use form_urlencoded::parse as uri_parse;

/// Parses `application/x-www-form-urlencoded` data, as found in query strings and POST bodies.
/// Pairs are split on '&' and then on the first '='; a pair without '=' gets an empty value.
/// Names and values are percent decoded, and '+' decodes to a space. Invalid encodings are
/// decoded lossily, so this never fails. A name given twice keeps its last value.
pub fn parse_form(data: &[u8]) -> HashMap<String, String> {
    HashMap::from_iter(uri_parse(data).into_owned())
}

#[cfg(test)]
mod tests {
    use crate::parse::form::parse_form;

    #[test]
    fn pairs() {
        let form = parse_form(b"a=1&b=2");
        assert_eq!(form["a"], "1");
        assert_eq!(form["b"], "2");
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn decoding() {
        let form = parse_form(b"greeting=hello+there%21&caf%C3%A9=%E2%9C%93");
        assert_eq!(form["greeting"], "hello there!");
        assert_eq!(form["café"], "✓");
    }

    #[test]
    fn missing_equals() {
        let form = parse_form(b"flag&x=");
        assert_eq!(form["flag"], "");
        assert_eq!(form["x"], "");
    }

    #[test]
    fn last_value_wins() {
        assert_eq!(parse_form(b"a=1&a=2")["a"], "2");
    }

    #[test]
    fn malformed() {
        let form = parse_form(b"%zz=%&&&=");
        assert_eq!(form["%zz"], "%");
        assert!(parse_form(b"").is_empty());
    }
}
