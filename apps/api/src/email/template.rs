//! Merge-field rendering for campaign templates.
//!
//! Placeholders look like `{{company}}`; the name is matched case-insensitively
//! and may be padded with whitespace (`{{ FirstName }}`). Unknown placeholders
//! are left untouched.

/// Replaces every known `{{name}}` placeholder in a single pass.
pub fn render(template: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let replacement = after_open.find("}}").and_then(|close| {
            let name = after_open[..close].trim();
            fields
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after_open[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Wraps a plain-text body as HTML, one `<br/>` per line break.
pub fn to_html(body: &str) -> String {
    let lines: Vec<&str> = body.split('\n').map(str::trim).collect();
    format!("<html><body>{}</body></html>", lines.join("<br/>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[(&str, &str)] = &[("company", "Acme"), ("firstName", "Ada")];

    #[test]
    fn test_render_is_case_and_space_insensitive() {
        assert_eq!(
            render("Hi {{ FIRSTNAME }}, welcome {{company}}!", FIELDS),
            "Hi Ada, welcome Acme!"
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{{ title }} at {{company}}", FIELDS), "{{ title }} at Acme");
    }

    #[test]
    fn test_render_handles_unclosed_braces() {
        assert_eq!(render("Hello {{company", FIELDS), "Hello {{company");
        assert_eq!(render("{{ {{company}}", FIELDS), "{{ Acme");
    }

    #[test]
    fn test_render_does_not_reexpand_values() {
        let fields = &[("company", "{{firstName}}"), ("firstName", "Ada")];
        assert_eq!(render("{{company}}", fields), "{{firstName}}");
    }

    #[test]
    fn test_to_html_trims_lines() {
        assert_eq!(
            to_html("Hello  \n  there\n"),
            "<html><body>Hello<br/>there<br/></body></html>"
        );
    }
}
