/// Persona and instructions wrapped around every user request.
pub const LOCALMIND_TEMPLATE: &str = include_str!("../../data/prompts/localmind.txt");

pub const UNKNOWN_LOCATION: &str = "Unknown India Location";
pub const DEFAULT_USER_TEXT: &str = "Analyze my input.";
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Formats the textual context block sent ahead of any media.
pub fn build_prompt(location: Option<&str>, language_code: &str, text: Option<&str>) -> String {
    let location = location.filter(|l| !l.is_empty()).unwrap_or(UNKNOWN_LOCATION);
    let user_text = text.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_USER_TEXT);

    render(
        LOCALMIND_TEMPLATE,
        &[
            ("location", location),
            ("language_code", language_code),
            ("user_text", user_text),
        ],
    )
}

/// Replace `{{key}}` placeholders in a single pass.
///
/// Substituted values are never scanned again, so user text containing
/// `{{location}}` comes through untouched. Unknown placeholders are kept.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            result.push_str(&rest[start..]);
            return result;
        };

        let key = &after_open[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    result
}
