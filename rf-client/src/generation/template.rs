use regex::{Captures, Regex};

lazy_static::lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\w+)\}").unwrap();
}

/// Replace each `{name}` in `template` with its value from `values`, in one pass.
///
/// Filled-in text is never scanned again, so values that look like placeholders stay as they
/// are. Names without a value are left untouched, which keeps JSON examples in templates intact.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}
