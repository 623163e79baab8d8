use regex::Regex;

lazy_static::lazy_static! {
    static ref LEADING_QUANTITY: Regex =
        Regex::new(r"^\s*(?:\d+(?:[/.]\d+)?(?:\s+\d+/\d+)?|[½⅓⅔¼¾⅛])\s*").unwrap();
    static ref UNITS: Regex = Regex::new(
        r"\b(?:tsp|tbsp|cups?|lbs?|oz|g|grams?|kg|ml|cloves?|pieces?)\b"
    )
    .unwrap();
    static ref PUNCTUATION: Regex = Regex::new(r"[.,]").unwrap();
    static ref DESCRIPTORS: Regex =
        Regex::new(r"\b(?:minced|diced|chopped|sliced|cubed|fresh|ground|grated)\b").unwrap();
    static ref EXTRA_SPACE: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Reduce an ingredient line like "2 cups fresh basil, chopped" to the bare
/// ingredient name ("basil"), for use in prompts and comparisons.
pub fn clean_ingredient(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let text = LEADING_QUANTITY.replace(&lowered, "");
    let text = UNITS.replace_all(&text, "");
    let text = PUNCTUATION.replace_all(&text, "");
    let text = DESCRIPTORS.replace_all(&text, "");
    let text = EXTRA_SPACE.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quantity_units_and_descriptors() {
        assert_eq!(clean_ingredient("2 cups Fresh Basil, chopped"), "basil");
        assert_eq!(clean_ingredient("3 cloves garlic, minced"), "garlic");
        assert_eq!(clean_ingredient("1 1/2 cups flour"), "flour");
        assert_eq!(clean_ingredient("1.5 lbs ground beef"), "beef");
        assert_eq!(clean_ingredient("½ tsp salt"), "salt");
    }

    #[test]
    fn leaves_plain_names_alone() {
        assert_eq!(clean_ingredient("olive oil"), "olive oil");
        assert_eq!(clean_ingredient("Eggs"), "eggs");
    }

    #[test]
    fn unit_letters_inside_words_survive() {
        // "g" is a unit, but only as a whole word
        assert_eq!(clean_ingredient("200 g green beans"), "green beans");
        assert_eq!(clean_ingredient("mozzarella"), "mozzarella");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(clean_ingredient(""), "");
        assert_eq!(clean_ingredient("   "), "");
    }
}
