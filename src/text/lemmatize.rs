//! Noun lemmatizer in the WordNet "morphy" style.
//!
//! There is no dictionary to confirm candidates against, so the detachment
//! rules are guarded by suffix checks instead: an irregular-plural table
//! first, then the inflectional suffix rules, with words that merely look
//! plural (`status`, `analysis`, `class`) left untouched.
//!
//! The rules cannot tell a plural noun from a third-person verb, so
//! `complains` becomes `complain` where WordNet would leave it alone. A
//! [`LemmaTable`] exported with the model pins those tokens to whatever the
//! training-time lemmatizer produced.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Irregular plurals that the suffix rules would get wrong.
static EXCEPTIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("children", "child"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("halves", "half"),
        ("shelves", "shelf"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("movies", "movie"),
        ("cookies", "cookie"),
        ("buses", "bus"),
    ])
});

/// Words ending in `s` (or `men`) that are already base forms.
static INVARIANT: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "news", "always", "perhaps", "thanks", "series", "species", "lens", "yes", "various",
        "sometimes", "besides", "towards", "afterwards", "specimen", "abdomen", "omen", "amen",
        "regimen", "stamen",
    ])
});

/// Surface form → lemma pairs recorded at training time. Entries take
/// precedence over the suffix rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LemmaTable(HashMap<String, String>);

impl LemmaTable {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recorded lemma for `token`, or the rule-based one.
    pub fn lemmatize(&self, token: &str) -> String {
        match self.0.get(token) {
            Some(lemma) => lemma.clone(),
            None => lemmatize(token),
        }
    }
}

/// Reduce a lowercase token to its noun base form.
///
/// Total and idempotent on already-singular input.
pub fn lemmatize(token: &str) -> String {
    if let Some(base) = EXCEPTIONS.get(token) {
        return (*base).to_string();
    }
    if token.len() <= 3 || INVARIANT.contains(token) {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("men") {
        return format!("{stem}man");
    }
    if let Some(stem) = token.strip_suffix("ies")
        && token.len() > 4
    {
        return format!("{stem}y");
    }
    if let Some(stem) = token.strip_suffix("es")
        && ["ss", "x", "z", "ch", "sh"].iter().any(|s| stem.ends_with(s))
    {
        return stem.to_string();
    }
    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix('s') {
        return stem.to_string();
    }

    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_plurals() {
        assert_eq!(lemmatize("emails"), "email");
        assert_eq!(lemmatize("problems"), "problem");
        assert_eq!(lemmatize("responses"), "response");
        assert_eq!(lemmatize("issues"), "issue");
    }

    #[test]
    fn sibilant_plurals() {
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("matches"), "match");
        assert_eq!(lemmatize("wishes"), "wish");
        assert_eq!(lemmatize("classes"), "class");
    }

    #[test]
    fn ies_and_men() {
        assert_eq!(lemmatize("replies"), "reply");
        assert_eq!(lemmatize("companies"), "company");
        assert_eq!(lemmatize("women"), "woman");
        assert_eq!(lemmatize("ties"), "tie");
    }

    #[test]
    fn irregulars_from_table() {
        assert_eq!(lemmatize("children"), "child");
        assert_eq!(lemmatize("analyses"), "analysis");
    }

    #[test]
    fn words_that_only_look_plural() {
        for word in ["status", "analysis", "class", "access", "news", "bus", "specimen"] {
            assert_eq!(lemmatize(word), word);
        }
    }

    #[test]
    fn singular_input_is_unchanged() {
        for word in ["frustrated", "service", "unacceptable", "waiting"] {
            assert_eq!(lemmatize(word), word);
        }
    }
    #[test]
    fn recorded_lemmas_override_rules() {
        let table = LemmaTable::new(HashMap::from([
            ("complains".to_string(), "complains".to_string()),
            ("expires".to_string(), "expires".to_string()),
        ]));
        assert_eq!(lemmatize("complains"), "complain");
        assert_eq!(table.lemmatize("complains"), "complains");
        assert_eq!(table.lemmatize("expires"), "expires");
        assert_eq!(table.lemmatize("emails"), "email");
        assert!(LemmaTable::default().is_empty());
    }

    #[test]
    fn table_reads_as_plain_json_object() {
        let table: LemmaTable =
            serde_json::from_str(r#"{"frustrates": "frustrates"}"#).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lemmatize("frustrates"), "frustrates");
    }
}
