//! Query validation and the address containment test.

use anyhow::bail;

/// Letters and numbers only, in the Unicode sense.
pub fn is_alphanumeric(s: &str) -> bool {
    s.chars().all(char::is_alphanumeric)
}

/// Substring matcher for strkey addresses. The query is uppercased once at
/// construction; strkey output is uppercase already, so the containment
/// test is a plain `contains`.
#[derive(Debug, Clone)]
pub struct Matcher {
    needle: String,
}

impl Matcher {
    pub fn new(query: &str) -> anyhow::Result<Self> {
        if !is_alphanumeric(query) {
            bail!("invalid find value {query:?} (err=!alphanum)");
        }
        Ok(Self {
            needle: query.to_uppercase(),
        })
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, address: &str) -> bool {
        address.contains(&self.needle)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_non_alphanumeric() {
        for query in ["with space", "semi;colon", "da-sh", "under_score", "!"] {
            assert!(Matcher::new(query).is_err(), "{query:?} must be rejected");
        }
    }

    #[test]
    fn accepts_letters_and_digits() {
        for query in ["", "CAFE", "cafe", "42", "XLM2024"] {
            assert!(Matcher::new(query).is_ok(), "{query:?} must be accepted");
        }
    }

    #[test]
    fn matches_case_normalized() {
        let matcher = Matcher::new("cafe").unwrap();
        assert!(matcher.matches("GCAFEXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX"));
        assert!(!matcher.matches("GBEANXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX"));
    }

    #[test]
    fn empty_query_matches_everything() {
        let matcher = Matcher::new("").unwrap();
        assert!(matcher.matches("GANYTHING"));
    }
}
