use models::{HoldingRecord, ACCOUNT_MASK};

/// Account identifier with surrounding whitespace and leading mask characters removed.
pub fn strip_account(account: &str) -> &str {
    account.trim().trim_start_matches(ACCOUNT_MASK).trim()
}

/// Restricts an analysis to a set of accounts.
///
/// Tokens match accounts exactly (case-sensitive) once both sides have been
/// stripped, so `*1234` selects both `*1234` and `1234`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFilter {
    tokens: Vec<String>,
}

impl AccountFilter {
    /// Builds a filter from user tokens; `None` when no usable token was given.
    pub fn new<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn matches(&self, account: &str) -> bool {
        let account = strip_account(account);
        self.tokens.iter().any(|t| strip_account(t) == account)
    }
}

pub fn filter_holdings<'a>(
    holdings: &'a [HoldingRecord],
    filter: Option<&AccountFilter>,
) -> Vec<&'a HoldingRecord> {
    match filter {
        Some(f) => holdings.iter().filter(|h| f.matches(&h.account)).collect(),
        None => holdings.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(account: &str) -> HoldingRecord {
        HoldingRecord {
            symbol: "FXAIX".to_string(),
            description: String::new(),
            account: account.to_string(),
            allocations: Vec::new(),
        }
    }

    #[test]
    fn test_strip_account() {
        assert_eq!(strip_account(" *1234 "), "1234");
        assert_eq!(strip_account("**1234"), "1234");
        assert_eq!(strip_account("Z1234"), "Z1234");
    }

    #[test]
    fn test_masked_token_matches_both_forms() {
        let filter = AccountFilter::new(["*1234"]).unwrap();
        assert!(filter.matches("*1234"));
        assert!(filter.matches("1234"));
        assert!(filter.matches(" *1234"));
        assert!(!filter.matches("*12345"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let filter = AccountFilter::new(["z1234"]).unwrap();
        assert!(!filter.matches("Z1234"));
    }

    #[test]
    fn test_blank_tokens_mean_no_filter() {
        assert!(AccountFilter::new(["", "  "]).is_none());
        assert!(AccountFilter::new(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_filter_holdings() {
        let holdings = vec![holding("*1"), holding("*2"), holding("1")];

        let filter = AccountFilter::new(["1"]).unwrap();
        let kept = filter_holdings(&holdings, Some(&filter));
        assert_eq!(kept.len(), 2);

        assert_eq!(filter_holdings(&holdings, None).len(), 3);
    }
}
