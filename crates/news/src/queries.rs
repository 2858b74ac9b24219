const SA_QUERIES: &[&str] = &[
    "site:argaam.com OR site:mubasher.info Saudi stock market",
    "Saudi Arabia stock market Tadawul",
    "Aramco SABIC Saudi economy",
    "TASI Saudi exchange news",
];

const EG_QUERIES: &[&str] = &[
    "Egypt stock market EGX",
    "Egyptian economy news",
    "Cairo stock exchange",
    "Egypt business finance",
];

const US_QUERIES: &[&str] = &[
    "US stock market news",
    "Wall Street trading",
    "S&P 500 Dow Jones Nasdaq",
    "Federal Reserve economy",
];

/// Upper-cased market code, `SA` when absent or blank.
pub fn normalize_market(market: Option<&str>) -> String {
    match market.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m.to_uppercase(),
        None => "SA".to_string(),
    }
}

/// Search queries for a normalized market code. Unknown codes get the US set.
pub fn market_queries(market: &str) -> &'static [&'static str] {
    match market {
        "SA" => SA_QUERIES,
        "EG" => EG_QUERIES,
        _ => US_QUERIES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_market() {
        assert_eq!(normalize_market(None), "SA");
        assert_eq!(normalize_market(Some("")), "SA");
        assert_eq!(normalize_market(Some("eg")), "EG");
    }

    #[test]
    fn test_unknown_market_uses_us_queries() {
        assert_eq!(market_queries("SA")[1], "Saudi Arabia stock market Tadawul");
        assert_eq!(market_queries("EG").len(), 4);
        assert_eq!(market_queries("GLOBAL"), market_queries("US"));
    }
}
