/// Keywords (lowercase) that map a chat message onto a ticker.
const SYMBOL_TABLE: &[(&[&str], &str)] = &[
    (&["aramco", "2222"], "2222.SR"),
    (&["rajhi", "1120"], "1120.SR"),
    (&["sabic", "2010"], "2010.SR"),
    (&["stc", "7010"], "7010.SR"),
    (&["acwa", "2082"], "2082.SR"),
    (&["apple", "aapl"], "AAPL"),
    (&["tesla", "tsla"], "TSLA"),
    (&["nvidia", "nvda"], "NVDA"),
];

/// Tickers mentioned in `message`, in table order.
pub fn extract_symbols(message: &str) -> Vec<String> {
    let lowered = message.to_lowercase();
    SYMBOL_TABLE
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, symbol)| symbol.to_string())
        .collect()
}
