//! Tracked accounts.

pub const ELITE_ANALYST: &str = "Elite Analyst";
pub const TECHNICAL: &str = "Technical";
pub const FUNDAMENTAL: &str = "Fundamental";
pub const NEWS: &str = "News";
pub const SIGNALS: &str = "Signals";
pub const INFLUENCER: &str = "Influencer";
pub const EDUCATOR: &str = "Educator";
pub const CHARTS: &str = "Charts";

/// Tier assigned to authors outside the roster.
pub const DEFAULT_TIER: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub username: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub tier: u8,
}

const fn account(
    username: &'static str,
    display_name: &'static str,
    category: &'static str,
    tier: u8,
) -> Account {
    Account {
        username,
        display_name,
        category,
        tier,
    }
}

pub const ACCOUNTS: [Account; 30] = [
    account("THEWOLFOFTASI", "The Wolf of TASI", ELITE_ANALYST, 1),
    account("Anas_S_Alrajhi", "Anas Al-Rajhi", ELITE_ANALYST, 1),
    account("RiadhAlhumaidan", "Riyadh Al-Humaidan", ELITE_ANALYST, 1),
    account("ahmadammar1993", "Ahmad Ammar", INFLUENCER, 1),
    account("FutrueGlimpse", "Future Glimpse", NEWS, 1),
    account("AlsagriCapital", "Alsagri Capital", FUNDAMENTAL, 1),
    account("Reda_Alidarous", "Reda Alidarous", ELITE_ANALYST, 1),
    account("Ezzo_Khrais", "Ezzo Khrais", ELITE_ANALYST, 1),
    account("King_night90", "King Night", TECHNICAL, 1),
    account("ABU_KHALED2021", "Abu Khaled", SIGNALS, 1),
    account("malmuqti", "M. Al-Muqti", ELITE_ANALYST, 1),
    account("SenseiFund", "Sensei Fund", FUNDAMENTAL, 1),
    account("fahadmutadawul", "Fahad Mutadawul", ELITE_ANALYST, 1),
    account("pro_chart", "Pro Chart", CHARTS, 1),
    account("Joker_Chart", "Joker Chart", CHARTS, 1),
    account("TasiElite", "TASI Elite", ELITE_ANALYST, 1),
    account("oqo888", "OQO", TECHNICAL, 2),
    account("Saad1100110", "Saad", TECHNICAL, 2),
    account("gchartt", "G Chart", CHARTS, 2),
    account("khabeer999", "Khabeer", SIGNALS, 2),
    account("vip9tasi", "VIP TASI", SIGNALS, 2),
    account("Equity_Data", "Equity Data", FUNDAMENTAL, 1),
    account("BinSolaiman", "Bin Solaiman", FUNDAMENTAL, 2),
    account("WaelAlmutlaq", "Wael Al-Mutlaq", ELITE_ANALYST, 2),
    account("MsaratSa", "Msarat SA", NEWS, 2),
    account("AhmedAllshehri", "Ahmed Al-Shehri", TECHNICAL, 2),
    account("Saeed_AJ", "Saeed AJ", TECHNICAL, 2),
    account("29_shg", "29 SHG", CHARTS, 2),
    account("ssaaeedd91", "Saeed 91", TECHNICAL, 2),
    account("Dr_Hachimi", "Dr. Hachimi", ELITE_ANALYST, 1),
];

/// Case-insensitive roster lookup.
pub fn find_account(username: &str) -> Option<&'static Account> {
    ACCOUNTS
        .iter()
        .find(|a| a.username.eq_ignore_ascii_case(username))
}

impl Account {
    /// Elite analysts and chart accounts bypass the relevance filter.
    pub fn skips_filter(&self) -> bool {
        self.category == ELITE_ANALYST || self.category == CHARTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_roster_is_unique() {
        let names: HashSet<_> = ACCOUNTS.iter().map(|a| a.username.to_lowercase()).collect();
        assert_eq!(names.len(), ACCOUNTS.len());
    }

    #[test]
    fn test_find_account_ignores_case() {
        let account = find_account("thewolfoftasi").unwrap();
        assert_eq!(account.display_name, "The Wolf of TASI");
        assert!(account.skips_filter());
        assert!(!find_account("oqo888").unwrap().skips_filter());
        assert!(find_account("someone_else").is_none());
    }
}
