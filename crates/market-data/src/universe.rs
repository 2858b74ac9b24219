//! Static ticker universe: market lists, display metadata, logos and names.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Tadawul constituents tracked by the app, plus the TASI index.
pub const SAUDI_STOCKS: &[&str] = &[
    "2222.SR", "1120.SR", "2010.SR", "7010.SR", "2082.SR", "1180.SR", "2380.SR", "4030.SR",
    "2350.SR", "4200.SR", "1211.SR", "4001.SR", "2310.SR", "4003.SR", "2050.SR", "1150.SR",
    "4190.SR", "2290.SR", "4002.SR", "1010.SR", "2020.SR", "2280.SR", "5110.SR", "1140.SR",
    "1060.SR", "7200.SR", "4220.SR", "4090.SR", "4040.SR", "^TASI.SR",
];

/// EGX constituents tracked by the app, plus the EGX 30 index.
pub const EGYPT_STOCKS: &[&str] = &[
    "COMI.CA", "EAST.CA", "HRHO.CA", "TMGH.CA", "SWDY.CA", "ETEL.CA", "AMOC.CA", "EKHO.CA",
    "HELI.CA", "ORAS.CA", "ESRS.CA", "ABUK.CA", "MFPC.CA", "ISPH.CA", "PHDC.CA", "AUTO.CA",
    "CIEB.CA", "FWRY.CA", "ADIB.CA", "^CASE30",
];

/// Global indices, commodities and US large caps.
pub const GLOBAL_TICKERS: &[&str] = &[
    "^GSPC", "^DJI", "^IXIC", "^FTSE", "^GDAXI", "^N225", "BZ=F", "GC=F", "AAPL", "MSFT", "GOOG",
    "AMZN", "TSLA", "NVDA", "META", "NFLX", "AMD", "INTC", "JPM", "V", "MA", "WMT", "HD", "PG",
    "KO", "PEP", "DIS", "NKE",
];

pub const FLAG_SA: &str = "\u{1F1F8}\u{1F1E6}";
pub const FLAG_EG: &str = "\u{1F1EA}\u{1F1EC}";
pub const FLAG_US: &str = "\u{1F1FA}\u{1F1F8}";

/// Display overrides for well-known tickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerMeta {
    pub name: &'static str,
    pub country: &'static str,
    pub sector: &'static str,
}

const fn meta(name: &'static str, country: &'static str, sector: &'static str) -> TickerMeta {
    TickerMeta {
        name,
        country,
        sector,
    }
}

lazy_static! {
    static ref TICKER_META: HashMap<&'static str, TickerMeta> = HashMap::from([
        ("^GSPC", meta("S&P 500", FLAG_US, "Index")),
        ("^DJI", meta("Dow Jones", FLAG_US, "Index")),
        ("^IXIC", meta("Nasdaq", FLAG_US, "Index")),
        ("^FTSE", meta("FTSE 100", "\u{1F1EC}\u{1F1E7}", "Index")),
        ("^GDAXI", meta("DAX", "\u{1F1E9}\u{1F1EA}", "Index")),
        ("^N225", meta("Nikkei 225", "\u{1F1EF}\u{1F1F5}", "Index")),
        ("BZ=F", meta("Oil (Brent)", "\u{1F6E2}\u{FE0F}", "Commodities")),
        ("GC=F", meta("Gold", "\u{1F947}", "Commodities")),
        ("AAPL", meta("Apple", FLAG_US, "Technology")),
        ("MSFT", meta("Microsoft", FLAG_US, "Technology")),
        ("GOOG", meta("Alphabet", FLAG_US, "Technology")),
        ("AMZN", meta("Amazon", FLAG_US, "Consumer Cyclical")),
        ("TSLA", meta("Tesla", FLAG_US, "Consumer Cyclical")),
        ("NVDA", meta("Nvidia", FLAG_US, "Technology")),
        ("META", meta("Meta", FLAG_US, "Technology")),
        ("NFLX", meta("Netflix", FLAG_US, "Communication")),
        ("2222.SR", meta("Saudi Aramco", FLAG_SA, "Energy")),
        ("1120.SR", meta("Al Rajhi Bank", FLAG_SA, "Financial")),
        ("2010.SR", meta("SABIC", FLAG_SA, "Materials")),
        ("7010.SR", meta("STC", FLAG_SA, "Telecom")),
        ("2082.SR", meta("ACWA Power", FLAG_SA, "Utilities")),
        ("1180.SR", meta("SNB", FLAG_SA, "Financial")),
        ("^TASI.SR", meta("TASI", FLAG_SA, "Index")),
        ("COMI.CA", meta("CIB Bank", FLAG_EG, "Financial")),
        ("^CASE30", meta("EGX 30", FLAG_EG, "Index")),
    ]);

    static ref COMPANY_DOMAINS: HashMap<&'static str, &'static str> = HashMap::from([
        ("2222.SR", "aramco.com"),
        ("1120.SR", "alrajhibank.com.sa"),
        ("2010.SR", "sabic.com"),
        ("7010.SR", "stc.com.sa"),
        ("2082.SR", "acwapower.com"),
        ("1180.SR", "alahli.com"),
        ("2050.SR", "savola.com"),
        ("1150.SR", "alinma.com"),
        ("1010.SR", "riyadbank.com"),
        ("1211.SR", "maaden.com.sa"),
        ("4200.SR", "aldrees.com"),
        ("4002.SR", "mouwasat.com"),
        ("^TASI.SR", "saudiexchange.sa"),
        ("^CASE30", "egx.com.eg"),
        ("COMI.CA", "cibeg.com"),
        ("ORAS.CA", "orascom.com"),
        ("FWRY.CA", "fawry.com"),
        ("AAPL", "apple.com"),
        ("MSFT", "microsoft.com"),
        ("GOOG", "google.com"),
        ("AMZN", "amazon.com"),
        ("TSLA", "tesla.com"),
        ("NVDA", "nvidia.com"),
        ("META", "meta.com"),
        ("NFLX", "netflix.com"),
        ("^GSPC", "spglobal.com"),
        ("^DJI", "dowjones.com"),
        ("^IXIC", "nasdaq.com"),
    ]);

    /// Friendly names used when the upstream has none.
    static ref STOCK_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
        ("2222.SR", "Saudi Aramco"),
        ("1120.SR", "Al Rajhi Bank"),
        ("2010.SR", "SABIC"),
        ("7010.SR", "STC"),
        ("2082.SR", "ACWA Power"),
        ("1180.SR", "Saudi National Bank"),
        ("2050.SR", "Savola"),
        ("1150.SR", "Alinma"),
        ("1010.SR", "Riyad Bank"),
        ("1211.SR", "Ma'aden"),
        ("4200.SR", "Aldrees"),
        ("4002.SR", "Mouwasat"),
        ("COMI.CA", "CIB Bank"),
        ("HRHO.CA", "EFG Hermes"),
        ("TMGH.CA", "TMG Holding"),
        ("SWDY.CA", "Elsewedy"),
        ("ETEL.CA", "Telecom Egypt"),
        ("FWRY.CA", "Fawry"),
        ("AAPL", "Apple"),
        ("MSFT", "Microsoft"),
        ("GOOG", "Alphabet"),
        ("AMZN", "Amazon"),
        ("TSLA", "Tesla"),
        ("NVDA", "Nvidia"),
        ("META", "Meta"),
    ]);
}

/// Market grouping used by the stocks list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketCategory {
    Saudi,
    Egypt,
    Global,
}

impl MarketCategory {
    pub fn of(symbol: &str) -> Self {
        if EGYPT_STOCKS.contains(&symbol) || symbol.contains(".CA") {
            Self::Egypt
        } else if SAUDI_STOCKS.contains(&symbol) || symbol.contains(".SR") {
            Self::Saudi
        } else {
            Self::Global
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Saudi => "SA",
            Self::Egypt => "EG",
            Self::Global => "Global",
        }
    }

    pub fn default_flag(&self) -> &'static str {
        match self {
            Self::Saudi => FLAG_SA,
            Self::Egypt => FLAG_EG,
            Self::Global => FLAG_US,
        }
    }
}

/// Tickers for a `market` parameter: `SA`, `EG`, `Global`, anything else
/// is the union of all three in that order without duplicates.
pub fn tickers_for_market(market: Option<&str>) -> Vec<&'static str> {
    match market {
        Some("SA") => SAUDI_STOCKS.to_vec(),
        Some("EG") => EGYPT_STOCKS.to_vec(),
        Some("Global") => GLOBAL_TICKERS.to_vec(),
        _ => {
            let mut all: Vec<&'static str> = Vec::new();
            for symbol in SAUDI_STOCKS.iter().chain(EGYPT_STOCKS).chain(GLOBAL_TICKERS) {
                if !all.contains(symbol) {
                    all.push(*symbol);
                }
            }
            all
        }
    }
}

pub fn ticker_meta(symbol: &str) -> Option<TickerMeta> {
    TICKER_META.get(symbol).copied()
}

/// Favicon URL for a known company, via Google's favicon service.
pub fn logo_url(symbol: &str) -> Option<String> {
    COMPANY_DOMAINS.get(symbol).map(|domain| {
        format!(
            "https://t1.gstatic.com/faviconV2?client=SOCIAL&type=FAVICON&fallback_opts=TYPE,SIZE,URL&url=http://{}&size=128",
            domain
        )
    })
}

pub fn known_name(symbol: &str) -> Option<&'static str> {
    STOCK_NAMES.get(symbol).copied()
}

/// Listing currency guessed from the exchange suffix.
pub fn currency_for_symbol(symbol: &str) -> &'static str {
    if symbol.contains(".SR") {
        "SAR"
    } else if symbol.contains(".CA") {
        "EGP"
    } else {
        "USD"
    }
}
