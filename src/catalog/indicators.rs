use serde::Serialize;

/// A statistical measure and its provider code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub name: String,
    pub code: String,
}

impl Indicator {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

const BUILTIN: [(&str, &str); 4] = [
    ("CO₂ Emissions (metric tons per capita)", "EN.ATM.CO2E.PC"),
    ("GDP per Capita (current US$)", "NY.GDP.PCAP.CD"),
    ("Population", "SP.POP.TOTL"),
    ("Life Expectancy", "SP.DYN.LE00.IN"),
];

/// Display name to provider code mapping, in declaration order.
#[derive(Clone, Debug)]
pub struct IndicatorCatalog {
    indicators: Vec<Indicator>,
}

impl IndicatorCatalog {
    pub fn builtin() -> Self {
        Self {
            indicators: BUILTIN
                .iter()
                .map(|(name, code)| Indicator::new(*name, *code))
                .collect(),
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.name == name)
    }

    pub fn by_code(&self, code: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
