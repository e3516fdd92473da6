use serde::{Deserialize, Serialize};

/// Plants with their own branding, plus the catch-all `default` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantCode {
    Admore,
    Amc,
    Default,
}

impl PlantCode {
    pub const ALL: [PlantCode; 3] = [Self::Admore, Self::Amc, Self::Default];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admore => "admore",
            Self::Amc => "amc",
            Self::Default => "default",
        }
    }

    /// Narrows an external string (typically a query parameter) to a known
    /// plant. Matching is exact and case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admore" => Some(Self::Admore),
            "amc" => Some(Self::Amc),
            "default" => Some(Self::Default),
            _ => None,
        }
    }

    pub fn branding(&self) -> &'static PlantBranding {
        match self {
            Self::Admore => &ADMORE_BRANDING,
            Self::Amc => &AMC_BRANDING,
            Self::Default => &DEFAULT_BRANDING,
        }
    }
}

/// Header colors and logo for a plant. The logo is an asset name the UI
/// resolves; `"n/a"` means no logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantBranding {
    pub code: PlantCode,
    /// Background and text color classes, in that order.
    pub color: [&'static str; 2],
    pub logo: &'static str,
}

impl PlantBranding {
    pub fn has_logo(&self) -> bool {
        self.logo != "n/a"
    }
}

static ADMORE_BRANDING: PlantBranding = PlantBranding {
    code: PlantCode::Admore,
    color: ["bg-green", "text-white"],
    logo: "ADM.jpg",
};

static AMC_BRANDING: PlantBranding = PlantBranding {
    code: PlantCode::Amc,
    color: ["bg-purple", "text-white"],
    logo: "AMC.jpg",
};

/// Branding used for any code that is not a known plant.
pub static DEFAULT_BRANDING: PlantBranding = PlantBranding {
    code: PlantCode::Default,
    color: ["bg-blue", "text-white"],
    logo: "n/a",
};

pub fn is_plant_code(x: &str) -> bool {
    PlantCode::parse(x).is_some()
}

/// Looks up branding for an external plant code, falling back to
/// [`DEFAULT_BRANDING`] for anything unknown.
pub fn plant_branding(x: &str) -> &'static PlantBranding {
    PlantCode::parse(x).map_or(&DEFAULT_BRANDING, |code| code.branding())
}
