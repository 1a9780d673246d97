use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Hair,
    Nails,
    Skin,
    Makeup,
}

impl ServiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Hair => "hair",
            ServiceCategory::Nails => "nails",
            ServiceCategory::Skin => "skin",
            ServiceCategory::Makeup => "makeup",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hair" => Some(ServiceCategory::Hair),
            "nails" => Some(ServiceCategory::Nails),
            "skin" => Some(ServiceCategory::Skin),
            "makeup" => Some(ServiceCategory::Makeup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub category: ServiceCategory,
    pub name: String,
    pub description: String,
    pub price_min: f64,
    pub price_max: f64,
    pub duration: u32,
}

impl Service {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.duration > 0, "service {} has a zero duration", self.id);
        anyhow::ensure!(
            self.price_min >= 0.0 && self.price_min <= self.price_max,
            "service {} has an invalid price range {}..{}",
            self.id,
            self.price_min,
            self.price_max
        );
        Ok(())
    }
}
