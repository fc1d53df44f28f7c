use serde::{Deserialize, Serialize};

pub mod extract;
pub mod places;

/// One entry of the Fortune 100 list, as read from the saved page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub rank: u32,
    pub company: String,
    pub industry: String,
    pub location: String,
    pub profile_url: String,
    pub employee_quote: String,
    pub image_url: String,
}

/// A [`Company`] with its headquarters; the three fields are `null` when no place was found.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCompany {
    #[serde(flatten)]
    pub company: Company,
    pub hq_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl EnrichedCompany {
    pub fn new(company: Company, place: Option<&places::Place>) -> Self {
        Self {
            company,
            hq_address: place.map(|p| p.formatted_address.clone()),
            latitude: place.map(|p| p.latitude),
            longitude: place.map(|p| p.longitude),
        }
    }
}

/// The only field later stages read from a company list; any list, enriched or not, will do.
#[derive(Clone, Debug, Deserialize)]
pub struct Listing {
    pub company: String,
}
