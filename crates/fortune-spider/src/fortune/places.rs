use super::{Company, EnrichedCompany};
use crate::api::{fetch_json, PlaceSource};
use crate::config::Config;
use crate::error::SpiderError;
use crate::http::*;
use crate::report::{Event, Reporter};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const FIELD_MASK: &str = "places.id,places.formattedAddress,places.location";

/// The first place a text search returned.
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    pub id: String,
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Client for the Places API (New) text search.
#[derive(Clone, Debug)]
pub struct PlacesClient {
    http: HttpClient,
    api_key: String,
}

impl PlacesClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            api_key: api_key.into(),
        }
    }
}

impl PlaceSource for PlacesClient {
    async fn search_place(&self, query: &str) -> Result<Option<Place>, SpiderError> {
        let request = self
            .http
            .post(SEARCH_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&SearchRequest { text_query: query });
        let response: SearchResponse =
            fetch_json(request, &format!("places for \"{query}\"")).await?;
        Ok(response.first_place())
    }
}

// de
// ----------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    text_query: &'a str,
}

// {
//   "places": [
//     {
//       "id": "ChIJ...",
//       "formattedAddress": "1 Apple Park Way, Cupertino, CA 95014, USA",
//       "location": { "latitude": 37.3346, "longitude": -122.0090 }
//     },
//     ...
//   ]
// }
//
// an empty result is `{}`
#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    places: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlace {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl SearchResponse {
    // only the first place counts; without an address or a location it is no match
    fn first_place(self) -> Option<Place> {
        let place = self.places.into_iter().next()?;
        let location = place.location?;
        Some(Place {
            id: place.id.unwrap_or_default(),
            formatted_address: place.formatted_address?,
            latitude: location.latitude,
            longitude: location.longitude,
        })
    }
}

// enrich
// ----------------------------------------------------------------------------

/// Look up the headquarters of every company, in order.
///
/// A company without a match, or whose lookup failed, keeps `null` headquarters fields; the
/// batch always completes.
pub async fn enrich<P: PlaceSource>(
    source: &P,
    companies: Vec<Company>,
    delay: Duration,
    reporter: &dyn Reporter,
) -> Vec<EnrichedCompany> {
    let total = companies.len();
    reporter.report(Event::Stage {
        name: "Headquarters",
        total,
    });

    let mut enriched = Vec::with_capacity(total);
    for (i, company) in companies.into_iter().enumerate() {
        let entity = company.company.clone();
        reporter.report(Event::Processing {
            index: i + 1,
            total,
            entity: &entity,
        });

        let place = match source.search_place(&format!("{entity} headquarters")).await {
            Ok(Some(place)) => {
                reporter.report(Event::Located {
                    entity: &entity,
                    place: &place,
                });
                reporter.report(Event::Finished { entity: &entity });
                Some(place)
            }
            Ok(None) => {
                reporter.report(Event::Skipped {
                    entity: &entity,
                    reason: &"no place found",
                });
                None
            }
            Err(err) => {
                reporter.report(Event::Failed {
                    entity: &entity,
                    error: &err,
                });
                None
            }
        };
        enriched.push(EnrichedCompany::new(company, place.as_ref()));

        // polite throttling
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    enriched
}

/// Enrich the company list at `input` and write it to `output`.
///
/// Fails before any request if `GOOGLE_PLACES_API_KEY` is not configured.
pub async fn run(
    config: &Config,
    input: &Path,
    output: &Path,
    reporter: &dyn Reporter,
) -> anyhow::Result<()> {
    let client = PlacesClient::new(config.places_api_key()?);
    let companies: Vec<Company> = crate::fs::read_json(input).await?;
    debug!("{} companies read from {}", companies.len(), input.display());

    let enriched = enrich(&client, companies, config.places_delay, reporter).await;

    crate::fs::write_json(output, &enriched).await?;
    reporter.report(Event::Saved {
        path: output,
        count: enriched.len(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_place_needs_address_and_location() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"places": [
                {"id": "a", "formattedAddress": "1 Main St", "location": {"latitude": 1.5, "longitude": -2.25}},
                {"id": "b", "formattedAddress": "2 Main St", "location": {"latitude": 0, "longitude": 0}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            response.first_place(),
            Some(Place {
                id: "a".to_string(),
                formatted_address: "1 Main St".to_string(),
                latitude: 1.5,
                longitude: -2.25,
            })
        );

        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_place(), None);

        let partial: SearchResponse =
            serde_json::from_str(r#"{"places": [{"id": "a", "formattedAddress": "1 Main St"}]}"#)
                .unwrap();
        assert_eq!(partial.first_place(), None);
    }

    #[test]
    fn request_body_uses_camel_case() {
        let body = serde_json::to_string(&SearchRequest {
            text_query: "Cisco headquarters",
        })
        .unwrap();
        assert_eq!(body, r#"{"textQuery":"Cisco headquarters"}"#);
    }
}
