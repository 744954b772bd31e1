use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::GeoConfig;
use crate::error::LookupError;
use crate::stats::{UNKNOWN_COUNTRY, UNKNOWN_COUNTRY_CODE};

/// Fields requested from the service; `message` only appears on failures.
const LOOKUP_FIELDS: &str = "status,message,country,countryCode,lat,lon,query";

/// Location reported for one address, before its failure count is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    /// Address as echoed back by the service, which may normalize the input.
    pub address: String,
    pub country: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub trait GeoLookup: Send + Sync {
    fn lookup(&self, address: &str) -> Result<GeoLocation, LookupError>;
}

/// Body returned by an ip-api compatible service, discriminated on `status`.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GeoResponse {
    Success {
        query: Option<String>,
        country: Option<String>,
        #[serde(rename = "countryCode")]
        country_code: Option<String>,
        lat: Option<f64>,
        lon: Option<f64>,
    },
    Fail {
        message: Option<String>,
    },
}

impl GeoResponse {
    pub fn into_location(self) -> Result<GeoLocation, LookupError> {
        match self {
            GeoResponse::Success {
                query,
                country,
                country_code,
                lat,
                lon,
            } => {
                let address = query
                    .filter(|q| !q.is_empty())
                    .ok_or(LookupError::MissingAddress)?;
                Ok(GeoLocation {
                    address,
                    country: country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
                    country_code: country_code.unwrap_or_else(|| UNKNOWN_COUNTRY_CODE.to_string()),
                    latitude: lat.unwrap_or(0.0),
                    longitude: lon.unwrap_or(0.0),
                })
            }
            GeoResponse::Fail { message } => Err(LookupError::Rejected(message)),
        }
    }
}

pub fn parse_response(body: &str) -> Result<GeoLocation, LookupError> {
    let response: GeoResponse = serde_json::from_str(body)?;
    response.into_location()
}

/// Blocking client for `GET {endpoint}/{address}?fields=...`.
#[derive(Debug, Clone)]
pub struct IpApiClient {
    client: Client,
    endpoint: Url,
}

impl IpApiClient {
    pub fn new(config: &GeoConfig) -> Result<Self, LookupError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| LookupError::InvalidUrl(format!("{}: {}", config.endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(LookupError::InvalidUrl(config.endpoint.clone()));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, endpoint })
    }

    pub fn lookup_url(&self, address: &str) -> Result<Url, LookupError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidUrl(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(address);
        url.query_pairs_mut().append_pair("fields", LOOKUP_FIELDS);
        Ok(url)
    }
}

impl GeoLookup for IpApiClient {
    fn lookup(&self, address: &str) -> Result<GeoLocation, LookupError> {
        let url = self.lookup_url(address)?;
        debug!(action = "request", component = "geo_lookup", url = %url, "Requesting geolocation");

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_response(&body)
    }
}
