use async_trait::async_trait;
use reqwest::{Client, Url, header::ACCEPT};
use tracing::{debug, instrument};

use crate::core::{CurrencySeriesProvider, FetchError, ReportPeriod};

/// Daily euro reference rates from the ECB data portal.
pub struct EcbProvider {
    base_url: String,
    client: Client,
}

impl EcbProvider {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent("ecbfx/0.1").build()?;
        Ok(EcbProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn series_url(&self, currency: &str) -> String {
        format!(
            "{}/service/data/EXR/D.{}.EUR.SP00.A",
            self.base_url, currency
        )
    }
}

#[async_trait]
impl CurrencySeriesProvider for EcbProvider {
    #[instrument(name = "EcbSeriesFetch", skip(self), fields(currency = %currency))]
    async fn fetch_series(
        &self,
        currency: &str,
        period: &ReportPeriod,
    ) -> Result<String, FetchError> {
        let url = self.series_url(currency);

        debug!("Checking series availability at {}", url);
        let probe = self.client.get(&url).send().await?;
        if !probe.status().is_success() {
            return Err(FetchError::Unavailable {
                status: probe.status().as_u16(),
            });
        }

        let mut params = Vec::with_capacity(2);
        if let Some(start) = period.start_param() {
            params.push(("startPeriod", start));
        }
        params.push(("endPeriod", period.end_param()));
        let data_url = Url::parse_with_params(&url, &params)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        debug!("Requesting series data from {}", data_url);
        let response = self
            .client
            .get(data_url)
            .header(ACCEPT, "text/csv")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FetchError::Http {
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SERIES_PATH: &str = "/service/data/EXR/D.USD.EUR.SP00.A";
    const CSV_BODY: &str = "KEY,FREQ,CURRENCY,CURRENCY_DENOM,TIME_PERIOD,OBS_VALUE\n\
                            EXR.D.USD.EUR.SP00.A,D,USD,EUR,2023-05-31,1.0735\n";

    fn period() -> ReportPeriod {
        ReportPeriod::new(
            NaiveDate::from_ymd_opt(2023, 5, 1),
            NaiveDate::from_ymd_opt(2023, 5, 31).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_successful_series_fetch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SERIES_PATH))
            .and(query_param("startPeriod", "2023-05-01"))
            .and(query_param("endPeriod", "2023-05-31"))
            .and(header("Accept", "text/csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CSV_BODY))
            .expect(1)
            .mount(&mock_server)
            .await;
        // Availability probe carries no query parameters
        Mock::given(method("GET"))
            .and(path(SERIES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("probe"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = EcbProvider::new(&mock_server.uri()).unwrap();
        let body = provider.fetch_series("USD", &period()).await.unwrap();
        assert_eq!(body, CSV_BODY);
    }

    #[tokio::test]
    async fn test_unbounded_start_omits_parameter() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SERIES_PATH))
            .and(query_param("endPeriod", "2023-05-31"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CSV_BODY))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(SERIES_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let provider = EcbProvider::new(&mock_server.uri()).unwrap();
        let period = ReportPeriod::new(None, NaiveDate::from_ymd_opt(2023, 5, 31).unwrap());
        provider.fetch_series("USD", &period).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url.query(), None);
        assert_eq!(requests[1].url.query(), Some("endPeriod=2023-05-31"));
    }

    #[tokio::test]
    async fn test_unavailable_series() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/service/data/EXR/D.XXX.EUR.SP00.A"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = EcbProvider::new(&mock_server.uri()).unwrap();
        let result = provider.fetch_series("XXX", &period()).await;
        assert!(matches!(
            result,
            Err(FetchError::Unavailable { status: 404 })
        ));
    }

    #[tokio::test]
    async fn test_data_request_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SERIES_PATH))
            .and(query_param("endPeriod", "2023-05-31"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(SERIES_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let provider = EcbProvider::new(&mock_server.uri()).unwrap();
        let result = provider.fetch_series("USD", &period()).await;
        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 500 }));
        assert_eq!(err.to_string(), "HTTP error: 500");
    }

    #[test]
    fn test_series_url() {
        let provider = EcbProvider::new("https://data-api.ecb.europa.eu/").unwrap();
        assert_eq!(
            provider.series_url("JPY"),
            "https://data-api.ecb.europa.eu/service/data/EXR/D.JPY.EUR.SP00.A"
        );
    }
}
