//! Reqwest-backed TMDB metadata gateway.
//!
//! This adapter owns transport details only: endpoint construction, bearer
//! authentication, timeout and HTTP error mapping, and JSON decoding into
//! domain catalog types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{CreditsDto, ExternalIdsDto, ListResponseDto, MovieDetailsDto};
use crate::domain::movie::{
    Credits, ExternalIds, GenreId, MovieDetails, MoviePage, TrendingPeriod,
};
use crate::domain::ports::{MetadataGatewayError, MovieMetadataGateway};
use crate::domain::watchlist::TmdbId;

/// Versioned API root of the hosted TMDB service.
pub const DEFAULT_TMDB_API_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Metadata gateway that performs HTTP GET requests against the TMDB API.
pub struct TmdbHttpGateway {
    client: Client,
    base_url: Url,
    api_token: String,
}

impl TmdbHttpGateway {
    /// Build a gateway using a reqwest client with an explicit request timeout.
    ///
    /// The token is sent as a bearer credential on every request.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        mut base_url: Url,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        // Url::join drops the final path segment unless the base ends with a
        // slash, which would silently strip the `/3` API version.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_token: api_token.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, MetadataGatewayError> {
        self.base_url.join(path).map_err(|error| {
            MetadataGatewayError::invalid_request(format!("invalid catalog path {path}: {error}"))
        })
    }

    async fn send_get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(StatusCode, Vec<u8>), MetadataGatewayError> {
        let response = self
            .client
            .get(self.endpoint(path)?)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }

    async fn fetch_page(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<MoviePage, MetadataGatewayError> {
        let (status, body) = self.send_get(path, query).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_page(&body)
    }
}

#[async_trait]
impl MovieMetadataGateway for TmdbHttpGateway {
    async fn details(&self, id: TmdbId) -> Result<Option<MovieDetails>, MetadataGatewayError> {
        let path = format!("movie/{}", id.as_i32());
        let (status, body) = self.send_get(&path, &[]).await?;
        // The provider answers 404 for ids outside its catalog; that is an
        // absent title, not a failure.
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_details(&body).map(Some)
    }

    async fn credits(&self, id: TmdbId) -> Result<Credits, MetadataGatewayError> {
        let path = format!("movie/{}/credits", id.as_i32());
        let (status, body) = self.send_get(&path, &[]).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_credits(&body)
    }

    async fn external_ids(&self, id: TmdbId) -> Result<ExternalIds, MetadataGatewayError> {
        let path = format!("movie/{}/external_ids", id.as_i32());
        let (status, body) = self.send_get(&path, &[]).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_external_ids(&body)
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, MetadataGatewayError> {
        self.fetch_page(
            "search/movie",
            &[
                ("query", query.to_owned()),
                ("page", page.to_string()),
                ("include_adult", "false".to_owned()),
            ],
        )
        .await
    }

    async fn trending(
        &self,
        period: TrendingPeriod,
        page: u32,
    ) -> Result<MoviePage, MetadataGatewayError> {
        let path = format!("trending/movie/{}", period.as_str());
        self.fetch_page(&path, &[("page", page.to_string())]).await
    }

    async fn top_rated(&self, page: u32) -> Result<MoviePage, MetadataGatewayError> {
        self.fetch_page("movie/top_rated", &[("page", page.to_string())])
            .await
    }

    async fn by_genre(
        &self,
        genre_id: GenreId,
        page: u32,
    ) -> Result<MoviePage, MetadataGatewayError> {
        self.fetch_page(
            "discover/movie",
            &[
                ("with_genres", genre_id.as_i32().to_string()),
                ("sort_by", "popularity.desc".to_owned()),
                ("page", page.to_string()),
            ],
        )
        .await
    }
}

fn parse_page(body: &[u8]) -> Result<MoviePage, MetadataGatewayError> {
    let decoded: ListResponseDto = decode_body(body)?;
    decoded.into_domain_page().map_err(MetadataGatewayError::decode)
}

fn parse_details(body: &[u8]) -> Result<MovieDetails, MetadataGatewayError> {
    let decoded: MovieDetailsDto = decode_body(body)?;
    decoded
        .into_domain_details()
        .map_err(MetadataGatewayError::decode)
}

fn parse_credits(body: &[u8]) -> Result<Credits, MetadataGatewayError> {
    let decoded: CreditsDto = decode_body(body)?;
    Ok(decoded.into_domain_credits())
}

fn parse_external_ids(body: &[u8]) -> Result<ExternalIds, MetadataGatewayError> {
    let decoded: ExternalIdsDto = decode_body(body)?;
    Ok(decoded.into_domain_external_ids())
}

fn decode_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, MetadataGatewayError> {
    serde_json::from_slice(body).map_err(|error| {
        MetadataGatewayError::decode(format!("invalid TMDB JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> MetadataGatewayError {
    if error.is_timeout() {
        MetadataGatewayError::timeout(error.to_string())
    } else {
        MetadataGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MetadataGatewayError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => MetadataGatewayError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            MetadataGatewayError::timeout(message)
        }
        _ if status.is_client_error() => MetadataGatewayError::invalid_request(message),
        _ => MetadataGatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network TMDB mapping helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "RateLimited")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, "InvalidRequest")]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, "InvalidRequest")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_expected_domain_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, b"{\"status_message\":\"nope\"}");
        match expected {
            "RateLimited" => {
                assert!(
                    matches!(error, MetadataGatewayError::RateLimited { .. }),
                    "429 should map to RateLimited",
                );
            }
            "Timeout" => {
                assert!(
                    matches!(error, MetadataGatewayError::Timeout { .. }),
                    "timeout statuses should map to Timeout",
                );
            }
            "InvalidRequest" => {
                assert!(
                    matches!(error, MetadataGatewayError::InvalidRequest { .. }),
                    "client statuses should map to InvalidRequest",
                );
            }
            "Transport" => {
                assert!(
                    matches!(error, MetadataGatewayError::Transport { .. }),
                    "other statuses should map to Transport",
                );
            }
            _ => panic!("unsupported test expectation: {expected}"),
        }
    }

    #[test]
    fn status_messages_truncate_long_bodies() {
        let body = "x".repeat(500);
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes());
        let message = error.to_string();

        assert!(message.contains("status 500"));
        assert!(message.ends_with("..."), "long bodies should truncate");
        assert!(message.len() < 300, "preview should stay short");
    }

    #[test]
    fn parses_list_responses_into_domain_pages() {
        let body = r#"{
            "page": 2,
            "results": [
                {
                    "id": 550,
                    "title": "Fight Club",
                    "overview": "An insomniac office worker.",
                    "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
                    "release_date": "1999-10-15",
                    "genre_ids": [18, 53],
                    "vote_average": 8.4,
                    "vote_count": 26280,
                    "popularity": 61.4
                },
                {
                    "id": 603,
                    "title": "The Matrix",
                    "release_date": ""
                }
            ],
            "total_pages": 12,
            "total_results": 224
        }"#;

        let page = parse_page(body.as_bytes()).expect("JSON should decode");
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 12);
        assert_eq!(page.total_results, 224);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].tmdb_id.as_i32(), 550);
        assert_eq!(page.results[0].genre_ids, vec![GenreId::new(18), GenreId::new(53)]);
        assert_eq!(
            page.results[1].release_date, None,
            "empty release dates should read as absent",
        );
    }

    #[test]
    fn rejects_results_with_non_positive_ids() {
        let body = r#"{
            "page": 1,
            "results": [{ "id": 0, "title": "Broken" }],
            "total_pages": 1,
            "total_results": 1
        }"#;

        let error = parse_page(body.as_bytes()).expect_err("decode should fail");
        assert!(
            matches!(error, MetadataGatewayError::Decode { .. }),
            "non-positive catalog ids should map to Decode errors",
        );
    }

    #[test]
    fn parses_detail_payloads_with_genre_objects() {
        let body = r#"{
            "id": 550,
            "title": "Fight Club",
            "genres": [{ "id": 18, "name": "Drama" }],
            "runtime": 139,
            "tagline": "Mischief. Mayhem. Soap.",
            "homepage": ""
        }"#;

        let details = parse_details(body.as_bytes()).expect("JSON should decode");
        assert_eq!(details.summary.tmdb_id.as_i32(), 550);
        assert_eq!(
            details.summary.genre_ids,
            vec![GenreId::new(18)],
            "genre ids should derive from the genre objects",
        );
        assert_eq!(details.genres[0].name, "Drama");
        assert_eq!(details.runtime, Some(139));
        assert_eq!(details.homepage, None, "empty homepages should read as absent");
    }

    #[test]
    fn parses_credits_with_sparse_members() {
        let body = r#"{
            "cast": [
                { "id": 819, "name": "Edward Norton", "character": "The Narrator", "order": 0 }
            ],
            "crew": [
                { "id": 7467, "name": "David Fincher", "job": "Director", "department": "Directing" },
                { "id": 7469, "name": "Jim Uhls" }
            ]
        }"#;

        let credits = parse_credits(body.as_bytes()).expect("JSON should decode");
        assert_eq!(credits.cast.len(), 1);
        assert_eq!(credits.cast[0].person_id, 819);
        assert_eq!(credits.crew.len(), 2);
        assert_eq!(credits.crew[1].job, "", "missing jobs should default");
    }

    #[test]
    fn parses_external_ids_with_nulls() {
        let body = r#"{
            "id": 550,
            "imdb_id": "tt0137523",
            "facebook_id": null,
            "instagram_id": null,
            "twitter_id": null
        }"#;

        let ids = parse_external_ids(body.as_bytes()).expect("JSON should decode");
        assert_eq!(ids.imdb_id.as_deref(), Some("tt0137523"));
        assert_eq!(ids.facebook_id, None);
    }

    #[test]
    fn base_urls_keep_their_version_segment() {
        let gateway = TmdbHttpGateway::new(
            Url::parse("https://api.themoviedb.org/3").expect("valid url"),
            "token",
            Duration::from_secs(5),
        )
        .expect("client should build");

        let url = gateway.endpoint("movie/550").expect("path should join");
        assert_eq!(url.as_str(), "https://api.themoviedb.org/3/movie/550");
    }
}
