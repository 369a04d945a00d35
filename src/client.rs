//! HTTP client for the perks API.
//!
//! Provides both async and blocking client variants behind feature flags.
//! The public listing needs no credentials; every other endpoint sends the
//! configured bearer token.

/// Base URL used when none is configured.
const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Public listing endpoint path.
const ALL_PERKS_PATH: &str = "/perks/all";

/// Authenticated collection endpoint path.
const PERKS_PATH: &str = "/perks";

/// Generates a perks client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        request_type: $req_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Bearer token for the authenticated endpoints.
            token: Option<SecretString>,
            /// Base URL override.
            base_url: Option<String>,
        }

        impl $builder {
            /// Sets the bearer token used by the authenticated endpoints.
            #[inline]
            #[must_use]
            pub fn token<T: Into<String>>(mut self, token: T) -> Self {
                self.token = Some(SecretString::from(token.into()));
                self
            }

            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`PerksError::Url`] if the base URL is not a valid URL.
            /// Returns [`PerksError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
                    .trim_end_matches('/')
                    .to_owned();
                let _parsed = Url::parse(&base_url)?;
                tracing::debug!(base_url = %base_url, authenticated = self.token.is_some(), "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client {
                    http,
                    token: self.token,
                    base_url,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Bearer token, if configured.
            token: Option<SecretString>,
            /// API base URL without a trailing slash.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    token: None,
                    base_url: None,
                }
            }

            /// Returns the configured base URL.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            /// Lists perks via the public `GET /perks/all` endpoint.
            ///
            /// Blank parameters are omitted from the query string.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(query = %query))]
            pub $($async_kw)? fn all_perks(&self, query: &PerkQuery) -> Result<Vec<Perk>> {
                let mut url = self.endpoint(ALL_PERKS_PATH)?;
                let pairs = query.to_pairs();
                if !pairs.is_empty() {
                    let mut serializer = url.query_pairs_mut();
                    let _serializer = serializer.extend_pairs(pairs);
                }
                tracing::debug!(url = %url, "listing public perks");
                let request = self.http.get(url);
                let response: PerksResponse = self.send_json(request) $( .$await_ext )? ?;
                Ok(response.perks)
            }

            /// Lists perks via the authenticated `GET /perks` endpoint.
            ///
            /// # Errors
            ///
            /// Returns [`PerksError::MissingToken`] without sending anything if
            /// no token is configured, otherwise any request or decoding error.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_perks(&self) -> Result<Vec<Perk>> {
                let request = self.authorized(self.http.get(self.endpoint(PERKS_PATH)?))?;
                let response: PerksResponse = self.send_json(request) $( .$await_ext )? ?;
                Ok(response.perks)
            }

            /// Fetches a single perk via `GET /perks/:id`.
            ///
            /// # Errors
            ///
            /// Returns [`PerksError::MissingToken`] without sending anything if
            /// no token is configured, otherwise any request or decoding error.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn get_perk(&self, id: &PerkId) -> Result<Perk> {
                let request = self.authorized(self.http.get(self.perk_url(id)?))?;
                let response: PerkResponse = self.send_json(request) $( .$await_ext )? ?;
                Ok(response.perk)
            }

            /// Creates a perk via `POST /perks`.
            ///
            /// # Errors
            ///
            /// Returns [`PerksError::MissingToken`] without sending anything if
            /// no token is configured, otherwise any request or decoding error.
            #[inline]
            #[tracing::instrument(skip_all, fields(title = %draft.title))]
            pub $($async_kw)? fn create_perk(&self, draft: &PerkDraft) -> Result<Perk> {
                let request = self
                    .authorized(self.http.post(self.endpoint(PERKS_PATH)?))?
                    .json(draft);
                let response: PerkResponse = self.send_json(request) $( .$await_ext )? ?;
                Ok(response.perk)
            }

            /// Applies a partial update via `PATCH /perks/:id`.
            ///
            /// # Errors
            ///
            /// Returns [`PerksError::MissingToken`] without sending anything if
            /// no token is configured, otherwise any request or decoding error.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn update_perk(&self, id: &PerkId, patch: &PerkPatch) -> Result<Perk> {
                let request = self
                    .authorized(self.http.patch(self.perk_url(id)?))?
                    .json(patch);
                let response: PerkResponse = self.send_json(request) $( .$await_ext )? ?;
                Ok(response.perk)
            }

            /// Deletes a perk via `DELETE /perks/:id`.
            ///
            /// # Errors
            ///
            /// Returns [`PerksError::MissingToken`] without sending anything if
            /// no token is configured, otherwise any request error.
            #[inline]
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete_perk(&self, id: &PerkId) -> Result<()> {
                let request = self.authorized(self.http.delete(self.perk_url(id)?))?;
                let _body = self.send(request) $( .$await_ext )? ?;
                Ok(())
            }

            /// Joins an endpoint path onto the base URL.
            fn endpoint(&self, path: &str) -> Result<Url> {
                Ok(Url::parse(&format!("{}{path}", self.base_url))?)
            }

            /// Builds the URL of a single perk, escaping the ID.
            fn perk_url(&self, id: &PerkId) -> Result<Url> {
                let mut url = self.endpoint(PERKS_PATH)?;
                {
                    let mut segments = url.path_segments_mut().map_err(|()| {
                        PerksError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase)
                    })?;
                    let _segments = segments.push(id.as_inner());
                }
                Ok(url)
            }

            /// Attaches the bearer token, failing if none is configured.
            fn authorized(&self, request: $req_type) -> Result<$req_type> {
                let token = self.token.as_ref().ok_or(PerksError::MissingToken)?;
                Ok(request.bearer_auth(token.expose_secret()))
            }

            /// Sends a request and deserializes the success body.
            $($async_kw)? fn send_json<Resp: serde::de::DeserializeOwned>(
                &self,
                request: $req_type,
            ) -> Result<Resp> {
                let body = self.send(request) $( .$await_ext )? ?;
                tracing::trace!(body_len = body.len(), "parsing response body");
                serde_json::from_str(&body).map_err(PerksError::from)
            }

            /// Sends a request and returns the body of a success response.
            ///
            /// Non-success statuses become [`PerksError::Api`] carrying the
            /// body's optional `message` field.
            $($async_kw)? fn send(&self, request: $req_type) -> Result<String> {
                let response: $resp_type = request.send() $( .$await_ext )? ?;
                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    Ok(response.text() $( .$await_ext )? ?)
                } else {
                    let raw = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_default();
                    let message = ErrorBody::message_from(&raw);
                    tracing::debug!(status = status.as_u16(), message = ?message, "API error");
                    Err(PerksError::Api {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }

        #[cfg(test)]
        mod tests {
            use super::*;

            #[test]
            fn builder_without_token_succeeds() {
                let client = $client::builder().build().unwrap();
                assert_eq!(client.base_url, DEFAULT_BASE_URL);
                assert!(client.token.is_none());
            }

            #[test]
            fn builder_custom_base_url_strips_trailing_slash() {
                let client = $client::builder()
                    .token("test-token")
                    .base_url("http://localhost:8080/api/")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url(), "http://localhost:8080/api");
            }

            #[test]
            fn builder_rejects_invalid_base_url() {
                let result = $client::builder().base_url("not a url").build();
                assert!(matches!(result, Err(PerksError::Url(_))));
            }

            #[test]
            fn perk_url_escapes_id() {
                let client = $client::builder()
                    .base_url("http://localhost:8080/api")
                    .build()
                    .unwrap();
                let url = client.perk_url(&PerkId::from("a/b")).unwrap();
                assert_eq!(url.as_str(), "http://localhost:8080/api/perks/a%2Fb");
            }

            #[test]
            fn token_is_not_leaked_by_debug() {
                let client = $client::builder().token("super-secret").build().unwrap();
                let rendered = format!("{client:?}");
                assert!(!rendered.contains("super-secret"));
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the perks API.

    use core::future::Future;

    use secrecy::{ExposeSecret as _, SecretString};
    use url::Url;

    use super::{ALL_PERKS_PATH, DEFAULT_BASE_URL, PERKS_PATH};
    use crate::error::{PerksError, Result};
    use crate::models::{ErrorBody, Perk, PerkDraft, PerkId, PerkPatch, PerkResponse, PerksResponse};
    use crate::query::PerkQuery;
    use crate::source::PerkSource;

    define_client! {
        client_name: PerksClient,
        builder_name: PerksClientBuilder,
        http_type: reqwest::Client,
        request_type: reqwest::RequestBuilder,
        response_type: reqwest::Response,
        client_doc: "Async client for the perks API.\n\nUse [`PerksClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`PerksClient`].",
        async_kw: async,
        await_kw: await,
    }

    impl PerkSource for PerksClient {
        #[inline]
        fn fetch(&self, query: &PerkQuery) -> impl Future<Output = Result<Vec<Perk>>> + Send {
            self.all_perks(query)
        }
    }

}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the perks API.

    use secrecy::{ExposeSecret as _, SecretString};
    use url::Url;

    use super::{ALL_PERKS_PATH, DEFAULT_BASE_URL, PERKS_PATH};
    use crate::error::{PerksError, Result};
    use crate::models::{ErrorBody, Perk, PerkDraft, PerkId, PerkPatch, PerkResponse, PerksResponse};
    use crate::query::PerkQuery;

    define_client! {
        client_name: PerksBlockingClient,
        builder_name: PerksBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        request_type: reqwest::blocking::RequestBuilder,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the perks API.\n\nUse [`PerksBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`PerksBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{PerksClient, PerksClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{PerksBlockingClient, PerksBlockingClientBuilder};
