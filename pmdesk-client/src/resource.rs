//! Generic CRUD client.
//!
//! Every reference-data table exposes the same five operations under its own
//! path, so one client parameterised by path covers all of them. A few
//! tables list under a plural and address single entries under the
//! singular; the client keeps both paths.

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::request::ApiRequest;
use pmdesk_core::Acknowledgement;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// CRUD operations on the collection at one path.
pub struct Resource<T> {
    client: ApiClient,
    path: String,
    item_path: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path)
            .field("item_path", &self.item_path)
            .finish()
    }
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            item_path: self.item_path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Resource<T> {
    /// Create a resource client for `path` (e.g. `/references/stages`).
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        let path = path.into();
        Self::with_item_path(client, path.clone(), path)
    }

    /// Create a resource client that lists at `path` and addresses single
    /// entries under `item_path` (e.g. `/references/evaluations` and
    /// `/references/evaluation`).
    pub fn with_item_path(
        client: ApiClient,
        path: impl Into<String>,
        item_path: impl Into<String>,
    ) -> Self {
        Self {
            client,
            path: path.into().trim_end_matches('/').to_string(),
            item_path: item_path.into().trim_end_matches('/').to_string(),
            _marker: PhantomData,
        }
    }

    /// Collection path, used for listing.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path single entries are created and addressed under.
    pub fn item_path(&self) -> &str {
        &self.item_path
    }

    fn entry_path(&self, id: &dyn fmt::Display) -> String {
        format!("{}/{}", self.item_path, urlencoding::encode(&id.to_string()))
    }

    /// List every entry.
    pub async fn list(&self) -> ApiResult<Vec<T>> {
        self.client.call_json(ApiRequest::get(self.path.as_str())).await
    }

    /// Fetch one entry.
    pub async fn get(&self, id: impl fmt::Display) -> ApiResult<T> {
        self.client.call_json(ApiRequest::get(self.entry_path(&id))).await
    }

    /// Create an entry.
    pub async fn create<D: Serialize + ?Sized>(&self, draft: &D) -> ApiResult<T> {
        let request = ApiRequest::post(self.item_path.as_str()).json(draft)?;
        self.client.call_json(request).await
    }

    /// Replace an entry.
    pub async fn update<D: Serialize + ?Sized>(
        &self,
        id: impl fmt::Display,
        draft: &D,
    ) -> ApiResult<T> {
        let request = ApiRequest::put(self.entry_path(&id)).json(draft)?;
        self.client.call_json(request).await
    }

    /// Delete an entry.
    pub async fn delete(&self, id: impl fmt::Display) -> ApiResult<Acknowledgement> {
        self.client
            .call_json(ApiRequest::delete(self.entry_path(&id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::{ApiClient, ClientConfig};
    use pmdesk_core::{Reference, ReferenceDraft, ReferenceKind, Session};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ClientConfig::new(&server.uri()).unwrap(), Session::in_memory()).unwrap()
    }

    #[rstest]
    #[case(ReferenceKind::Stage, "/references/stages", "/references/stages")]
    #[case(ReferenceKind::Service, "/references/service", "/references/service")]
    #[case(ReferenceKind::Payment, "/references/payment", "/references/payment")]
    #[case(
        ReferenceKind::BusinessSegment,
        "/references/business_segment",
        "/references/business_segment"
    )]
    #[case(ReferenceKind::Evaluation, "/references/evaluations", "/references/evaluation")]
    #[case(ReferenceKind::Cost, "/references/cost", "/references/cost")]
    #[case(
        ReferenceKind::RevenueStatus,
        "/references/revenue_statuses",
        "/references/revenue_status"
    )]
    #[case(ReferenceKind::CostStatus, "/references/cost_status", "/references/cost_status")]
    fn test_reference_paths(
        #[case] kind: ReferenceKind,
        #[case] collection: &str,
        #[case] item: &str,
    ) {
        let client = ApiClient::new(ClientConfig::default(), Session::in_memory()).unwrap();
        let resource = client.references(kind);
        assert_eq!(resource.path(), collection);
        assert_eq!(resource.item_path(), item);
    }

    #[tokio::test]
    async fn test_singular_item_routes() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        let entry = json!({ "oid": id, "name": "Won" });
        Mock::given(method("GET"))
            .and(path("/references/revenue_statuses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([entry.clone()])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/references/revenue_status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(entry.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/references/revenue_status/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(entry.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("/references/revenue_status/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(entry.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/references/revenue_status/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/references/evaluation/{}", id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "oid": id, "name": "A" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let statuses = client.references(ReferenceKind::RevenueStatus);
        assert_eq!(statuses.list().await.unwrap().len(), 1);
        assert_eq!(statuses.create(&ReferenceDraft::named("Won")).await.unwrap().oid, id);
        assert_eq!(statuses.get(id).await.unwrap().name, "Won");
        statuses.update(id, &ReferenceDraft::named("Won")).await.unwrap();
        assert_eq!(statuses.delete(id).await.unwrap().message, "deleted");

        let evaluation = client.references(ReferenceKind::Evaluation).get(id).await.unwrap();
        assert_eq!(evaluation.name, "A");
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path("/references/stages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "oid": id, "name": "Lead", "probability": 0.1 }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/references/stages/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(
                { "oid": id, "name": "Lead", "probability": 0.1 }
            )))
            .mount(&server)
            .await;

        let stages = client_for(&server).references(ReferenceKind::Stage);
        let listed = stages.list().await.unwrap();
        assert_eq!(
            listed,
            vec![Reference {
                oid: id,
                name: "Lead".to_string(),
                probability: Some(0.1)
            }]
        );

        let one = stages.get(id).await.unwrap();
        assert_eq!(one.name, "Lead");
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path("/references/service"))
            .and(body_json(json!({ "name": "Audit" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "oid": id, "name": "Audit" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("/references/service/{}", id)))
            .and(body_json(json!({ "name": "Security audit" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "oid": id, "name": "Security audit" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/references/service/{}", id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "Stage deleted" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let services = client_for(&server).references(ReferenceKind::Service);

        let created = services.create(&ReferenceDraft::named("Audit")).await.unwrap();
        assert_eq!(created.oid, id);
        assert!(created.probability.is_none());

        let updated = services
            .update(id, &ReferenceDraft::named("Security audit"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Security audit");

        let ack = services.delete(id).await.unwrap();
        assert_eq!(ack.message, "Stage deleted");
    }

    #[tokio::test]
    async fn test_forbidden_create_surfaces_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/references/cost"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({ "detail": "Insufficient permissions" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .references(ReferenceKind::Cost)
            .create(&ReferenceDraft::named("Travel"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 403);
        assert_eq!(err.to_string(), "Insufficient permissions");
    }
}
