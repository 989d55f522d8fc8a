#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use httpmock::MockServer;
    use serde_json::json;

    use crate::config::credentials::Credentials;
    use crate::config::telco::SessionFlow;
    use crate::dialect::payload::project_session_payload;
    use crate::dialect::{
        build_request, normalize_session_created, ApiVersion, Operation, Resource, SessionCreated,
    };
    use crate::errors::TelcoError;
    use crate::tests::common::{credentials, telco_config, SESSION_CLIENT_ID};

    #[test]
    fn parses_known_versions_and_rejects_others() {
        assert_eq!("qod-v0".parse::<ApiVersion>().unwrap(), ApiVersion::QodV0);
        assert_eq!("qod-rc-v1".parse::<ApiVersion>().unwrap(), ApiVersion::QodRcV1);
        assert_eq!("mec-qos-v1".parse::<ApiVersion>().unwrap(), ApiVersion::MecQosV1);

        let err = "qod-v9".parse::<ApiVersion>().unwrap_err();
        assert!(matches!(err, TelcoError::Configuration(_)), "got {:?}", err);
    }

    #[test]
    fn projection_keeps_only_allowed_fields_unchanged() {
        let payload = json!({
            "duration": 3600,
            "ueId": { "ipv4addr": "192.168.0.1" },
            "asPorts": { "ranges": [{ "from": 5010, "to": 5020 }] },
            "qos": "QOS_E",
            "notificationUri": "https://example.org/notify",
            "debug": true
        });

        let projected = project_session_payload(&payload);

        assert_eq!(
            projected,
            json!({
                "duration": 3600,
                "ueId": { "ipv4addr": "192.168.0.1" },
                "asPorts": { "ranges": [{ "from": 5010, "to": 5020 }] },
                "qos": "QOS_E"
            })
        );
        assert!(projected.get("asId").is_none());
        assert!(projected.get("uePorts").is_none());
    }

    #[test]
    fn projection_of_non_object_is_empty() {
        assert_eq!(project_session_payload(&json!(["duration"])), json!({}));
        assert_eq!(project_session_payload(&json!(null)), json!({}));
    }

    #[tokio::test]
    async fn session_paths_per_dialect() {
        let server = MockServer::start_async().await;
        let creds = credentials(&server, "qod-v0", SessionFlow::Ciba);
        let get = Operation::Get("abc-123".to_string());

        let cases = [
            (ApiVersion::QodV0, "/qod/v0/sessions/abc-123"),
            (ApiVersion::QodRcV1, "/qod-rc/v1/sessions/abc-123"),
            (ApiVersion::MecQosV1, "/hp3v-meccontroller-v1-qos/sessions/abc-123"),
        ];
        for (version, path) in cases {
            let request = build_request(Resource::Session, &get, version, &creds).unwrap();
            assert_eq!(request.method, Method::GET);
            assert_eq!(request.path, path);
            assert!(request.body.is_none());
        }

        let create = Operation::Create(json!({ "qos": "QOS_E", "extra": 1 }));
        let request = build_request(Resource::Session, &create, ApiVersion::QodRcV1, &creds).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/qod-rc/v1/sessions");
        assert_eq!(request.body, Some(json!({ "qos": "QOS_E" })));

        let delete = Operation::Delete("abc-123".to_string());
        let request = build_request(Resource::Session, &delete, ApiVersion::QodV0, &creds).unwrap();
        assert_eq!(request.method, Method::DELETE);
        assert!(request.headers.is_empty());
    }

    #[tokio::test]
    async fn consent_paths_and_unsupported_resources() {
        let server = MockServer::start_async().await;
        let creds = credentials(&server, "qod-v0", SessionFlow::Ciba);

        let create = Operation::Create(json!({ "name": "video", "extra": 1 }));
        let request = build_request(Resource::Purpose, &create, ApiVersion::QodV0, &creds).unwrap();
        assert_eq!(request.path, "/consent/v0/purposes");
        // admin payloads are forwarded untouched
        assert_eq!(request.body, Some(json!({ "name": "video", "extra": 1 })));

        let get = Operation::Get("app-1".to_string());
        let request = build_request(Resource::App, &get, ApiVersion::QodRcV1, &creds).unwrap();
        assert_eq!(request.path, "/consent-rc/v1/apps/app-1");

        let err = build_request(Resource::App, &get, ApiVersion::MecQosV1, &creds).unwrap_err();
        assert!(matches!(err, TelcoError::Configuration(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn ids_are_escaped_as_a_single_segment() {
        let server = MockServer::start_async().await;
        let creds = credentials(&server, "qod-v0", SessionFlow::Ciba);

        let get = Operation::Get("a/b?c".to_string());
        let request = build_request(Resource::Session, &get, ApiVersion::QodV0, &creds).unwrap();
        assert_eq!(request.path, "/qod/v0/sessions/a%2Fb%3Fc");

        let delete = Operation::Delete("x?admin=1#frag".to_string());
        let request = build_request(Resource::App, &delete, ApiVersion::QodRcV1, &creds).unwrap();
        assert_eq!(request.path, "/consent-rc/v1/apps/x%3Fadmin%3D1%23frag");

        let escaped = Operation::Get("../purposes".to_string());
        let request = build_request(Resource::Session, &escaped, ApiVersion::QodV0, &creds).unwrap();
        assert_eq!(request.path, "/qod/v0/sessions/..%2Fpurposes");

        for id in ["", ".", ".."] {
            let err = build_request(Resource::Session, &Operation::Get(id.to_string()), ApiVersion::QodV0, &creds)
                .unwrap_err();
            assert!(matches!(err, TelcoError::Configuration(_)), "{:?} gave {:?}", id, err);
        }
    }

    #[tokio::test]
    async fn mec_dialect_carries_gateway_headers() {
        let server = MockServer::start_async().await;
        let creds = credentials(&server, "mec-qos-v1", SessionFlow::ClientCredentials);

        let get = Operation::Get("s-1".to_string());
        let request = build_request(Resource::Session, &get, ApiVersion::MecQosV1, &creds).unwrap();

        assert_eq!(
            request.headers,
            vec![
                ("apikey", SESSION_CLIENT_ID.to_string()),
                ("X-SUBJECT-NAME", "developer-kit".to_string()),
                ("X-CLIENT-CERT-STATUS", "ok".to_string()),
            ]
        );

        let mut cfg = telco_config(&server, "mec-qos-v1", SessionFlow::ClientCredentials);
        cfg.gateway_headers = None;
        let creds = Credentials::from_config(&cfg);
        let err = build_request(Resource::Session, &get, ApiVersion::MecQosV1, &creds).unwrap_err();
        assert!(matches!(err, TelcoError::Configuration(_)), "got {:?}", err);
    }

    #[test]
    fn normalizes_created_session_per_dialect() {
        let body = json!({ "id": "abc-123", "duration": 3600 });

        assert_eq!(
            normalize_session_created(ApiVersion::QodV0, StatusCode::CREATED, Some(&body)),
            Some(SessionCreated::Id { id: "abc-123".to_string() })
        );
        assert_eq!(
            normalize_session_created(ApiVersion::QodRcV1, StatusCode::CREATED, Some(&body)),
            Some(SessionCreated::SessionId { session_id: "abc-123".to_string() })
        );

        let mec_body = json!({ "sessionId": "mec-9" });
        assert_eq!(
            normalize_session_created(ApiVersion::MecQosV1, StatusCode::OK, Some(&mec_body)),
            Some(SessionCreated::Id { id: "mec-9".to_string() })
        );
    }

    #[test]
    fn created_session_serializes_to_caller_shape() {
        let legacy = serde_json::to_value(SessionCreated::Id { id: "abc-123".to_string() }).unwrap();
        assert_eq!(legacy, json!({ "id": "abc-123" }));

        let revised = serde_json::to_value(SessionCreated::SessionId {
            session_id: "abc-123".to_string(),
        })
        .unwrap();
        assert_eq!(revised, json!({ "session_id": "abc-123" }));
    }

    #[test]
    fn anything_but_declared_create_status_is_no_result() {
        let body = json!({ "id": "abc-123" });

        // 200 is not the legacy create status
        assert_eq!(normalize_session_created(ApiVersion::QodV0, StatusCode::OK, Some(&body)), None);
        assert_eq!(
            normalize_session_created(ApiVersion::MecQosV1, StatusCode::CREATED, Some(&json!({ "sessionId": "x" }))),
            None
        );
        assert_eq!(
            normalize_session_created(ApiVersion::QodRcV1, StatusCode::BAD_REQUEST, Some(&json!({ "code": "INVALID_ARGUMENT" }))),
            None
        );
        // success without an id
        assert_eq!(normalize_session_created(ApiVersion::QodV0, StatusCode::CREATED, None), None);
        assert_eq!(
            normalize_session_created(ApiVersion::QodV0, StatusCode::CREATED, Some(&json!({ "id": "" }))),
            None
        );
    }
}
