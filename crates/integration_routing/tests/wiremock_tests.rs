//! Integration tests for the OSRM client (wiremock-based)

use domain::GeoPoint;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_routing::{OsrmConfig, OsrmRoutingClient, RoutingClient, RoutingError};

fn config_for_mock(base_url: &str) -> OsrmConfig {
    OsrmConfig {
        base_url: format!("{base_url}/route/v1"),
        ..OsrmConfig::for_testing()
    }
}

fn points() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new_unchecked(-1.2491, -78.6167),
        GeoPoint::new_unchecked(-1.2400, -78.6200),
        GeoPoint::new_unchecked(-1.2543, -78.6229),
    ]
}

const fn sample_route_json() -> &'static str {
    r#"{
        "code": "Ok",
        "routes": [
            {
                "distance": 12345.0,
                "duration": 754.0,
                "geometry": "_p~iF~ps|U_ulLnnqC_mqNvxq`@",
                "weight_name": "cyclability",
                "legs": [
                    {
                        "distance": 5000.0,
                        "duration": 300.0,
                        "summary": "Avenida Cevallos",
                        "steps": [
                            { "distance": 5000.0, "duration": 300.0, "name": "Avenida Cevallos",
                              "maneuver": { "type": "depart", "bearing_after": 0 } },
                            { "distance": 0.0, "duration": 0.0, "name": "Avenida Cevallos",
                              "maneuver": { "type": "arrive" } }
                        ]
                    },
                    {
                        "distance": 7345.0,
                        "duration": 454.0,
                        "summary": "Calle Sucre",
                        "steps": [
                            { "distance": 7345.0, "duration": 454.0, "name": "Calle Sucre",
                              "maneuver": { "type": "turn", "modifier": "right" } },
                            { "distance": 0.0, "duration": 0.0, "name": "Calle Sucre",
                              "maneuver": { "type": "arrive" } }
                        ]
                    }
                ]
            },
            {
                "distance": 13000.0,
                "duration": 800.0,
                "legs": []
            }
        ],
        "waypoints": []
    }"#
}

#[tokio::test]
async fn test_route_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/route/v1/bicycle/-78.6167,-1.2491;-78.62,-1.24;-78.6229,-1.2543",
        ))
        .and(query_param("overview", "full"))
        .and(query_param("steps", "true"))
        .and(query_param("geometries", "polyline"))
        .and(query_param("alternatives", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let result = client.route("bicycle", &points()).await.unwrap();

    assert_eq!(result.routes.len(), 2);
    assert_eq!(result.raw.len(), 2);

    let best = &result.routes[0];
    assert_eq!(best.distance, Some(12345.0));
    assert_eq!(best.duration, Some(754.0));
    assert_eq!(best.legs.len(), 2);
    assert_eq!(best.decode_geometry().unwrap().len(), 3);

    let steps = best.instructions();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0].text, "Head north on Avenida Cevallos");
    assert_eq!(steps[1].text, "You have reached stop 1");
    assert_eq!(steps[2].text, "Turn right onto Calle Sucre");
    assert_eq!(steps[3].text, "You have arrived at your destination");
}

#[tokio::test]
async fn test_alternatives_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("alternatives", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = OsrmConfig {
        alternatives: false,
        ..config_for_mock(&server.uri())
    };
    let client = OsrmRoutingClient::new(&config).unwrap();
    let result = client.route("driving", &points()).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_no_route_reported_with_400() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"code": "NoRoute", "message": "Impossible route between points"}"#,
        ))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.route("foot", &points()).await.unwrap_err();

    assert!(err.is_no_route());
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("Impossible route"));
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.route("driving", &points()).await.unwrap_err();

    assert!(matches!(err, RoutingError::RequestFailed(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.route("driving", &points()).await.unwrap_err();

    assert!(matches!(err, RoutingError::RateLimitExceeded));
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.route("driving", &points()).await.unwrap_err();

    assert!(matches!(err, RoutingError::ParseError(_)));
}

#[tokio::test]
async fn test_route_with_leg_figures_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code": "Ok", "routes": [{"legs": [
                {"distance": 1000, "duration": 60, "steps": []},
                {"distance": 2000, "duration": 120, "steps": []}
            ]}]}"#,
        ))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&config_for_mock(&server.uri())).unwrap();
    let result = client.route("driving", &points()[..2]).await.unwrap();

    let route = &result.routes[0];
    assert!(route.distance.is_none());
    assert_eq!(route.legs[0].distance, Some(1000.0));
    assert_eq!(route.legs[1].duration, Some(120.0));
}
