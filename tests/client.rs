//! End-to-end tests against a wiremock server.

use serde_json::json;
use std::time::{Duration, Instant};
use usda::{
    Client, Context, Error, FoodsReportParams, ListParams, Presets, QueryOptions, ReportType,
    SearchParams,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("demo123:")
const DEMO_AUTH: &str = "Basic ZGVtbzEyMzo=";

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let client = Client::builder("demo123")
        .base_url(format!("{}/ndb/", server.uri()))
        .build()
        .unwrap();
    (server, client)
}

fn search_sample() -> serde_json::Value {
    json!({
        "list": {
            "q": "apple", "sr": "1", "ds": "any", "start": 0, "end": 2, "total": 2,
            "group": "", "sort": "n",
            "item": [
                {"offset": 0, "group": "Fruits and Fruit Juices", "name": "Apples, raw, with skin", "ndbno": "09003", "ds": "SR", "manu": "none"},
                {"offset": 1, "group": "Baby Foods", "name": "Babyfood, juice, apple", "ndbno": "03167", "ds": "SR", "manu": "none"}
            ]
        }
    })
}

#[tokio::test]
async fn test_food_name_search() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ndb/search"))
        .and(query_param("max", "100"))
        .and(query_param("offset", "0"))
        .and(query_param("sort", "n"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", DEMO_AUTH))
        .and(body_json(json!({"q": "apple"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_sample()))
        .expect(1)
        .mount(&server)
        .await;

    let results = client.food_name_search(&Context::new(), "apple").await.unwrap();

    assert_eq!(results.list.q, "apple");
    assert_eq!(results.list.total, 2);
    assert_eq!(results.list.item[1].ndbno, "03167");
    assert_eq!(results.list.item[1].group, "Baby Foods");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("max=100&offset=0&sort=n"));
    assert_eq!(requests[0].body, br#"{"q":"apple"}"#);
}

#[tokio::test]
async fn test_basic_food_report() {
    let (server, client) = setup().await;

    let sample = json!({
        "foods": [{"food": {
            "sr": "Legacy", "type": "b",
            "desc": {"ndbno": "01009", "name": "Cheese, cheddar", "ds": "Standard Reference", "manu": "", "ru": "g"},
            "nutrients": [
                {"nutrient_id": "208", "name": "Energy", "derivation": "NC", "group": "Proximates", "unit": "kcal", "value": "404",
                 "measures": [{"label": "cup, diced", "eqv": 132.0, "eunit": "g", "qty": 1.0, "value": "533"}]}
            ],
            "footnotes": []
        }}],
        "count": 1, "notfound": 0, "api": 2.0
    });

    Mock::given(method("POST"))
        .and(path("/ndb/V2/reports"))
        .and(body_json(json!({"ndbno": ["01009"], "type": "b"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample))
        .expect(1)
        .mount(&server)
        .await;

    let report = client.basic_food_report(&Context::new(), "01009").await.unwrap();

    assert_eq!(report.count, 1);
    assert_eq!(report.api, 2.0);
    let food = report.foods[0].food.as_ref().unwrap();
    assert_eq!(food.desc.name, "Cheese, cheddar");
    assert_eq!(food.nutrients[0].nutrient_id, json!("208"));
    assert_eq!(food.nutrients[0].measures[0].eqv, 132.0);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
    assert_eq!(requests[0].body, br#"{"ndbno":["01009"],"type":"b"}"#);
}

#[tokio::test]
async fn test_list_by_type() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ndb/list"))
        .and(query_param("max", "1500"))
        .and(query_param("sort", "id"))
        .and(body_json(json!({"lt": "g"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": {"lt": "g", "start": 0, "end": 1, "total": 1, "sr": "Legacy", "sort": "id",
                     "item": [{"offset": 0, "id": "0300", "name": "Baby Foods"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list = client.list_by_type(&Context::new(), "g").await.unwrap();
    assert_eq!(list.list.item[0].id, "0300");
    assert_eq!(list.list.sort, "id");
}

#[tokio::test]
async fn test_nutrient_reports() {
    let (server, client) = setup().await;

    let sample = json!({
        "report": {
            "sr": "Legacy", "subset": "All foods", "start": 0, "end": 1, "total": 1,
            "groups": [{"id": "0300", "description": "Baby Foods"}],
            "foods": [{"ndbno": "03926", "name": "Babyfood, juice, apple", "weight": 31.2, "measure": "1.0 fl oz",
                       "nutrients": [{"nutrient_id": 306, "nutrient": "Potassium, K", "unit": "mg", "value": "28", "gm": 91.0}]}]
        }
    });

    Mock::given(method("POST"))
        .and(path("/ndb/nutrients"))
        .and(query_param("max", "10"))
        .and(query_param("sort", "c"))
        .and(body_json(json!({"fg": ["0300"], "nutrients": ["306", "204"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample.clone()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ndb/nutrients"))
        .and(query_param("max", "100"))
        .and(body_json(json!({"ndbno": "03926", "nutrients": ["306", "204"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = Context::new();
    let aggregate = client.nutrients_report(&ctx).await.unwrap();
    assert_eq!(aggregate.report.groups[0].id, "0300");

    let single = client.food_nutrients_report(&ctx, "03926").await.unwrap();
    let nutrient = &single.report.foods[0].nutrients[0];
    assert_eq!(nutrient.nutrient_id, 306);
    assert_eq!(nutrient.value, json!("28"));
    assert_eq!(nutrient.gm, 91.0);
}

#[tokio::test]
async fn test_operation_with_custom_options() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ndb/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_sample()))
        .mount(&server)
        .await;

    let params = SearchParams {
        q: Some("apple pie".into()),
        ds: Some("Standard Reference".into()),
        fg: None,
    };
    let opts = QueryOptions::new().with_max(5).with_sort("r");
    client
        .search(&Context::new(), &params, Some(&opts))
        .await
        .unwrap();
    client.search(&Context::new(), &params, None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("max=5&sort=r"));
    assert_eq!(requests[1].url.query(), None);

    let sent: SearchParams = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent, params);
}

#[tokio::test]
async fn test_custom_presets() {
    let server = MockServer::start().await;
    let presets = Presets {
        search: QueryOptions::new().with_max(10),
        ..Default::default()
    };
    let client = Client::builder("demo123")
        .base_url(format!("{}/ndb", server.uri()))
        .presets(presets)
        .build()
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/ndb/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_sample()))
        .expect(1)
        .mount(&server)
        .await;

    client.food_name_search(&Context::new(), "apple").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("max=10"));
}

#[tokio::test]
async fn test_api_error_response() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ndb/V2/reports"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": {"error": [{"status": 400, "parameter": "type", "message": "Invalid report type"}]}
        })))
        .mount(&server)
        .await;

    let params = FoodsReportParams {
        ndbno: vec!["01009".into()],
        report_type: Some(ReportType::Full),
    };
    let err = client.foods_report(&Context::new(), &params).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "type: Invalid report type");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_rejected_api_key() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": "API_KEY_INVALID", "message": "An invalid api_key was supplied."}
        })))
        .mount(&server)
        .await;

    let err = client.list(&Context::new(), &ListParams::default(), None).await.unwrap_err();
    assert!(matches!(err, Error::Authentication(ref m) if m.contains("API_KEY_INVALID")), "{err}");
}

#[tokio::test]
async fn test_undecodable_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ndb/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.food_name_search(&Context::new(), "apple").await.unwrap_err();
    assert!(matches!(err, Error::Json(_)), "{err}");
}

#[tokio::test]
async fn test_cancel_in_flight_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_sample())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let ctx = Context::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = client.food_name_search(&ctx, "apple").await.unwrap_err();
    assert!(matches!(err, Error::Cancelled), "{err}");
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_context_deadline() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_sample())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let ctx = Context::new().with_timeout(Duration::from_millis(50));
    let err = client.food_name_search(&ctx, "apple").await.unwrap_err();
    assert!(matches!(err, Error::Timeout), "{err}");
}

#[tokio::test]
async fn test_cancelled_context_sends_nothing() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_sample()))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = Context::new();
    ctx.cancel();
    let err = client.food_name_search(&ctx, "apple").await.unwrap_err();
    assert!(matches!(err, Error::Cancelled), "{err}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/ndb/")
}

#[tokio::test]
async fn test_transport_failure() {
    let client = Client::builder("demo123")
        .base_url(unreachable_base_url())
        .build()
        .unwrap();

    let err = client.food_name_search(&Context::new(), "apple").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)), "{err}");
}

#[tokio::test]
async fn test_injected_http_client_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_sample())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let client = Client::builder("demo123")
        .base_url(format!("{}/ndb/", server.uri()))
        .http_client(http)
        .build()
        .unwrap();

    let err = client.food_name_search(&Context::new(), "apple").await.unwrap_err();
    assert!(matches!(err, Error::Timeout), "{err}");
}

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ndb/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_sample()))
        .expect(2)
        .mount(&server)
        .await;

    let other = client.clone();
    let ctx = Context::new();
    let (a, b) = tokio::join!(
        client.food_name_search(&ctx, "apple"),
        other.food_name_search(&ctx, "pear"),
    );
    assert_eq!(a.unwrap(), b.unwrap());
}
