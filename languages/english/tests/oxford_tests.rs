use lexi_core::{Dictionary, LanguageError};
use lexi_lang_english::OxfordDictionary;
use lexi_types::PartOfSpeech;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dictionary(server: &MockServer) -> OxfordDictionary {
    OxfordDictionary::new(&server.uri(), "app-id".into(), "app-key".into(), "en").unwrap()
}

#[tokio::test]
async fn returns_entries_for_the_requested_category() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/entries/en/ace"))
        .and(query_param("lexicalCategory", "verb"))
        .and(query_param("strictMatch", "false"))
        .and(header("app_id", "app-id"))
        .and(header("app_key", "app-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "metadata": { "provider": "Oxford University Press" },
            "results": [{
                "lexicalEntries": [{
                    "lexicalCategory": { "id": "verb", "text": "Verb" },
                    "entries": [{
                        "senses": [{
                            "definitions": ["achieve high marks in (a test or exam)"],
                            "examples": [{ "text": "I aced my grammar test" }],
                            "registers": [{ "id": "informal", "text": "Informal" }]
                        }]
                    }]
                }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entries = dictionary(&server)
        .define("ace", PartOfSpeech::Verb)
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].definition, "achieve high marks in (a test or exam)");
    assert_eq!(entries[0].part_of_speech, PartOfSpeech::Verb);
    assert_eq!(entries[0].registers, vec!["informal"]);
    assert_eq!(entries[0].examples, vec!["I aced my grammar test"]);
}

#[tokio::test]
async fn unknown_word_has_no_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let entries = dictionary(&server)
        .define("zzxq", PartOfSpeech::Any)
        .await
        .unwrap();

    assert!(entries.is_empty());
}

#[tokio::test]
async fn server_error_is_reported_with_its_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = dictionary(&server)
        .define("ace", PartOfSpeech::Any)
        .await
        .unwrap_err();

    match err {
        LanguageError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = dictionary(&server)
        .define("ace", PartOfSpeech::Any)
        .await
        .unwrap_err();

    assert!(matches!(err, LanguageError::Parse(_)));
}

#[tokio::test]
async fn missing_credentials_skip_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dictionary = OxfordDictionary::new(&server.uri(), String::new(), String::new(), "en").unwrap();
    let err = dictionary.define("ace", PartOfSpeech::Any).await.unwrap_err();

    assert!(matches!(err, LanguageError::Authentication));
}
