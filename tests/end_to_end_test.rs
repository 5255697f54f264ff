//! End-to-end orchestration tests
//!
//! The LLM is scripted with `MockLLMClient`. Tools are either counting stubs or
//! the real weather and attraction tools pointed at mockito servers.

use async_trait::async_trait;
use genai::adapter::AdapterKind;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use tripbrief::config::{ApiKey, ConfigError, TravelConfig};
use tripbrief::llm::{LLMClient, MockLLMClient, MockResponse};
use tripbrief::pipeline::{
    read_trace, trace_file_name, write_trace, AgentConfig, AgentError, AgentExecutor,
    PromptTemplate, TravelOrchestrator,
};
use tripbrief::progress::NoOpHandler;
use tripbrief::tools::{Tool, ToolError, ToolRegistry};

struct CountingTool {
    name: &'static str,
    result: Result<Value, fn() -> ToolError>,
    calls: AtomicUsize,
    arguments: std::sync::Mutex<Vec<Value>>,
}

impl CountingTool {
    fn ok(name: &'static str, output: Value) -> Arc<Self> {
        Arc::new(Self {
            name,
            result: Ok(output),
            calls: AtomicUsize::new(0),
            arguments: std::sync::Mutex::new(Vec::new()),
        })
    }

    fn failing(name: &'static str, error: fn() -> ToolError) -> Arc<Self> {
        Arc::new(Self {
            name,
            result: Err(error),
            calls: AtomicUsize::new(0),
            arguments: std::sync::Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for CountingTool {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "counting stub"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"destination": {"type": "string"}},
            "required": ["destination"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.arguments.lock().unwrap().push(arguments);
        match &self.result {
            Ok(value) => Ok(value.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

fn sunny_report(destination: &str) -> Value {
    let forecast: Vec<Value> = (1..=7)
        .map(|day| {
            json!({
                "date": format!("2024-06-{:02}", day),
                "maxtemp_c": 26.0,
                "mintemp_c": 16.0,
                "daily_chance_of_rain": 0,
                "condition": "Sunny"
            })
        })
        .collect();

    json!({
        "location": {
            "name": destination,
            "region": "",
            "country": "France",
            "localtime": "2024-06-01 14:00",
            "lat": 48.87,
            "lon": 2.33
        },
        "current": {
            "condition": "Sunny",
            "temp_c": 25.0,
            "feelslike_c": 26.0,
            "wind_kph": 8.0,
            "humidity": 45.0,
            "cloud": 0.0
        },
        "forecast": forecast
    })
}

fn landmarks(destination: &str) -> Value {
    let names = [
        "Eiffel Tower",
        "Louvre Museum",
        "Notre-Dame Cathedral",
        "Musée d'Orsay",
        "Sacré-Cœur",
    ];
    let results: Vec<Value> = names
        .iter()
        .map(|name| json!({"title": name, "snippet": format!("{} is a must-see.", name), "link": "https://example.com"}))
        .collect();

    json!({
        "destination": destination,
        "query": format!("top attractions in {}", destination),
        "results": results
    })
}

fn script_both_tools(llm: &MockLLMClient, destination: &str, summary: &str) {
    llm.add_responses(vec![
        MockResponse::with_tool_calls(
            "",
            vec![
                MockLLMClient::weather_call("call_weather", destination),
                MockLLMClient::attractions_call("call_attractions", destination),
            ],
        ),
        MockResponse::text(summary),
    ]);
}

fn orchestrator(
    llm: Arc<MockLLMClient>,
    weather: Arc<CountingTool>,
    attractions: Arc<CountingTool>,
) -> TravelOrchestrator {
    let registry = ToolRegistry::new(vec![weather as Arc<dyn Tool>, attractions as Arc<dyn Tool>]);
    TravelOrchestrator::new(AgentExecutor::new(
        llm,
        registry,
        PromptTemplate::default(),
        AgentConfig::default(),
    ))
}

/// Same sequence the binary follows: run, then persist only on success
async fn brief_and_save(
    orchestrator: &TravelOrchestrator,
    destination: &str,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let report = orchestrator.run(destination).await?;
    Ok(write_trace(output_dir, &report.destination, &report.trace)?)
}

fn dir_is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().next().is_none()
}

#[tokio::test]
async fn test_each_tool_called_once_with_destination() {
    for destination in ["Paris", "San Francisco", "Tokyo", "Reykjavík"] {
        let llm = Arc::new(MockLLMClient::new());
        let weather = CountingTool::ok("get_weather", sunny_report(destination));
        let attractions = CountingTool::ok("search_attractions", landmarks(destination));
        script_both_tools(&llm, destination, "Enjoy your trip.");

        let report = orchestrator(llm, weather.clone(), attractions.clone())
            .run(destination)
            .await
            .unwrap();

        assert_eq!(weather.calls(), 1, "{}", destination);
        assert_eq!(attractions.calls(), 1, "{}", destination);
        assert_eq!(
            weather.arguments.lock().unwrap()[0],
            json!({"destination": destination})
        );
        assert_eq!(
            attractions.arguments.lock().unwrap()[0],
            json!({"destination": destination})
        );
        assert!(!report.summary.is_empty());
    }
}

#[tokio::test]
async fn test_weather_failure_aborts_without_output_file() {
    let dir = TempDir::new().unwrap();
    let llm = Arc::new(MockLLMClient::new());
    let weather = CountingTool::failing("get_weather", || ToolError::Provider {
        provider: "WeatherAPI".to_string(),
        status_code: Some(502),
        message: "Bad gateway".to_string(),
    });
    let attractions = CountingTool::ok("search_attractions", landmarks("Paris"));
    script_both_tools(&llm, "Paris", "should never be produced");

    let orchestrator = orchestrator(llm, weather, attractions);
    let err = brief_and_save(&orchestrator, "Paris", dir.path())
        .await
        .unwrap_err();

    let agent_error = err.downcast_ref::<AgentError>().unwrap();
    assert!(matches!(
        agent_error,
        AgentError::Tool { tool, source: ToolError::Provider { .. } } if tool == "get_weather"
    ));
    assert!(dir_is_empty(&dir));
}

#[tokio::test]
async fn test_unknown_location_aborts() {
    let llm = Arc::new(MockLLMClient::new());
    let weather = CountingTool::failing("get_weather", || ToolError::NotFound {
        location: "Atlantis".to_string(),
    });
    let attractions = CountingTool::ok("search_attractions", landmarks("Atlantis"));
    script_both_tools(&llm, "Atlantis", "unreachable");

    let err = orchestrator(llm, weather, attractions)
        .run("Atlantis")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AgentError::Tool {
            source: ToolError::NotFound { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_empty_attractions_still_summarized() {
    let llm = Arc::new(MockLLMClient::new());
    let weather = CountingTool::ok("get_weather", sunny_report("Nowhere"));
    let attractions = CountingTool::ok(
        "search_attractions",
        json!({"destination": "Nowhere", "query": "top attractions in Nowhere", "results": []}),
    );
    script_both_tools(&llm, "Nowhere", "Sunny. No attractions were found, so enjoy a walk.");

    let report = orchestrator(llm, weather, attractions)
        .run("Nowhere")
        .await
        .unwrap();

    assert_eq!(
        report.summary,
        "Sunny. No attractions were found, so enjoy a walk."
    );
    assert_eq!(report.trace.intermediate_steps.len(), 2);
    assert_eq!(report.trace.intermediate_steps[1].output["results"], json!([]));
}

#[tokio::test]
async fn test_missing_credentials_fail_before_any_call() {
    let mut weather_server = mockito::Server::new_async().await;
    let mut search_server = mockito::Server::new_async().await;
    let weather_mock = weather_server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let search_mock = search_server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = TravelConfig {
        llm_api_key: Some(ApiKey::new("gemini-key")),
        weather_api_key: None,
        weather_base_url: weather_server.url(),
        search_base_url: search_server.url(),
        ..TravelConfig::for_provider(AdapterKind::Gemini)
    };
    let llm = Arc::new(MockLLMClient::new());

    let result: anyhow::Result<()> = async {
        config.validate()?;
        let orchestrator =
            TravelOrchestrator::from_config(&config, llm.clone(), Arc::new(NoOpHandler))?;
        orchestrator.run("Paris").await?;
        Ok(())
    }
    .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingCredential(var)) if var == "WEATHER_API_KEY"
    ));
    assert!(llm.requests().is_empty());
    weather_mock.assert_async().await;
    search_mock.assert_async().await;
}

#[tokio::test]
async fn test_trace_file_for_paris() {
    let dir = TempDir::new().unwrap();
    let llm = Arc::new(MockLLMClient::new());
    let weather = CountingTool::ok("get_weather", sunny_report("Paris"));
    let attractions = CountingTool::ok("search_attractions", landmarks("Paris"));
    script_both_tools(&llm, "Paris", "Sunny and 25°C. Start at the Eiffel Tower.");

    let orchestrator = orchestrator(llm, weather, attractions);
    let path = brief_and_save(&orchestrator, "Paris", dir.path()).await.unwrap();

    assert_eq!(trace_file_name("Paris"), "travel_assistant_output_Paris.json");
    assert_eq!(path, dir.path().join("travel_assistant_output_Paris.json"));

    let trace = read_trace(&path).unwrap();
    assert_eq!(trace.output, "Sunny and 25°C. Start at the Eiffel Tower.");
    assert_eq!(trace.calls_to("get_weather"), 1);
    assert_eq!(trace.calls_to("search_attractions"), 1);
    assert_eq!(trace.intermediate_steps[0].output["current"]["temp_c"], 25.0);
}

fn weatherapi_body() -> String {
    let days: Vec<Value> = (1..=7)
        .map(|day| {
            json!({
                "date": format!("2024-06-{:02}", day),
                "day": {
                    "maxtemp_c": 26.0,
                    "mintemp_c": 16.0,
                    "daily_chance_of_rain": 0,
                    "condition": {"text": "Sunny"}
                }
            })
        })
        .collect();

    json!({
        "location": {
            "name": "Paris",
            "region": "Ile-de-France",
            "country": "France",
            "lat": 48.87,
            "lon": 2.33,
            "localtime": "2024-06-01 14:00"
        },
        "current": {
            "temp_c": 25.0,
            "feelslike_c": 26.0,
            "wind_kph": 8.0,
            "humidity": 45,
            "cloud": 0,
            "condition": {"text": "Sunny"}
        },
        "forecast": {"forecastday": days}
    })
    .to_string()
}

fn duckduckgo_page() -> String {
    let results: String = [
        ("Eiffel Tower", "https://www.toureiffel.paris/en"),
        ("Louvre Museum", "https://www.louvre.fr/en"),
        ("Notre-Dame Cathedral", "https://www.notredamedeparis.fr/en/"),
        ("Musée d'Orsay", "https://www.musee-orsay.fr/en"),
        ("Sacré-Cœur", "https://www.sacre-coeur-montmartre.com/english/"),
    ]
    .iter()
    .map(|(title, link)| {
        format!(
            r#"<div class="result results_links web-result">
                 <a class="result__a" href="{link}">{title}</a>
                 <a class="result__snippet" href="{link}">{title} in Paris.</a>
               </div>"#
        )
    })
    .collect();

    format!("<html><body>{}</body></html>", results)
}

#[tokio::test]
async fn test_paris_end_to_end_with_http_providers() {
    let dir = TempDir::new().unwrap();
    let mut weather_server = mockito::Server::new_async().await;
    let mut search_server = mockito::Server::new_async().await;

    let weather_mock = weather_server
        .mock("GET", "/forecast.json")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("q".into(), "Paris".into()),
            mockito::Matcher::UrlEncoded("days".into(), "7".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(weatherapi_body())
        .expect(1)
        .create_async()
        .await;
    let search_mock = search_server
        .mock("GET", "/html/")
        .match_query(mockito::Matcher::UrlEncoded(
            "q".into(),
            "top attractions in Paris".into(),
        ))
        .with_status(200)
        .with_body(duckduckgo_page())
        .expect(1)
        .create_async()
        .await;

    let config = TravelConfig {
        llm_api_key: Some(ApiKey::new("gemini-key")),
        weather_api_key: Some(ApiKey::new("weather-key")),
        weather_base_url: weather_server.url(),
        search_base_url: search_server.url(),
        output_dir: dir.path().to_path_buf(),
        ..TravelConfig::for_provider(AdapterKind::Gemini)
    };
    config.validate().unwrap();

    let llm = Arc::new(MockLLMClient::new());
    script_both_tools(
        &llm,
        "Paris",
        "It's sunny and 25°C, so pack light layers. Visit the Eiffel Tower, the Louvre and Musée d'Orsay.",
    );

    let orchestrator =
        TravelOrchestrator::from_config(&config, llm.clone() as Arc<dyn LLMClient>, Arc::new(NoOpHandler))
            .unwrap();
    let path = brief_and_save(&orchestrator, "Paris", &config.output_dir)
        .await
        .unwrap();

    weather_mock.assert_async().await;
    search_mock.assert_async().await;

    let trace = read_trace(&path).unwrap();
    assert!(!trace.output.is_empty());
    assert_eq!(trace.intermediate_steps.len(), 2);

    let weather = &trace.intermediate_steps[0].output;
    assert_eq!(weather["current"]["condition"], "Sunny");
    assert_eq!(weather["forecast"].as_array().unwrap().len(), 7);

    let attractions = &trace.intermediate_steps[1].output;
    assert_eq!(attractions["results"].as_array().unwrap().len(), 5);
    assert_eq!(attractions["results"][0]["title"], "Eiffel Tower");

    let final_request = llm.requests().pop().unwrap();
    let tool_messages = final_request
        .messages
        .iter()
        .filter(|m| m.tool_call_id.is_some())
        .count();
    assert_eq!(tool_messages, 2);
}
