use crate::{GhIssuesWorld, MockGitHub};
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use ghissues::config::EnvVars;
use ghissues::run::Outcome;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Port 1 refuses connections; used when a scenario mounts no mock server.
const UNREACHABLE_API: &str = "http://127.0.0.1:1";
const MISSING_EDITOR: &str = "ghissues-acceptance-missing-editor";

async fn server(world: &mut GhIssuesWorld) -> &MockServer {
    if world.server.is_none() {
        world.server = Some(MockGitHub(MockServer::start().await));
    }
    &world
        .server
        .as_ref()
        .expect("mock server was just started")
        .0
}

async fn received_requests(world: &GhIssuesWorld) -> Vec<wiremock::Request> {
    match &world.server {
        Some(server) => server
            .0
            .received_requests()
            .await
            .expect("request recording is enabled by default"),
        None => Vec::new(),
    }
}

fn output(world: &GhIssuesWorld) -> String {
    String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8")
}

fn docstring(step: &Step) -> String {
    step.docstring
        .as_ref()
        .expect("Expected a docstring")
        .trim()
        .to_string()
}

fn write_editor(world: &mut GhIssuesWorld, body: &str) {
    let dir = tempfile::tempdir().expect("Failed to create editor dir");
    let script = dir.path().join("editor.sh");
    std::fs::write(&script, format!("{body}\n")).expect("Failed to write editor script");
    let quoted = shlex::try_quote(&script.to_string_lossy())
        .expect("editor path is quotable")
        .into_owned();
    world.editor = Some(format!("sh {quoted}"));
    world.editor_dir = Some(dir);
}

#[given(regex = r#"^the GitHub API answers (GET|POST|PATCH) "([^"]*)" with status (\d+)$"#)]
async fn given_api_answers(world: &mut GhIssuesWorld, verb: String, route: String, status: u16) {
    let server = server(world).await;
    Mock::given(method(verb.as_str()))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[given(regex = r#"^the GitHub API answers (GET|POST|PATCH) "([^"]*)" with status (\d+) and body:$"#)]
async fn given_api_answers_with_body(
    world: &mut GhIssuesWorld,
    verb: String,
    route: String,
    status: u16,
    step: &Step,
) {
    let body = docstring(step);
    let server = server(world).await;
    Mock::given(method(verb.as_str()))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

#[given("an editor that saves:")]
async fn given_editor_that_saves(world: &mut GhIssuesWorld, step: &Step) {
    let content = docstring(step);
    let quoted = shlex::try_quote(&content)
        .expect("content is quotable")
        .into_owned();
    write_editor(world, &format!("printf '%s' {quoted} > \"$1\""));
}

#[given("an editor that saves nothing")]
async fn given_editor_that_saves_nothing(world: &mut GhIssuesWorld) {
    write_editor(world, "true");
}

#[given(regex = r"^an editor that exits with status (\d+)$")]
async fn given_editor_that_fails(world: &mut GhIssuesWorld, status: u8) {
    write_editor(world, &format!("exit {status}"));
}

#[when(regex = r"^I run `ghissues(.*)`$")]
async fn when_run_ghissues(world: &mut GhIssuesWorld, command_line: String) {
    let mut args = vec!["ghissues".to_string()];
    args.extend(shlex::split(&command_line).expect("Invalid command line in scenario"));

    let env = EnvVars {
        editor: Some(
            world
                .editor
                .clone()
                .unwrap_or_else(|| MISSING_EDITOR.to_string()),
        ),
        api_url: Some(
            world
                .server
                .as_ref()
                .map_or_else(|| UNREACHABLE_API.to_string(), |server| server.0.uri()),
        ),
    };

    let mut buffer: Vec<u8> = Vec::new();
    let writer_option: Option<&mut dyn std::io::Write> = Some(&mut buffer);
    let outcome = ghissues::run::run(args, writer_option, &env)
        .await
        .expect("writing output should not fail");

    world.captured_output = buffer;
    world.outcome = Some(outcome);
}

#[then(regex = r#"^the output should contain "(.*)"$"#)]
async fn then_output_should_contain(world: &mut GhIssuesWorld, expected: String) {
    let output = output(world);
    assert!(
        output.contains(&expected),
        "Expected '{}' in output:\n---\n{}\n---",
        expected,
        output
    );
}

#[then(regex = r#"^the output should not contain "(.*)"$"#)]
async fn then_output_should_not_contain(world: &mut GhIssuesWorld, unexpected: String) {
    let output = output(world);
    assert!(
        !output.contains(&unexpected),
        "Did not expect '{}' in output:\n---\n{}\n---",
        unexpected,
        output
    );
}

#[then("the output should be:")]
async fn then_output_should_be(world: &mut GhIssuesWorld, step: &Step) {
    let expected = docstring(step);
    let output = output(world);
    assert_eq!(
        output.trim_end(),
        expected,
        "Expected output '{}', but got:\n---\n{}\n---",
        expected,
        output.trim_end()
    );
}

#[then(regex = r"^the exit status should be (\d+)$")]
async fn then_exit_status_should_be(world: &mut GhIssuesWorld, expected: u8) {
    let code = match world.outcome.expect("the command was not run") {
        Outcome::Completed => 0,
        Outcome::MissingSubcommand => 1,
        Outcome::UsageError => 2,
    };
    assert_eq!(code, expected);
}

#[then("no request should have been sent")]
async fn then_no_request(world: &mut GhIssuesWorld) {
    let requests = received_requests(world).await;
    assert!(
        requests.is_empty(),
        "Expected no requests, got {}",
        requests.len()
    );
}

#[then(regex = r"^(\d+) requests? should have been sent$")]
async fn then_request_count(world: &mut GhIssuesWorld, expected: usize) {
    assert_eq!(received_requests(world).await.len(), expected);
}

#[then(regex = r#"^the last request should carry "([^"]*)" header "(.*)"$"#)]
async fn then_last_request_header(world: &mut GhIssuesWorld, name: String, value: String) {
    let requests = received_requests(world).await;
    let request = requests.last().expect("no request was sent");
    let actual = request
        .headers
        .get(name.as_str())
        .unwrap_or_else(|| panic!("header {name} missing"))
        .to_str()
        .expect("header is ASCII");
    assert_eq!(actual, value);
}

#[then(regex = r#"^the last request should not carry a "([^"]*)" header$"#)]
async fn then_last_request_without_header(world: &mut GhIssuesWorld, name: String) {
    let requests = received_requests(world).await;
    let request = requests.last().expect("no request was sent");
    assert!(request.headers.get(name.as_str()).is_none());
}

#[then("the last request body should be:")]
async fn then_last_request_body(world: &mut GhIssuesWorld, step: &Step) {
    let expected: serde_json::Value =
        serde_json::from_str(&docstring(step)).expect("Expected JSON docstring");
    let requests = received_requests(world).await;
    let request = requests.last().expect("no request was sent");
    let actual: serde_json::Value =
        serde_json::from_slice(&request.body).expect("request body is JSON");
    assert_eq!(actual, expected);
}
