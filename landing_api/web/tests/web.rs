use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use landing_api_web::{WebServer, WebServerConfig, REQUEST_ID_HEADER, SESSION_COOKIE};
use landing_core_contact_contracts::{ContactSendMessageError, ContactService};
use landing_core_contact_impl::form::ContactFormConfig;
use landing_models::contact::ContactMessage;
use landing_templates_contracts::SiteInfo;
use landing_templates_impl::TemplateServiceImpl;
use pretty_assertions::assert_eq;
use reqwest::{header, redirect, StatusCode};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Notify};

const ADA: [(&str, &str); 4] = [
    ("name", "Ada"),
    ("email", "ada@example.com"),
    ("company", ""),
    ("message", "Hello"),
];

#[tokio::test]
async fn index() {
    let server = setup(false).await;

    let response = server.client.get(server.url("/")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    assert_eq!(session_cookie(&response), None);
    let html = response.text().await.unwrap();
    assert!(html.contains("We're Under Maintenance"));
    assert!(html.contains("Send Message"));
    assert!(!html.contains("banner-success"));
}

#[tokio::test]
async fn submit_form_success() {
    let server = setup(false).await;
    let cookie = server.start_session().await;

    let response = server
        .client
        .post(server.url("/"))
        .header(header::COOKIE, &cookie)
        .form(&ADA)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert_eq!(server.sent().len(), 1);
    assert_eq!(*server.sent()[0].author.name, "Ada");

    let html = server.page(&cookie).await;
    assert!(html.contains("Thank you for your message! We'll get back to you soon."));
    assert!(html.contains(r#"id="name" name="name" value="""#));
    assert!(html.contains(r#"<meta http-equiv="refresh" content="5" />"#));
}

#[tokio::test]
async fn submit_form_failure_keeps_fields() {
    let server = setup(true).await;
    let cookie = server.start_session().await;

    let response = server
        .client
        .post(server.url("/"))
        .header(header::COOKIE, &cookie)
        .form(&ADA)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let html = server.page(&cookie).await;
    assert!(html.contains("Your message was not sent. Please try again."));
    assert!(html.contains(r#"id="name" name="name" value="Ada""#));
    assert!(html.contains(">Hello</textarea>"));
}

#[tokio::test]
async fn submit_form_missing_field() {
    let server = setup(false).await;

    let response = server
        .client
        .post(server.url("/"))
        .form(&[("name", ""), ("email", "ada@example.com"), ("message", "Hello")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text().await.unwrap();
    assert!(html.contains("Please fill out the name field."));
    assert!(html.contains(r#"value="ada@example.com""#));
    assert!(server.sent().is_empty());
}

#[tokio::test]
async fn api() {
    let server = setup(false).await;
    let cookie = server.start_session().await;

    for (field, value) in ADA {
        let response = server
            .client
            .patch(server.url("/api/contact"))
            .header(header::COOKIE, &cookie)
            .json(&json!({"field": field, "value": value}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let snapshot = server.api_snapshot(&cookie).await;
    assert_eq!(
        snapshot,
        json!({
            "fields": {"name": "Ada", "email": "ada@example.com", "company": "", "message": "Hello"},
            "status": {"state": "idle"},
        })
    );

    let response = server
        .client
        .post(server.url("/api/contact/submit"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "fields": {"name": "", "email": "", "company": "", "message": ""},
            "status": {"state": "succeeded"},
        })
    );
    assert_eq!(server.sent().len(), 1);
}

#[tokio::test]
async fn api_invalid_form() {
    let server = setup(false).await;
    let cookie = server.start_session().await;

    let response = server
        .client
        .post(server.url("/api/contact/submit"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "detail": "Invalid contact form",
            "field": "name",
            "message": "Please fill out the name field.",
        })
    );
    assert!(server.sent().is_empty());
}

#[tokio::test]
async fn api_failure() {
    let server = setup(true).await;
    let cookie = server.start_session().await;
    server.fill_form(&cookie).await;

    let response = server
        .client
        .post(server.url("/api/contact/submit"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.json::<Value>().await.unwrap()["status"],
        json!({"state": "failed", "reason": "rejected"})
    );
    assert_eq!(server.api_snapshot(&cookie).await["fields"]["name"], "Ada");
}

#[tokio::test]
async fn sessions_are_separate() {
    let server = setup(false).await;
    let alice = server.start_session().await;
    let bob = server.start_session().await;

    server
        .client
        .patch(server.url("/api/contact"))
        .header(header::COOKIE, &alice)
        .json(&json!({"field": "name", "value": "Alice"}))
        .send()
        .await
        .unwrap();

    assert_eq!(server.api_snapshot(&alice).await["fields"]["name"], "Alice");
    assert_eq!(server.api_snapshot(&bob).await["fields"]["name"], "");
}

#[tokio::test]
async fn reading_does_not_start_session() {
    let server = setup(false).await;

    let response = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(session_cookie(&response), None);

    let response = server
        .client
        .get(server.url("/api/contact"))
        .send()
        .await
        .unwrap();
    assert_eq!(session_cookie(&response), None);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({
            "fields": {"name": "", "email": "", "company": "", "message": ""},
            "status": {"state": "idle"},
        })
    );

    let response = server
        .client
        .patch(server.url("/api/contact"))
        .json(&json!({"field": "name", "value": "Ada"}))
        .send()
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
}

#[tokio::test]
async fn submit_while_sending_conflicts() {
    let hold = Arc::new(Notify::new());
    let server = setup_with(false, Some(Arc::clone(&hold))).await;
    let cookie = server.start_session().await;
    server.fill_form(&cookie).await;

    let first = tokio::spawn({
        let request = server
            .client
            .post(server.url("/api/contact/submit"))
            .header(header::COOKIE, &cookie);
        async move { request.send().await.unwrap() }
    });
    while server.api_snapshot(&cookie).await["status"]["state"] != "submitting" {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let response = server
        .client
        .post(server.url("/api/contact/submit"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"detail": "Already submitting"})
    );

    let response = server
        .client
        .post(server.url("/"))
        .header(header::COOKIE, &cookie)
        .form(&ADA)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let html = response.text().await.unwrap();
    assert!(html.contains("A message is already being sent."));
    assert!(html.contains("Sending..."));

    hold.notify_one();
    let response = first.await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap()["status"],
        json!({"state": "succeeded"})
    );
    assert_eq!(server.sent().len(), 1);
}

#[tokio::test]
async fn health_and_assets() {
    let server = setup(false).await;

    let response = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"http": true}));

    let response = server
        .client
        .get(server.url("/assets/style.css"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/css; charset=utf-8"
    );

    let response = server
        .client
        .get(server.url("/assets/logo.svg"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
}

#[derive(Debug, Clone)]
struct FakeContact {
    sent: Arc<Mutex<Vec<ContactMessage>>>,
    fail: bool,
    /// Holds every send until notified.
    hold: Option<Arc<Notify>>,
}

impl ContactService for FakeContact {
    async fn send_message(&self, message: ContactMessage) -> Result<(), ContactSendMessageError> {
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        if self.fail {
            return Err(ContactSendMessageError::Send);
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    sent: Arc<Mutex<Vec<ContactMessage>>>,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().unwrap().clone()
    }

    async fn start_session(&self) -> String {
        let response = self
            .client
            .patch(self.url("/api/contact"))
            .json(&json!({"field": "company", "value": ""}))
            .send()
            .await
            .unwrap();
        session_cookie(&response).unwrap()
    }

    async fn fill_form(&self, cookie: &str) {
        for (field, value) in ADA {
            self.client
                .patch(self.url("/api/contact"))
                .header(header::COOKIE, cookie)
                .json(&json!({"field": field, "value": value}))
                .send()
                .await
                .unwrap()
                .error_for_status()
                .unwrap();
        }
    }

    async fn page(&self, cookie: &str) -> String {
        self.client
            .get(self.url("/"))
            .header(header::COOKIE, cookie)
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    async fn api_snapshot(&self, cookie: &str) -> Value {
        self.client
            .get(self.url("/api/contact"))
            .header(header::COOKIE, cookie)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|cookie| cookie.starts_with(SESSION_COOKIE))
        .map(Into::into)
}

async fn setup(fail: bool) -> TestServer {
    setup_with(fail, None).await
}

async fn setup_with(fail: bool, hold: Option<Arc<Notify>>) -> TestServer {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let contact = FakeContact {
        sent: Arc::clone(&sent),
        fail,
        hold,
    };
    let config = WebServerConfig {
        site: SiteInfo {
            company: "VisionLab Technologies".into(),
            email: "contact@visionlab.ae".into(),
            phone: "+251963978798".into(),
            phone_display: "+251 963978798".into(),
            location: "Addis Ababa, Ethiopia".into(),
        },
        form: ContactFormConfig {
            banner_duration: Duration::from_secs(5),
        },
        session_ttl: Duration::from_secs(3600),
        session_capacity: 100,
    };
    let server = WebServer::new(contact, TemplateServiceImpl::new().unwrap(), config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve_listener(listener));

    TestServer {
        addr,
        client: reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap(),
        sent,
    }
}
