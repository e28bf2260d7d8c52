use datalayer::authentication::{Credentials, HostedAuth, MockAuth};
use datalayer::conf::{EnvConf, HostedConf};
use datalayer::store::{HostedClient, HostedStore, MockStore};
use interfacing::{ArticleCategory, NewArticle, NewComment};
use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::sync::Arc;
use uuid::Uuid;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        datalayer::trace::TracingSubscriber::new()
            .pretty(true)
            .set_global_default();
    }
});

pub fn conf() -> EnvConf {
    Lazy::force(&TRACING);
    EnvConf::test_default()
}

pub fn mock_store() -> MockStore {
    MockStore::new(&conf().mock)
}

pub fn empty_store() -> MockStore {
    MockStore::unseeded(&conf().mock)
}

pub fn mock_auth() -> MockAuth {
    MockAuth::new(&conf().mock).unwrap()
}

pub fn empty_auth() -> MockAuth {
    MockAuth::unseeded(&conf().mock).unwrap()
}

pub fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.into(),
        password: SecretString::new(password.into()),
    }
}

pub fn unique_username() -> String {
    format!("reader_{}", Uuid::new_v4().simple())
}

pub fn draft_article(title: &str) -> NewArticle {
    NewArticle {
        title: title.into(),
        summary: "A condensed take for the card list.".into(),
        content: "## Body\n\nLong form text.".into(),
        category: ArticleCategory::Article,
        cover_image: "https://images.example.com/cover.jpg".into(),
        author: "Test Author".into(),
    }
}

pub fn draft_comment(article_id: &str, content: &str) -> NewComment {
    NewComment {
        article_id: article_id.into(),
        nickname: "reader".into(),
        content: content.into(),
    }
}

pub struct HostedApp {
    pub server: MockServer,
    pub store: HostedStore,
    pub auth: HostedAuth,
}

/// Hosted backend pointed at a local wiremock server.
pub async fn spawn_hosted() -> HostedApp {
    Lazy::force(&TRACING);

    let server = MockServer::start().await;
    let conf = HostedConf {
        base_url: server.uri(),
        api_key: SecretString::new("test-api-key".into()),
        timeout_ms: 2_000,
    };
    let client = Arc::new(HostedClient::new(&conf).unwrap());

    HostedApp {
        server,
        store: HostedStore::new(client.clone()),
        auth: HostedAuth::new(client),
    }
}
