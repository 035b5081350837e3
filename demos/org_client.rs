use std::collections::HashMap;

use gatherwait::{Error, FetchJson, GithubOrgClient};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

struct InMemory(HashMap<&'static str, Value>);

impl FetchJson for InMemory {
    fn get_json(&self, url: &str) -> gatherwait::Result<Value> {
        self.0.get(url).cloned().ok_or_else(|| Error::Http {
            url: url.to_owned(),
            reason: "404 Not Found".to_owned(),
        })
    }
}

fn main() -> gatherwait::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let source = InMemory(HashMap::from([
        (
            "https://api.github.com/orgs/google",
            json!({"repos_url": "https://api.github.com/orgs/google/repos"}),
        ),
        (
            "https://api.github.com/orgs/google/repos",
            json!([
                {"name": "dagger", "license": {"key": "apache-2.0"}},
                {"name": "cpp-netlib", "license": {"key": "bsl-1.0"}},
                {"name": "kratu", "license": {"key": "apache-2.0"}},
                {"name": "google.github.io"}
            ]),
        ),
    ]));

    let client = GithubOrgClient::new("google", source);
    println!("All repositories: {:?}", client.public_repos(None)?);
    println!("Apache 2.0: {:?}", client.public_repos(Some("apache-2.0"))?);

    let missing = GithubOrgClient::new("nobody", InMemory(HashMap::new()));
    if let Err(e) = missing.public_repos(None) {
        println!("Unknown organisation: {e}");
    }
    Ok(())
}
