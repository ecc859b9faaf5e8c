//! In-memory GitHub API and virtual clock shared by integration tests.

#![allow(dead_code)]

use app_repo_matcher::host::{Headers, HostError, RawResponse, Transport};
use app_repo_matcher::rate_limit::{Clock, ResourceClass};
use app_repo_matcher::repository::RepoMetadataService;
use app_repo_matcher::GithubClient;
use futures::future::BoxFuture;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Absolute prefix used in generated pagination links.
pub const API_ROOT: &str = "https://api.github.com";

/// Clock whose `sleep` advances time instantly.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Arc<AtomicU64>,
    sleeps: Arc<Mutex<Vec<u64>>>,
}

impl VirtualClock {
    pub fn at(now: u64) -> Self {
        let clock = Self::default();
        clock.now.store(now, Ordering::SeqCst);
        clock
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Every sleep so far, in seconds.
    pub fn sleeps(&self) -> Vec<u64> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn total_slept(&self) -> u64 {
        self.sleeps().iter().sum()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
        self.sleeps.lock().unwrap().push(secs);
        self.advance(secs);
        Box::pin(futures::future::ready(()))
    }
}

#[derive(Debug, Clone, Copy)]
struct Quota {
    limit: u32,
    used: u32,
    window_secs: u64,
    reset: u64,
}

impl Quota {
    fn roll(&mut self, now: u64) {
        if now >= self.reset {
            self.used = 0;
            self.reset = now + self.window_secs;
        }
    }

    fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }
}

#[derive(Debug, Clone)]
struct Route {
    status: u16,
    body: String,
    link: Option<String>,
}

#[derive(Debug)]
struct HostState {
    routes: HashMap<String, Route>,
    quotas: HashMap<ResourceClass, Quota>,
    rate_headers: bool,
    violations: usize,
    requests: Vec<String>,
}

/// Fake GitHub API enforcing per-class quotas with fixed windows.
///
/// Unknown URLs answer 404. Requests made while a quota is exhausted are
/// counted as violations and answered with 403.
#[derive(Debug, Clone)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
    clock: VirtualClock,
}

impl FakeHost {
    /// Creates a host where every class allows `limit` requests per `window_secs`.
    pub fn new(clock: VirtualClock, limit: u32, window_secs: u64) -> Self {
        let now = clock.now();
        let quotas = ResourceClass::ALL
            .iter()
            .map(|class| {
                (
                    *class,
                    Quota {
                        limit,
                        used: 0,
                        window_secs,
                        reset: now + window_secs,
                    },
                )
            })
            .collect();

        Self {
            state: Arc::new(Mutex::new(HostState {
                routes: HashMap::new(),
                quotas,
                rate_headers: true,
                violations: 0,
                requests: Vec::new(),
            })),
            clock,
        }
    }

    /// A host with a quota large enough to never matter.
    pub fn unlimited(clock: VirtualClock) -> Self {
        Self::new(clock, 1_000_000, 3600)
    }

    /// Stops sending `X-RateLimit-*` headers on ordinary responses.
    pub fn without_rate_headers(self) -> Self {
        self.state.lock().unwrap().rate_headers = false;
        self
    }

    pub fn route(&self, url: &str, status: u16, body: Value) {
        self.route_with_link(url, status, body, None);
    }

    pub fn route_with_link(&self, url: &str, status: u16, body: Value, link: Option<String>) {
        self.state.lock().unwrap().routes.insert(
            url.to_string(),
            Route {
                status,
                body: body.to_string(),
                link,
            },
        );
    }

    /// Registers a repository document under `/repos/<full_name>`.
    pub fn add_repo(&self, repo: Value) {
        let full_name = repo["full_name"].as_str().unwrap().to_string();
        self.add_repo_at(&full_name, repo);
    }

    /// Registers a repository document under another name, as after a rename.
    pub fn add_repo_at(&self, requested: &str, repo: Value) {
        self.route(&format!("/repos/{requested}"), 200, repo);
    }

    /// Registers `total` commits of `branch`, paginated `per_page` at a time.
    pub fn add_commits(&self, full_name: &str, branch: &str, per_page: u32, total: u64) {
        let per_page_u64 = u64::from(per_page);
        let pages = total.div_ceil(per_page_u64).max(1);
        let base = format!("/repos/{full_name}/commits?sha={branch}&per_page={per_page}");
        let page_url = |page: u64| {
            if page == 1 {
                base.clone()
            } else {
                format!("{base}&page={page}")
            }
        };

        for page in 1..=pages {
            let first = (page - 1) * per_page_u64;
            let count = total.saturating_sub(first).min(per_page_u64);
            let items: Vec<Value> = (first..first + count)
                .map(|n| json!({ "sha": format!("{n:040x}") }))
                .collect();

            let mut rels = Vec::new();
            if page < pages {
                rels.push(format!("<{API_ROOT}{}&page={}>; rel=\"next\"", base, page + 1));
                rels.push(format!("<{API_ROOT}{}&page={}>; rel=\"last\"", base, pages));
            }
            if page > 1 {
                rels.push(format!("<{API_ROOT}{}&page={}>; rel=\"prev\"", base, page - 1));
                rels.push(format!("<{API_ROOT}{}&page=1>; rel=\"first\"", base));
            }
            let link = (!rels.is_empty()).then(|| rels.join(", "));

            self.route_with_link(&page_url(page), 200, Value::Array(items), link);
        }
    }

    pub fn violations(&self) -> usize {
        self.state.lock().unwrap().violations
    }

    /// Every URL requested so far, normalized to a path, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests other than quota queries.
    pub fn api_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|url| url.as_str() != "/rate_limit")
            .count()
    }

    pub fn quota_queries(&self) -> usize {
        self.requests()
            .iter()
            .filter(|url| url.as_str() == "/rate_limit")
            .count()
    }

    fn respond(&self, url: &str) -> RawResponse {
        let path = url.strip_prefix(API_ROOT).unwrap_or(url).to_string();
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap();
        state.requests.push(path.clone());

        for quota in state.quotas.values_mut() {
            quota.roll(now);
        }

        if path == "/rate_limit" {
            let resources: serde_json::Map<String, Value> = state
                .quotas
                .iter()
                .map(|(class, quota)| {
                    (
                        class.as_str().to_string(),
                        json!({
                            "limit": quota.limit,
                            "used": quota.used,
                            "remaining": quota.remaining(),
                            "reset": quota.reset,
                        }),
                    )
                })
                .collect();
            let rate = resources[ResourceClass::Core.as_str()].clone();
            return RawResponse {
                status: 200,
                headers: Headers::default(),
                body: json!({ "resources": resources, "rate": rate }).to_string(),
            };
        }

        let class = if path.starts_with("/search/") {
            ResourceClass::Search
        } else {
            ResourceClass::Core
        };

        let rate_headers = state.rate_headers;
        let exhausted = {
            let quota = state.quotas.get_mut(&class).unwrap();
            if quota.remaining() == 0 {
                true
            } else {
                quota.used += 1;
                false
            }
        };
        let quota = state.quotas[&class];

        let mut headers = Headers::default();
        if rate_headers {
            headers.insert("X-RateLimit-Limit", quota.limit.to_string());
            headers.insert("X-RateLimit-Remaining", quota.remaining().to_string());
            headers.insert("X-RateLimit-Reset", quota.reset.to_string());
            headers.insert("X-RateLimit-Resource", class.as_str());
        }

        if exhausted {
            state.violations += 1;
            return RawResponse {
                status: 403,
                headers,
                body: json!({ "message": "API rate limit exceeded" }).to_string(),
            };
        }

        match state.routes.get(&path) {
            Some(route) => {
                if let Some(link) = &route.link {
                    headers.insert("Link", link.clone());
                }
                RawResponse {
                    status: route.status,
                    headers,
                    body: route.body.clone(),
                }
            }
            None => RawResponse {
                status: 404,
                headers,
                body: json!({ "message": "Not Found" }).to_string(),
            },
        }
    }
}

impl Transport for FakeHost {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<RawResponse, HostError>> {
        Box::pin(futures::future::ready(Ok(self.respond(url))))
    }
}

/// A user document with every field the repository decoder requires.
pub fn owner_json(login: &str) -> Value {
    let url = format!("{API_ROOT}/users/{login}");
    json!({
        "login": login,
        "id": 7,
        "node_id": "U_7",
        "avatar_url": "https://avatars.githubusercontent.com/u/7",
        "gravatar_id": "",
        "url": url,
        "html_url": format!("https://github.com/{login}"),
        "followers_url": format!("{url}/followers"),
        "following_url": format!("{url}/following"),
        "gists_url": format!("{url}/gists"),
        "starred_url": format!("{url}/starred"),
        "subscriptions_url": format!("{url}/subscriptions"),
        "organizations_url": format!("{url}/orgs"),
        "repos_url": format!("{url}/repos"),
        "events_url": format!("{url}/events"),
        "received_events_url": format!("{url}/received_events"),
        "type": "User",
        "site_admin": false
    })
}

/// A repository document as `/repos/{owner}/{name}` returns it.
pub fn repo_json(full_name: &str, forks: u64, watchers: u64, subscribers: u64) -> Value {
    let (owner, name) = full_name.split_once('/').unwrap();
    json!({
        "id": 1000 + forks,
        "name": name,
        "full_name": full_name,
        "url": format!("{API_ROOT}/repos/{full_name}"),
        "description": format!("{name} app"),
        "fork": false,
        "default_branch": "main",
        "forks_count": forks,
        "watchers_count": watchers,
        "stargazers_count": watchers,
        "subscribers_count": subscribers,
        "owner": owner_json(owner)
    })
}

/// A repository document marked as a fork.
pub fn fork_json(full_name: &str, forks: u64) -> Value {
    let mut repo = repo_json(full_name, forks, forks, forks);
    let origin = json!({
        "id": 1,
        "name": "origin",
        "full_name": "upstream/origin",
        "url": format!("{API_ROOT}/repos/upstream/origin")
    });
    repo["fork"] = Value::Bool(true);
    repo["parent"] = origin.clone();
    repo["source"] = origin;
    repo
}

/// A service over `host` using `clock`.
pub fn service(host: &FakeHost, clock: &VirtualClock) -> RepoMetadataService<FakeHost, VirtualClock> {
    RepoMetadataService::new(GithubClient::with_clock(host.clone(), clock.clone()))
}
