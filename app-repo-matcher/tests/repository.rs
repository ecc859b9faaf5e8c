mod common;

use app_repo_matcher::host::link_target;
use app_repo_matcher::rate_limit::ResourceClass;
use app_repo_matcher::repository::{RepositoryError, RepositoryMetadata};
use common::{repo_json, service, FakeHost, VirtualClock};
use serde_json::json;
use url::form_urlencoded;

const START: u64 = 1_700_000_000;

fn metadata(full_name: &str) -> RepositoryMetadata {
    RepositoryMetadata::from_document(repo_json(full_name, 0, 0, 0)).unwrap()
}

#[tokio::test]
async fn count_commits_is_exact_with_at_most_two_requests() {
    const PAGE: u32 = 3;
    let page = u64::from(PAGE);

    for total in [0, 1, page, page + 1, 2 * page, 2 * page + 1, 10 * page - 1] {
        let clock = VirtualClock::at(START);
        let host = FakeHost::unlimited(clock.clone());
        host.add_commits("owner/app", "main", PAGE, total);
        let service = service(&host, &clock).with_page_size(PAGE);

        let count = service.count_commits(&metadata("owner/app")).await.unwrap();

        assert_eq!(count, total, "total {total}");
        assert!(host.api_requests() <= 2, "total {total}: {:?}", host.requests());
    }
}

#[tokio::test]
async fn count_commits_matches_walking_every_page() {
    const PAGE: u32 = 4;
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());
    host.add_commits("owner/app", "main", PAGE, 4 * 5 + 2);
    let service = service(&host, &clock).with_page_size(PAGE);

    let mut walked = 0;
    let mut url = Some("/repos/owner/app/commits?sha=main&per_page=4".to_string());
    while let Some(next) = url {
        let page = service
            .client()
            .list_page(ResourceClass::Core, &next)
            .await
            .unwrap();
        walked += page.items.len() as u64;
        url = page.next.as_ref().map(link_target);
    }

    let counted = service.count_commits(&metadata("owner/app")).await.unwrap();
    assert_eq!(counted, walked);
    assert_eq!(counted, 22);
}

#[tokio::test]
async fn empty_repository_has_no_commits() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());
    host.route(
        "/repos/owner/app/commits?sha=main&per_page=100",
        409,
        json!({ "message": "Git Repository is empty." }),
    );

    let count = service(&host, &clock)
        .count_commits(&metadata("owner/app"))
        .await
        .unwrap();

    assert_eq!(count, 0);
}

#[tokio::test]
async fn get_repo_returns_none_when_missing() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());

    let repo = service(&host, &clock).get_repo("owner/missing").await.unwrap();

    assert!(repo.is_none());
}

#[tokio::test]
async fn get_repo_rejects_invalid_identifier_without_requests() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());

    let result = service(&host, &clock).get_repo("not an identifier").await;

    assert!(matches!(result, Err(RepositoryError::InvalidIdentifier(_))));
    assert!(host.requests().is_empty());
}

#[tokio::test]
async fn get_repo_reports_canonical_name_after_rename() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());
    host.add_repo_at("old/name", repo_json("new/name", 1, 2, 3));

    let repo = service(&host, &clock)
        .get_repo("old/name")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(repo.full_name, "new/name");
}

#[tokio::test]
async fn rejected_lookup_is_validation_failure() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());
    host.route("/repos/old/name", 422, json!({ "message": "Validation Failed" }));

    let result = service(&host, &clock).get_repo("old/name").await;

    match result {
        Err(RepositoryError::ValidationFailed {
            identifier,
            canonical,
            message,
        }) => {
            assert_eq!(identifier, "old/name");
            assert_eq!(canonical, None);
            assert_eq!(message, "Validation Failed");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn repo_info_includes_commit_count() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());
    host.add_repo(repo_json("owner/app", 5, 6, 7));
    host.add_commits("owner/app", "main", 100, 250);

    let repo = service(&host, &clock)
        .get_repo_info("owner/app")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(repo.commit_count, Some(250));
    assert_eq!(repo.forks_count(), 5);
}

#[tokio::test]
async fn code_search_follows_next_links() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", "repo:owner/app in:path build.gradle OR settings.gradle")
        .append_pair("per_page", "100")
        .finish();
    let first = format!("/search/code?{query}");
    let second = format!("{first}&page=2");

    let item = |path: &str| json!({ "path": path, "repository": { "full_name": "owner/app" } });
    host.route_with_link(
        &first,
        200,
        json!({ "total_count": 3, "items": [item("build.gradle"), item("app/build.gradle")] }),
        Some(format!("<{}{second}>; rel=\"next\"", common::API_ROOT)),
    );
    host.route(
        &second,
        200,
        json!({ "total_count": 3, "items": [item("docs/settings.gradle/readme.md")] }),
    );

    let service = service(&host, &clock);
    let hits = service
        .search_code("owner/app", &["build.gradle", "settings.gradle"])
        .await
        .unwrap();
    assert_eq!(hits.len(), 3);

    let files = service
        .find_files("owner/app", ".gradle", &["build.gradle", "settings.gradle"])
        .await
        .unwrap();
    assert_eq!(files, vec!["build.gradle", "app/build.gradle"]);
}

#[tokio::test]
async fn rejected_commit_listing_carries_canonical_name() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());
    host.route(
        "/repos/owner/app/commits?sha=main&per_page=100",
        422,
        json!({ "message": "Validation Failed" }),
    );

    let result = service(&host, &clock)
        .count_commits(&metadata("owner/app"))
        .await;

    match result {
        Err(RepositoryError::ValidationFailed {
            identifier,
            canonical,
            message,
        }) => {
            assert_eq!(identifier, "owner/app");
            assert_eq!(canonical.as_deref(), Some("owner/app"));
            assert_eq!(message, "Validation Failed");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn out_of_range_last_page_is_an_error() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());
    let first = "/repos/owner/app/commits?sha=main&per_page=100";
    let last = format!("{}{first}&page={}", common::API_ROOT, u64::MAX);
    host.route_with_link(
        first,
        200,
        json!([{ "sha": "a" }]),
        Some(format!("<{last}>; rel=\"last\"")),
    );

    let result = service(&host, &clock)
        .count_commits(&metadata("owner/app"))
        .await;

    match result {
        Err(RepositoryError::PageLink { identifier, link }) => {
            assert_eq!(identifier, "owner/app");
            assert_eq!(link, last);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(host.api_requests(), 1);
}

#[tokio::test]
async fn last_page_at_one_counts_first_page() {
    let clock = VirtualClock::at(START);
    let host = FakeHost::unlimited(clock.clone());
    let first = "/repos/owner/app/commits?sha=main&per_page=100";
    host.route_with_link(
        first,
        200,
        json!([{ "sha": "a" }, { "sha": "b" }]),
        Some(format!("<{}{first}&page=1>; rel=\"last\"", common::API_ROOT)),
    );

    let count = service(&host, &clock)
        .count_commits(&metadata("owner/app"))
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(host.api_requests(), 1);
}
