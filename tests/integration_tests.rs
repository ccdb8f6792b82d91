//! Integration tests for bump-deps-index
//!
//! These tests verify:
//! - Resolution against a simple index and an npm registry
//! - Specifier rewriting keeps operators, extras and markers
//! - Banner deduplication, including under concurrent resolution
//! - Orchestrated manifest rewriting with format preservation

use bump_deps_index::dispatch::{BannerCache, Resolver};
use bump_deps_index::domain::{BumpOutcome, Ecosystem};
use bump_deps_index::error::{RegistryError, ResolveError};
use bump_deps_index::registry::HttpClient;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;

/// Render a simple index page linking the given files
fn simple_page(files: &[&str]) -> String {
    let links: String = files
        .iter()
        .map(|f| format!("    <a href=\"https://files.example/{f}#sha256=00\">{f}</a><br/>\n"))
        .collect();
    format!("<!DOCTYPE html>\n<html>\n  <body>\n    <h1>Links</h1>\n{links}  </body>\n</html>\n")
}

/// Render an npm packument listing the given versions
fn packument(versions: &[&str]) -> String {
    let entries: Vec<String> = versions
        .iter()
        .map(|v| format!("\"{v}\": {{\"version\": \"{v}\"}}"))
        .collect();
    format!("{{\"name\": \"pkg\", \"versions\": {{{}}}}}", entries.join(", "))
}

async fn serve_index(server: &mut ServerGuard, package: &str, files: &[&str]) -> Mock {
    server
        .mock("GET", format!("/{}", package).as_str())
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(simple_page(files))
        .create_async()
        .await
}

async fn serve_npm(server: &mut ServerGuard, package: &str, versions: &[&str]) -> Mock {
    server
        .mock("GET", format!("/{}", package).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(packument(versions))
        .create_async()
        .await
}

fn resolver_for(index_url: &str, npm_registry: &str) -> Resolver {
    Resolver::new(HttpClient::new().unwrap(), index_url, npm_registry)
}

mod python_resolution {
    use super::*;

    #[tokio::test]
    async fn test_prerelease_filtering_is_exact() {
        let mut server = Server::new_async().await;
        let _m = serve_index(
            &mut server,
            "pkg",
            &["pkg-1.0.tar.gz", "pkg-1.1a1.tar.gz", "pkg-1.1a1-py3-none-any.whl"],
        )
        .await;
        let resolver = resolver_for(&server.url(), "http://unused");

        let stable = resolver.resolve(Ecosystem::Python, "pkg", false).await.unwrap();
        assert_eq!(stable, "pkg>=1");

        let pre = resolver.resolve(Ecosystem::Python, "pkg", true).await.unwrap();
        assert_eq!(pre, "pkg>=1.1a1");
    }

    #[tokio::test]
    async fn test_constraint_satisfying_selection() {
        let mut server = Server::new_async().await;
        let _m = serve_index(
            &mut server,
            "pkg",
            &["pkg-0.9.tar.gz", "pkg-1.5.tar.gz", "pkg-2.1.tar.gz"],
        )
        .await;
        let resolver = resolver_for(&server.url(), "http://unused");

        let result = resolver
            .resolve(Ecosystem::Python, "pkg>=1.0,<2.0", false)
            .await
            .unwrap();
        assert_eq!(result, "pkg>=1.5,<2.0");
    }

    #[tokio::test]
    async fn test_no_satisfying_candidate_returns_input_verbatim() {
        let mut server = Server::new_async().await;
        let _m = serve_index(&mut server, "pkg", &["pkg-1.5.tar.gz", "pkg-2.1.tar.gz"]).await;
        let resolver = resolver_for(&server.url(), "http://unused");

        let spec = "pkg  < 1.0 ;  os_name == 'nt'";
        let result = resolver.resolve(Ecosystem::Python, spec, false).await.unwrap();
        assert_eq!(result, spec);
    }

    #[tokio::test]
    async fn test_empty_listing_returns_input() {
        let mut server = Server::new_async().await;
        let _m = serve_index(&mut server, "pkg", &[]).await;
        let resolver = resolver_for(&server.url(), "http://unused");

        let result = resolver.resolve(Ecosystem::Python, "pkg>=1", false).await.unwrap();
        assert_eq!(result, "pkg>=1");
    }

    #[tokio::test]
    async fn test_equality_pin_takes_newest() {
        let mut server = Server::new_async().await;
        let _m = serve_index(&mut server, "black", &["black-22.6.0.tar.gz", "black-23.1.0.tar.gz"])
            .await;
        let resolver = resolver_for(&server.url(), "http://unused");

        let result = resolver
            .resolve(Ecosystem::Python, "black==22.6.0", false)
            .await
            .unwrap();
        assert_eq!(result, "black==23.1");
    }

    #[tokio::test]
    async fn test_extras_and_marker_are_kept() {
        let mut server = Server::new_async().await;
        let _m = serve_index(&mut server, "pkg", &["pkg-2.4.0.tar.gz"]).await;
        let resolver = resolver_for(&server.url(), "http://unused");

        let result = resolver
            .resolve(
                Ecosystem::Python,
                "pkg[socks,security]>=1.0; python_version >= \"3.8\"",
                false,
            )
            .await
            .unwrap();
        assert_eq!(result, "pkg[socks,security]>=2.4; python_version >= \"3.8\"");
    }

    #[tokio::test]
    async fn test_build_segment_is_stripped() {
        let mut server = Server::new_async().await;
        let _m = serve_index(&mut server, "torch", &["torch-2.1.0+cpu-cp311-none-any.whl"]).await;
        let resolver = resolver_for(&server.url(), "http://unused");

        let result = resolver
            .resolve(Ecosystem::Python, "torch>=2", false)
            .await
            .unwrap();
        assert_eq!(result, "torch>=2.1");
    }

    #[tokio::test]
    async fn test_duplicate_files_collapse() {
        let mut server = Server::new_async().await;
        let _m = serve_index(
            &mut server,
            "pkg",
            &["pkg-1.0.tar.gz", "pkg-1.0.0.zip", "pkg-1.0-py3-none-any.whl"],
        )
        .await;
        let resolver = resolver_for(&server.url(), "http://unused");

        let result = resolver.resolve(Ecosystem::Python, "pkg", false).await.unwrap();
        assert_eq!(result, "pkg>=1");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pkg")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;
        let resolver = resolver_for(&server.url(), "http://unused");

        let result = resolver.resolve(Ecosystem::Python, "pkg", false).await;
        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(ResolveError::Registry(RegistryError::NetworkError { .. }))
        ));
    }

    #[tokio::test]
    async fn test_malformed_specifier() {
        let resolver = resolver_for("http://unused", "http://unused");
        for spec in ["pkg[extra", "pkg>=1.0; this is not a marker"] {
            let result = resolver.resolve(Ecosystem::Python, spec, false).await;
            assert!(matches!(result, Err(ResolveError::Specifier(_))), "{spec}");
        }
    }
}

mod js_resolution {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let mut server = Server::new_async().await;
        let _m = serve_npm(&mut server, "lodash", &["4.17.0", "4.17.20", "4.17.21"]).await;
        let resolver = resolver_for("http://unused", &server.url());

        let result = resolver
            .resolve(Ecosystem::JavaScript, "lodash@4.17.0", false)
            .await
            .unwrap();
        assert_eq!(result, "lodash@4.17.21");
    }

    #[tokio::test]
    async fn test_trailing_zeros_stripped_and_prereleases_skipped() {
        let mut server = Server::new_async().await;
        let _m = serve_npm(&mut server, "prettier", &["2.8.8", "3.0.0", "3.1.0-beta.1"]).await;
        let resolver = resolver_for("http://unused", &server.url());

        let result = resolver
            .resolve(Ecosystem::JavaScript, "prettier@22", false)
            .await
            .unwrap();
        assert_eq!(result, "prettier@3");
    }

    #[tokio::test]
    async fn test_prerelease_allowed() {
        let mut server = Server::new_async().await;
        let _m = serve_npm(&mut server, "prettier", &["3.0.0", "3.1.0-beta.1"]).await;
        let resolver = resolver_for("http://unused", &server.url());

        let result = resolver
            .resolve(Ecosystem::JavaScript, "prettier@3", true)
            .await
            .unwrap();
        assert_eq!(result, "prettier@3.1.0-beta.1");
    }

    #[tokio::test]
    async fn test_empty_candidates_is_named_error() {
        let mut server = Server::new_async().await;
        let _m = serve_npm(&mut server, "ghost", &[]).await;
        let resolver = resolver_for("http://unused", &server.url());

        let result = resolver.resolve(Ecosystem::JavaScript, "ghost@1", false).await;
        match result {
            Err(ResolveError::NoCandidates { package, registry }) => {
                assert_eq!(package, "ghost");
                assert_eq!(registry, "npm registry");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/broken")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;
        let resolver = resolver_for("http://unused", &server.url());

        let result = resolver.resolve(Ecosystem::JavaScript, "broken@1", false).await;
        assert!(matches!(
            result,
            Err(ResolveError::Registry(RegistryError::InvalidResponse { .. }))
        ));
    }
}

mod banner_cache {
    use super::*;

    #[tokio::test]
    async fn test_same_pair_announced_once() {
        let mut server = Server::new_async().await;
        let _a = serve_index(&mut server, "a", &["a-1.0.tar.gz"]).await;
        let _b = serve_index(&mut server, "b", &["b-1.0.tar.gz"]).await;
        let resolver = resolver_for(&server.url(), "http://unused");

        resolver.resolve(Ecosystem::Python, "a", false).await.unwrap();
        resolver.resolve(Ecosystem::Python, "b", false).await.unwrap();
        assert_eq!(resolver.banner().len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_url_or_ecosystem_announced_again() {
        let mut first = Server::new_async().await;
        let mut second = Server::new_async().await;
        let _a = serve_index(&mut first, "a", &["a-1.0.tar.gz"]).await;
        let _b = serve_index(&mut second, "a", &["a-1.0.tar.gz"]).await;
        let _c = serve_npm(&mut first, "c", &["1.0.0"]).await;

        let banner = Arc::new(BannerCache::new());
        let client = HttpClient::new().unwrap();
        let one = Resolver::with_banner(client.clone(), first.url(), first.url(), banner.clone());
        let two = Resolver::with_banner(client, second.url(), first.url(), banner.clone());

        one.resolve(Ecosystem::Python, "a", false).await.unwrap();
        assert_eq!(banner.len(), 1);
        two.resolve(Ecosystem::Python, "a", false).await.unwrap();
        assert_eq!(banner.len(), 2);
        one.resolve(Ecosystem::JavaScript, "c@1", false).await.unwrap();
        assert_eq!(banner.len(), 3);
        assert!(banner.contains(Ecosystem::JavaScript, &first.url()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_resolution_keeps_cache_consistent() {
        let mut server = Server::new_async().await;
        let _py = server
            .mock("GET", Matcher::Regex(r"^/py\d+$".to_string()))
            .with_status(200)
            .with_body(simple_page(&["py0-1.0.tar.gz", "py0-2.0.tar.gz"]))
            .expect(16)
            .create_async()
            .await;
        let _js = server
            .mock("GET", Matcher::Regex(r"^/js\d+$".to_string()))
            .with_status(200)
            .with_body(packument(&["1.0.0", "2.0.0"]))
            .expect(16)
            .create_async()
            .await;

        let index_url = format!("{}/", server.url());
        let resolver = resolver_for(&index_url, &server.url());
        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..16 {
            let py = resolver.clone();
            tasks.spawn(async move {
                py.resolve(Ecosystem::Python, &format!("py{i}>=1"), false).await
            });
            let js = resolver.clone();
            tasks.spawn(async move {
                js.resolve(Ecosystem::JavaScript, &format!("js{i}@1"), false).await
            });
        }

        let mut resolved = 0;
        while let Some(joined) = tasks.join_next().await {
            let result = joined.unwrap().unwrap();
            assert!(result.ends_with(">=2") || result.ends_with("@2"));
            resolved += 1;
        }

        assert_eq!(resolved, 32);
        assert_eq!(resolver.banner().len(), 2);
        assert!(resolver.banner().contains(Ecosystem::Python, &index_url));
        assert!(resolver.banner().contains(Ecosystem::JavaScript, &server.url()));
    }
}

mod orchestration {
    use super::*;
    use bump_deps_index::cli::CliArgs;
    use bump_deps_index::orchestrator::Orchestrator;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn orchestrator(args: Vec<String>) -> Orchestrator {
        let mut full = vec!["bump-deps-index".to_string()];
        full.extend(args);
        Orchestrator::with_client(CliArgs::parse_from(full), HttpClient::new().unwrap())
    }

    async fn serve_abcd(server: &mut ServerGuard) -> Vec<Mock> {
        vec![
            serve_index(server, "A", &["A-1.0.tar.gz"]).await,
            serve_index(server, "B", &["B-1.0.tar.gz", "B-2.0.tar.gz"]).await,
            serve_index(server, "C", &["C-1.0.tar.gz"]).await,
            server
                .mock("GET", "/D")
                .with_status(404)
                .create_async()
                .await,
        ]
    }

    #[tokio::test]
    async fn test_pyproject_rewritten_in_place() {
        let mut server = Server::new_async().await;
        let _mocks = serve_abcd(&mut server).await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pyproject.toml");
        fs::write(
            &path,
            "[build-system]\nrequires = [\"A\"]\n[project]\nkeywords = [\"C\"]\ndependencies = [ \"B==1\"]\noptional-dependencies.test = [ \"C\" ]\noptional-dependencies.docs = [ \"D\"]\n",
        )
        .unwrap();

        let result = orchestrator(vec![
            "--index-url".to_string(),
            server.url(),
            "-f".to_string(),
            path.display().to_string(),
        ])
        .run()
        .await;

        let lines: Vec<String> = result.outcomes.iter().map(ToString::to_string).collect();
        assert!(lines.contains(&"A -> A>=1".to_string()));
        assert!(lines.contains(&"B==1 -> B==2".to_string()));
        assert!(lines.contains(&"C -> C>=1".to_string()));
        assert!(result.has_failures());
        assert!(result
            .outcomes
            .iter()
            .any(|o| o.is_failed() && o.spec() == "D"));

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[build-system]\nrequires = [\"A>=1\"]\n[project]\nkeywords = [\"C\"]\ndependencies = [ \"B==2\"]\noptional-dependencies.test = [ \"C>=1\" ]\noptional-dependencies.docs = [ \"D\"]\n"
        );
    }

    #[tokio::test]
    async fn test_dry_run_leaves_tox_ini() {
        let mut server = Server::new_async().await;
        let _mocks = serve_abcd(&mut server).await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tox.ini");
        let original = "[testenv]\ndeps =\n    A\n[testenv:ok]\ndeps =\n    B==1\n[magic]\ndeps = NO\n";
        fs::write(&path, original).unwrap();

        let result = orchestrator(vec![
            "--index-url".to_string(),
            server.url(),
            "--dry-run".to_string(),
            "-f".to_string(),
            path.display().to_string(),
        ])
        .run()
        .await;

        assert!(!result.has_failures());
        assert_eq!(result.outcomes.len(), 2);
        assert!(result.write_results[0].has_updates());
        assert!(!result.write_results[0].file_modified);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn test_args_and_pre_commit_mixed_ecosystems() {
        let mut server = Server::new_async().await;
        let _mocks = serve_abcd(&mut server).await;
        let _prettier = serve_npm(&mut server, "prettier", &["2.8.8", "3.0.0"]).await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".pre-commit-config.yaml");
        fs::write(
            &path,
            "repos:\n  - repo: local\n    hooks:\n      - id: fmt\n        additional_dependencies:\n        - B==1\n        - prettier@2\n",
        )
        .unwrap();

        let result = orchestrator(vec![
            "--index-url".to_string(),
            server.url(),
            "--npm-registry".to_string(),
            server.url(),
            " A ".to_string(),
            "-f".to_string(),
            path.display().to_string(),
        ])
        .run()
        .await;

        assert!(!result.has_failures());
        assert_eq!(
            result.outcomes,
            vec![
                BumpOutcome::from_resolution("A", "A>=1", Ecosystem::Python),
                BumpOutcome::from_resolution("B==1", "B==2", Ecosystem::Python),
                BumpOutcome::from_resolution("prettier@2", "prettier@3", Ecosystem::JavaScript),
            ]
        );
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("        - B==2\n        - prettier@3\n"));
    }
}
