//! Robustness tests for the fetcher.
//!
//! A throwaway HTTP server on 127.0.0.1 stands in for list hosts, so these
//! tests need no outside network.

use listforge::commands::fetch::fetch_sources;
use listforge::config::{Category, Config, FetchSettings, Source};
use listforge::error::ListforgeError;
use listforge::fetcher::{DownloadJob, Fetcher};
use std::net::SocketAddr;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn settings(retries: u32, timeout_secs: u64) -> FetchSettings {
    FetchSettings {
        retries,
        timeout_secs,
        workers: 4,
        retry_delay_ms: 0,
    }
}

/// Serve the same canned response to every connection
async fn serve(status_line: &'static str, body: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n",
                    status_line,
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Accept connections but never answer
async fn serve_silently() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address with nothing listening
async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[tokio::test]
async fn test_download_ok_writes_cache() {
    let addr = serve("200 OK", b"0.0.0.0 ads.example.com\n||tracker.net^\n").await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ads/local.txt");

    let fetcher = Fetcher::new(&settings(3, 5)).unwrap();
    let job = DownloadJob {
        url: format!("http://{}/hosts.txt", addr),
        path: path.clone(),
    };
    let report = fetcher.download(&job).await.unwrap();

    assert_eq!(report.status, 200);
    assert_eq!(report.attempt, 1);
    assert!(report.is_success());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "0.0.0.0 ads.example.com\n||tracker.net^\n"
    );
}

#[tokio::test]
async fn test_download_non_200_still_saved() {
    let addr = serve("404 Not Found", b"<html>not found</html>").await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ads/gone.txt");

    let fetcher = Fetcher::new(&settings(3, 5)).unwrap();
    let job = DownloadJob {
        url: format!("http://{}/gone.txt", addr),
        path: path.clone(),
    };
    let report = fetcher.download(&job).await.unwrap();

    assert_eq!(report.status, 404);
    assert!(!report.is_success());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "<html>not found</html>"
    );
}

#[tokio::test]
async fn test_download_204_counts_as_non_success() {
    let addr = serve("204 No Content", b"").await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ads/empty.txt");

    let fetcher = Fetcher::new(&settings(1, 5)).unwrap();
    let job = DownloadJob {
        url: format!("http://{}/empty.txt", addr),
        path: path.clone(),
    };
    let report = fetcher.download(&job).await.unwrap();

    assert_eq!(report.status, 204);
    assert!(!report.is_success());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

    let config = Config {
        cache_dir: temp_dir.path().join("cache"),
        fetch: settings(1, 5),
        categories: vec![Category {
            name: "ads".to_string(),
            sources: vec![Source {
                name: "empty".to_string(),
                url: format!("http://{}/empty.txt", addr),
            }],
        }],
        ..Config::default()
    };
    let outcome = fetch_sources(&config).await.unwrap();

    assert_eq!(outcome.downloaded, 0);
    assert_eq!(outcome.non_success, 1);
    assert_eq!(outcome.failed, 0);
    assert!(temp_dir.path().join("cache/ads/empty.txt").exists());
}

#[tokio::test]
async fn test_download_invalid_utf8_is_lossy() {
    let addr = serve("200 OK", b"ads.example.com\n\xff\xfebad\n").await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ads/binary.txt");

    let fetcher = Fetcher::new(&settings(1, 5)).unwrap();
    let job = DownloadJob {
        url: format!("http://{}/binary.txt", addr),
        path: path.clone(),
    };
    fetcher.download(&job).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("ads.example.com\n"));
    assert!(content.contains('\u{fffd}'));
}

#[tokio::test]
async fn test_download_connection_refused_exhausts() {
    let addr = closed_port().await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("malware/refused.txt");

    let fetcher = Fetcher::new(&settings(3, 5)).unwrap();
    let job = DownloadJob {
        url: format!("http://{}/list.txt", addr),
        path: path.clone(),
    };
    let err = fetcher.download(&job).await.unwrap_err();

    assert!(matches!(err, ListforgeError::Exhausted { attempts: 3, .. }));
    // Cache file is left empty, never stale
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[tokio::test]
async fn test_download_timeout() {
    let addr = serve_silently().await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ads/slow.txt");

    let fetcher = Fetcher::new(&settings(1, 1)).unwrap();
    let job = DownloadJob {
        url: format!("http://{}/slow.txt", addr),
        path,
    };

    let started = std::time::Instant::now();
    let result = fetcher.download(&job).await;
    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_download_all_isolates_failures() {
    let good = serve("200 OK", b"good.example.com\n").await;
    let bad = closed_port().await;
    let temp_dir = TempDir::new().unwrap();

    let jobs = vec![
        DownloadJob {
            url: format!("http://{}/a.txt", good),
            path: temp_dir.path().join("ads/a.txt"),
        },
        DownloadJob {
            url: format!("http://{}/b.txt", bad),
            path: temp_dir.path().join("ads/b.txt"),
        },
        DownloadJob {
            url: format!("http://{}/c.txt", good),
            path: temp_dir.path().join("tracking/c.txt"),
        },
    ];

    let fetcher = Fetcher::new(&settings(2, 5)).unwrap();
    let results = fetcher.download_all(&jobs).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("ads/a.txt")).unwrap(),
        "good.example.com\n"
    );
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("tracking/c.txt")).unwrap(),
        "good.example.com\n"
    );
}

#[tokio::test]
async fn test_retry_delay_applies_between_attempts() {
    let addr = closed_port().await;
    let temp_dir = TempDir::new().unwrap();

    let fetcher = Fetcher::new(&FetchSettings {
        retries: 3,
        timeout_secs: 5,
        workers: 1,
        retry_delay_ms: 50,
    })
    .unwrap();
    let job = DownloadJob {
        url: format!("http://{}/x.txt", addr),
        path: temp_dir.path().join("x/x.txt"),
    };

    let started = std::time::Instant::now();
    assert!(fetcher.download(&job).await.is_err());
    // 50ms + 100ms of backoff
    assert!(started.elapsed() >= Duration::from_millis(150));
}
