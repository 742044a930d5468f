use std::future::Future;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::error::FetchError;
use crate::parser::{self, extract::Extractor, PageReport};
use crate::songs::{Accumulator, Song};

/// Where page bodies come from.
pub trait PageSource {
    fn fetch(&self, page: u32) -> impl Future<Output = Result<String, FetchError>>;
}

/// `{base_url}?p={page}`
pub fn page_url(base_url: &str, page: u32) -> String {
    format!("{}?p={}", base_url, page)
}

/// Plain GET per page with client defaults.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, page: u32) -> Result<String, FetchError> {
        let url = page_url(&self.base_url, page);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Request { url, source })
    }
}

/// Totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeStats {
    pub pages: u32,
    pub failed: u32,
    pub found: usize,
    pub undecodable: usize,
    pub not_audio: usize,
}

pub struct ScrapeOutcome {
    pub songs: Vec<Song>,
    pub stats: ScrapeStats,
}

/// Fetch pages 1..=max_pages one after another, then deduplicate.
///
/// A failed page is reported and contributes nothing; the run goes on.
pub async fn scrape_pages<S: PageSource>(
    source: &S,
    max_pages: u32,
    extractor: &dyn Extractor,
    audio_marker: &str,
) -> ScrapeOutcome {
    let pb = ProgressBar::new(u64::from(max_pages));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut acc = Accumulator::new();
    let mut stats = ScrapeStats {
        pages: max_pages,
        ..Default::default()
    };

    for page in 1..=max_pages {
        match source.fetch(page).await {
            Ok(text) => {
                let report = parser::process_page(&text, extractor, audio_marker);
                pb.suspend(|| {
                    report.log(page);
                    println!("page {}/{}: {} found", page, max_pages, report.found());
                });

                stats.found += report.found();
                stats.undecodable += report.undecodable;
                stats.not_audio += report.not_audio;
                acc.extend(report.songs);
            }
            Err(e) => {
                stats.failed += 1;
                pb.suspend(|| {
                    warn!(page, error = %e, "fetch failed");
                    println!("page {}/{}: error: {}", page, max_pages, e);
                });
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        pages = stats.pages,
        failed = stats.failed,
        collected = acc.len(),
        "scrape finished"
    );

    ScrapeOutcome {
        songs: acc.into_songs(),
        stats,
    }
}

/// Fetch and process a single page without touching the accumulator.
pub async fn scrape_single_page<S: PageSource>(
    source: &S,
    page: u32,
    extractor: &dyn Extractor,
    audio_marker: &str,
) -> Result<PageReport, FetchError> {
    let text = source.fetch(page).await?;
    Ok(parser::process_page(&text, extractor, audio_marker))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::parser::extract::TeaserPattern;

    /// Serves canned bodies; a missing page answers HTTP 503.
    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<u32, String>,
        calls: RefCell<Vec<u32>>,
    }

    impl FakeSource {
        fn with(mut self, page: u32, body: String) -> Self {
            self.pages.insert(page, body);
            self
        }
    }

    impl PageSource for FakeSource {
        async fn fetch(&self, page: u32) -> Result<String, FetchError> {
            self.calls.borrow_mut().push(page);
            self.pages.get(&page).cloned().ok_or(FetchError::Status {
                url: page_url("http://fake", page),
                status: 503,
            })
        }
    }

    fn entry(title: &str, artist: &str, url: &str) -> String {
        format!(r#"{{\"title\":\"{title}\",\"artist\":\"{artist}\",\"teaserURL\":\"{url}\"}}"#)
    }

    async fn run(source: &FakeSource, max_pages: u32) -> ScrapeOutcome {
        scrape_pages(source, max_pages, &TeaserPattern, ".mp3").await
    }

    #[test]
    fn url_carries_page_query() {
        assert_eq!(page_url("https://x/chart", 7), "https://x/chart?p=7");
    }

    #[tokio::test]
    async fn failed_page_does_not_stop_the_run() {
        let source = FakeSource::default()
            .with(1, entry("Thriller", "Michael Jackson", "https://x/1.mp3"))
            .with(3, entry("Imagine", "John Lennon", "https://x/3.mp3"));

        let out = run(&source, 3).await;

        assert_eq!(*source.calls.borrow(), vec![1, 2, 3]);
        assert_eq!(out.stats.failed, 1);
        assert_eq!(out.stats.found, 2);
        let titles: Vec<&str> = out.songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Thriller", "Imagine"]);
        assert_eq!(out.songs[1].id, 2);
    }

    #[tokio::test]
    async fn later_page_wins_for_same_audio() {
        let source = FakeSource::default()
            .with(
                1,
                entry("Old Title", "Falco", "https://x/falco.mp3")
                    + &entry("Jeanny", "Falco", "https://x/jeanny.mp3"),
            )
            .with(2, entry("Rock Me Amadeus", "Falco", "https://x/falco.mp3"));

        let out = run(&source, 2).await;

        assert_eq!(out.songs.len(), 2);
        assert_eq!(out.songs[0].id, 1);
        assert_eq!(out.songs[0].audio, "https://x/falco.mp3");
        assert_eq!(out.songs[0].title, "Rock Me Amadeus");
        assert_eq!(out.songs[1].title, "Jeanny");
        assert_eq!(out.stats.found, 3);
    }

    #[tokio::test]
    async fn non_audio_never_survives() {
        let cover = entry("Cover", "Band", "https://x/cover.jpg");
        let source = FakeSource::default()
            .with(1, cover.repeat(3))
            .with(2, cover.clone() + &entry("Song", "Band", "https://x/song.mp3"));

        let out = run(&source, 2).await;

        assert_eq!(out.stats.not_audio, 4);
        assert_eq!(out.songs.len(), 1);
        assert!(out.songs.iter().all(|s| s.audio.contains(".mp3")));
    }

    #[tokio::test]
    async fn zero_pages_fetches_nothing() {
        let source = FakeSource::default();
        let out = run(&source, 0).await;
        assert!(source.calls.borrow().is_empty());
        assert!(out.songs.is_empty());
        assert_eq!(out.stats, ScrapeStats::default());
    }

    #[tokio::test]
    async fn pages_without_matches_give_empty_list() {
        let source = FakeSource::default()
            .with(1, "<html></html>".into())
            .with(2, String::new());
        let out = run(&source, 2).await;
        assert!(out.songs.is_empty());
        assert_eq!(out.stats.failed, 0);
    }

    #[tokio::test]
    async fn single_page_report() {
        let source = FakeSource::default().with(
            4,
            entry("Skandal im Sperrbezirk", "Spider Murphy Gang", "https://x/s.mp3"),
        );
        let report = scrape_single_page(&source, 4, &TeaserPattern, ".mp3")
            .await
            .unwrap();
        assert_eq!(report.found(), 1);
        assert!(scrape_single_page(&source, 5, &TeaserPattern, ".mp3").await.is_err());
    }
}
