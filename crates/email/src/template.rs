//! Mail template loading and caching.

use std::{path::Path, sync::Arc};

use {
    minijinja::{AutoEscape, Environment},
    serde::Serialize,
    sha2::{Digest, Sha256},
    tokio::sync::RwLock,
    tracing::debug,
};

use crate::error::{Error, Result};

/// Where template sources come from. `load` may block; it runs on the
/// blocking thread pool.
pub trait TemplateSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<String>;
}

/// Reads templates from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTemplateSource;

impl TemplateSource for FsTemplateSource {
    fn load(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| Error::TemplateRead {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Variables exposed to the mail template.
///
/// `title` is HTML-escaped on output; templates print `body` with the `safe`
/// filter, so it is inserted as raw HTML.
#[derive(Debug, Serialize)]
pub struct MailTemplateVars<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

/// Parsed templates keyed by the SHA-256 of their path.
///
/// A template is loaded and compiled on first use and kept for the lifetime
/// of the process. Concurrent first renders of the same path load it once.
pub struct TemplateCache {
    source: Arc<dyn TemplateSource>,
    env: RwLock<Environment<'static>>,
}

impl TemplateCache {
    pub fn new(source: impl TemplateSource + 'static) -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self {
            source: Arc::new(source),
            env: RwLock::new(env),
        }
    }

    pub async fn render<S: Serialize>(&self, path: &Path, ctx: &S) -> Result<String> {
        let key = cache_key(path);

        {
            let env = self.env.read().await;
            if let Ok(template) = env.get_template(&key) {
                return Ok(template.render(ctx)?);
            }
        }

        let mut env = self.env.write().await;
        // Another task may have loaded it while we waited for the lock.
        if env.get_template(&key).is_err() {
            let loader = Arc::clone(&self.source);
            let owned = path.to_path_buf();
            let source = tokio::task::spawn_blocking(move || loader.load(&owned)).await??;
            env.add_template_owned(key.clone(), source)?;
            debug!(path = %path.display(), key, "template cached");
        }
        Ok(env.get_template(&key)?.render(ctx)?)
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new(FsTemplateSource)
    }
}

/// Hex SHA-256 of the template path.
pub fn cache_key(path: &Path) -> String {
    format!("{:x}", Sha256::digest(path.to_string_lossy().as_bytes()))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::sync::atomic::{AtomicUsize, Ordering},
    };

    const MAIL: &str = "<h1>{{ title }}</h1><div>{{ body|safe }}</div>";

    struct CountingSource {
        loads: Arc<AtomicUsize>,
        template: &'static str,
    }

    impl TemplateSource for CountingSource {
        fn load(&self, _path: &Path) -> Result<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.template.to_string())
        }
    }

    fn counting(template: &'static str) -> (TemplateCache, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = TemplateCache::new(CountingSource {
            loads: Arc::clone(&loads),
            template,
        });
        (cache, loads)
    }

    #[tokio::test]
    async fn second_render_reuses_parsed_template() {
        let (cache, loads) = counting(MAIL);
        let path = Path::new("template/mail.html");
        let vars = MailTemplateVars {
            title: "Alert",
            body: "<b>down</b>",
        };

        let first = cache.render(path, &vars).await.unwrap();
        let second = cache.render(path, &vars).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn title_is_escaped_body_is_raw() {
        let (cache, _) = counting(MAIL);
        let html = cache
            .render(Path::new("mail.html"), &MailTemplateVars {
                title: "a < b & c",
                body: "<p>raw</p>",
            })
            .await
            .unwrap();
        assert_eq!(html, "<h1>a &lt; b &amp; c</h1><div><p>raw</p></div>");
    }

    #[tokio::test]
    async fn concurrent_first_use_loads_once() {
        let (cache, loads) = counting(MAIL);
        let cache = Arc::new(cache);

        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let body = format!("n{i}");
                cache
                    .render(Path::new("template/mail.html"), &MailTemplateVars {
                        title: "t",
                        body: &body,
                    })
                    .await
                    .unwrap()
            }));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            assert!(handle.await.unwrap().contains(&format!("n{i}")));
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_paths_are_cached_separately() {
        let (cache, loads) = counting(MAIL);
        let vars = MailTemplateVars {
            title: "t",
            body: "b",
        };
        cache.render(Path::new("a.html"), &vars).await.unwrap();
        cache.render(Path::new("b.html"), &vars).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn syntax_error_is_reported_and_not_cached() {
        let (cache, loads) = counting("{{ title ");
        let vars = MailTemplateVars {
            title: "t",
            body: "b",
        };
        assert!(matches!(
            cache.render(Path::new("bad.html"), &vars).await,
            Err(Error::Template(_))
        ));
        assert!(cache.render(Path::new("bad.html"), &vars).await.is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TemplateCache::default();
        let err = cache
            .render(&dir.path().join("nope.html"), &MailTemplateVars {
                title: "t",
                body: "b",
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TemplateRead { .. }));
    }

    #[tokio::test]
    async fn renders_template_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mail.html");
        std::fs::write(&path, MAIL).unwrap();

        let cache = TemplateCache::default();
        let html = cache
            .render(&path, &MailTemplateVars {
                title: "Hi",
                body: "<i>x</i>",
            })
            .await
            .unwrap();
        assert_eq!(html, "<h1>Hi</h1><div><i>x</i></div>");
    }

    #[tokio::test]
    async fn slow_load_does_not_stall_the_runtime() {
        struct SlowSource;

        impl TemplateSource for SlowSource {
            fn load(&self, _path: &Path) -> Result<String> {
                std::thread::sleep(std::time::Duration::from_millis(200));
                Ok(MAIL.to_string())
            }
        }

        let cache = TemplateCache::new(SlowSource);
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = {
            let ticks = Arc::clone(&ticks);
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        cache
            .render(Path::new("slow.html"), &MailTemplateVars {
                title: "t",
                body: "b",
            })
            .await
            .unwrap();
        ticker.abort();

        assert!(ticks.load(Ordering::SeqCst) >= 5);
    }

    #[test]
    fn cache_key_is_stable_hex() {
        let key = cache_key(Path::new("template/mail.html"));
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, cache_key(Path::new("template/mail.html")));
        assert_ne!(key, cache_key(Path::new("template/other.html")));
    }
}
