//! Login and the on-disk session cache.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;

use camlapse_camera_model::Session;
use camlapse_common::config::SessionConfig;
use camlapse_common::error::{CamlapseError, CamlapseResult};

use crate::client::{client_builder, http_error};
use crate::endpoints::DropcamEndpoints;

/// Produces an authenticated [`Session`] for the rest of the invocation.
#[derive(Debug, Clone)]
pub struct SessionProvider {
    cache_path: PathBuf,
    login_url: String,
}

impl SessionProvider {
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: expand_home(cache_path.into()),
            login_url: DropcamEndpoints::default().login,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.cookie_cache)
    }

    #[must_use]
    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Cached session, in order: cache file, given credentials, interactive prompt.
    pub async fn authenticate(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> CamlapseResult<Session> {
        if let Some(session) = self.load_cached()? {
            tracing::debug!(path = %self.cache_path.display(), "Using cached session");
            return Ok(session);
        }

        let (username, password) = match (username, password) {
            (Some(u), Some(p)) => (u.to_string(), p.to_string()),
            (username, _) => {
                let username = username.map(str::to_string);
                tokio::task::spawn_blocking(move || prompt_credentials(username))
                    .await
                    .map_err(|e| CamlapseError::Other(e.into()))??
            }
        };

        self.login_with_password(&username, &password).await
    }

    /// Log in and persist the returned cookies.
    ///
    /// Cookies set anywhere along a redirect chain are kept.
    pub async fn login_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> CamlapseResult<Session> {
        tracing::info!(url = %self.login_url, "Logging in");
        let login_url = Url::parse(&self.login_url)
            .map_err(|e| CamlapseError::invalid_parameter(format!("login URL: {e}")))?;
        let jar = Arc::new(Jar::default());
        let response = client_builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(http_error)?
            .post(login_url.clone())
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(http_error)?;

        let mut cookies = Vec::new();
        for url in [&login_url, response.url()] {
            if let Some(header) = jar.cookies(url) {
                cookies.extend(parse_cookie_header(header.to_str().unwrap_or_default()));
            }
        }
        let session = Session::from_cookies(cookies);
        if session.is_empty() {
            tracing::debug!(status = %response.status(), "Login returned no cookies");
            return Err(CamlapseError::auth("Bad username or password"));
        }

        self.save(&session)?;
        Ok(session)
    }

    /// Read the cache. A missing or empty file yields `None`.
    pub fn load_cached(&self) -> CamlapseResult<Option<Session>> {
        let content = match std::fs::read_to_string(&self.cache_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) if !session.is_empty() => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(
                    path = %self.cache_path.display(),
                    error = %e,
                    "Ignoring unreadable session cache"
                );
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> CamlapseResult<()> {
        if let Some(parent) = self
            .cache_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.cache_path)?;
        file.write_all(serde_json::to_string(session)?.as_bytes())?;

        eprintln!(
            "NOTICE: Your session token has been saved in {}",
            self.cache_path.display()
        );
        Ok(())
    }

    /// Delete the cache. Returns whether a file was removed.
    pub fn clear(&self) -> CamlapseResult<bool> {
        match std::fs::remove_file(&self.cache_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Split a `Cookie` request header into name/value pairs.
fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn expand_home(path: PathBuf) -> PathBuf {
    if let (Ok(rest), Some(home)) = (path.strip_prefix("~"), dirs::home_dir()) {
        return home.join(rest);
    }
    path
}

fn prompt_credentials(username: Option<String>) -> CamlapseResult<(String, String)> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    read_credentials(&mut input, username, || {
        rpassword::prompt_password("Password: ")
    })
}

/// Username from `input` (unless given); password from the no-echo reader.
fn read_credentials(
    input: &mut impl BufRead,
    username: Option<String>,
    read_password: impl FnOnce() -> io::Result<String>,
) -> CamlapseResult<(String, String)> {
    let username = match username {
        Some(username) => username,
        None => read_prompt(input, "Enter your Dropcam username: ")?,
    };
    let password = read_password()?;

    if username.is_empty() || password.is_empty() {
        return Err(CamlapseError::auth("a username and password are required"));
    }
    Ok((username, password))
}

fn read_prompt(input: &mut impl BufRead, prompt: &str) -> CamlapseResult<String> {
    eprint!("{prompt}");
    io::stderr().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SessionProvider::new(dir.path().join("nested").join("cookies"));
        assert_eq!(provider.load_cached().unwrap(), None);

        let session = Session::from_cookies([("sessionid", "abc")]);
        provider.save(&session).unwrap();
        assert_eq!(provider.load_cached().unwrap(), Some(session));

        // Flat name -> value map on disk.
        let raw = std::fs::read_to_string(provider.cache_path()).unwrap();
        assert_eq!(raw, r#"{"sessionid":"abc"}"#);

        assert!(provider.clear().unwrap());
        assert!(!provider.clear().unwrap());
        assert_eq!(provider.load_cached().unwrap(), None);
    }

    #[test]
    fn test_empty_or_corrupt_cache_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");
        let provider = SessionProvider::new(&path);

        std::fs::write(&path, "{}").unwrap();
        assert_eq!(provider.load_cached().unwrap(), None);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(provider.load_cached().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_cache_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let provider = SessionProvider::new(dir.path().join("cookies"));
        provider
            .save(&Session::from_cookies([("sessionid", "abc")]))
            .unwrap();
        let mode = std::fs::metadata(provider.cache_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_authenticate_prefers_cache() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SessionProvider::new(dir.path().join("cookies"))
            .with_login_url("http://127.0.0.1:9/unreachable");
        let session = Session::from_cookies([("sessionid", "cached")]);
        provider.save(&session).unwrap();

        let got = provider.authenticate(Some("u"), Some("p")).await.unwrap();
        assert_eq!(got, session);
    }

    #[test]
    fn test_read_prompt_trims_line() {
        let mut input = io::Cursor::new(b"alice\nsecret\n".to_vec());
        assert_eq!(read_prompt(&mut input, "user: ").unwrap(), "alice");
        assert_eq!(read_prompt(&mut input, "pass: ").unwrap(), "secret");
    }

    #[test]
    fn test_password_never_comes_from_the_echoed_input() {
        let mut input = io::Cursor::new(b"alice\nvisible\n".to_vec());
        let (username, password) =
            read_credentials(&mut input, None, || Ok("hidden".to_string())).unwrap();
        assert_eq!(username, "alice");
        assert_eq!(password, "hidden");

        // Only the username line was consumed.
        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "visible\n");
    }

    #[test]
    fn test_given_username_skips_the_prompt() {
        let mut input = io::Cursor::new(Vec::new());
        let (username, _) =
            read_credentials(&mut input, Some("bob".to_string()), || Ok("pw".to_string()))
                .unwrap();
        assert_eq!(username, "bob");
    }

    #[test]
    fn test_empty_password_is_rejected() {
        let mut input = io::Cursor::new(b"alice\n".to_vec());
        let err = read_credentials(&mut input, None, || Ok(String::new())).unwrap_err();
        assert!(matches!(err, CamlapseError::Auth { .. }));
    }

    #[test]
    fn test_parse_cookie_header() {
        assert_eq!(
            parse_cookie_header("sessionid=abc; website_2=x=y"),
            [
                ("sessionid".to_string(), "abc".to_string()),
                ("website_2".to_string(), "x=y".to_string())
            ]
        );
        assert!(parse_cookie_header("").is_empty());
    }

    #[test]
    fn test_expand_home() {
        let plain = PathBuf::from("/tmp/cookies");
        assert_eq!(expand_home(plain.clone()), plain);
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home(PathBuf::from("~/.dropcam_cookie_cache")),
                home.join(".dropcam_cookie_cache")
            );
        }
    }
}
