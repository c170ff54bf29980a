//! JSON file-backed session store with atomic writes.

use std::path::{Path, PathBuf};

use {async_trait::async_trait, tokio::fs, tracing::debug};

use crate::{Context, Error, Result, store::SessionStore};

/// One file per key: `<dir>/<key>.json`.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `<data_dir>/onboarding`.
    pub fn default_path() -> Self {
        Self::new(voira_config::data_dir().join("onboarding"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(Error::invalid_key(key));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomic write: write to a temp file, then rename over the target.
    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create {}", self.dir.display()))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value.as_bytes())
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("rename {} into place", tmp.display()))?;
        debug!(path = %path.display(), "saved onboarding session");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            session::OnboardingSession,
            step::Step,
            store::{load_session, persist_session},
        },
        tempfile::TempDir,
    };

    #[tokio::test]
    async fn write_read_remove() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::new(tmp.path().join("onboarding"));

        assert!(store.read("voira_onboarding_data").await.unwrap().is_none());
        store
            .write("voira_onboarding_data", r#"{"step":2,"data":{}}"#)
            .await
            .unwrap();
        let path = tmp.path().join("onboarding").join("voira_onboarding_data.json");
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        store.remove("voira_onboarding_data").await.unwrap();
        assert!(!path.exists());
        store.remove("voira_onboarding_data").await.unwrap();
    }

    #[tokio::test]
    async fn survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let session = OnboardingSession::new(Step::Phone, Default::default());
        {
            let store = FileSessionStore::new(tmp.path());
            persist_session(&store, "k", &session).await.unwrap();
        }
        let reopened = FileSessionStore::new(tmp.path());
        assert_eq!(load_session(&reopened, "k").await, session);
    }

    #[tokio::test]
    async fn write_errors_name_the_path() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("onboarding");
        std::fs::write(&blocker, "").unwrap();
        let store = FileSessionStore::new(&blocker);
        let err = store.write("k", "{}").await.unwrap_err();
        assert!(err.to_string().starts_with("create "), "{err}");
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileSessionStore::new(tmp.path());
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                store.write(key, "{}").await,
                Err(Error::InvalidKey { .. })
            ));
        }
    }
}
