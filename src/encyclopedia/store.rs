// region:    --- Imports
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

// endregion: --- Imports

pub const ENTRY_EXTENSION: &str = "md";
pub const MAX_TITLE_LENGTH: usize = 100;

// region:    --- Search Result

/// 검색 결과. 제목이 정확히 일치하면 `Exact`, 아니면 부분 일치 목록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchResult {
    Exact(String),
    Partial(Vec<String>),
}

/// 대소문자를 구분하는 제목 검색
pub fn search_titles(titles: &[String], query: &str) -> SearchResult {
    if let Some(title) = titles.iter().find(|title| title.as_str() == query) {
        return SearchResult::Exact(title.clone());
    }
    SearchResult::Partial(
        titles
            .iter()
            .filter(|title| title.contains(query))
            .cloned()
            .collect(),
    )
}

// endregion: --- Search Result

// region:    --- Entry Store Trait

/// 백과사전 항목 저장소 트레이트
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// 모든 항목 제목 (정렬됨)
    async fn list_entries(&self) -> AppResult<Vec<String>>;

    /// 항목 저장. 있으면 덮어쓴다
    async fn save_entry(&self, title: &str, content: &str) -> AppResult<()>;

    /// 항목 조회. 없으면 None
    async fn get_entry(&self, title: &str) -> AppResult<Option<String>>;

    async fn search(&self, query: &str) -> AppResult<SearchResult> {
        let titles = self.list_entries().await?;
        Ok(search_titles(&titles, query))
    }

    /// 임의의 항목 제목. 항목이 없으면 None
    async fn random_entry(&self) -> AppResult<Option<String>> {
        let titles = self.list_entries().await?;
        Ok(titles.choose(&mut rand::rng()).cloned())
    }
}

/// 제목 검증. 파일 이름으로 쓰이므로 경로 구분자를 허용하지 않는다
pub fn validate_title(title: &str) -> AppResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("title", crate::validation::REQUIRED));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation(
            "title",
            format!("Ensure this value has at most {} characters.", MAX_TITLE_LENGTH),
        ));
    }
    if title.starts_with('.') || title.contains(['/', '\\', '\0']) {
        return Err(AppError::validation(
            "title",
            "Title must not contain path separators.",
        ));
    }
    Ok(title)
}

// endregion: --- Entry Store Trait

// region:    --- File Entry Store

/// 항목마다 `<제목>.md` 파일 하나로 저장하는 구현체
pub struct FileEntryStore {
    dir: PathBuf,
}

impl FileEntryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 저장 디렉터리가 없으면 생성
    pub async fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let store = Self::new(dir);
        tokio::fs::create_dir_all(&store.dir).await?;
        info!("{:<12} --> 항목 디렉터리: {}", "Wiki", store.dir.display());
        Ok(store)
    }

    fn path_for(&self, title: &str) -> AppResult<PathBuf> {
        let title = validate_title(title)?;
        Ok(self.dir.join(format!("{}.{}", title, ENTRY_EXTENSION)))
    }
}

#[async_trait]
impl EntryStore for FileEntryStore {
    async fn list_entries(&self) -> AppResult<Vec<String>> {
        let mut titles = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(titles),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                titles.push(stem.to_string());
            }
        }

        titles.sort();
        Ok(titles)
    }

    async fn save_entry(&self, title: &str, content: &str) -> AppResult<()> {
        let path = self.path_for(title)?;
        tokio::fs::write(&path, content).await?;
        debug!("{:<12} --> 항목 저장: {}", "Wiki", path.display());
        Ok(())
    }

    async fn get_entry(&self, title: &str) -> AppResult<Option<String>> {
        let path = match self.path_for(title) {
            Ok(path) => path,
            // 파일 이름이 될 수 없는 제목은 존재할 수도 없다
            Err(AppError::Validation(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// endregion: --- File Entry Store

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn saved_entries_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEntryStore::open(dir.path()).await.unwrap();

        let content = "# Python\n\nPython is a *programming language*.\n";
        store.save_entry("Python", content).await.unwrap();
        assert_eq!(store.get_entry("Python").await.unwrap().as_deref(), Some(content));
        assert_eq!(store.get_entry("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_overwrites_existing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEntryStore::open(dir.path()).await.unwrap();

        store.save_entry("CSS", "old").await.unwrap();
        store.save_entry("CSS", "new").await.unwrap();
        assert_eq!(store.get_entry("CSS").await.unwrap().as_deref(), Some("new"));
        assert_eq!(store.list_entries().await.unwrap(), titles(&["CSS"]));
    }

    #[tokio::test]
    async fn lists_only_markdown_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEntryStore::open(dir.path()).await.unwrap();

        store.save_entry("Python", "p").await.unwrap();
        store.save_entry("Django", "d").await.unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), "ignored")
            .await
            .unwrap();

        assert_eq!(
            store.list_entries().await.unwrap(),
            titles(&["Django", "Python"])
        );
    }

    #[tokio::test]
    async fn missing_directory_has_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEntryStore::new(dir.path().join("absent"));
        assert!(store.list_entries().await.unwrap().is_empty());
        assert_eq!(store.random_entry().await.unwrap(), None);
    }

    #[tokio::test]
    async fn random_entry_is_an_existing_title() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEntryStore::open(dir.path()).await.unwrap();
        store.save_entry("Git", "g").await.unwrap();
        store.save_entry("HTML", "h").await.unwrap();

        let title = store.random_entry().await.unwrap().unwrap();
        assert!(["Git", "HTML"].contains(&title.as_str()));
    }

    #[test]
    fn search_prefers_exact_match_and_is_case_sensitive() {
        let all = titles(&["CSS", "Django", "Git", "HTML", "Python"]);
        assert_eq!(search_titles(&all, "Git"), SearchResult::Exact("Git".to_string()));
        assert_eq!(
            search_titles(&all, "y"),
            SearchResult::Partial(titles(&["Python"]))
        );
        assert_eq!(search_titles(&all, "git"), SearchResult::Partial(vec![]));
    }

    #[test]
    fn titles_cannot_escape_the_directory() {
        assert!(validate_title("../secret").is_err());
        assert!(validate_title("a/b").is_err());
        assert!(validate_title("  ").is_err());
        assert_eq!(validate_title(" Rust ").unwrap(), "Rust");
    }

    #[tokio::test]
    async fn invalid_titles_are_never_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEntryStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get_entry("../etc/passwd").await.unwrap(), None);
        assert!(store.save_entry("../escape", "x").await.is_err());
    }
}
