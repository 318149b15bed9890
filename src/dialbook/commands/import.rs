use crate::commands::helpers::note_stale_list;
use crate::commands::{CmdMessage, CmdResult, Record};
use crate::error::Result;
use crate::gateway::Collection;
use crate::model::Country;
use crate::store::EntityStore;
use std::fs;
use std::path::Path;

/// Bulk-create the countries listed in a JSON array file.
///
/// Every entry is validated before anything is sent; one bad entry aborts
/// the whole import.
pub async fn run<G>(store: &mut EntityStore<Country>, gateway: &G, path: &Path) -> Result<CmdResult>
where
    G: Collection<Country> + ?Sized,
{
    let content = fs::read_to_string(path)?;
    let drafts: Vec<Country> = serde_json::from_str(&content)?;

    let mut result = CmdResult::default();
    if drafts.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No countries found in {}",
            path.display()
        )));
        return Ok(result);
    }

    let created = store.create_all(gateway, &drafts).await?;
    result.add_message(CmdMessage::success(format!(
        "Imported {} countries from {}",
        created.len(),
        path.display()
    )));
    note_stale_list(store, &mut result);
    Ok(result.with_affected(created.into_iter().map(Record::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DialbookError;
    use crate::gateway::memory::InMemoryGateway;
    use tempfile::TempDir;

    fn write(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("countries.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn imports_an_array_of_countries() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"[{"code":"JP","name":"Japan","phoneCode":"+81"},
                {"code":"IT","name":"Italy","phoneCode":"+39"}]"#,
        );
        let gw = InMemoryGateway::new();
        let mut store = EntityStore::new();

        let result = run(&mut store, &gw, &path).await.unwrap();

        assert_eq!(result.affected.len(), 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn one_invalid_entry_aborts_the_import() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"[{"code":"JP","name":"Japan","phoneCode":"+81"},
                {"code":"IT","name":"","phoneCode":"+39"}]"#,
        );
        let gw = InMemoryGateway::new();
        let mut store = EntityStore::new();

        let err = run(&mut store, &gw, &path).await.unwrap_err();

        assert!(matches!(err, DialbookError::Validation(ref m) if m.contains("#2")));
        assert!(gw.countries().is_empty());
    }

    #[tokio::test]
    async fn unreadable_json_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "{ not json");
        let gw = InMemoryGateway::new();
        let mut store = EntityStore::new();

        assert!(matches!(
            run(&mut store, &gw, &path).await,
            Err(DialbookError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn empty_file_imports_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "[]");
        let gw = InMemoryGateway::new();
        let mut store = EntityStore::new();

        let result = run(&mut store, &gw, &path).await.unwrap();

        assert!(result.affected.is_empty());
        assert!(gw.calls().is_empty());
    }
}
