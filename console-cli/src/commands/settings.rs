use console_core::ConsoleSettings;
use std::path::Path;
use tracing::info;

pub fn show(settings: &ConsoleSettings) -> anyhow::Result<()> {
    println!("base_url:  {}", settings.base_url);
    println!("admin_key: {}", mask(&settings.admin_key));
    println!("timeout:   {}s", settings.timeout_secs);
    Ok(())
}

pub fn set(
    settings: &mut ConsoleSettings,
    path: &Path,
    base_url: Option<String>,
    admin_key: Option<String>,
) -> anyhow::Result<()> {
    settings.update(base_url, admin_key);
    settings.save(path)?;
    info!(path = %path.display(), "settings saved");
    show(settings)
}

/// Show only the last four characters of a key.
pub fn mask(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".into();
    }
    let visible: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if key.chars().count() <= 4 {
        "****".into()
    } else {
        format!("****{visible}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_hides_all_but_tail() {
        assert_eq!(mask(""), "(not set)");
        assert_eq!(mask("abc"), "****");
        assert_eq!(mask("edd1c9f034335f136f87ad84b625c8f1"), "****c8f1");
    }

    #[test]
    fn set_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.yaml");
        let mut settings = ConsoleSettings::default();
        set(&mut settings, &path, Some("http://gw:9180".into()), Some("k1".into())).unwrap();
        let loaded = ConsoleSettings::load(&path).unwrap();
        assert_eq!(loaded.base_url, "http://gw:9180");
        assert_eq!(loaded.admin_key, "k1");
    }
}
