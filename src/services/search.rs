use crate::models::CatalogEntry;

/// Finds all catalog entries whose title matches exactly,
/// case-insensitively, preserving catalog order
///
/// Duplicate titles are expected (remakes, re-releases); callers
/// disambiguate by release year.
pub fn find_by_title<'a>(catalog: &'a [CatalogEntry], title: &str) -> Vec<&'a CatalogEntry> {
    let wanted = title.trim().to_lowercase();
    if wanted.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|entry| entry.title.to_lowercase() == wanted)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str, year: i32) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            title: title.to_string(),
            start_year: Some(year),
            genres: Vec::new(),
        }
    }

    #[test]
    fn test_find_by_title_case_insensitive() {
        let catalog = vec![entry("tt1", "Heat", 1995), entry("tt2", "Ronin", 1998)];
        let matches = find_by_title(&catalog, "heat");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "tt1");
    }

    #[test]
    fn test_find_by_title_returns_duplicates_in_order() {
        let catalog = vec![
            entry("tt1", "Nosferatu", 1922),
            entry("tt2", "Dracula", 1931),
            entry("tt3", "Nosferatu", 2024),
        ];
        let matches = find_by_title(&catalog, "Nosferatu");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "tt1");
        assert_eq!(matches[1].id, "tt3");
    }

    #[test]
    fn test_find_by_title_no_match() {
        let catalog = vec![entry("tt1", "Heat", 1995)];
        assert!(find_by_title(&catalog, "Collateral").is_empty());
        assert!(find_by_title(&catalog, "  ").is_empty());
    }
}
