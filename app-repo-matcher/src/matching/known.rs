//! Known package to repository mapping.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Repositories known to contain a manifest for each package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownRepos {
    packages: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct KnownReposRow {
    package: String,
    all_repos: String,
}

impl KnownRepos {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses CSV with a `package` and an `all_repos` column.
    ///
    /// `all_repos` is a comma separated list of repository identifiers.
    /// Other columns are ignored. If a package appears more than once, the
    /// last row wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV is malformed or lacks either column.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut known = Self::new();
        for row in csv::Reader::from_reader(reader).deserialize() {
            let row: KnownReposRow = row?;
            known.insert(row.package, split_repos(&row.all_repos));
        }
        Ok(known)
    }

    /// Sets the known repositories of `package`.
    pub fn insert(&mut self, package: impl Into<String>, repos: Vec<String>) {
        self.packages.insert(package.into(), repos);
    }

    /// Returns the known repositories of `package`.
    pub fn get(&self, package: &str) -> Option<&[String]> {
        self.packages.get(package).map(Vec::as_slice)
    }

    /// Number of packages in the mapping.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn split_repos(all_repos: &str) -> Vec<String> {
    all_repos
        .split(',')
        .map(str::trim)
        .filter(|repo| !repo.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_package_to_repos_csv() {
        let csv = "package,all_repos,count\n\
                   com.example.a,\"owner/a,fork/a\",2\n\
                   com.example.b,owner/b,1\n";

        let known = KnownRepos::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(known.len(), 2);
        assert_eq!(
            known.get("com.example.a"),
            Some(&["owner/a".to_string(), "fork/a".to_string()][..])
        );
        assert_eq!(known.get("com.example.b"), Some(&["owner/b".to_string()][..]));
        assert_eq!(known.get("com.example.c"), None);
    }

    #[test]
    fn last_duplicate_row_wins() {
        let csv = "package,all_repos\ncom.example.a,owner/a\ncom.example.a,owner/b\n";

        let known = KnownRepos::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(known.get("com.example.a"), Some(&["owner/b".to_string()][..]));
    }

    #[test]
    fn skips_empty_entries() {
        assert_eq!(split_repos("a/b,, c/d ,"), vec!["a/b", "c/d"]);
        assert!(split_repos("").is_empty());
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "package,repo\ncom.example.a,owner/a\n";
        assert!(KnownRepos::from_csv(csv.as_bytes()).is_err());
    }
}
