use serde::{Deserialize, Serialize};

use libris_core::{Entity, ItemId, Record, flag};

/// Variant tag of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Book,
    Article,
    Thesis,
    Digital,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Book => "Book",
            ItemKind::Article => "Article",
            ItemKind::Thesis => "Thesis",
            ItemKind::Digital => "Digital",
        }
    }
}

impl core::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemDetails {
    Book { isbn: String, pages: u32 },
    Article { journal: String, volume: u32 },
    Thesis { degree: String, university: String },
    Digital { format: String, size_mb: f64 },
}

impl ItemDetails {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemDetails::Book { .. } => ItemKind::Book,
            ItemDetails::Article { .. } => ItemKind::Article,
            ItemDetails::Thesis { .. } => ItemKind::Thesis,
            ItemDetails::Digital { .. } => ItemKind::Digital,
        }
    }

    fn describe(&self) -> String {
        match self {
            ItemDetails::Book { isbn, pages } => format!("ISBN: {isbn}, Pages: {pages}"),
            ItemDetails::Article { journal, volume } => {
                format!("Journal: {journal}, Volume: {volume}")
            }
            ItemDetails::Thesis { degree, university } => {
                format!("Degree: {degree}, University: {university}")
            }
            ItemDetails::Digital { format, size_mb } => {
                format!("Format: {format}, Size: {size_mb} MB")
            }
        }
    }

    fn record_fields(&self) -> [String; 2] {
        match self {
            ItemDetails::Book { isbn, pages } => [isbn.clone(), pages.to_string()],
            ItemDetails::Article { journal, volume } => [journal.clone(), volume.to_string()],
            ItemDetails::Thesis { degree, university } => [degree.clone(), university.clone()],
            ItemDetails::Digital { format, size_mb } => [format.clone(), size_mb.to_string()],
        }
    }
}

/// Input for creating a catalog entry (id is assigned by the catalog owner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub category: String,
    pub details: ItemDetails,
}

impl NewItem {
    pub fn book(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        category: impl Into<String>,
        isbn: impl Into<String>,
        pages: u32,
    ) -> Self {
        Self::with_details(
            title,
            author,
            publication_year,
            category,
            ItemDetails::Book {
                isbn: isbn.into(),
                pages,
            },
        )
    }

    pub fn article(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        category: impl Into<String>,
        journal: impl Into<String>,
        volume: u32,
    ) -> Self {
        Self::with_details(
            title,
            author,
            publication_year,
            category,
            ItemDetails::Article {
                journal: journal.into(),
                volume,
            },
        )
    }

    pub fn thesis(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        category: impl Into<String>,
        degree: impl Into<String>,
        university: impl Into<String>,
    ) -> Self {
        Self::with_details(
            title,
            author,
            publication_year,
            category,
            ItemDetails::Thesis {
                degree: degree.into(),
                university: university.into(),
            },
        )
    }

    pub fn digital(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        category: impl Into<String>,
        format: impl Into<String>,
        size_mb: f64,
    ) -> Self {
        Self::with_details(
            title,
            author,
            publication_year,
            category,
            ItemDetails::Digital {
                format: format.into(),
                size_mb,
            },
        )
    }

    fn with_details(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        category: impl Into<String>,
        details: ItemDetails,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_year,
            category: category.into(),
            details,
        }
    }
}

/// Partial update of bibliographic fields.
///
/// `None` and empty strings both mean "leave unchanged"; an edit can never
/// clear a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEdit {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_year: Option<i32>,
}

/// A circulating item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    id: ItemId,
    title: String,
    author: String,
    publication_year: i32,
    category: String,
    available: bool,
    details: ItemDetails,
}

impl CatalogEntry {
    /// New entries start out available.
    pub fn new(id: ItemId, item: NewItem) -> Self {
        Self {
            id,
            title: item.title,
            author: item.author,
            publication_year: item.publication_year,
            category: item.category,
            available: true,
            details: item.details,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn publication_year(&self) -> i32 {
        self.publication_year
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn details(&self) -> &ItemDetails {
        &self.details
    }

    pub fn kind(&self) -> ItemKind {
        self.details.kind()
    }

    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.title.contains(keyword) || self.author.contains(keyword)
    }

    /// One-line rendering including the variant payload.
    pub fn describe(&self) -> String {
        format!(
            "ID: {}, Type: {}, Title: {}, Author: {}, Year: {}, Category: {}, Available: {} | {}",
            self.id,
            self.kind(),
            self.title,
            self.author,
            self.publication_year,
            self.category,
            if self.available { "Yes" } else { "No" },
            self.details.describe()
        )
    }

    pub(crate) fn apply_edit(&mut self, edit: &ItemEdit) {
        if let Some(title) = edit.title.as_deref().filter(|t| !t.trim().is_empty()) {
            self.title = title.to_string();
        }
        if let Some(author) = edit.author.as_deref().filter(|a| !a.trim().is_empty()) {
            self.author = author.to_string();
        }
        if let Some(year) = edit.publication_year {
            self.publication_year = year;
        }
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

impl Entity for CatalogEntry {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

impl Record for CatalogEntry {
    fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.id.to_string(),
            self.kind().to_string(),
            self.title.clone(),
            self.author.clone(),
            self.publication_year.to_string(),
            self.category.clone(),
            flag(self.available),
        ];
        record.extend(self.details.record_fields());
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thesis() -> CatalogEntry {
        CatalogEntry::new(
            ItemId::new(3),
            NewItem::thesis("On Lending", "Grace", 2019, "CS", "PhD", "MIT"),
        )
    }

    #[test]
    fn new_entries_are_available() {
        assert!(thesis().is_available());
        assert_eq!(thesis().kind(), ItemKind::Thesis);
    }

    #[test]
    fn record_starts_with_id_and_type_tag() {
        let record = thesis().to_record();
        assert_eq!(
            record,
            vec!["3", "Thesis", "On Lending", "Grace", "2019", "CS", "1", "PhD", "MIT"]
        );
    }

    #[test]
    fn record_fields_follow_variant() {
        let book = CatalogEntry::new(
            ItemId::new(1),
            NewItem::book("Dune", "Herbert", 1965, "SciFi", "978-0441", 412),
        );
        assert_eq!(&book.to_record()[7..], &["978-0441".to_string(), "412".to_string()]);

        let article = CatalogEntry::new(
            ItemId::new(2),
            NewItem::article("Paxos", "Lamport", 1998, "CS", "TOCS", 16),
        );
        assert_eq!(&article.to_record()[7..], &["TOCS".to_string(), "16".to_string()]);

        let digital = CatalogEntry::new(
            ItemId::new(4),
            NewItem::digital("Talk", "Hopper", 1982, "CS", "mp4", 2.5),
        );
        assert_eq!(digital.to_record()[1], "Digital");
        assert_eq!(&digital.to_record()[7..], &["mp4".to_string(), "2.5".to_string()]);
    }

    #[test]
    fn edit_ignores_empty_and_missing_fields() {
        let mut entry = thesis();
        entry.apply_edit(&ItemEdit {
            title: Some(String::new()),
            author: None,
            publication_year: Some(2020),
        });
        assert_eq!(entry.title(), "On Lending");
        assert_eq!(entry.author(), "Grace");
        assert_eq!(entry.publication_year(), 2020);

        entry.apply_edit(&ItemEdit {
            title: Some("On Borrowing".to_string()),
            author: Some("Hopper".to_string()),
            publication_year: None,
        });
        assert_eq!(entry.title(), "On Borrowing");
        assert_eq!(entry.author(), "Hopper");
        assert_eq!(entry.publication_year(), 2020);
        assert_eq!(entry.category(), "CS");
    }

    #[test]
    fn describe_includes_payload_and_availability() {
        let mut entry = thesis();
        entry.set_available(false);
        let text = entry.describe();
        assert!(text.contains("Available: No"));
        assert!(text.contains("Degree: PhD, University: MIT"));
    }

    #[test]
    fn keyword_matches_title_or_author() {
        let entry = thesis();
        assert!(entry.matches_keyword("Lending"));
        assert!(entry.matches_keyword("Gra"));
        assert!(!entry.matches_keyword("lending"));
    }

    #[test]
    fn details_serialize_with_type_tag() {
        let json = serde_json::to_value(thesis().details()).unwrap();
        assert_eq!(json["type"], "thesis");
        assert_eq!(json["university"], "MIT");
    }
}
