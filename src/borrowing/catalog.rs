// Book metadata used to decorate borrow history

use std::collections::HashMap;

use super::models::BorrowInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub isbn: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookCatalog {
    books: HashMap<String, BookDetails>,
}

impl BookCatalog {
    pub fn empty() -> Self {
        Self {
            books: HashMap::new(),
        }
    }

    pub fn insert(&mut self, book_id: impl Into<String>, details: BookDetails) {
        self.books.insert(book_id.into(), details);
    }

    pub fn lookup(&self, book_id: &str) -> Option<&BookDetails> {
        self.books.get(book_id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// The demo shelf: four titles with no category or ISBN on file
impl Default for BookCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        for (id, title, author) in [
            ("BK001", "The Great Gatsby", "F. Scott Fitzgerald"),
            ("BK002", "To Kill a Mockingbird", "Harper Lee"),
            ("BK003", "1984", "George Orwell"),
            ("BK004", "Angular Complete Guide", "John Smith"),
        ] {
            catalog.insert(
                id,
                BookDetails {
                    title: title.to_string(),
                    author: author.to_string(),
                    category: None,
                    isbn: None,
                },
            );
        }
        catalog
    }
}

/// Fixed borrowing figures for the two demo accounts, served for ids that
/// are not in the registry when the demo fallback is enabled
pub fn demo_borrow_info() -> Vec<BorrowInfo> {
    vec![
        BorrowInfo {
            library_id: "LIB123456".to_string(),
            name: "Avadhi Jain".to_string(),
            email: "avadhi@example.com".to_string(),
            current_borrowed_count: 2,
            max_books_allowed: 5,
            fines: 0,
            overdue_books: 0,
            is_eligible: true,
        },
        BorrowInfo {
            library_id: "LIB789012".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            current_borrowed_count: 4,
            max_books_allowed: 5,
            fines: 25,
            overdue_books: 1,
            is_eligible: false,
        },
    ]
}
