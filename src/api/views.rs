//! Server-rendered HTML pages.

use crate::domain::{Book, Loan, LoanStatus, Member};
use axum::http::StatusCode;
use std::collections::HashMap;

const CSS: &str = r#"
body { font-family: sans-serif; margin: 2rem auto; max-width: 960px; color: #222; }
nav a { margin-right: 1rem; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
th, td { border-bottom: 1px solid #ddd; padding: 0.4rem; text-align: left; }
form label { display: block; margin-top: 0.6rem; }
.status-ACTIVE { color: #1a7f37; }
.status-OVERDUE { color: #cf222e; }
.status-RETURNED { color: #6e7781; }
.error { color: #cf222e; }
"#;

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title} - Library</title>
    <style>{css}</style>
</head>
<body>
    <nav><a href="/">Home</a><a href="/books">Books</a><a href="/members">Members</a><a href="/loans">Loans</a></nav>
    <h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape(title),
        css = CSS,
        body = body,
    )
}

fn optional(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_default()
}

pub fn menu_page() -> String {
    layout(
        "Library",
        r#"    <ul>
        <li><a href="/books">Books</a></li>
        <li><a href="/members">Members</a></li>
        <li><a href="/loans">Loans</a></li>
    </ul>"#,
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"    <p class="error">{}</p>
    <p><a href="/">Back to menu</a></p>"#,
        escape(message)
    );
    layout(&format!("Error {}", status.as_u16()), &body)
}

// ============================================================================
// Books
// ============================================================================

pub fn books_page(books: &[Book]) -> String {
    let rows: String = books
        .iter()
        .map(|book| {
            format!(
                r#"        <tr><td>{title}</td><td>{author}</td><td>{isbn}</td><td>{category}</td>
            <td><a href="/books/edit/{id}">Edit</a> <a href="/books/delete/{id}">Delete</a></td></tr>
"#,
                id = book.id,
                title = escape(&book.title),
                author = escape(&book.author),
                isbn = escape(&book.isbn),
                category = optional(book.category.as_deref()),
            )
        })
        .collect();

    let body = format!(
        r#"    <p><a href="/books/new">New book</a></p>
    <table>
        <tr><th>Title</th><th>Author</th><th>ISBN</th><th>Category</th><th></th></tr>
{rows}    </table>"#
    );
    layout("Books", &body)
}

/// New-book form, or the edit form when `book` is given
pub fn book_form_page(book: Option<&Book>) -> String {
    let title = if book.is_some() { "Edit book" } else { "New book" };
    let body = format!(
        r#"    <form method="post" action="/books/save">
        <input type="hidden" name="id" value="{id}">
        <label>Title <input name="title" value="{title}" required></label>
        <label>Author <input name="author" value="{author}" required></label>
        <label>ISBN <input name="isbn" value="{isbn}" maxlength="13" required></label>
        <label>Category <input name="category" value="{category}"></label>
        <p><button type="submit">Save</button></p>
    </form>"#,
        id = book.map(|b| b.id.to_string()).unwrap_or_default(),
        title = optional(book.map(|b| b.title.as_str())),
        author = optional(book.map(|b| b.author.as_str())),
        isbn = optional(book.map(|b| b.isbn.as_str())),
        category = optional(book.and_then(|b| b.category.as_deref())),
    );
    layout(title, &body)
}

// ============================================================================
// Members
// ============================================================================

pub fn members_page(members: &[Member]) -> String {
    let rows: String = members
        .iter()
        .map(|member| {
            format!(
                r#"        <tr><td>{name}</td><td>{email}</td><td>{penalty}</td>
            <td><a href="/members/edit/{id}">Edit</a> <a href="/members/delete/{id}">Delete</a></td></tr>
"#,
                id = member.id,
                name = escape(&member.name),
                email = escape(&member.email),
                penalty = member
                    .penalty_until
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            )
        })
        .collect();

    let body = format!(
        r#"    <p><a href="/members/new">New member</a></p>
    <table>
        <tr><th>Name</th><th>Email</th><th>Penalty until</th><th></th></tr>
{rows}    </table>"#
    );
    layout("Members", &body)
}

pub fn member_form_page(member: Option<&Member>) -> String {
    let title = if member.is_some() {
        "Edit member"
    } else {
        "New member"
    };
    let body = format!(
        r#"    <form method="post" action="/members/save">
        <input type="hidden" name="id" value="{id}">
        <label>Name <input name="name" value="{name}" required></label>
        <label>Email <input type="email" name="email" value="{email}" required></label>
        <label>Penalty until <input type="date" name="penalty_until" value="{penalty}"></label>
        <p><button type="submit">Save</button></p>
    </form>"#,
        id = member.map(|m| m.id.to_string()).unwrap_or_default(),
        name = optional(member.map(|m| m.name.as_str())),
        email = optional(member.map(|m| m.email.as_str())),
        penalty = member
            .and_then(|m| m.penalty_until)
            .map(|d| d.to_string())
            .unwrap_or_default(),
    );
    layout(title, &body)
}

// ============================================================================
// Loans
// ============================================================================

/// Loan list with book titles and member names resolved
pub fn loans_page(loans: &[Loan], books: &[Book], members: &[Member]) -> String {
    let titles: HashMap<_, _> = books.iter().map(|b| (b.id, b.title.as_str())).collect();
    let names: HashMap<_, _> = members.iter().map(|m| (m.id, m.name.as_str())).collect();

    let rows: String = loans
        .iter()
        .map(|loan| {
            let return_link = if loan.status == LoanStatus::Returned {
                String::new()
            } else {
                format!(r#"<a href="/loans/return/{}">Return</a> "#, loan.id)
            };
            format!(
                r#"        <tr><td>{book}</td><td>{member}</td><td>{start}</td><td>{due}</td><td class="status-{status}">{status}</td>
            <td>{return_link}<a href="/loans/delete/{id}">Delete</a></td></tr>
"#,
                id = loan.id,
                book = optional(titles.get(&loan.book_id).copied()),
                member = optional(names.get(&loan.member_id).copied()),
                start = loan.start_date,
                due = loan.due_date,
                status = loan.status,
            )
        })
        .collect();

    let body = format!(
        r#"    <p><a href="/loans/new">New loan</a></p>
    <table>
        <tr><th>Book</th><th>Member</th><th>Start</th><th>Due / returned</th><th>Status</th><th></th></tr>
{rows}    </table>"#
    );
    layout("Loans", &body)
}

pub fn loan_form_page(books: &[Book], members: &[Member]) -> String {
    let book_options: String = books
        .iter()
        .map(|b| format!(r#"<option value="{}">{}</option>"#, b.id, escape(&b.title)))
        .collect();
    let member_options: String = members
        .iter()
        .map(|m| format!(r#"<option value="{}">{}</option>"#, m.id, escape(&m.name)))
        .collect();

    let body = format!(
        r#"    <form method="post" action="/loans/save">
        <label>Book <select name="book_id" required>{book_options}</select></label>
        <label>Member <select name="member_id" required>{member_options}</select></label>
        <label>Start date <input type="date" name="start_date"></label>
        <label>Due date <input type="date" name="due_date"></label>
        <p><button type="submit">Save</button></p>
    </form>"#
    );
    layout("New loan", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookId, LoanId, MemberId};
    use chrono::NaiveDate;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_books_page_escapes_titles() {
        let book = Book {
            id: BookId::new(),
            title: "<script>".to_string(),
            author: "A".to_string(),
            isbn: "9780000000000".to_string(),
            category: None,
        };
        let html = books_page(&[book]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_loans_page_resolves_names_and_hides_return_link() {
        let book = Book {
            id: BookId::new(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            isbn: "9780441013593".to_string(),
            category: None,
        };
        let member = Member {
            id: MemberId::new(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            penalty_until: None,
        };
        let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let loan = Loan {
            id: LoanId::new(),
            book_id: book.id,
            member_id: member.id,
            start_date: day,
            due_date: day,
            returned_on: Some(day),
            status: LoanStatus::Returned,
        };

        let html = loans_page(&[loan], &[book], &[member]);
        assert!(html.contains("<td>Dune</td>"));
        assert!(html.contains("<td>Ana</td>"));
        assert!(html.contains("RETURNED"));
        assert!(!html.contains("/loans/return/"));
    }
}
