//! Console front-end for book-registry
//!
//! stdin/stdout <-> application::RegistryController
//!
//! Commands: list, add, find, json, help, quit

use std::io::Write;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use unicode_width::UnicodeWidthStr;

use crate::application::controller::RegistryController;
use crate::domain::model::book::Book;
use crate::domain::store::BookStore;

// =============================================================================
// Public entry point
// =============================================================================

/// コンソールUIを起動する。初期表示でLoadを実行し、以後はコマンドループ。
pub async fn run<S: BookStore>(controller: RegistryController<S>) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    println!("{}", style("Book Registry").bold());
    println!();

    println!("{}", style("Loading...").dim());
    controller.load().await;
    render_after_load(&controller);
    println!();
    println!("Type `help` for commands.");

    loop {
        print!("registry> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "list" | "books" => {
                println!("{}", style("Loading...").dim());
                controller.load().await;
                render_after_load(&controller);
            }
            "add" => handle_add(&controller, &mut lines).await?,
            "find" => handle_find(&controller, &mut lines, rest).await?,
            "json" => {
                let books = controller.state().books;
                println!("{}", serde_json::to_string_pretty(&books)?);
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("Unknown command: {other}. Type `help` for commands."),
        }
    }

    Ok(())
}

// =============================================================================
// Command handlers
// =============================================================================

/// 登録フォーム。3フィールドを順に聞いてSubmitする。
async fn handle_add<S: BookStore>(
    controller: &RegistryController<S>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    let title = prompt(lines, "Title: ").await?;
    let author = prompt(lines, "Author: ").await?;
    let price = prompt(lines, "Price (INR): ").await?;

    controller.set_form(&title, &author, &price);

    println!("{}", style("Adding...").dim());
    controller.submit().await;

    let state = controller.state();
    if let Some(error) = &state.error {
        println!("{}", style(error).red());
    }
    if let Some(success) = &state.success {
        println!("{}", style(success).green());
        println!();
        println!("{}", render_table(&state.books));
    }
    Ok(())
}

/// ID検索。引数がなければ対話で聞く。
async fn handle_find<S: BookStore>(
    controller: &RegistryController<S>,
    lines: &mut Lines<BufReader<Stdin>>,
    arg: &str,
) -> anyhow::Result<()> {
    let id = if arg.is_empty() {
        prompt(lines, "Enter book ID: ").await?
    } else {
        arg.to_string()
    };
    controller.set_search_id(&id);

    println!("{}", style("Searching...").dim());
    controller.search().await;

    let state = controller.state();
    if let Some(error) = &state.search_error {
        println!("{}", style(error).red());
    }
    if let Some(book) = &state.searched_book {
        println!("{}", render_details(book));
    }
    Ok(())
}

fn render_after_load<S: BookStore>(controller: &RegistryController<S>) {
    let state = controller.state();
    if let Some(error) = &state.error {
        println!("{}", style(error).red());
        return;
    }
    println!("{}", render_table(&state.books));
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.unwrap_or_default())
}

fn print_help() {
    println!("Commands:");
    println!("  list         Reload and show the book collection");
    println!("  add          Add a new book (title / author / price)");
    println!("  find <id>    Look up a book by ID");
    println!("  json         Print the collection as the raw list response");
    println!("  help         Show this help");
    println!("  quit         Exit");
    println!();
    println!("{}", render_endpoints());
}

// =============================================================================
// Renderers (pure, snapshot-tested)
// =============================================================================

/// 価格表示。通貨記号と小数2桁はここだけの責務で、保存値には含まれない。
pub fn format_price(price: f64) -> String {
    format!("₹{price:.2}")
}

/// 一覧テーブル。列は表示幅で揃え、行の並びは登録順のまま。
pub fn render_table(books: &[Book]) -> String {
    let mut out = format!("Book Collection ({} books)", books.len());
    if books.is_empty() {
        out.push_str("\n\nNo Books Found\nAdd your first book using the form!");
        return out;
    }

    let headers = ["Book ID", "Title", "Author", "Price"];
    let rows: Vec<[String; 4]> = books
        .iter()
        .map(|b| {
            [
                b.book_id.to_string(),
                b.title.clone(),
                b.author.clone(),
                format_price(b.price),
            ]
        })
        .collect();

    let mut widths = [0usize; 3];
    for (i, w) in widths.iter_mut().enumerate() {
        *w = headers[i].width();
        for row in &rows {
            *w = (*w).max(row[i].width());
        }
    }

    out.push_str("\n\n");
    out.push_str(&format_row(&headers, &widths));
    for row in &rows {
        out.push('\n');
        let cells = [
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ];
        out.push_str(&format_row(&cells, &widths));
    }
    out
}

/// 先頭3列を表示幅でパディングする。最終列はパディングしない。
fn format_row(cells: &[&str; 4], widths: &[usize; 3]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate().take(3) {
        line.push_str(cell);
        let pad = widths[i].saturating_sub(cell.width()) + 2;
        line.push_str(&" ".repeat(pad));
    }
    line.push_str(cells[3]);
    line
}

/// 検索結果の詳細カード。
pub fn render_details(book: &Book) -> String {
    format!(
        "Book Details:\n  {:<8}{}\n  {:<8}{}\n  {:<8}{}\n  {:<8}{}",
        "ID:",
        book.book_id,
        "Title:",
        book.title,
        "Author:",
        book.author,
        "Price:",
        format_price(book.price),
    )
}

/// ストアが鏡映しているRESTエンドポイントの一覧。
pub fn render_endpoints() -> String {
    let mut out = String::from("REST API Endpoints");
    for (method, path) in [
        ("GET", "/api/books"),
        ("GET", "/api/books/{id}"),
        ("POST", "/api/books"),
    ] {
        out.push_str(&format!("\n  {method:<5} {path}"));
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
