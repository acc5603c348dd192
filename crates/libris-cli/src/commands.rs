use std::collections::BTreeSet;

use anyhow::Context;
use colored::Colorize;
use libris_catalog::{BookAvailability, Library};
use libris_inventory::RecordSnapshot;
use libris_types::Book;
use serde::Serialize;
use serde_json::json;

use crate::cli::*;
use crate::seed::SeedFile;

const DEMO_ISBN: &str = "9780140449136";
const DEMO_REFERENCE_ISBN: &str = "9780199535569";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let seed = match &cli.seed {
        Some(path) => SeedFile::load(path)?,
        None => SeedFile::builtin(),
    };
    let library = seed.into_library()?;
    let format = cli.format;

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => cmd_demo(&library, format),
        Command::List => cmd_list(&library, format),
        Command::Author(args) => {
            let found = library.find_by_author(&args.query)?;
            print_matches("author", &args.query, &found, format)
        }
        Command::Title(args) => {
            let found = library.find_by_title(&args.query)?;
            print_matches("title", &args.query, &found, format)
        }
        Command::Isbn(args) => cmd_isbn(&library, &args.isbn, format),
        Command::Borrow(args) => cmd_borrow(&library, args, format),
    }
}

#[derive(Serialize)]
struct Holding<'a> {
    book: &'a Book,
    #[serde(flatten)]
    counts: RecordSnapshot,
    available_copies: u32,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn availability_line(a: &BookAvailability) -> String {
    let count = if a.book.is_borrowable() {
        format!("available {}", a.available_copies).green()
    } else {
        "reference only".yellow()
    };
    format!("  - {} by {} [{}] ({})", a.book.title().bold(), a.book.author(), a.book.isbn().dimmed(), count)
}

fn print_matches(
    field: &str,
    query: &str,
    found: &BTreeSet<BookAvailability>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(&json!({ field: query, "matches": found }));
    }
    println!("By {field} {}:", query.cyan());
    if found.is_empty() {
        println!("  - no matches");
    }
    for a in found {
        println!("{}", availability_line(a));
    }
    Ok(())
}

fn cmd_demo(library: &Library, format: OutputFormat) -> anyhow::Result<()> {
    let homer = library.find_by_author("Homer")?;
    let can_borrow = library.can_borrow(DEMO_ISBN)?;
    let borrowed = library.borrow(DEMO_ISBN)?;
    let borrowed_reference = library.borrow(DEMO_REFERENCE_ISBN)?;
    let total_borrowed = library.total_borrowed_count()?;
    let remaining_isbn = library.remaining_by_isbn(DEMO_ISBN)?;
    let remaining_title = library.remaining_by_title("The Iliad")?;
    let remaining_author = library.remaining_by_author("Homer")?;
    let odyssey = library.find_by_isbn(DEMO_ISBN).ok();

    if format == OutputFormat::Json {
        return print_json(&json!({
            "by_author_homer": homer,
            "can_borrow_odyssey": can_borrow,
            "borrow_odyssey": borrowed,
            "borrow_reference": borrowed_reference,
            "total_borrowed": total_borrowed,
            "remaining_by_isbn": remaining_isbn,
            "remaining_by_title": remaining_title,
            "remaining_by_author": remaining_author,
            "odyssey": odyssey,
        }));
    }

    println!("By author {}:", "Homer".cyan());
    if homer.is_empty() {
        println!("  - no matches");
    }
    for a in &homer {
        println!("{}", availability_line(a));
    }
    println!("Can borrow The Odyssey: {}", yes_no(can_borrow));
    println!("Borrow The Odyssey: {}", yes_no(borrowed));
    println!("Borrow reference book: {}", yes_no(borrowed_reference));
    println!("Total borrowed: {}", total_borrowed.to_string().bold());
    println!("Remaining by ISBN (The Odyssey): {remaining_isbn}");
    println!("Remaining by title (The Iliad): {remaining_title}");
    println!("Remaining by author (Homer): {remaining_author}");
    match odyssey {
        Some(a) => println!("By ISBN: {} available {}", a.book.title(), a.available_copies),
        None => println!("By ISBN: {} not in catalog", DEMO_ISBN.dimmed()),
    }
    Ok(())
}

fn cmd_list(library: &Library, format: OutputFormat) -> anyhow::Result<()> {
    let records = library.store().find_all().context("listing inventory")?;
    let holdings: Vec<Holding<'_>> = records
        .iter()
        .map(|record| {
            let counts = record.snapshot();
            Holding {
                book: record.book(),
                counts,
                available_copies: counts.available_copies(),
            }
        })
        .collect();

    if format == OutputFormat::Json {
        return print_json(&holdings);
    }
    if holdings.is_empty() {
        println!("Catalog is empty.");
    }
    for h in &holdings {
        println!(
            "{}  {} by {}  [{}]  total {} / borrowed {} / available {}",
            h.book.isbn().yellow(),
            h.book.title().bold(),
            h.book.author(),
            h.book.category(),
            h.counts.total_copies,
            h.counts.borrowed_copies,
            h.available_copies.to_string().green(),
        );
    }
    Ok(())
}

fn cmd_isbn(library: &Library, isbn: &str, format: OutputFormat) -> anyhow::Result<()> {
    let found = library.find_by_isbn(isbn)?;
    if format == OutputFormat::Json {
        return print_json(&found);
    }
    println!("{}", availability_line(&found));
    Ok(())
}

fn cmd_borrow(library: &Library, args: BorrowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let outcomes = (0..args.times)
        .map(|_| library.borrow(&args.isbn))
        .collect::<Result<Vec<bool>, _>>()?;
    let remaining = library.remaining_by_isbn(&args.isbn)?;

    if format == OutputFormat::Json {
        return print_json(&json!({
            "isbn": args.isbn,
            "outcomes": outcomes,
            "remaining": remaining,
        }));
    }
    for (attempt, ok) in outcomes.iter().enumerate() {
        println!("Borrow #{} of {}: {}", attempt + 1, args.isbn.yellow(), yes_no(*ok));
    }
    println!("Remaining: {remaining}");
    Ok(())
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value {
        "yes".green()
    } else {
        "no".red()
    }
}
